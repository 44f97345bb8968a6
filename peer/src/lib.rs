#![deny(rust_2018_idioms)]

use crate::{game_handler::GameInform, session_handler::SessionInform};

pub mod cm_says_handler;
pub mod game_handler;
pub mod io;
pub mod session_handler;

/// Notifications for the UI collaborator. The handlers only produce hard
/// errors on codec misuse; everything the UI has to react to (status
/// changes, display feedback, outgoing frames) arrives here.
pub enum InformEvent {
    SessionInform(SessionInform),
    GameInform(GameInform),
    /// A frame was serialized and handed to the transport.
    FrameReady(Vec<u8>),
}
