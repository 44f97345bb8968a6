use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

pub type DeviceId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: String,
}

/// Completion events delivered by a [`Transport`]. Every operation on the
/// transport finishes asynchronously with exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Enumeration of bonded devices finished.
    Devices(Vec<DeviceInfo>),
    ListFailed,
    Connected,
    ConnectFailed,
    WriteOk,
    WriteFailed,
    Read(Vec<u8>),
    ReadFailed,
    /// The remote side went away. Terminal for the session.
    Disconnected,
}

/// Returned when the transport worker is no longer accepting requests.
#[derive(Debug)]
pub struct SendError;

impl Display for SendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "transport worker gone")
    }
}

impl StdError for SendError {}

/// A single ordered, reliable byte stream to the display controller plus
/// device enumeration. Implementations receive a [`Sender`] at construction
/// and report every completion through it; none of the methods may assume
/// synchronous completion.
pub trait Transport: Sized {
    fn list(&mut self) -> Result<(), SendError>;

    fn connect(&mut self, id: &DeviceId) -> Result<(), SendError>;

    fn write(&mut self, data: Vec<u8>) -> Result<(), SendError>;

    fn read(&mut self) -> Result<(), SendError>;
}

/// Owns a transport and the channel its completions arrive on.
pub struct IoHandle<T> {
    transport: T,
    receiver: Receiver<TransportEvent>,
}

impl<T: Transport> IoHandle<T> {
    pub fn new<F>(make_transport: F) -> Self
    where F: FnOnce(Sender<TransportEvent>) -> T {
        let (sender, receiver) = unbounded();
        Self {
            transport: make_transport(sender),
            receiver,
        }
    }

    /// Tries to receive the next completion event without blocking. A
    /// disconnected channel means the transport worker is gone, which is
    /// reported as [`TransportEvent::Disconnected`].
    pub fn recv(&self) -> Option<TransportEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(TransportEvent::Disconnected),
        }
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }
}
