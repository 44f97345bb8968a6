mod message_component;
pub use message_component::*;
pub mod ledm;
