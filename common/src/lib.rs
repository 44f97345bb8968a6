#![deny(rust_2018_idioms)]

pub mod constants;
pub mod frame;
pub mod messages;
pub mod timer;
