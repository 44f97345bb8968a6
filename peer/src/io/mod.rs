pub mod handle;
pub mod loopback;

pub use handle::*;
pub use loopback::*;
