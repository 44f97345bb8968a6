use std::time::Duration;

pub const PROTOCOL_VERSION: u8 = 1;

pub const GRID_WIDTH: u8 = 24;
pub const GRID_HEIGHT: u8 = 24;
pub const COLOR_MODE_GRAYSCALE: u8 = 0;

pub const APP_NAME: &str = "Connection Machine Says App";

/// Advertised name of the display controller among the bonded devices.
pub const DEVICE_NAME: &str = "ledpi-teco";

/// How long to wait after a successful handshake write before reading the
/// response. The remote side sends no acknowledgement, so this has to be
/// conservative.
pub const HANDSHAKE_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Period of the automatic sequence playback.
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(500);

/// How long a lit panel stays on before it is cleared again.
pub const FEEDBACK_CLEAR_DELAY: Duration = Duration::from_millis(400);

/// Pause between winning a round and the replay of the longer sequence.
pub const ROUND_PAUSE: Duration = Duration::from_millis(500);

/// Pause between losing and the replay of the losing flash sequence.
pub const LOSS_PAUSE: Duration = Duration::from_millis(300);
