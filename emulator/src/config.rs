use anyhow::anyhow;
use common::constants::DEVICE_NAME;
use once_cell::sync::OnceCell;
use std::{
    env::{self, VarError},
    time::Duration,
};

const DEVICE_NAME_ENV_VAR: &str = "CM_DEVICE_NAME";
const MAX_FPS_ENV_VAR: &str = "CM_MAX_FPS";
const HANDSHAKE_STATUS_ENV_VAR: &str = "CM_HANDSHAKE_STATUS";
const ROUNDS_ENV_VAR: &str = "CM_ROUNDS";
const SETTLE_DELAY_MS_ENV_VAR: &str = "CM_SETTLE_DELAY_MS";

const DEFAULT_MAX_FPS: u8 = 30;
const DEFAULT_ROUNDS: usize = 3;
// The 2 s protocol default makes an interactive demo sluggish; the emulated
// machine answers instantly, so a short settle is enough here.
const DEFAULT_SETTLE_DELAY_MS: u64 = 200;

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

pub struct Config {
    pub device_name: String,
    pub max_fps: u8,
    pub handshake_status: u8,
    pub rounds: usize,
    pub settle_delay: Duration,
}

impl Config {
    pub fn get() -> anyhow::Result<&'static Config> {
        GLOBAL_CONFIG.get_or_try_init(Self::from_env)
    }

    fn from_env() -> anyhow::Result<Self> {
        let device_name = Self::parse_or_default(
            DEVICE_NAME_ENV_VAR,
            |var| Ok::<_, anyhow::Error>(var),
            DEVICE_NAME.to_owned(),
        )?;
        let max_fps = Self::parse_or_default(MAX_FPS_ENV_VAR, |var| var.parse(), DEFAULT_MAX_FPS)?;
        let handshake_status =
            Self::parse_or_default(HANDSHAKE_STATUS_ENV_VAR, |var| var.parse(), 0)?;
        let rounds = Self::parse_or_default(ROUNDS_ENV_VAR, |var| var.parse(), DEFAULT_ROUNDS)?;
        let settle_delay_ms = Self::parse_or_default(
            SETTLE_DELAY_MS_ENV_VAR,
            |var| var.parse(),
            DEFAULT_SETTLE_DELAY_MS,
        )?;

        if max_fps == 0 {
            return Err(anyhow!("{MAX_FPS_ENV_VAR} must be at least 1"));
        }

        Ok(Self {
            device_name,
            max_fps,
            handshake_status,
            rounds,
            settle_delay: Duration::from_millis(settle_delay_ms),
        })
    }

    fn parse_or_default<T, F, E>(env_var: &str, parse: F, default: T) -> anyhow::Result<T>
    where
        F: FnOnce(String) -> Result<T, E>,
        E: Into<anyhow::Error>,
    {
        match env::var(env_var) {
            Ok(var) => parse(var).map_err(Into::into),
            Err(VarError::NotPresent) => Ok(default),
            Err(error @ VarError::NotUnicode(_)) => {
                Err(anyhow!("Failed to parse env var {env_var}: {error}"))
            }
        }
    }
}
