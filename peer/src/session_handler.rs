//! Connection lifecycle of one display session: enumerate bonded devices,
//! connect, perform the versioned handshake, then emit frames at the rate
//! the controller granted.
//!
//! The handler is pure state: transport completions come in through
//! [`SessionHandler::handle`], time comes in through
//! [`SessionHandler::poll`], and everything the caller has to do comes back
//! out as [`SessionAction`]s. Failures during search, connect and handshake
//! are terminal for the session; there is no automatic retry.

use crate::{
    io::{DeviceId, TransportEvent},
    InformEvent,
};
use common::{
    constants::{
        APP_NAME,
        COLOR_MODE_GRAYSCALE,
        DEVICE_NAME,
        GRID_HEIGHT,
        GRID_WIDTH,
        HANDSHAKE_SETTLE_DELAY,
        PROTOCOL_VERSION,
    },
    messages::{
        ledm::{HandshakeRequest, HandshakeResponse},
        MessageComponent,
    },
    timer::Timers,
};
use std::{
    io::Cursor,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub device_name: String,
    pub app_name: String,
    pub width: u8,
    pub height: u8,
    pub color_mode: u8,
    pub settle_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_name: DEVICE_NAME.to_owned(),
            app_name: APP_NAME.to_owned(),
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            color_mode: COLOR_MODE_GRAYSCALE,
            settle_delay: HANDSHAKE_SETTLE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    /// The request write has not completed yet.
    AwaitingWrite,
    /// Write completed; waiting out the settle delay before reading.
    Settling,
    /// Read was issued; waiting for the response bytes.
    AwaitingRead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Searching,
    Connecting,
    HandshakePending(HandshakePhase),
    Streaming,
    Failed(SessionFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFailure {
    DeviceNotFound,
    ListError,
    ConnectError,
    HandshakeWriteError,
    HandshakeReadError,
    HandshakeRejected(u8),
    MalformedResponse,
    Disconnected,
}

/// What the caller has to do next on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    ListDevices,
    Connect(DeviceId),
    Write(Vec<u8>),
    Read,
    /// Serialize the current frame buffer and write it.
    EmitFrame,
}

pub enum SessionInform {
    StatusChanged(State),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTask {
    SettleRead,
    EmitFrame,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("codec error: {0}")]
    Codec(#[from] common::messages::Error),
    #[error("unexpected transport event {0:?} in state {1:?}")]
    UnexpectedEvent(TransportEvent, State),
}

pub struct SessionHandler {
    config: SessionConfig,
    state: State,
    timers: Timers<SessionTask>,
    max_fps: Option<u8>,
}

impl SessionHandler {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            timers: Timers::new(),
            max_fps: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn max_fps(&self) -> Option<u8> {
        self.max_fps
    }

    /// Period of the frame emission ticker once a rate is negotiated.
    pub fn frame_interval(&self) -> Option<Duration> {
        self.max_fps
            .map(|fps| Duration::from_secs(1) / u32::from(fps))
    }

    /// Begins the session by enumerating bonded devices. No-op unless idle.
    pub fn start(&mut self, events: &mut Vec<InformEvent>) -> Option<SessionAction> {
        if self.state != State::Idle {
            return None;
        }
        self.set_state(State::Searching, events);
        Some(SessionAction::ListDevices)
    }

    /// Tears the session back down to `Idle` so it can be started again.
    /// This is the only way out of `Failed`.
    pub fn reset(&mut self, events: &mut Vec<InformEvent>) {
        self.timers.clear();
        self.max_fps = None;
        self.set_state(State::Idle, events);
    }

    pub fn handle(
        &mut self,
        event: TransportEvent,
        now: Instant,
        events: &mut Vec<InformEvent>,
    ) -> Result<Option<SessionAction>, SessionError> {
        // Completions can trail a failure; once failed, drop them.
        if let State::Failed(_) = self.state {
            return Ok(None);
        }

        if event == TransportEvent::Disconnected {
            self.fail(SessionFailure::Disconnected, events);
            return Ok(None);
        }

        match self.state {
            State::Searching => match event {
                TransportEvent::Devices(devices) => {
                    match devices
                        .into_iter()
                        .find(|device| device.name == self.config.device_name)
                    {
                        Some(device) => {
                            self.set_state(State::Connecting, events);
                            Ok(Some(SessionAction::Connect(device.id)))
                        }
                        None => {
                            self.fail(SessionFailure::DeviceNotFound, events);
                            Ok(None)
                        }
                    }
                }
                TransportEvent::ListFailed => {
                    self.fail(SessionFailure::ListError, events);
                    Ok(None)
                }
                event => Err(SessionError::UnexpectedEvent(event, self.state)),
            },

            State::Connecting => match event {
                TransportEvent::Connected => {
                    self.set_state(
                        State::HandshakePending(HandshakePhase::AwaitingWrite),
                        events,
                    );
                    let request = HandshakeRequest {
                        version: PROTOCOL_VERSION,
                        width: self.config.width,
                        height: self.config.height,
                        color_mode: self.config.color_mode,
                        app_name: self.config.app_name.clone(),
                    };
                    Ok(Some(SessionAction::Write(request.to_bytes()?)))
                }
                TransportEvent::ConnectFailed => {
                    self.fail(SessionFailure::ConnectError, events);
                    Ok(None)
                }
                event => Err(SessionError::UnexpectedEvent(event, self.state)),
            },

            State::HandshakePending(phase) => match (phase, event) {
                (HandshakePhase::AwaitingWrite, TransportEvent::WriteOk) => {
                    self.timers
                        .after(now, self.config.settle_delay, SessionTask::SettleRead);
                    self.set_state(State::HandshakePending(HandshakePhase::Settling), events);
                    Ok(None)
                }
                (HandshakePhase::AwaitingWrite, TransportEvent::WriteFailed) => {
                    self.fail(SessionFailure::HandshakeWriteError, events);
                    Ok(None)
                }
                (HandshakePhase::AwaitingRead, TransportEvent::Read(bytes)) => {
                    self.handle_response(&bytes, now, events);
                    Ok(None)
                }
                (HandshakePhase::AwaitingRead, TransportEvent::ReadFailed) => {
                    self.fail(SessionFailure::HandshakeReadError, events);
                    Ok(None)
                }
                (_, event) => Err(SessionError::UnexpectedEvent(event, self.state)),
            },

            State::Streaming => match event {
                TransportEvent::WriteOk => Ok(None),
                // Best-effort delivery: a lost frame does not end the session.
                TransportEvent::WriteFailed => {
                    log::warn!("frame write failed, continuing to stream");
                    Ok(None)
                }
                event => Err(SessionError::UnexpectedEvent(event, self.state)),
            },

            State::Idle | State::Failed(_) => {
                Err(SessionError::UnexpectedEvent(event, self.state))
            }
        }
    }

    /// Fires due timers: the handshake settle delay turns into a read, the
    /// frame ticker turns into `EmitFrame` actions (one per elapsed period).
    pub fn poll(&mut self, now: Instant, events: &mut Vec<InformEvent>) -> Vec<SessionAction> {
        let mut actions = Vec::new();
        for (_, task) in self.timers.poll(now) {
            match task {
                SessionTask::SettleRead => {
                    self.set_state(
                        State::HandshakePending(HandshakePhase::AwaitingRead),
                        events,
                    );
                    actions.push(SessionAction::Read);
                }
                SessionTask::EmitFrame => actions.push(SessionAction::EmitFrame),
            }
        }
        actions
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    fn handle_response(&mut self, bytes: &[u8], now: Instant, events: &mut Vec<InformEvent>) {
        let response = match HandshakeResponse::read(&mut Cursor::new(bytes)) {
            Ok(response) => response,
            Err(_) => {
                self.fail(SessionFailure::MalformedResponse, events);
                return;
            }
        };
        if !response.accepted() {
            self.fail(SessionFailure::HandshakeRejected(response.status), events);
            return;
        }
        self.max_fps = Some(response.max_fps);
        let interval = Duration::from_secs(1) / u32::from(response.max_fps);
        self.timers.every(now, interval, SessionTask::EmitFrame);
        self.set_state(State::Streaming, events);
    }

    fn set_state(&mut self, state: State, events: &mut Vec<InformEvent>) {
        self.state = state;
        events.push(InformEvent::SessionInform(SessionInform::StatusChanged(
            state,
        )));
    }

    fn fail(&mut self, failure: SessionFailure, events: &mut Vec<InformEvent>) {
        self.timers.clear();
        self.set_state(State::Failed(failure), events);
    }
}
