//! Composition of the session and game state machines around the shared
//! frame buffer and the transport.
//!
//! Both state machines run on the caller's single poll loop. The frame
//! ticker serializes whatever the game timers last painted; when both fire
//! in the same tick window the most recent paint wins, which is the
//! intended last-writer-wins behavior of the shared buffer.

use crate::{
    game_handler::{GameHandler, GameInform, PanelPicker},
    io::{IoHandle, Transport, TransportEvent},
    session_handler::{SessionAction, SessionConfig, SessionError, SessionHandler},
    InformEvent,
};
use common::frame::{encode_frame, FrameBuffer, Panel};
use std::time::Instant;

pub struct CmSaysHandler<T, P> {
    pub io_handle: IoHandle<T>,
    session: SessionHandler,
    game: GameHandler<P>,
    frame: FrameBuffer,
}

impl<T: Transport, P: PanelPicker> CmSaysHandler<T, P> {
    pub fn new(io_handle: IoHandle<T>, config: SessionConfig, picker: P) -> Self {
        let frame = FrameBuffer::new(usize::from(config.width), usize::from(config.height));
        Self {
            io_handle,
            session: SessionHandler::new(config),
            game: GameHandler::new(picker),
            frame,
        }
    }

    pub fn session(&self) -> &SessionHandler {
        &self.session
    }

    pub fn game(&self) -> &GameHandler<P> {
        &self.game
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Kicks off the session (device enumeration onwards).
    pub fn start(
        &mut self,
        now: Instant,
        events: &mut Vec<InformEvent>,
    ) -> Result<(), SessionError> {
        if let Some(action) = self.session.start(events) {
            self.apply(action, now, events)?;
        }
        Ok(())
    }

    /// Drains one pending transport completion, if any. The caller loops
    /// over this until it returns `None`, then sleeps until the next
    /// deadline.
    pub fn handle_next_event(
        &mut self,
        now: Instant,
        events: &mut Vec<InformEvent>,
    ) -> Option<Result<(), SessionError>> {
        let event = self.io_handle.recv()?;
        Some(self.handle_transport_event(event, now, events))
    }

    pub fn handle_transport_event(
        &mut self,
        event: TransportEvent,
        now: Instant,
        events: &mut Vec<InformEvent>,
    ) -> Result<(), SessionError> {
        if let Some(action) = self.session.handle(event, now, events)? {
            self.apply(action, now, events)?;
        }
        Ok(())
    }

    /// UI collaborator: a panel button was pressed.
    pub fn button_pressed(&mut self, panel: Panel, now: Instant, events: &mut Vec<InformEvent>) {
        let start = events.len();
        self.game.register_click(panel, now, events);
        self.apply_display(events, start);
    }

    /// UI collaborator: the start button was pressed.
    pub fn start_game(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        let start = events.len();
        self.game.start_game(now, events);
        self.apply_display(events, start);
    }

    /// Advances both state machines to `now`. Game timers run first so a
    /// frame emitted in the same tick carries their paint.
    pub fn poll(&mut self, now: Instant, events: &mut Vec<InformEvent>) -> Result<(), SessionError> {
        let start = events.len();
        self.game.poll(now, events);
        self.apply_display(events, start);

        for action in self.session.poll(now, events) {
            self.apply(action, now, events)?;
        }
        Ok(())
    }

    /// Earliest instant at which either state machine has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.session.next_deadline(), self.game.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn apply(
        &mut self,
        action: SessionAction,
        now: Instant,
        events: &mut Vec<InformEvent>,
    ) -> Result<(), SessionError> {
        match action {
            SessionAction::ListDevices => {
                if self.io_handle.transport().list().is_err() {
                    return self.handle_transport_event(TransportEvent::ListFailed, now, events);
                }
            }
            SessionAction::Connect(id) => {
                if self.io_handle.transport().connect(&id).is_err() {
                    return self.handle_transport_event(
                        TransportEvent::ConnectFailed,
                        now,
                        events,
                    );
                }
            }
            SessionAction::Write(bytes) => {
                if self.io_handle.transport().write(bytes).is_err() {
                    return self.handle_transport_event(TransportEvent::WriteFailed, now, events);
                }
            }
            SessionAction::Read => {
                if self.io_handle.transport().read().is_err() {
                    return self.handle_transport_event(TransportEvent::ReadFailed, now, events);
                }
            }
            SessionAction::EmitFrame => {
                let config = self.session.config();
                let data = encode_frame(
                    &self.frame,
                    usize::from(config.width),
                    usize::from(config.height),
                )?;
                events.push(InformEvent::FrameReady(data.clone()));
                if self.io_handle.transport().write(data).is_err() {
                    return self.handle_transport_event(TransportEvent::WriteFailed, now, events);
                }
            }
        }
        Ok(())
    }

    /// Applies the display commands the game pushed since `start` to the
    /// shared frame buffer.
    fn apply_display(&mut self, events: &[InformEvent], start: usize) {
        for event in &events[start ..] {
            if let InformEvent::GameInform(inform) = event {
                match inform {
                    GameInform::ShowPanel(panel) => self.frame.paint(*panel),
                    GameInform::ClearDisplay => self.frame.paint(Panel::AllOff),
                    _ => {}
                }
            }
        }
    }
}
