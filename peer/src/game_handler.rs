//! The Simon Says state machine, decoupled from rendering: instead of
//! touching the frame buffer it emits [`GameInform`] display commands which
//! the composed handler applies.
//!
//! Timing mirrors the device UX: autoplay steps every 500 ms, a lit panel
//! clears after 400 ms, and replays start after a short pause (500 ms after
//! a won round, 300 ms after a loss). Losing deliberately replaces the
//! sequence with four full-matrix flashes and replays it.

use crate::InformEvent;
use common::{
    constants::{AUTOPLAY_INTERVAL, FEEDBACK_CLEAR_DELAY, LOSS_PAUSE, ROUND_PAUSE},
    frame::Panel,
    timer::{TimerId, Timers},
};
use rand::Rng;
use std::time::Instant;

/// Source of the next panel appended to the sequence. Injected so tests can
/// script the sequence deterministically.
pub trait PanelPicker {
    fn pick(&mut self) -> Panel;
}

/// Uniform pick over the four quadrants.
pub struct RngPicker<R>(pub R);

impl<R: Rng> PanelPicker for RngPicker<R> {
    fn pick(&mut self) -> Panel {
        Panel::from_index(self.0.gen_range(1 ..= 4))
    }
}

/// Display and UI feedback produced by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInform {
    ShowPanel(Panel),
    ClearDisplay,
    /// Whether the player buttons should accept input.
    InputEnabled(bool),
    /// A full round was entered correctly; the sequence now has `length`
    /// elements and will replay shortly.
    RoundWon { length: usize },
    GameLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameTask {
    AutoStep,
    ClearFeedback,
    Replay,
}

pub struct GameHandler<P> {
    picker: P,
    sequence: Vec<Panel>,
    position: usize,
    playing: bool,
    autoplay: bool,
    autoplay_cursor: usize,
    timers: Timers<GameTask>,
    autoplay_timer: Option<TimerId>,
    feedback_timer: Option<TimerId>,
}

impl<P: PanelPicker> GameHandler<P> {
    pub fn new(picker: P) -> Self {
        Self {
            picker,
            sequence: Vec::new(),
            position: 0,
            playing: false,
            autoplay: false,
            autoplay_cursor: 0,
            timers: Timers::new(),
            autoplay_timer: None,
            feedback_timer: None,
        }
    }

    pub fn sequence(&self) -> &[Panel] {
        &self.sequence
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_autoplay(&self) -> bool {
        self.autoplay
    }

    /// Starts a fresh game: a single random panel, replayed immediately.
    /// No-op while a game is active.
    pub fn start_game(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        if self.playing {
            return;
        }
        // A loss replay may still hold the display; stop it before the
        // sequence shrinks under its cursor.
        if let Some(id) = self.autoplay_timer.take() {
            self.timers.cancel(id);
        }
        self.autoplay = false;
        self.playing = true;
        events.push(InformEvent::GameInform(GameInform::ClearDisplay));
        self.sequence.clear();
        self.extend_sequence();
        self.position = 0;
        self.play_sequence(now, events);
    }

    /// Player pressed a panel button. Ignored while autoplay holds the
    /// display; otherwise lights the panel briefly and, if a game is
    /// active, validates it against the sequence.
    pub fn register_click(&mut self, panel: Panel, now: Instant, events: &mut Vec<InformEvent>) {
        if self.autoplay {
            return;
        }
        // Debounce: a new click restarts the pending clear.
        if let Some(id) = self.feedback_timer.take() {
            self.timers.cancel(id);
        }
        events.push(InformEvent::GameInform(GameInform::ShowPanel(panel)));
        self.feedback_timer =
            Some(self.timers
                .after(now, FEEDBACK_CLEAR_DELAY, GameTask::ClearFeedback));

        if !self.playing {
            return;
        }
        if panel == self.sequence[self.position] {
            self.correct_button(now, events);
        } else {
            self.lose_game(now, events);
        }
    }

    pub fn poll(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        for (id, task) in self.timers.poll(now) {
            match task {
                GameTask::AutoStep => self.auto_step(now, events),
                GameTask::ClearFeedback => {
                    if self.feedback_timer == Some(id) {
                        self.feedback_timer = None;
                    }
                    events.push(InformEvent::GameInform(GameInform::ClearDisplay));
                }
                GameTask::Replay => self.play_sequence(now, events),
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Begins replaying the whole sequence on the display. No-op if a
    /// replay is already running.
    fn play_sequence(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        if self.autoplay {
            return;
        }
        self.autoplay = true;
        self.autoplay_cursor = 0;
        events.push(InformEvent::GameInform(GameInform::InputEnabled(false)));
        self.autoplay_timer =
            Some(self.timers.every(now, AUTOPLAY_INTERVAL, GameTask::AutoStep));
    }

    fn auto_step(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        if self.autoplay_cursor == self.sequence.len() {
            if let Some(id) = self.autoplay_timer.take() {
                self.timers.cancel(id);
            }
            self.autoplay = false;
            events.push(InformEvent::GameInform(GameInform::InputEnabled(true)));
        } else {
            let panel = self.sequence[self.autoplay_cursor];
            self.autoplay_cursor += 1;
            events.push(InformEvent::GameInform(GameInform::ShowPanel(panel)));
            self.timers
                .after(now, FEEDBACK_CLEAR_DELAY, GameTask::ClearFeedback);
        }
    }

    fn extend_sequence(&mut self) {
        self.sequence.push(self.picker.pick());
    }

    fn correct_button(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        self.position += 1;
        if self.position < self.sequence.len() {
            return;
        }
        // Round won: grow the sequence and replay it after a pause.
        events.push(InformEvent::GameInform(GameInform::InputEnabled(false)));
        self.extend_sequence();
        self.position = 0;
        events.push(InformEvent::GameInform(GameInform::RoundWon {
            length: self.sequence.len(),
        }));
        self.timers.after(now, ROUND_PAUSE, GameTask::Replay);
    }

    fn lose_game(&mut self, now: Instant, events: &mut Vec<InformEvent>) {
        events.push(InformEvent::GameInform(GameInform::InputEnabled(false)));
        events.push(InformEvent::GameInform(GameInform::GameLost));
        self.playing = false;
        // The losing feedback: four full-matrix flashes, replayed like a
        // normal sequence.
        self.sequence = vec![Panel::AllOn; 4];
        self.position = 0;
        self.timers.after(now, LOSS_PAUSE, GameTask::Replay);
    }
}
