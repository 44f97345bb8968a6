use common::frame::Panel;
use peer::{
    game_handler::{GameHandler, GameInform, PanelPicker},
    InformEvent,
};
use std::time::{Duration, Instant};

/// Deterministic stand-in for the uniform panel picker.
struct ScriptedPicker {
    panels: Vec<Panel>,
    next: usize,
}

impl ScriptedPicker {
    fn new(panels: &[Panel]) -> Self {
        Self {
            panels: panels.to_vec(),
            next: 0,
        }
    }
}

impl PanelPicker for ScriptedPicker {
    fn pick(&mut self) -> Panel {
        let panel = self.panels[self.next % self.panels.len()];
        self.next += 1;
        panel
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn informs(events: &[InformEvent]) -> Vec<GameInform> {
    events
        .iter()
        .filter_map(|event| match event {
            InformEvent::GameInform(inform) => Some(*inform),
            _ => None,
        })
        .collect()
}

/// Polls in 100 ms steps until the current autoplay run finishes.
fn run_autoplay(
    handler: &mut GameHandler<ScriptedPicker>,
    now: &mut Instant,
    events: &mut Vec<InformEvent>,
) {
    for _ in 0 .. 100 {
        if !handler.is_autoplay() {
            return;
        }
        *now += ms(100);
        handler.poll(*now, events);
    }
    panic!("autoplay did not finish");
}

#[test]
fn test_start_game_seeds_one_panel() {
    let mut handler = GameHandler::new(ScriptedPicker::new(&[Panel::TopLeft]));
    let mut events = Vec::new();
    let start = Instant::now();

    handler.start_game(start, &mut events);
    assert!(handler.is_playing());
    assert!(handler.is_autoplay());
    assert_eq!(handler.sequence(), [Panel::TopLeft]);
    assert_eq!(handler.position(), 0);

    let informs = informs(&events);
    assert!(informs.contains(&GameInform::ClearDisplay));
    assert!(informs.contains(&GameInform::InputEnabled(false)));

    // Starting again while playing is a no-op.
    events.clear();
    handler.start_game(start, &mut events);
    assert!(events.is_empty());
    assert_eq!(handler.sequence().len(), 1);
}

#[test]
fn test_autoplay_shows_sequence_then_enables_input() {
    let mut handler = GameHandler::new(ScriptedPicker::new(&[Panel::BottomLeft]));
    let mut events = Vec::new();
    let start = Instant::now();
    handler.start_game(start, &mut events);
    events.clear();

    handler.poll(start + ms(500), &mut events);
    assert_eq!(informs(&events), [GameInform::ShowPanel(Panel::BottomLeft)]);

    // The lit panel clears 400 ms after it was shown.
    events.clear();
    handler.poll(start + ms(900), &mut events);
    assert_eq!(informs(&events), [GameInform::ClearDisplay]);

    // One interval later the run is over and input opens.
    events.clear();
    handler.poll(start + ms(1000), &mut events);
    assert_eq!(informs(&events), [GameInform::InputEnabled(true)]);
    assert!(!handler.is_autoplay());
}

#[test]
fn test_clicks_ignored_during_autoplay() {
    let mut handler = GameHandler::new(ScriptedPicker::new(&[Panel::TopRight]));
    let mut events = Vec::new();
    let start = Instant::now();
    handler.start_game(start, &mut events);
    events.clear();

    handler.register_click(Panel::TopRight, start + ms(10), &mut events);
    assert!(events.is_empty());
    assert_eq!(handler.position(), 0);
}

#[test]
fn test_correct_round_grows_sequence() {
    let mut handler =
        GameHandler::new(ScriptedPicker::new(&[Panel::TopLeft, Panel::BottomRight]));
    let mut events = Vec::new();
    let mut now = Instant::now();
    handler.start_game(now, &mut events);
    run_autoplay(&mut handler, &mut now, &mut events);
    events.clear();

    handler.register_click(Panel::TopLeft, now, &mut events);
    let seen = informs(&events);
    assert!(seen.contains(&GameInform::ShowPanel(Panel::TopLeft)));
    assert!(seen.contains(&GameInform::InputEnabled(false)));
    assert!(seen.contains(&GameInform::RoundWon { length: 2 }));
    assert_eq!(handler.sequence(), [Panel::TopLeft, Panel::BottomRight]);
    assert_eq!(handler.position(), 0);

    // The longer sequence replays after the pause.
    now += ms(500);
    handler.poll(now, &mut events);
    assert!(handler.is_autoplay());
}

#[test]
fn test_full_game_over_multiple_rounds() {
    let script = [
        Panel::TopLeft,
        Panel::TopRight,
        Panel::BottomLeft,
        Panel::BottomRight,
    ];
    let mut handler = GameHandler::new(ScriptedPicker::new(&script));
    let mut events = Vec::new();
    let mut now = Instant::now();
    handler.start_game(now, &mut events);

    let rounds = 4;
    for round in 1 ..= rounds {
        run_autoplay(&mut handler, &mut now, &mut events);
        assert_eq!(handler.sequence().len(), round);

        for panel in handler.sequence().to_vec() {
            now += ms(50);
            handler.register_click(panel, now, &mut events);
        }
        assert_eq!(handler.position(), 0);
        assert_eq!(handler.sequence().len(), round + 1);
        // Let the replay pause elapse so the next round can start.
        now += ms(500);
        handler.poll(now, &mut events);
    }
    assert!(handler.is_playing());
    assert_eq!(handler.sequence().len(), rounds + 1);
}

#[test]
fn test_wrong_input_loses() {
    let mut handler = GameHandler::new(ScriptedPicker::new(&[Panel::TopLeft]));
    let mut events = Vec::new();
    let mut now = Instant::now();
    handler.start_game(now, &mut events);
    run_autoplay(&mut handler, &mut now, &mut events);
    events.clear();

    handler.register_click(Panel::BottomRight, now, &mut events);
    let seen = informs(&events);
    assert!(seen.contains(&GameInform::GameLost));
    assert!(seen.contains(&GameInform::InputEnabled(false)));
    assert!(!handler.is_playing());

    // The losing feedback: four full-matrix flashes, replayed after the
    // short pause.
    assert_eq!(handler.sequence(), [Panel::AllOn; 4]);
    events.clear();
    now += ms(300);
    handler.poll(now, &mut events);
    assert!(handler.is_autoplay());
    now += ms(500);
    handler.poll(now, &mut events);
    assert!(informs(&events).contains(&GameInform::ShowPanel(Panel::AllOn)));
}

#[test]
fn test_restart_during_loss_replay() {
    let mut handler = GameHandler::new(ScriptedPicker::new(&[Panel::TopLeft]));
    let mut events = Vec::new();
    let mut now = Instant::now();
    handler.start_game(now, &mut events);
    run_autoplay(&mut handler, &mut now, &mut events);

    handler.register_click(Panel::BottomRight, now, &mut events);
    now += ms(300);
    handler.poll(now, &mut events);
    assert!(handler.is_autoplay());

    // Two flashes into the loss replay, the start button comes in. The
    // old replay must stop; its cursor is past the reseeded sequence.
    now += ms(1000);
    handler.poll(now, &mut events);
    events.clear();
    handler.start_game(now, &mut events);
    assert!(handler.is_playing());
    assert_eq!(handler.sequence(), [Panel::TopLeft]);

    // The fresh single-panel sequence plays to completion without the
    // stale autoplay firing again.
    run_autoplay(&mut handler, &mut now, &mut events);
    let seen = informs(&events);
    assert!(seen.contains(&GameInform::ShowPanel(Panel::TopLeft)));
    assert!(seen.contains(&GameInform::InputEnabled(true)));
    assert_eq!(handler.position(), 0);
}

#[test]
fn test_click_feedback_is_debounced() {
    let mut handler = GameHandler::new(ScriptedPicker::new(&[Panel::TopLeft]));
    let mut events = Vec::new();
    let start = Instant::now();

    // No game running; clicks still light panels briefly.
    handler.register_click(Panel::TopLeft, start, &mut events);
    handler.register_click(Panel::TopRight, start + ms(200), &mut events);
    events.clear();

    // The first click's clear (due at 400 ms) was cancelled by the second.
    handler.poll(start + ms(450), &mut events);
    assert!(informs(&events).is_empty());

    handler.poll(start + ms(600), &mut events);
    assert_eq!(informs(&events), [GameInform::ClearDisplay]);
}
