//! Runs the full Connection Machine Says stack against an in-process
//! emulated display controller: handshake, frame streaming and a few
//! scripted Simon Says rounds (the demo watches the autoplay informs and
//! feeds the shown panels back as button presses).

mod config;

use anyhow::anyhow;
use common::frame::Panel;
use config::Config;
use log::{info, warn};
use peer::{
    cm_says_handler::CmSaysHandler,
    game_handler::{GameInform, RngPicker},
    io::{EmulatedMachine, IoHandle, LoopbackTransport},
    session_handler::{SessionConfig, SessionInform, State},
    InformEvent,
};
use std::{
    thread,
    time::{Duration, Instant},
};

const RUN_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_SLEEP: Duration = Duration::from_millis(2);

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::get()?;

    let machine = EmulatedMachine::new(
        &config.device_name,
        config.handshake_status,
        config.max_fps,
    );
    let io_handle = IoHandle::new(|sender| LoopbackTransport::new(sender, machine));
    let session_config = SessionConfig {
        device_name: config.device_name.clone(),
        settle_delay: config.settle_delay,
        ..SessionConfig::default()
    };
    let mut handler = CmSaysHandler::new(io_handle, session_config, RngPicker(rand::thread_rng()));

    let mut events = Vec::new();
    handler.start(Instant::now(), &mut events)?;

    // Panels shown by autoplay, replayed as button presses once input opens.
    let mut observed: Vec<Panel> = Vec::new();
    let mut input_enabled = false;
    let mut game_started = false;
    let mut rounds_won = 0;

    let timeout = Instant::now() + RUN_TIMEOUT;
    while Instant::now() < timeout && rounds_won < config.rounds {
        let now = Instant::now();
        while let Some(result) = handler.handle_next_event(now, &mut events) {
            result?;
        }
        handler.poll(now, &mut events)?;

        for event in std::mem::take(&mut events) {
            match event {
                InformEvent::SessionInform(SessionInform::StatusChanged(state)) => {
                    info!("session state: {state:?}");
                    match state {
                        State::Streaming if !game_started => {
                            game_started = true;
                            let fps = handler.session().max_fps().unwrap_or_default();
                            info!("handshake accepted, streaming at {fps} FPS");
                            handler.start_game(Instant::now(), &mut events);
                        }
                        State::Failed(failure) => {
                            return Err(anyhow!("session failed: {failure:?}"));
                        }
                        _ => {}
                    }
                }
                InformEvent::GameInform(inform) => match inform {
                    GameInform::ShowPanel(panel) if !input_enabled => observed.push(panel),
                    GameInform::InputEnabled(enabled) => {
                        input_enabled = enabled;
                        if enabled {
                            let panels = std::mem::take(&mut observed);
                            info!("entering {} panel(s)", panels.len());
                            for panel in panels {
                                handler.button_pressed(panel, Instant::now(), &mut events);
                            }
                        } else {
                            observed.clear();
                        }
                    }
                    GameInform::RoundWon { length } => {
                        rounds_won += 1;
                        info!("round won, sequence length now {length}");
                    }
                    GameInform::GameLost => warn!("game lost"),
                    _ => {}
                },
                InformEvent::FrameReady(_) => {}
            }
        }

        thread::sleep(POLL_SLEEP);
    }

    let frames = handler.io_handle.transport().machine().frames_received();
    info!("delivered {frames} frame(s), won {rounds_won} round(s)");
    if rounds_won < config.rounds {
        return Err(anyhow!("timed out after {} round(s)", rounds_won));
    }
    Ok(())
}
