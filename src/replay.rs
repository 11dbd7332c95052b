use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::manifest::LoadError;
use crate::player::Player;
use crate::runtime::PlayerEvent;
use crate::TICK_RATE_MS;

/// One entry of a recorded session script. `Wait` stands in for real time
/// passing and expands to runtime ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Click { x: f64, y: f64 },
    Input { box_id: String, text: String },
    Advance,
    Retreat,
    Wait { ms: u64 },
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_script_file(path: &Path) -> Result<Vec<ScriptEvent>, LoadError> {
    let json = std::fs::read_to_string(path)?;
    Ok(parse_script(&json)?)
}

/// Dispatch one runtime event into the player. Frontends and the replay
/// driver share this mapping so scripted and live sessions behave the same.
pub fn apply_event(player: &mut Player, event: &PlayerEvent) {
    match event {
        PlayerEvent::Click { x, y } => {
            player.click(*x, *y);
        }
        PlayerEvent::Input { box_id, text } => {
            player.set_input(box_id, text);
        }
        PlayerEvent::Advance => player.advance(),
        PlayerEvent::Retreat => player.retreat(),
        PlayerEvent::Tick => player.on_tick(),
    }
}

fn ticks_for(ms: u64) -> u64 {
    ms.div_ceil(TICK_RATE_MS)
}

/// Drive a player through a recorded script, then let any still-pending
/// auto-advance fire so the session lands in a settled state.
pub fn run_script(player: &mut Player, script: &[ScriptEvent]) {
    for event in script {
        match event {
            ScriptEvent::Click { x, y } => apply_event(player, &PlayerEvent::Click { x: *x, y: *y }),
            ScriptEvent::Input { box_id, text } => apply_event(
                player,
                &PlayerEvent::Input {
                    box_id: box_id.clone(),
                    text: text.clone(),
                },
            ),
            ScriptEvent::Advance => apply_event(player, &PlayerEvent::Advance),
            ScriptEvent::Retreat => apply_event(player, &PlayerEvent::Retreat),
            ScriptEvent::Wait { ms } => {
                for _ in 0..ticks_for(*ms) {
                    player.on_tick();
                }
            }
        }
    }

    while player.advance_pending() {
        player.on_tick();
    }
}
