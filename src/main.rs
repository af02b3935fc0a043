//! Rogue Arena entry point
//!
//! Headless demo driver: stands in for the presentation layer. It forwards
//! autopilot input intents into the core, ticks at the fixed 50 ms cadence,
//! and drains the event queue into log lines where a real front end would
//! update sprites and HUD widgets.

use std::time::{Duration, Instant};

use rogue_arena::consts::{PLAYER_STEP, TICK_MS};
use rogue_arena::sim::{Ability, GameEvent, GamePhase, GameState, TickInput, tick};

/// Demo runs end after this many ticks even if the autopilot refuses to die
const MAX_DEMO_TICKS: u64 = 20_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(entropy_seed);

    let mut state = GameState::new(seed);
    if let Err(err) = state.start() {
        log::error!("Failed to start session: {err}");
        return;
    }

    let tick_interval = Duration::from_millis(TICK_MS);
    let mut next_tick = Instant::now();

    while state.phase != GamePhase::GameOver {
        if state.time_ticks >= MAX_DEMO_TICKS {
            log::info!("Demo tick cap reached, stopping");
            break;
        }

        let input = autopilot(&state);
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::StatsChanged {
                    health,
                    level,
                    experience,
                    ..
                } => {
                    log::debug!("HUD: health {health} | level {level} | exp {experience}/100");
                }
                GameEvent::LevelUpOffer { choices } => {
                    // The autopilot always favors raw damage
                    let pick = choices
                        .iter()
                        .copied()
                        .find(|a| *a == Ability::IncreaseDamage)
                        .unwrap_or(choices[0]);
                    log::info!("Ability chosen: {}", pick.name());
                    if let Err(err) = state.choose_ability(pick) {
                        log::error!("Room respawn failed: {err}");
                        return;
                    }
                }
                GameEvent::GameOver { final_level } => {
                    println!("Game Over! Level: {final_level}");
                }
                _ => {}
            }
        }

        next_tick += tick_interval;
        if let Some(sleep) = next_tick.checked_duration_since(Instant::now()) {
            std::thread::sleep(sleep);
        }
    }

    if std::env::var_os("ARENA_DUMP_STATE").is_some() {
        match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Snapshot serialization failed: {err}"),
        }
    }
}

/// Seed from the wall clock when none is given on the command line
fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Scripted stand-in for a human: chase the nearest monster at range, back
/// off when crowded, and keep firing at it.
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = state.player.pos;

    let nearest = state.monsters.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player)
            .partial_cmp(&b.pos.distance_squared(player))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if let Some(monster) = nearest {
        input.shoot = Some(monster.pos);
        let delta = monster.pos - player;
        if delta.length() < 120.0 {
            // Too close: retreat
            input.left = delta.x > 0.0;
            input.right = delta.x < 0.0;
            input.up = delta.y > 0.0;
            input.down = delta.y < 0.0;
        } else {
            // Close the gap
            input.right = delta.x > PLAYER_STEP;
            input.left = delta.x < -PLAYER_STEP;
            input.down = delta.y > PLAYER_STEP;
            input.up = delta.y < -PLAYER_STEP;
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autopilot_aims_at_the_nearest_monster() {
        let mut state = GameState::new(5);
        state.start().unwrap();
        let player = state.player.pos;
        let nearest = state
            .monsters
            .iter()
            .map(|m| m.pos)
            .min_by(|a, b| {
                a.distance_squared(player)
                    .partial_cmp(&b.distance_squared(player))
                    .unwrap()
            })
            .unwrap();
        let input = autopilot(&state);
        assert_eq!(input.shoot, Some(nearest));
    }

    #[test]
    fn test_autopilot_idles_on_an_empty_field() {
        let state = GameState::new(5);
        let input = autopilot(&state);
        assert_eq!(input.shoot, None);
        assert!(!input.up && !input.down && !input.left && !input.right);
    }
}
