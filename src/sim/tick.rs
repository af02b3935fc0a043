//! Fixed-step simulation tick
//!
//! The driver that advances one simulation step: input application,
//! movement, bullet and monster phases, collision resolution, and the
//! progression triggers. One call is one tick; the cadence belongs to the
//! embedder.

use glam::Vec2;

use super::state::{Bullet, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held movement keys
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// One-shot intent: shoot toward a world-space point
    pub shoot: Option<Vec2>,
}

impl TickInput {
    /// Resolve held keys into one combined movement delta
    pub fn movement_delta(&self) -> Vec2 {
        let mut delta = Vec2::ZERO;
        if self.up {
            delta.y -= PLAYER_STEP;
        }
        if self.down {
            delta.y += PLAYER_STEP;
        }
        if self.left {
            delta.x -= PLAYER_STEP;
        }
        if self.right {
            delta.x += PLAYER_STEP;
        }
        delta
    }
}

/// Advance the session by one fixed step.
///
/// A no-op outside the Running phase: AwaitingStart and GameOver never tick,
/// and a pending ability choice suspends movement, shooting, and monster
/// pursuit alike until `choose_ability` resumes the session.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.time_ticks += 1;

    // Movement: diagonals are a single atomic candidate check
    let delta = input.movement_delta();
    if delta != Vec2::ZERO && state.player.try_move(delta.x, delta.y, &state.map) {
        let pos = state.player.pos;
        state.push_event(GameEvent::PlayerMoved { pos });
    }

    // Shoot intent; the cooldown and zero-length-aim guards live on Player
    if let Some(target) = input.shoot {
        if let Some(dir) = state.player.shoot(target) {
            let id = state.next_entity_id();
            let bullet = Bullet {
                id,
                pos: state.player.pos,
                dir,
                speed: BULLET_SPEED,
                radius: state.player.bullet_radius,
            };
            state.push_event(GameEvent::BulletSpawned { id, pos: bullet.pos });
            state.bullets.push(bullet);
        }
    }

    state.player.update_cooldown();

    // Bullet phase. Removals are decided over one stable pass and applied
    // afterwards, so a monster killed by one bullet is skipped by every
    // later bullet this tick and its kill is processed exactly once.
    let attack = state.player.attack;
    let mut expired: Vec<u32> = Vec::new();
    let mut spent: Vec<u32> = Vec::new();
    let mut killed: Vec<u32> = Vec::new();
    {
        let GameState {
            bullets,
            monsters,
            events,
            ..
        } = state;
        for bullet in bullets.iter_mut() {
            if !bullet.advance() {
                expired.push(bullet.id);
                events.push(GameEvent::BulletRemoved { id: bullet.id });
                continue;
            }
            events.push(GameEvent::BulletMoved {
                id: bullet.id,
                pos: bullet.pos,
            });
            // At most one hit per bullet per tick; the bullet is consumed
            // only when the hit kills
            for monster in monsters.iter_mut() {
                if killed.contains(&monster.id) {
                    continue;
                }
                if bullet.pos.distance(monster.pos) < bullet.radius + monster.radius {
                    if monster.take_damage(attack) {
                        killed.push(monster.id);
                        events.push(GameEvent::MonsterRemoved { id: monster.id });
                        spent.push(bullet.id);
                        events.push(GameEvent::BulletRemoved { id: bullet.id });
                    }
                    break;
                }
            }
        }
        bullets.retain(|b| !expired.contains(&b.id) && !spent.contains(&b.id));
        monsters.retain(|m| !killed.contains(&m.id));
    }

    // Kill rewards may cross the level threshold; the LevelUp phase guard
    // keeps simultaneous kills to a single level-up
    for _ in 0..killed.len() {
        state.award_experience(KILL_EXPERIENCE);
    }
    if state.phase != GamePhase::Running {
        // Ability choice pending: monsters and the room-clear check wait
        return;
    }

    // Monster phase: pursuit against live positions, then contact damage
    let player_pos = state.player.pos;
    let mut damage_taken = 0;
    {
        let GameState {
            monsters, events, ..
        } = state;
        let mut positions: Vec<Vec2> = monsters.iter().map(|m| m.pos).collect();
        for i in 0..monsters.len() {
            let others: Vec<Vec2> = positions
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &p)| p)
                .collect();
            let monster = &mut monsters[i];
            if monster.step_towards(player_pos, &others) {
                positions[i] = monster.pos;
                events.push(GameEvent::MonsterMoved {
                    id: monster.id,
                    pos: monster.pos,
                });
            }
            if monster.pos.distance(player_pos) < PLAYER_RADIUS + MONSTER_RADIUS {
                damage_taken += MONSTER_CONTACT_DAMAGE;
            }
        }
    }
    if damage_taken > 0 {
        state.player.take_damage(damage_taken);
        if state.player.health <= 0 {
            state.game_over();
            return;
        }
        state.push_stats();
    }

    // Room-clear reward: an empty field levels up regardless of experience
    if state.monsters.is_empty() {
        state.level_up();
    }
}
