//! Session state and core entity types
//!
//! `GameState` is the single session aggregate: it owns the player, the map,
//! and the live bullet/monster collections. Presentation code never holds
//! entities directly; it issues commands, ticks the session, and drains the
//! event queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::map::Map;
use super::spawn::{SpawnError, generate_room};
use crate::consts::*;
use crate::in_world_bounds;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session created, waiting for the start command
    AwaitingStart,
    /// Active gameplay
    Running,
    /// Paused on a pending ability choice. This phase doubles as the
    /// re-entrant level-up guard: no second level-up can trigger while a
    /// choice is outstanding.
    LevelUp,
    /// Terminal until an explicit restart
    GameOver,
}

/// The fixed ability catalog offered on every level-up.
///
/// Each selection applies a permanent effect; duplicates stack additively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    IncreaseHealth,
    IncreaseAttack,
    DecreaseReloadTime,
    IncreaseBulletSpeed,
    IncreaseBulletSize,
    IncreaseDamage,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::IncreaseHealth,
        Ability::IncreaseAttack,
        Ability::DecreaseReloadTime,
        Ability::IncreaseBulletSpeed,
        Ability::IncreaseBulletSize,
        Ability::IncreaseDamage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Ability::IncreaseHealth => "Increase Health",
            Ability::IncreaseAttack => "Increase Attack",
            Ability::DecreaseReloadTime => "Decrease Reload Time",
            Ability::IncreaseBulletSpeed => "Increase Bullet Speed",
            Ability::IncreaseBulletSize => "Increase Bullet Size",
            Ability::IncreaseDamage => "Increase Damage",
        }
    }

    /// Apply this ability's effect to the player and, where the effect is
    /// retroactive, to the live bullets.
    pub fn apply(self, player: &mut Player, bullets: &mut [Bullet]) {
        match self {
            Ability::IncreaseHealth => player.health += 20,
            // Two catalog names, one shared effect
            Ability::IncreaseAttack | Ability::IncreaseDamage => player.attack += 5,
            Ability::DecreaseReloadTime => {
                // Shaves the pending counter rather than the base reload
                player.shoot_cooldown = player.shoot_cooldown.saturating_sub(5);
            }
            Ability::IncreaseBulletSpeed => {
                for bullet in bullets.iter_mut() {
                    bullet.speed += 2.0;
                }
            }
            Ability::IncreaseBulletSize => {
                player.bullet_radius += 5.0;
                // Retroactive: live bullets grow their collision footprint too
                for bullet in bullets.iter_mut() {
                    bullet.radius = player.bullet_radius;
                }
            }
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub health: i32,
    pub attack: i32,
    pub experience: u32,
    pub level: u32,
    /// Ticks until the next shot is allowed
    pub shoot_cooldown: u32,
    /// Radius applied to newly spawned bullets
    pub bullet_radius: f32,
    /// Chosen abilities in selection order; duplicates allowed
    pub abilities: Vec<Ability>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            health: PLAYER_START_HEALTH,
            attack: PLAYER_START_ATTACK,
            experience: 0,
            level: 1,
            shoot_cooldown: 0,
            bullet_radius: BULLET_RADIUS,
            abilities: Vec::new(),
        }
    }
}

impl Player {
    /// Attempt one move by (dx, dy). Diagonal input is a single atomic
    /// candidate check, not two sequential axis checks. Returns whether the
    /// move committed; a rejected move is a normal no-op, not an error.
    pub fn try_move(&mut self, dx: f32, dy: f32, map: &Map) -> bool {
        let candidate = self.pos + Vec2::new(dx, dy);
        if !in_world_bounds(candidate) || !map.is_walkable(candidate, PLAYER_RADIUS) {
            return false;
        }
        self.pos = candidate;
        true
    }

    /// Aim at a world-space target. Returns the unit direction of the shot,
    /// or None when still reloading or when the target coincides exactly
    /// with the player (zero-length aim is silently dropped and the
    /// cooldown stays untouched).
    pub fn shoot(&mut self, target: Vec2) -> Option<Vec2> {
        if self.shoot_cooldown > 0 {
            return None;
        }
        let delta = target - self.pos;
        if delta == Vec2::ZERO {
            return None;
        }
        self.shoot_cooldown = RELOAD_TICKS;
        Some(delta.normalize())
    }

    /// Tick the reload counter toward zero
    pub fn update_cooldown(&mut self) {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    /// Health as shown to the presentation layer: never negative, even on
    /// the tick the session terminates
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction, fixed at spawn
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
}

impl Bullet {
    /// Advance one tick. Returns false ("expired") once the bullet has left
    /// the world; the loop is the only owner allowed to remove it.
    pub fn advance(&mut self) -> bool {
        self.pos += self.dir * self.speed;
        in_world_bounds(self.pos)
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub pos: Vec2,
    pub health: i32,
    pub radius: f32,
    pub speed: f32,
}

impl Monster {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            health: MONSTER_HEALTH,
            radius: MONSTER_RADIUS,
            speed: MONSTER_SPEED,
        }
    }

    /// Returns true ("killed") when this hit drops health to zero or below
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.health <= 0
    }

    /// One pursuit step toward the player. The move is rejected (monster
    /// stays put) if the candidate leaves the world or crowds another live
    /// monster; separation distance is one monster diameter. A coincident
    /// player yields a zero pursuit vector and no movement.
    pub fn step_towards(&mut self, player_pos: Vec2, others: &[Vec2]) -> bool {
        let delta = player_pos - self.pos;
        if delta == Vec2::ZERO {
            return false;
        }
        let candidate = self.pos + delta.normalize() * self.speed;
        if !in_world_bounds(candidate) {
            return false;
        }
        let separation = self.radius * 2.0;
        if others.iter().any(|&other| candidate.distance(other) < separation) {
            return false;
        }
        self.pos = candidate;
        true
    }
}

/// Notifications emitted toward the presentation layer, drained once per
/// frame by the embedder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerMoved {
        pos: Vec2,
    },
    BulletSpawned {
        id: u32,
        pos: Vec2,
    },
    BulletMoved {
        id: u32,
        pos: Vec2,
    },
    BulletRemoved {
        id: u32,
    },
    MonsterSpawned {
        id: u32,
        pos: Vec2,
    },
    MonsterMoved {
        id: u32,
        pos: Vec2,
    },
    MonsterRemoved {
        id: u32,
    },
    /// Map geometry was replaced wholesale; re-read `GameState::map`
    MapChanged,
    StatsChanged {
        health: i32,
        level: u32,
        experience: u32,
        abilities: Vec<Ability>,
    },
    /// The loop is suspended until `choose_ability` is called back
    LevelUpOffer {
        choices: Vec<Ability>,
    },
    GameOver {
        final_level: u32,
    },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    pub map: Map,
    pub player: Player,
    /// Live bullets; only the tick loop removes entries
    pub bullets: Vec<Bullet>,
    /// Live monsters; only the tick loop and room transitions remove entries
    pub monsters: Vec<Monster>,
    /// Simulation tick counter (Running ticks only)
    pub time_ticks: u64,
    /// Pending notifications for the presentation layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session in AwaitingStart
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::AwaitingStart,
            map: Map::default(),
            player: Player::default(),
            bullets: Vec::new(),
            monsters: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn push_stats(&mut self) {
        let event = GameEvent::StatsChanged {
            health: self.player.display_health(),
            level: self.player.level,
            experience: self.player.experience,
            abilities: self.player.abilities.clone(),
        };
        self.events.push(event);
    }

    /// Begin the session: first map and monster wave, then ticking proceeds.
    /// A no-op outside AwaitingStart.
    pub fn start(&mut self) -> Result<(), SpawnError> {
        if self.phase != GamePhase::AwaitingStart {
            return Ok(());
        }
        self.respawn_room()?;
        self.phase = GamePhase::Running;
        self.push_stats();
        log::info!("Session started (seed {})", self.seed);
        Ok(())
    }

    /// Throw the whole session away and re-enter AwaitingStart
    pub fn restart(&mut self, seed: u64) {
        *self = GameState::new(seed);
        log::info!("Session reset (seed {seed})");
    }

    /// Apply a chosen ability, record it, and resume play with a fresh room.
    /// A no-op unless a choice is actually pending.
    pub fn choose_ability(&mut self, ability: Ability) -> Result<(), SpawnError> {
        if self.phase != GamePhase::LevelUp {
            return Ok(());
        }
        ability.apply(&mut self.player, &mut self.bullets);
        self.player.abilities.push(ability);
        self.push_stats();
        self.respawn_room()?;
        self.phase = GamePhase::Running;
        Ok(())
    }

    /// Regenerate the map and repopulate it with a fresh monster batch,
    /// clearing any leftovers from the previous room
    pub(crate) fn respawn_room(&mut self) -> Result<(), SpawnError> {
        for monster in self.monsters.drain(..) {
            self.events.push(GameEvent::MonsterRemoved { id: monster.id });
        }
        self.map.regenerate(&mut self.rng);
        self.events.push(GameEvent::MapChanged);

        let positions = generate_room(&mut self.rng, ROOM_MONSTERS)?;
        for pos in positions {
            let id = self.next_entity_id();
            self.monsters.push(Monster::new(id, pos));
            self.events.push(GameEvent::MonsterSpawned { id, pos });
        }
        Ok(())
    }

    /// Add experience and trigger at most one level-up. The LevelUp phase is
    /// the in-flight guard: several kills may cross the threshold within one
    /// tick, and only the first may fire.
    pub(crate) fn award_experience(&mut self, amount: u32) {
        self.player.experience += amount;
        self.push_stats();
        if self.player.experience >= LEVEL_THRESHOLD {
            self.level_up();
        }
    }

    /// Bump the level, reset experience, and suspend the loop on the
    /// ability choice. A no-op outside Running (a pending choice or a
    /// terminal session must never level again).
    pub(crate) fn level_up(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.player.level += 1;
        self.player.experience = 0;
        self.phase = GamePhase::LevelUp;
        log::info!("Level up: now level {}", self.player.level);
        self.push_stats();
        self.events.push(GameEvent::LevelUpOffer {
            choices: Ability::ALL.to_vec(),
        });
    }

    /// Terminal transition; ticking halts until an explicit restart
    pub(crate) fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        log::info!("Game over at level {}", self.player.level);
        self.events.push(GameEvent::GameOver {
            final_level: self.player.level,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(42);
        state.start().unwrap();
        state.drain_events();
        state
    }

    #[test]
    fn test_shoot_at_own_position_is_a_silent_no_op() {
        let mut player = Player::default();
        assert_eq!(player.shoot(player.pos), None);
        // Cooldown untouched: no bullet was spent
        assert_eq!(player.shoot_cooldown, 0);
    }

    #[test]
    fn test_shoot_sets_cooldown_and_normalizes_direction() {
        let mut player = Player::default();
        let dir = player.shoot(player.pos + Vec2::new(30.0, 40.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.y - 0.8).abs() < 1e-6);
        assert_eq!(player.shoot_cooldown, RELOAD_TICKS);
        // Still reloading: second shot is refused
        assert_eq!(player.shoot(player.pos + Vec2::new(1.0, 0.0)), None);
    }

    #[test]
    fn test_cooldown_never_goes_negative() {
        let mut player = Player::default();
        player.update_cooldown();
        assert_eq!(player.shoot_cooldown, 0);
    }

    #[test]
    fn test_bullet_expires_outside_world() {
        let mut bullet = Bullet {
            id: 1,
            pos: Vec2::new(795.0, 300.0),
            dir: Vec2::new(1.0, 0.0),
            speed: BULLET_SPEED,
            radius: BULLET_RADIUS,
        };
        assert!(!bullet.advance());
    }

    #[test]
    fn test_monster_kill_reports_once() {
        let mut monster = Monster::new(1, Vec2::new(100.0, 100.0));
        assert!(!monster.take_damage(15));
        assert!(monster.take_damage(5)); // exactly zero counts as killed
    }

    #[test]
    fn test_monster_pursuit_zero_vector_no_movement() {
        let pos = Vec2::new(100.0, 100.0);
        let mut monster = Monster::new(1, pos);
        assert!(!monster.step_towards(pos, &[]));
        assert_eq!(monster.pos, pos);
    }

    #[test]
    fn test_monster_pursuit_respects_separation() {
        let mut monster = Monster::new(1, Vec2::new(100.0, 100.0));
        // Another monster sits right on the pursuit path
        let blocker = Vec2::new(110.0, 100.0);
        assert!(!monster.step_towards(Vec2::new(200.0, 100.0), &[blocker]));
        assert_eq!(monster.pos, Vec2::new(100.0, 100.0));
        // With the path clear, the step commits at fixed speed
        assert!(monster.step_towards(Vec2::new(200.0, 100.0), &[]));
        assert_eq!(monster.pos, Vec2::new(100.0 + MONSTER_SPEED, 100.0));
    }

    #[test]
    fn test_ability_increase_bullet_size_is_retroactive() {
        let mut player = Player::default();
        let mut bullets = vec![Bullet {
            id: 1,
            pos: Vec2::new(400.0, 300.0),
            dir: Vec2::new(1.0, 0.0),
            speed: BULLET_SPEED,
            radius: BULLET_RADIUS,
        }];
        Ability::IncreaseBulletSize.apply(&mut player, &mut bullets);
        assert_eq!(player.bullet_radius, BULLET_RADIUS + 5.0);
        // The live bullet's collision footprint grew, not just future ones
        assert_eq!(bullets[0].radius, BULLET_RADIUS + 5.0);
    }

    #[test]
    fn test_ability_stacking_is_additive() {
        let mut player = Player::default();
        let mut bullets = Vec::new();
        Ability::IncreaseAttack.apply(&mut player, &mut bullets);
        Ability::IncreaseDamage.apply(&mut player, &mut bullets);
        assert_eq!(player.attack, PLAYER_START_ATTACK + 10);
        Ability::IncreaseHealth.apply(&mut player, &mut bullets);
        Ability::IncreaseHealth.apply(&mut player, &mut bullets);
        assert_eq!(player.health, PLAYER_START_HEALTH + 40);
    }

    #[test]
    fn test_ability_decrease_reload_floors_at_zero() {
        let mut player = Player::default();
        player.shoot_cooldown = 3;
        Ability::DecreaseReloadTime.apply(&mut player, &mut []);
        assert_eq!(player.shoot_cooldown, 0);
    }

    #[test]
    fn test_start_spawns_room_and_runs() {
        let mut state = GameState::new(1);
        state.start().unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.monsters.len(), ROOM_MONSTERS);
        assert!(!state.map.rooms.is_empty());
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::MapChanged)));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::MonsterSpawned { .. }))
                .count(),
            ROOM_MONSTERS
        );
    }

    #[test]
    fn test_level_up_guard_is_the_phase() {
        let mut state = running_state();
        state.player.experience = 95;
        state.award_experience(10);
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.experience, 0);
        // A second threshold crossing while the choice is pending must not
        // stack another level-up
        state.award_experience(200);
        assert_eq!(state.player.level, 2);
        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelUpOffer { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_choose_ability_resumes_with_fresh_room() {
        let mut state = running_state();
        state.player.experience = 95;
        state.award_experience(10);
        assert_eq!(state.phase, GamePhase::LevelUp);
        state.drain_events();

        state.choose_ability(Ability::IncreaseHealth).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.abilities, vec![Ability::IncreaseHealth]);
        assert_eq!(state.player.health, PLAYER_START_HEALTH + 20);
        assert_eq!(state.monsters.len(), ROOM_MONSTERS);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::MapChanged)));
    }

    #[test]
    fn test_choose_ability_without_pending_choice_is_a_no_op() {
        let mut state = running_state();
        state.choose_ability(Ability::IncreaseHealth).unwrap();
        assert!(state.player.abilities.is_empty());
        assert_eq!(state.player.health, PLAYER_START_HEALTH);
    }

    #[test]
    fn test_restart_reinitializes_everything() {
        let mut state = running_state();
        state.player.level = 5;
        state.game_over();
        assert_eq!(state.phase, GamePhase::GameOver);
        state.restart(7);
        assert_eq!(state.phase, GamePhase::AwaitingStart);
        assert_eq!(state.seed, 7);
        assert_eq!(state.player.level, 1);
        assert!(state.monsters.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_session_snapshot_round_trips_through_json() {
        let state = running_state();
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase, GamePhase::Running);
        assert_eq!(restored.monsters.len(), state.monsters.len());
        assert_eq!(restored.player.pos, state.player.pos);
    }
}
