//! Monster placement for freshly generated rooms
//!
//! Rejection sampling: candidates are drawn uniformly over the spawn region
//! and resampled while they crowd an already-placed monster. Retries are
//! bounded; a saturated region is a configuration error, never an infinite
//! loop.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::{
    SPAWN_MAX_RETRIES, SPAWN_SEPARATION, SPAWN_X_MAX, SPAWN_X_MIN, SPAWN_Y_MAX, SPAWN_Y_MIN,
};

/// Placement failure: the separation constraint could not be satisfied
/// within the retry budget
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("room placement saturated after {0} retries")]
    Saturated(u32),
}

/// Pick `count` spawn positions for a new room
pub fn generate_room(rng: &mut Pcg32, count: usize) -> Result<Vec<Vec2>, SpawnError> {
    place(rng, count, SPAWN_SEPARATION, SPAWN_MAX_RETRIES)
}

fn place(
    rng: &mut Pcg32,
    count: usize,
    separation: f32,
    max_retries: u32,
) -> Result<Vec<Vec2>, SpawnError> {
    let mut placed: Vec<Vec2> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut retries = 0;
        loop {
            let candidate = Vec2::new(
                rng.random_range(SPAWN_X_MIN..=SPAWN_X_MAX),
                rng.random_range(SPAWN_Y_MIN..=SPAWN_Y_MAX),
            );
            if placed.iter().all(|&p| p.distance(candidate) >= separation) {
                placed.push(candidate);
                break;
            }
            retries += 1;
            if retries >= max_retries {
                return Err(SpawnError::Saturated(retries));
            }
        }
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ROOM_MONSTERS;
    use rand::SeedableRng;

    #[test]
    fn test_generate_room_count_and_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let positions = generate_room(&mut rng, ROOM_MONSTERS).unwrap();
        assert_eq!(positions.len(), ROOM_MONSTERS);
        for p in &positions {
            assert!(p.x >= SPAWN_X_MIN && p.x <= SPAWN_X_MAX);
            assert!(p.y >= SPAWN_Y_MIN && p.y <= SPAWN_Y_MAX);
        }
    }

    #[test]
    fn test_generate_room_respects_separation_for_all_pairs() {
        // Several seeds; the constraint must hold for every pair each time
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let positions = generate_room(&mut rng, ROOM_MONSTERS).unwrap();
            for (i, a) in positions.iter().enumerate() {
                for b in &positions[i + 1..] {
                    assert!(
                        a.distance(*b) >= SPAWN_SEPARATION,
                        "seed {seed}: pair closer than separation"
                    );
                }
            }
        }
    }

    #[test]
    fn test_saturated_placement_fails_instead_of_hanging() {
        let mut rng = Pcg32::seed_from_u64(9);
        // A separation wider than the whole region cannot fit two monsters
        let result = place(&mut rng, 2, 10_000.0, 50);
        assert_eq!(result, Err(SpawnError::Saturated(50)));
    }
}
