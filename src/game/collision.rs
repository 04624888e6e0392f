use crate::config::*;
use crate::game::collectibles::CollectiblePool;
use crate::game::grease::GreasePool;
use crate::game::taxi::Taxi;
use crate::game::traffic::TrafficPool;

/// Everything one frame of collision testing produced. The engine only
/// reads; the session applies the outcome afterwards.
#[derive(Default)]
pub struct CollisionOutcome {
    pub hit_traffic: bool,
    pub jump_bonus_points: u32,
    pub collected: Vec<usize>,
    pub hit_grease: bool,
    pub finish_line_crossed: bool,
}

fn overlaps(taxi_x: f32, entity_x: f32, relative_z: f32) -> bool {
    (taxi_x - entity_x).abs() < COLLISION_THRESHOLD_X
        && relative_z.abs() < COLLISION_THRESHOLD_Z
}

/// Test the taxi against every pool. Entity positions are stored in world
/// space, so the scroll offset brings them into the taxi's frame.
pub fn check_all(
    taxi: &Taxi,
    world_z: f32,
    traffic: &TrafficPool,
    collectibles: &CollectiblePool,
    grease: &GreasePool,
    finish_z: Option<f32>,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let invincible = collectibles.is_invincible();

    for car in &traffic.cars {
        if overlaps(taxi.x, car.x, car.z + world_z) {
            if taxi.is_jumping() {
                outcome.jump_bonus_points += 1;
            } else if !invincible {
                outcome.hit_traffic = true;
            }
        }
    }

    for (i, item) in collectibles.items.iter().enumerate() {
        if item.active && overlaps(taxi.x, item.x, item.z + world_z) {
            outcome.collected.push(i);
        }
    }

    if !taxi.is_jumping() {
        for patch in &grease.patches {
            if patch.active && overlaps(taxi.x, patch.x, patch.z + world_z) {
                outcome.hit_grease = true;
                break;
            }
        }
    }

    // No finish line this tick is fine; just skip the check
    if let Some(fz) = finish_z {
        if (fz + world_z).abs() < FINISH_THRESHOLD_Z && taxi.x.abs() <= FINISH_LATERAL_BOUND {
            outcome.finish_line_crossed = true;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::collectibles::{Collectible, CollectibleKind, PowerUpKind};
    use crate::game::grease::GreasePatch;
    use crate::game::traffic::TrafficCar;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn empty_pools() -> (TrafficPool, CollectiblePool, GreasePool) {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut traffic = TrafficPool::new(&mut rng, INITIAL_SPEED);
        traffic.cars.clear();
        let mut collectibles = CollectiblePool::new(&mut rng, 0.0, 0.0);
        collectibles.items.clear();
        let mut grease = GreasePool::new(&mut rng, 0.0);
        grease.patches.clear();
        (traffic, collectibles, grease)
    }

    fn car_at(x: f32, z: f32) -> TrafficCar {
        TrafficCar {
            x,
            z,
            speed: 0.0,
            color: 0,
        }
    }

    fn item_at(kind: CollectibleKind, x: f32, z: f32) -> Collectible {
        Collectible {
            kind,
            x,
            z,
            spin: 0.0,
            hover_y: 1.0,
            active: true,
        }
    }

    #[test]
    fn test_grounded_overlap_flags_traffic_hit() {
        let (mut traffic, collectibles, grease) = empty_pools();
        let taxi = Taxi::new();
        traffic.cars.push(car_at(taxi.x, 101.0));

        let outcome = check_all(&taxi, -100.0, &traffic, &collectibles, &grease, None);
        assert!(outcome.hit_traffic);
        assert_eq!(outcome.jump_bonus_points, 0);
    }

    #[test]
    fn test_airborne_overlap_awards_jump_bonus_instead() {
        let (mut traffic, collectibles, grease) = empty_pools();
        let mut taxi = Taxi::new();
        taxi.advance(JUMP_DURATION / 2.0, true);
        assert!(taxi.is_jumping());
        traffic.cars.push(car_at(taxi.x, 0.0));
        traffic.cars.push(car_at(taxi.x, 1.0));

        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert!(!outcome.hit_traffic);
        assert_eq!(outcome.jump_bonus_points, 2);
    }

    #[test]
    fn test_invincibility_ignores_traffic_entirely() {
        let (mut traffic, mut collectibles, grease) = empty_pools();
        let taxi = Taxi::new();
        collectibles
            .items
            .push(item_at(CollectibleKind::PowerUp(PowerUpKind::Invincibility), taxi.x, 500.0));
        collectibles.collect(0);
        assert!(collectibles.is_invincible());
        traffic.cars.push(car_at(taxi.x, 0.0));

        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert!(!outcome.hit_traffic);
    }

    #[test]
    fn test_lateral_miss_is_not_a_collision() {
        let (mut traffic, collectibles, grease) = empty_pools();
        let taxi = Taxi::new(); // middle lane, x = 0
        traffic.cars.push(car_at(LANE_POSITIONS[0], 0.0));

        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert!(!outcome.hit_traffic);
    }

    #[test]
    fn test_overlapping_collectibles_are_reported_once_each() {
        let (traffic, mut collectibles, grease) = empty_pools();
        let taxi = Taxi::new();
        collectibles.items.push(item_at(CollectibleKind::Coin, taxi.x, 1.0));
        collectibles.items.push(item_at(CollectibleKind::Coin, taxi.x, 200.0));

        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert_eq!(outcome.collected, vec![0]);
    }

    #[test]
    fn test_inactive_collectible_is_skipped() {
        let (traffic, mut collectibles, grease) = empty_pools();
        let taxi = Taxi::new();
        collectibles.items.push(item_at(CollectibleKind::Coin, taxi.x, 1.0));
        collectibles.collect(0);

        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert!(outcome.collected.is_empty());
    }

    #[test]
    fn test_grease_contact_only_while_grounded() {
        let (traffic, collectibles, mut grease) = empty_pools();
        let mut taxi = Taxi::new();
        grease.patches.push(GreasePatch {
            x: taxi.x,
            z: 1.0,
            active: true,
        });

        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert!(outcome.hit_grease);

        taxi.advance(JUMP_DURATION / 2.0, true);
        let outcome = check_all(&taxi, 0.0, &traffic, &collectibles, &grease, None);
        assert!(!outcome.hit_grease);
    }

    #[test]
    fn test_finish_line_detected_within_window() {
        let (traffic, collectibles, grease) = empty_pools();
        let taxi = Taxi::new();

        let near = check_all(
            &taxi,
            -(DISTANCE_GOAL - FINISH_THRESHOLD_Z + 1.0),
            &traffic,
            &collectibles,
            &grease,
            Some(DISTANCE_GOAL),
        );
        assert!(near.finish_line_crossed);

        let far = check_all(
            &taxi,
            -(DISTANCE_GOAL - FINISH_THRESHOLD_Z - 1.0),
            &traffic,
            &collectibles,
            &grease,
            Some(DISTANCE_GOAL),
        );
        assert!(!far.finish_line_crossed);
    }

    #[test]
    fn test_missing_finish_line_skips_check() {
        let (traffic, collectibles, grease) = empty_pools();
        let taxi = Taxi::new();
        let outcome = check_all(&taxi, -DISTANCE_GOAL, &traffic, &collectibles, &grease, None);
        assert!(!outcome.finish_line_crossed);
    }
}
