use crate::config::*;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Serialize;

pub const CAR_COLOR_COUNT: usize = 6;

#[derive(Serialize, Clone)]
pub struct TrafficCar {
    pub x: f32,
    pub z: f32,
    pub speed: f32,
    pub color: usize,
}

/// Traffic cars live in world space and carry their own forward speed, so
/// the closing speed against the player varies car to car.
pub struct TrafficPool {
    pub cars: Vec<TrafficCar>,
}

fn seed_speed(rng: &mut SmallRng, player_speed: f32) -> f32 {
    TRAFFIC_SPEED_FACTOR * player_speed
        + (rng.gen::<f32>() - 0.5) * 2.0 * TRAFFIC_SPEED_JITTER
}

fn random_lane_x(rng: &mut SmallRng) -> f32 {
    LANE_POSITIONS[rng.gen_range(0..LANE_COUNT)]
}

impl TrafficPool {
    pub fn new(rng: &mut SmallRng, player_speed: f32) -> Self {
        let mut pool = TrafficPool { cars: Vec::new() };
        pool.spawn_cars(rng, TRAFFIC_INITIAL_COUNT, player_speed);
        pool
    }

    pub fn spawn_cars(&mut self, rng: &mut SmallRng, count: usize, player_speed: f32) {
        for _ in 0..count {
            self.cars.push(TrafficCar {
                x: random_lane_x(rng),
                z: TRAFFIC_SPAWN_MIN_Z + rng.gen::<f32>() * TRACK_LENGTH * 0.8,
                speed: seed_speed(rng, player_speed),
                color: rng.gen_range(0..CAR_COLOR_COUNT),
            });
        }
    }

    /// Advance every car by its own speed and recycle any that have fallen
    /// behind the player by more than the cleanup threshold.
    pub fn update(&mut self, dt: f32, world_z: f32, rng: &mut SmallRng, player_speed: f32) {
        for car in &mut self.cars {
            car.z += car.speed * dt;
            if car.z + world_z < -CLEANUP_DISTANCE {
                car.x = random_lane_x(rng);
                car.z = -world_z + TRAFFIC_SPAWN_MIN_Z + rng.gen::<f32>() * 100.0;
                car.speed = seed_speed(rng, player_speed);
            }
        }
    }

    /// World-wrap recycle: fresh lane, jittered position clamped back onto
    /// the track, and a reseeded speed relative to the player's.
    pub fn recycle(&mut self, rng: &mut SmallRng, player_speed: f32) {
        for car in &mut self.cars {
            car.x = random_lane_x(rng);
            car.z += rng.gen::<f32>() * 100.0 - 50.0;
            if car.z < TRAFFIC_SPAWN_MIN_Z {
                car.z = TRAFFIC_SPAWN_MIN_Z + rng.gen::<f32>() * 100.0;
            }
            if car.z > TRACK_LENGTH {
                car.z = TRACK_LENGTH - rng.gen::<f32>() * 100.0;
            }
            car.speed = seed_speed(rng, player_speed);
        }
    }

    pub fn reset(&mut self, rng: &mut SmallRng, player_speed: f32) {
        self.cars.clear();
        self.spawn_cars(rng, TRAFFIC_INITIAL_COUNT, player_speed);
    }
}
