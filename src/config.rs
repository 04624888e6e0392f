use serde::{Deserialize, Serialize};

// Road and lanes
pub const ROAD_WIDTH: f32 = 12.0;
pub const TRACK_LENGTH: f32 = 10000.0;
pub const LANE_POSITIONS: [f32; 3] = [4.0, 0.0, -4.0]; // left, middle, right
pub const LANE_COUNT: usize = 3;

// Taxi
pub const TAXI_DEFAULT_Y: f32 = 0.5;
pub const TAXI_INITIAL_LANE: usize = 1;
pub const LANE_EASING_RATE: f32 = 10.0;

// Speed
pub const INITIAL_SPEED: f32 = 10.0;
pub const MIN_SPEED: f32 = 0.0;
pub const MAX_SPEED: f32 = 100.0;
pub const ACCEL_RATE: f32 = 20.0;
// Actual speed eases toward the target faster when slowing down.
pub const SPEED_EASE_UP: f32 = 6.0;
pub const SPEED_EASE_DOWN: f32 = 9.0;

// Jump
pub const JUMP_DURATION: f32 = 1.0;
pub const MAX_JUMP_HEIGHT: f32 = 2.0;

// Traffic
pub const TRAFFIC_INITIAL_COUNT: usize = 15;
pub const TRAFFIC_SPAWN_MIN_Z: f32 = 50.0;
pub const TRAFFIC_SPEED_FACTOR: f32 = 0.8;
pub const TRAFFIC_SPEED_JITTER: f32 = 10.0;

// Collision thresholds
pub const COLLISION_THRESHOLD_X: f32 = 2.0;
pub const COLLISION_THRESHOLD_Z: f32 = 3.0;
pub const CLEANUP_DISTANCE: f32 = 50.0;

// Finish line: longitudinal window must cover MAX_SPEED * MAX_FRAME_TIME so a
// fast frame cannot step across it undetected.
pub const FINISH_THRESHOLD_Z: f32 = 20.0;
pub const FINISH_LATERAL_BOUND: f32 = ROAD_WIDTH / 2.0;

// Coins
pub const COIN_POINTS: u32 = 50;
pub const COIN_SPAWN_CHANCE: f64 = 0.4;
pub const COIN_SPACING: f32 = 20.0;
pub const COIN_ROTATION_SPEED: f32 = 2.0;
pub const COIN_HOVER_BASE_Y: f32 = 1.0;
pub const COIN_HOVER_AMPLITUDE: f32 = 0.2;
pub const COIN_HOVER_SPEED: f32 = 2.0;

// Power-ups
pub const POWERUP_SPAWN_CHANCE: f64 = 0.2;
pub const POWERUP_HOVER_BASE_Y: f32 = 1.5;
pub const POWERUP_ROTATION_SPEED: f32 = 1.5;
pub const POWERUP_HOVER_AMPLITUDE: f32 = 0.3;
pub const POWERUP_HOVER_SPEED: f32 = 1.5;
pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
pub const SPEED_BOOST_DURATION: f32 = 5.0;
pub const TIME_BONUS_SECONDS: f32 = 10.0;
pub const INVINCIBILITY_DURATION: f32 = 8.0;

// Grease patches
pub const GREASE_SPAWN_CHANCE: f64 = 0.15;
pub const GREASE_SPACING: f32 = 50.0;
pub const GREASE_SLOWDOWN_FACTOR: f32 = 0.1;
pub const GREASE_EFFECT_DURATION: f32 = 1.5;

// Session
pub const INITIAL_LEVEL: u32 = 1;
pub const BASE_TIME_LIMIT: f32 = 30.0;
pub const TIME_DECREASE_PER_LEVEL: f32 = 5.0;
pub const MIN_TIME_LIMIT: f32 = 15.0;
pub const DISTANCE_GOAL: f32 = 1000.0;
pub const LEVEL_BONUS_POINTS: u32 = 100;
pub const LEVEL_TRAFFIC_BASE: usize = 2;
pub const SPAWN_RANGE_START: f32 = 100.0;

// Crash debris
pub const DEBRIS_COUNT: usize = 8;
pub const GRAVITY: f32 = 9.8;
pub const DEBRIS_FLOOR_Y: f32 = -10.0;

// A suspended tab hands us a huge delta on resume; clamp it so physics
// doesn't teleport.
pub const MAX_FRAME_TIME: f32 = 0.1;

/// Host-supplied tuning overrides, fetched from `/assets/config.json`.
/// Anything absent falls back to the compiled defaults above.
#[derive(Serialize, Deserialize, Clone)]
pub struct TuningConfig {
    #[serde(default = "default_initial_speed")]
    pub initial_speed: f32,
    #[serde(default = "default_base_time_limit")]
    pub base_time_limit: f32,
    #[serde(default = "default_distance_goal")]
    pub distance_goal: f32,
    #[serde(default = "default_coin_spawn_chance")]
    pub coin_spawn_chance: f64,
    #[serde(default = "default_powerup_spawn_chance")]
    pub powerup_spawn_chance: f64,
    #[serde(default = "default_grease_spawn_chance")]
    pub grease_spawn_chance: f64,
}

fn default_initial_speed() -> f32 {
    INITIAL_SPEED
}

fn default_base_time_limit() -> f32 {
    BASE_TIME_LIMIT
}

fn default_distance_goal() -> f32 {
    DISTANCE_GOAL
}

fn default_coin_spawn_chance() -> f64 {
    COIN_SPAWN_CHANCE
}

fn default_powerup_spawn_chance() -> f64 {
    POWERUP_SPAWN_CHANCE
}

fn default_grease_spawn_chance() -> f64 {
    GREASE_SPAWN_CHANCE
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            initial_speed: INITIAL_SPEED,
            base_time_limit: BASE_TIME_LIMIT,
            distance_goal: DISTANCE_GOAL,
            coin_spawn_chance: COIN_SPAWN_CHANCE,
            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,
            grease_spawn_chance: GREASE_SPAWN_CHANCE,
        }
    }
}
