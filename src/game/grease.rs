use crate::config::*;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Serialize;

#[derive(Serialize, Clone)]
pub struct GreasePatch {
    pub x: f32,
    pub z: f32,
    pub active: bool,
}

/// Grease patches on the road plus the single slowdown effect driving over
/// one activates.
pub struct GreasePool {
    pub patches: Vec<GreasePatch>,
    slowdown_time_left: f32,
    spawn_chance: f64,
}

impl GreasePool {
    pub fn new(rng: &mut SmallRng, spawn_chance: f64) -> Self {
        let mut pool = GreasePool {
            patches: Vec::new(),
            slowdown_time_left: 0.0,
            spawn_chance,
        };
        pool.spawn_range(SPAWN_RANGE_START, TRACK_LENGTH, GREASE_SPACING, rng);
        pool
    }

    pub fn spawn_range(&mut self, start_z: f32, end_z: f32, spacing: f32, rng: &mut SmallRng) {
        let mut z = start_z;
        while z < end_z {
            if rng.gen_bool(self.spawn_chance) {
                let lane = rng.gen_range(0..LANE_COUNT);
                self.patches.push(GreasePatch {
                    x: LANE_POSITIONS[lane],
                    z,
                    active: true,
                });
            }
            z += spacing;
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.slowdown_time_left > 0.0 {
            self.slowdown_time_left = (self.slowdown_time_left - dt).max(0.0);
        }
    }

    /// Driving over a patch refreshes the slowdown timer.
    pub fn activate_slowdown(&mut self) {
        self.slowdown_time_left = GREASE_EFFECT_DURATION;
    }

    pub fn slowdown_factor(&self) -> f32 {
        if self.slowdown_time_left > 0.0 {
            GREASE_SLOWDOWN_FACTOR
        } else {
            1.0
        }
    }

    pub fn cleanup(&mut self, min_z: f32) {
        self.patches.retain(|patch| patch.z >= min_z);
    }

    /// Restock the road with fresh patches; a running slowdown keeps ticking.
    pub fn respawn(&mut self, rng: &mut SmallRng) {
        self.patches.clear();
        self.spawn_range(SPAWN_RANGE_START, TRACK_LENGTH, GREASE_SPACING, rng);
    }

    pub fn reset(&mut self, rng: &mut SmallRng) {
        self.slowdown_time_left = 0.0;
        self.respawn(rng);
    }
}
