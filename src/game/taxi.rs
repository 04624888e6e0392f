use crate::config::*;
use nalgebra::Vector3;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Serialize;

/// One flying piece of the crashed taxi. Pure ballistics; the renderer
/// draws whatever is still active.
#[derive(Serialize, Clone)]
pub struct Debris {
    pub position: (f32, f32, f32),
    pub rotation: (f32, f32, f32),
    #[serde(skip)]
    pub velocity: Vector3<f32>,
    #[serde(skip)]
    pub angular_velocity: Vector3<f32>,
    pub active: bool,
}

pub struct Taxi {
    pub lane: usize,
    pub x: f32,
    pub y: f32,
    pub alive: bool,
    jumping: bool,
    jump_time: f32,
    pub debris: Vec<Debris>,
}

impl Taxi {
    pub fn new() -> Self {
        Taxi {
            lane: TAXI_INITIAL_LANE,
            x: LANE_POSITIONS[TAXI_INITIAL_LANE],
            y: TAXI_DEFAULT_Y,
            alive: true,
            jumping: false,
            jump_time: 0.0,
            debris: Vec::new(),
        }
    }

    pub fn steer_left(&mut self) {
        if self.lane > 0 {
            self.lane -= 1;
        }
    }

    pub fn steer_right(&mut self) {
        if self.lane < LANE_COUNT - 1 {
            self.lane += 1;
        }
    }

    pub fn target_x(&self) -> f32 {
        LANE_POSITIONS[self.lane]
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn advance(&mut self, dt: f32, jump_requested: bool) {
        // Ease toward the canonical lane offset
        self.x += (self.target_x() - self.x) * LANE_EASING_RATE * dt;

        if jump_requested && !self.jumping {
            self.jumping = true;
            self.jump_time = 0.0;
        }

        if self.jumping {
            self.jump_time += dt;
            if self.jump_time > JUMP_DURATION {
                self.jumping = false;
                self.jump_time = 0.0;
                self.y = TAXI_DEFAULT_Y;
            } else {
                let fraction = self.jump_time / JUMP_DURATION;
                self.y = TAXI_DEFAULT_Y
                    + MAX_JUMP_HEIGHT * (fraction * std::f32::consts::PI).sin();
            }
        } else {
            self.y = TAXI_DEFAULT_Y;
        }
    }

    /// Hide the taxi and scatter debris from its current position.
    pub fn crash(&mut self, rng: &mut SmallRng) {
        self.alive = false;
        self.debris.clear();
        for _ in 0..DEBRIS_COUNT {
            let offset = |rng: &mut SmallRng| (rng.gen::<f32>() - 0.5) * 0.5;
            self.debris.push(Debris {
                position: (self.x + offset(rng), self.y + offset(rng), offset(rng)),
                rotation: (0.0, 0.0, 0.0),
                velocity: Vector3::new(
                    (rng.gen::<f32>() - 0.5) * 10.0,
                    rng.gen::<f32>() * 10.0,
                    (rng.gen::<f32>() - 0.5) * 10.0,
                ),
                angular_velocity: Vector3::new(
                    rng.gen::<f32>() * 0.2,
                    rng.gen::<f32>() * 0.2,
                    rng.gen::<f32>() * 0.2,
                ),
                active: true,
            });
        }
    }

    pub fn update_debris(&mut self, dt: f32) {
        for part in &mut self.debris {
            if !part.active {
                continue;
            }
            part.velocity.y -= GRAVITY * dt;
            part.position.0 += part.velocity.x * dt;
            part.position.1 += part.velocity.y * dt;
            part.position.2 += part.velocity.z * dt;
            part.rotation.0 += part.angular_velocity.x;
            part.rotation.1 += part.angular_velocity.y;
            part.rotation.2 += part.angular_velocity.z;
            if part.position.1 < DEBRIS_FLOOR_Y {
                part.active = false;
            }
        }
    }

    pub fn reset(&mut self) {
        self.lane = TAXI_INITIAL_LANE;
        self.x = LANE_POSITIONS[TAXI_INITIAL_LANE];
        self.y = TAXI_DEFAULT_Y;
        self.alive = true;
        self.jumping = false;
        self.jump_time = 0.0;
        self.debris.clear();
    }
}
