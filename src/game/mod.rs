pub mod collectibles;
pub mod collision;
pub mod grease;
pub mod state;
pub mod taxi;
pub mod traffic;

use crate::config::*;
use crate::game::collectibles::{Collectible, CollectiblePool};
use crate::game::collision::check_all;
use crate::game::grease::{GreasePatch, GreasePool};
use crate::game::state::{GameSession, Phase, TimerCommand};
use crate::game::taxi::{Debris, Taxi};
use crate::game::traffic::{TrafficCar, TrafficPool};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

/// Logical control signals sampled once per tick. Steering and jump are
/// edge-triggered (consumed on use); accelerate/decelerate reflect held keys.
#[derive(Default)]
pub struct ControlState {
    pub accelerate: bool,
    pub decelerate: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

#[derive(Serialize)]
pub struct TaxiView {
    pub x: f32,
    pub y: f32,
    pub lane: usize,
    pub jumping: bool,
    pub alive: bool,
}

#[derive(Serialize)]
pub struct HudView {
    pub phase: Phase,
    pub score: u32,
    pub coins: u32,
    pub level: u32,
    pub remaining_time: f32,
    pub speed: f32,
    pub distance_left: f32,
    pub invincible: bool,
    pub boosted: bool,
}

/// Everything the JS renderer needs to draw one frame.
#[derive(Serialize)]
pub struct FrameSnapshot<'a> {
    pub world_z: f32,
    pub taxi: TaxiView,
    pub debris: &'a [Debris],
    pub traffic: &'a [TrafficCar],
    pub collectibles: &'a [Collectible],
    pub grease: &'a [GreasePatch],
    pub finish_line_z: Option<f32>,
    pub hud: HudView,
}

pub struct Game {
    pub session: GameSession,
    pub taxi: Taxi,
    pub traffic: TrafficPool,
    pub collectibles: CollectiblePool,
    pub grease: GreasePool,
    pub controls: ControlState,
    tuning: TuningConfig,
    rng: SmallRng,
}

impl Game {
    pub fn new(tuning: Option<TuningConfig>, seed: u64) -> Self {
        let tuning = tuning.unwrap_or_default();
        let mut rng = SmallRng::seed_from_u64(seed);
        let session = GameSession::new(&tuning);
        let traffic = TrafficPool::new(&mut rng, session.speed);
        let collectibles =
            CollectiblePool::new(&mut rng, tuning.coin_spawn_chance, tuning.powerup_spawn_chance);
        let grease = GreasePool::new(&mut rng, tuning.grease_spawn_chance);

        Game {
            session,
            taxi: Taxi::new(),
            traffic,
            collectibles,
            grease,
            controls: ControlState::default(),
            tuning,
            rng,
        }
    }

    pub fn begin(&mut self) {
        self.session.begin();
    }

    /// Fresh session in place: new seed, reset pools, restarted countdown.
    pub fn restart(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.session.restart(&self.tuning);
        self.taxi.reset();
        self.traffic.reset(&mut self.rng, self.session.speed);
        self.collectibles.reset(&mut self.rng);
        self.grease.reset(&mut self.rng);
        self.controls = ControlState::default();
    }

    /// One simulation step. Order per frame: speed from controls, taxi
    /// motion, world scroll, pool updates, collision, outcome application.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_TIME);

        if self.session.phase == Phase::GameOver {
            self.taxi.update_debris(dt);
            return;
        }
        if self.session.phase != Phase::Playing {
            return;
        }

        // Edge-triggered signals apply once per press
        if std::mem::take(&mut self.controls.move_left) {
            self.taxi.steer_left();
        }
        if std::mem::take(&mut self.controls.move_right) {
            self.taxi.steer_right();
        }
        let jump = std::mem::take(&mut self.controls.jump);

        self.session
            .update_speed(dt, self.controls.accelerate, self.controls.decelerate);
        self.taxi.advance(dt, jump);

        let multiplier = self.collectibles.speed_multiplier() * self.grease.slowdown_factor();
        let wrapped = self.session.advance(dt, multiplier);

        self.traffic
            .update(dt, self.session.world_z, &mut self.rng, self.session.speed);
        self.collectibles.update(dt);
        self.grease.update(dt);

        if wrapped {
            self.traffic.recycle(&mut self.rng, self.session.speed);
            self.collectibles.respawn(&mut self.rng);
            self.grease.respawn(&mut self.rng);
        }

        let min_z = -self.session.world_z - CLEANUP_DISTANCE;
        self.collectibles.cleanup(min_z);
        self.grease.cleanup(min_z);

        let outcome = check_all(
            &self.taxi,
            self.session.world_z,
            &self.traffic,
            &self.collectibles,
            &self.grease,
            self.session.finish_line_z,
        );

        for index in &outcome.collected {
            if let Some(gain) = self.collectibles.collect(*index) {
                self.session.add_score(gain.points);
                self.session.add_coins(gain.coins);
                self.session.add_time(gain.time_bonus_seconds);
            }
        }
        self.session.add_score(outcome.jump_bonus_points);

        if outcome.hit_grease {
            self.grease.activate_slowdown();
        }

        if outcome.finish_line_crossed {
            let reinforcements = self.session.level_up();
            self.traffic
                .spawn_cars(&mut self.rng, reinforcements, self.session.speed);
            // The scroll offset is back at 0; lay out a fresh road ahead so
            // later levels have pickups and hazards too
            self.collectibles.respawn(&mut self.rng);
            self.grease.respawn(&mut self.rng);
        }

        if outcome.hit_traffic {
            self.taxi.crash(&mut self.rng);
            self.session.game_over();
        }
    }

    pub fn second_tick(&mut self) {
        self.session.second_tick();
    }

    pub fn take_timer_command(&mut self) -> Option<TimerCommand> {
        self.session.take_timer_command()
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            world_z: self.session.world_z,
            taxi: TaxiView {
                x: self.taxi.x,
                y: self.taxi.y,
                lane: self.taxi.lane,
                jumping: self.taxi.is_jumping(),
                alive: self.taxi.alive,
            },
            debris: &self.taxi.debris,
            traffic: &self.traffic.cars,
            collectibles: &self.collectibles.items,
            grease: &self.grease.patches,
            finish_line_z: self.session.finish_line_z,
            hud: HudView {
                phase: self.session.phase,
                score: self.session.score,
                coins: self.session.coins,
                level: self.session.level,
                remaining_time: self.session.remaining_time,
                speed: self.session.speed,
                distance_left: self.session.distance_to_goal(),
                invincible: self.collectibles.is_invincible(),
                boosted: self.collectibles.speed_multiplier() > 1.0,
            },
        }
    }
}
