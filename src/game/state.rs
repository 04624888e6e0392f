use crate::config::*;
use serde::Serialize;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Start,
    Playing,
    GameOver,
}

/// Instruction for the host's countdown interval. The session emits these on
/// phase transitions; the shell owns the actual handle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerCommand {
    Start,
    Stop,
}

/// Score, speed, timer, level and phase for one play session. Restart resets
/// the fields in place rather than transitioning backwards.
pub struct GameSession {
    pub phase: Phase,
    pub level: u32,
    pub time_limit: f32,
    pub remaining_time: f32,
    pub score: u32,
    pub coins: u32,
    pub speed: f32,
    pub target_speed: f32,
    pub distance: f32,
    pub world_z: f32,
    pub finish_line_z: Option<f32>,
    base_time_limit: f32,
    distance_goal: f32,
    scored_distance: u32,
    timer_command: Option<TimerCommand>,
}

impl GameSession {
    pub fn new(tuning: &TuningConfig) -> Self {
        GameSession {
            phase: Phase::Start,
            level: INITIAL_LEVEL,
            time_limit: tuning.base_time_limit,
            remaining_time: tuning.base_time_limit,
            score: 0,
            coins: 0,
            speed: tuning.initial_speed,
            target_speed: tuning.initial_speed,
            distance: 0.0,
            world_z: 0.0,
            finish_line_z: None,
            base_time_limit: tuning.base_time_limit,
            distance_goal: tuning.distance_goal,
            scored_distance: 0,
            timer_command: None,
        }
    }

    pub fn begin(&mut self) {
        if self.phase != Phase::Start {
            return;
        }
        self.phase = Phase::Playing;
        self.remaining_time = self.time_limit;
        self.finish_line_z = Some(self.distance_goal);
        self.timer_command = Some(TimerCommand::Start);
    }

    /// Target speed follows the held accelerate/decelerate signals; actual
    /// speed eases toward it, faster when shedding speed than gaining it.
    pub fn update_speed(&mut self, dt: f32, accelerate: bool, decelerate: bool) {
        if accelerate {
            self.target_speed += ACCEL_RATE * dt;
        } else if decelerate {
            self.target_speed -= ACCEL_RATE * dt;
        }
        self.target_speed = self.target_speed.clamp(MIN_SPEED, MAX_SPEED);

        let rate = if self.target_speed >= self.speed {
            SPEED_EASE_UP
        } else {
            SPEED_EASE_DOWN
        };
        self.speed += (self.target_speed - self.speed) * rate * dt;
        self.speed = self.speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Scroll the world by the effective speed (base speed times power-up and
    /// grease multipliers; the stored base speed is never touched, so an
    /// expiring effect restores it implicitly). Returns true on world wrap.
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) -> bool {
        let effective = self.speed * speed_multiplier;
        self.distance += effective * dt;
        self.world_z -= effective * dt;

        // Distance contributes to score one point per whole unit
        let whole = self.distance as u32;
        self.score += whole - self.scored_distance;
        self.scored_distance = whole;

        if self.world_z <= -TRACK_LENGTH {
            self.world_z = 0.0;
            return true;
        }
        false
    }

    pub fn distance_to_goal(&self) -> f32 {
        match self.finish_line_z {
            Some(goal) => (goal - self.world_z.abs()).max(0.0),
            None => 0.0,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn add_coins(&mut self, coins: u32) {
        self.coins += coins;
    }

    pub fn add_time(&mut self, seconds: f32) {
        if seconds > 0.0 {
            self.remaining_time += seconds;
        }
    }

    /// Finish-line crossing: next level, shorter limit, fresh goal. Returns
    /// how many reinforcement traffic cars to spawn.
    pub fn level_up(&mut self) -> usize {
        self.level += 1;
        self.time_limit = (self.base_time_limit
            - (self.level - 1) as f32 * TIME_DECREASE_PER_LEVEL)
            .max(MIN_TIME_LIMIT);
        self.remaining_time = self.time_limit;
        self.world_z = 0.0;
        self.finish_line_z = Some(self.distance_goal);
        self.score += LEVEL_BONUS_POINTS * self.level;
        LEVEL_TRAFFIC_BASE + self.level as usize
    }

    /// Called once per wall-clock second by the host interval. No-op outside
    /// Playing, so a straggling interval tick after game over cannot
    /// double-decrement.
    pub fn second_tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.remaining_time -= 1.0;
        if self.remaining_time <= 0.0 {
            self.remaining_time = 0.0;
            self.game_over();
        }
    }

    pub fn game_over(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        self.timer_command = Some(TimerCommand::Stop);
    }

    pub fn restart(&mut self, tuning: &TuningConfig) {
        *self = GameSession {
            phase: Phase::Playing,
            finish_line_z: Some(tuning.distance_goal),
            timer_command: Some(TimerCommand::Start),
            ..GameSession::new(tuning)
        };
    }

    pub fn take_timer_command(&mut self) -> Option<TimerCommand> {
        self.timer_command.take()
    }
}
