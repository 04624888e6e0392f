use crate::config::*;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Serialize;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PowerUpKind {
    SpeedBoost,
    TimeBonus,
    Invincibility,
}

const POWERUP_KINDS: [PowerUpKind; 3] = [
    PowerUpKind::SpeedBoost,
    PowerUpKind::TimeBonus,
    PowerUpKind::Invincibility,
];

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollectibleKind {
    Coin,
    PowerUp(PowerUpKind),
}

#[derive(Serialize, Clone)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub x: f32,
    pub z: f32,
    pub spin: f32,
    pub hover_y: f32,
    pub active: bool,
}

/// What a single pickup grants the session.
#[derive(Default, Clone, Copy)]
pub struct CollectGain {
    pub points: u32,
    pub coins: u32,
    pub time_bonus_seconds: f32,
}

struct ActiveEffect {
    time_left: f32,
}

/// Coins and power-ups in one pool, plus the at-most-one-per-kind timed
/// effects their collection activates.
pub struct CollectiblePool {
    pub items: Vec<Collectible>,
    clock: f32,
    speed_boost: Option<ActiveEffect>,
    invincibility: Option<ActiveEffect>,
    coin_chance: f64,
    powerup_chance: f64,
}

impl CollectiblePool {
    pub fn new(rng: &mut SmallRng, coin_chance: f64, powerup_chance: f64) -> Self {
        let mut pool = CollectiblePool {
            items: Vec::new(),
            clock: 0.0,
            speed_boost: None,
            invincibility: None,
            coin_chance,
            powerup_chance,
        };
        pool.spawn_range(SPAWN_RANGE_START, TRACK_LENGTH, COIN_SPACING, rng);
        pool
    }

    pub fn spawn_range(&mut self, start_z: f32, end_z: f32, spacing: f32, rng: &mut SmallRng) {
        let mut z = start_z;
        while z < end_z {
            let lane = rng.gen_range(0..LANE_COUNT);

            if rng.gen_bool(self.coin_chance) {
                self.items.push(Collectible {
                    kind: CollectibleKind::Coin,
                    x: LANE_POSITIONS[lane],
                    z,
                    spin: 0.0,
                    hover_y: COIN_HOVER_BASE_Y,
                    active: true,
                });
            }

            if rng.gen_bool(self.powerup_chance) {
                let kind = POWERUP_KINDS[rng.gen_range(0..POWERUP_KINDS.len())];
                // One lane over from the coin slot so the two never stack
                let powerup_lane = (lane + 1) % LANE_COUNT;
                self.items.push(Collectible {
                    kind: CollectibleKind::PowerUp(kind),
                    x: LANE_POSITIONS[powerup_lane],
                    z: z + spacing / 2.0,
                    spin: 0.0,
                    hover_y: POWERUP_HOVER_BASE_Y,
                    active: true,
                });
            }

            z += spacing;
        }
    }

    /// Cosmetic spin/hover plus effect countdowns.
    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        for item in &mut self.items {
            if !item.active {
                continue;
            }
            match item.kind {
                CollectibleKind::Coin => {
                    item.spin += COIN_ROTATION_SPEED * dt;
                    item.hover_y = COIN_HOVER_BASE_Y
                        + (self.clock * COIN_HOVER_SPEED).sin() * COIN_HOVER_AMPLITUDE;
                }
                CollectibleKind::PowerUp(_) => {
                    item.spin += POWERUP_ROTATION_SPEED * dt;
                    item.hover_y = POWERUP_HOVER_BASE_Y
                        + (self.clock * POWERUP_HOVER_SPEED).sin() * POWERUP_HOVER_AMPLITUDE;
                }
            }
        }

        if let Some(boost) = &mut self.speed_boost {
            boost.time_left -= dt;
            if boost.time_left <= 0.0 {
                self.speed_boost = None;
            }
        }
        if let Some(inv) = &mut self.invincibility {
            inv.time_left -= dt;
            if inv.time_left <= 0.0 {
                self.invincibility = None;
            }
        }
    }

    /// Deactivate the item and apply its effect. Returns `None` when the
    /// item was already collected, so a pickup can never count twice.
    pub fn collect(&mut self, index: usize) -> Option<CollectGain> {
        let item = self.items.get_mut(index)?;
        if !item.active {
            return None;
        }
        item.active = false;

        let mut gain = CollectGain::default();
        match item.kind {
            CollectibleKind::Coin => {
                gain.points = COIN_POINTS;
                gain.coins = 1;
            }
            CollectibleKind::PowerUp(PowerUpKind::SpeedBoost) => {
                // Re-collecting refreshes the duration, never stacks
                self.speed_boost = Some(ActiveEffect {
                    time_left: SPEED_BOOST_DURATION,
                });
            }
            CollectibleKind::PowerUp(PowerUpKind::TimeBonus) => {
                gain.time_bonus_seconds = TIME_BONUS_SECONDS;
            }
            CollectibleKind::PowerUp(PowerUpKind::Invincibility) => {
                self.invincibility = Some(ActiveEffect {
                    time_left: INVINCIBILITY_DURATION,
                });
            }
        }
        Some(gain)
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.speed_boost.is_some() {
            SPEED_BOOST_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_some()
    }

    pub fn cleanup(&mut self, min_z: f32) {
        self.items.retain(|item| item.z >= min_z);
    }

    /// Restock the road with a fresh spread of items, as on a new level or a
    /// world wrap. Running effect timers are left alone.
    pub fn respawn(&mut self, rng: &mut SmallRng) {
        self.items.clear();
        self.spawn_range(SPAWN_RANGE_START, TRACK_LENGTH, COIN_SPACING, rng);
    }

    pub fn reset(&mut self, rng: &mut SmallRng) {
        self.speed_boost = None;
        self.invincibility = None;
        self.respawn(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pool_with_defaults(seed: u64) -> (CollectiblePool, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pool = CollectiblePool::new(&mut rng, COIN_SPAWN_CHANCE, POWERUP_SPAWN_CHANCE);
        (pool, rng)
    }

    #[test]
    fn test_spawn_rates_roughly_match_configured_chances() {
        let (pool, _) = pool_with_defaults(11);
        let slots = ((TRACK_LENGTH - SPAWN_RANGE_START) / COIN_SPACING) as f64;
        let coins = pool
            .items
            .iter()
            .filter(|i| i.kind == CollectibleKind::Coin)
            .count() as f64;
        let powerups = pool.items.len() as f64 - coins;
        assert!((coins / slots - COIN_SPAWN_CHANCE).abs() < 0.1);
        assert!((powerups / slots - POWERUP_SPAWN_CHANCE).abs() < 0.1);
    }

    #[test]
    fn test_powerup_never_shares_a_slot_with_its_coin() {
        let (pool, _) = pool_with_defaults(12);
        for item in &pool.items {
            if let CollectibleKind::PowerUp(_) = item.kind {
                assert!(LANE_POSITIONS.contains(&item.x));
            }
        }
        // Power-ups sit half a spacing off the coin grid
        for item in &pool.items {
            let on_grid = ((item.z - SPAWN_RANGE_START) % COIN_SPACING).abs() < 0.001;
            match item.kind {
                CollectibleKind::Coin => assert!(on_grid),
                CollectibleKind::PowerUp(_) => assert!(!on_grid),
            }
        }
    }

    #[test]
    fn test_coin_collects_exactly_once() {
        let (mut pool, _) = pool_with_defaults(13);
        let idx = pool
            .items
            .iter()
            .position(|i| i.kind == CollectibleKind::Coin)
            .unwrap();
        let gain = pool.collect(idx).unwrap();
        assert_eq!(gain.points, COIN_POINTS);
        assert_eq!(gain.coins, 1);
        assert!(pool.collect(idx).is_none());
    }

    #[test]
    fn test_boost_refreshes_instead_of_stacking() {
        let (mut pool, _) = pool_with_defaults(14);
        pool.items.push(Collectible {
            kind: CollectibleKind::PowerUp(PowerUpKind::SpeedBoost),
            x: 0.0,
            z: 0.0,
            spin: 0.0,
            hover_y: POWERUP_HOVER_BASE_Y,
            active: true,
        });
        let a = pool.items.len() - 1;
        pool.collect(a);
        pool.update(SPEED_BOOST_DURATION - 1.0);
        assert_eq!(pool.speed_multiplier(), SPEED_BOOST_MULTIPLIER);

        // Second pickup resets the countdown to the full duration
        pool.items.push(Collectible {
            kind: CollectibleKind::PowerUp(PowerUpKind::SpeedBoost),
            x: 0.0,
            z: 0.0,
            spin: 0.0,
            hover_y: POWERUP_HOVER_BASE_Y,
            active: true,
        });
        let b = pool.items.len() - 1;
        pool.collect(b);
        pool.update(SPEED_BOOST_DURATION - 0.5);
        assert_eq!(pool.speed_multiplier(), SPEED_BOOST_MULTIPLIER);
        pool.update(1.0);
        assert_eq!(pool.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_invincibility_expires() {
        let (mut pool, _) = pool_with_defaults(15);
        pool.items.push(Collectible {
            kind: CollectibleKind::PowerUp(PowerUpKind::Invincibility),
            x: 0.0,
            z: 0.0,
            spin: 0.0,
            hover_y: POWERUP_HOVER_BASE_Y,
            active: true,
        });
        let idx = pool.items.len() - 1;
        pool.collect(idx);
        assert!(pool.is_invincible());
        pool.update(INVINCIBILITY_DURATION + 0.01);
        assert!(!pool.is_invincible());
    }

    #[test]
    fn test_respawn_restocks_but_keeps_running_effects() {
        let (mut pool, mut rng) = pool_with_defaults(17);
        pool.items.push(Collectible {
            kind: CollectibleKind::PowerUp(PowerUpKind::SpeedBoost),
            x: 0.0,
            z: 0.0,
            spin: 0.0,
            hover_y: POWERUP_HOVER_BASE_Y,
            active: true,
        });
        let idx = pool.items.len() - 1;
        pool.collect(idx);
        pool.items.clear(); // road stripped bare

        pool.respawn(&mut rng);
        assert!(!pool.items.is_empty());
        assert!(pool.items.iter().all(|i| i.active));
        assert_eq!(pool.speed_multiplier(), SPEED_BOOST_MULTIPLIER);
    }

    #[test]
    fn test_hover_oscillates_around_kind_base_height() {
        let (mut pool, _) = pool_with_defaults(18);
        pool.update(0.5);
        for item in &pool.items {
            match item.kind {
                CollectibleKind::Coin => {
                    assert!((item.hover_y - COIN_HOVER_BASE_Y).abs() <= COIN_HOVER_AMPLITUDE)
                }
                CollectibleKind::PowerUp(_) => {
                    assert!((item.hover_y - POWERUP_HOVER_BASE_Y).abs() <= POWERUP_HOVER_AMPLITUDE)
                }
            }
        }
    }

    #[test]
    fn test_cleanup_drops_items_behind_threshold() {
        let (mut pool, _) = pool_with_defaults(16);
        let before = pool.items.len();
        pool.cleanup(5000.0);
        assert!(pool.items.len() < before);
        assert!(pool.items.iter().all(|i| i.z >= 5000.0));
    }
}
