//! Timer-driven mini-games.
//!
//! Nothing here reads a clock. Callers feed elapsed time through `tick` and
//! player actions through `press`/`shoot`, which keeps every game deterministic.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use super::{AnswerError, GameStatus};
use crate::content::TargetKind;

/// A plain countdown, used by timed challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub limit: Duration,
    pub elapsed: Duration,
}

impl Countdown {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.limit
    }
}

/// A cursor sweeps 0..100 and back once per period; pressing inside the zone scores a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingBar {
    pub zone_start: f32,
    pub zone_end: f32,
    pub period: Duration,
    pub hits_required: u32,
    pub max_misses: u32,
    elapsed: Duration,
    hits: u32,
    misses: u32,
    status: GameStatus,
}

impl TimingBar {
    pub fn new(
        zone_start: f32,
        zone_end: f32,
        period: Duration,
        hits_required: u32,
        max_misses: u32,
    ) -> Self {
        Self {
            zone_start,
            zone_end,
            period,
            hits_required,
            max_misses,
            elapsed: Duration::ZERO,
            hits: 0,
            misses: 0,
            status: GameStatus::Running,
        }
    }

    /// Current cursor position in 0.0..=100.0.
    pub fn position(&self) -> f32 {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return 0.0;
        }
        let phase = (self.elapsed.as_secs_f64() % period) / period;
        let sweep = if phase < 0.5 {
            phase * 2.0
        } else {
            (1.0 - phase) * 2.0
        };
        (sweep * 100.0) as f32
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.status == GameStatus::Running {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    pub fn press(&mut self) -> GameStatus {
        if self.status.is_finished() {
            return self.status;
        }

        let position = self.position();
        if (self.zone_start..=self.zone_end).contains(&position) {
            self.hits += 1;
            if self.hits >= self.hits_required {
                self.status = GameStatus::Won;
            }
        } else {
            self.misses += 1;
            if self.misses >= self.max_misses {
                self.status = GameStatus::Lost;
            }
        }
        self.status
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}

/// A circle shrinks steadily; press while its radius sits inside the target window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShrinkingCircle {
    pub start_radius: f32,
    pub shrink_per_sec: f32,
    pub target_min: f32,
    pub target_max: f32,
    elapsed: Duration,
    status: GameStatus,
}

impl ShrinkingCircle {
    pub fn new(start_radius: f32, shrink_per_sec: f32, target_min: f32, target_max: f32) -> Self {
        Self {
            start_radius,
            shrink_per_sec,
            target_min,
            target_max,
            elapsed: Duration::ZERO,
            status: GameStatus::Running,
        }
    }

    pub fn radius(&self) -> f32 {
        (self.start_radius - self.shrink_per_sec * self.elapsed.as_secs_f32()).max(0.0)
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.status != GameStatus::Running {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.radius() <= 0.0 {
            self.status = GameStatus::Lost;
        }
    }

    /// One press decides the game.
    pub fn press(&mut self) -> GameStatus {
        if self.status == GameStatus::Running {
            let radius = self.radius();
            self.status = if (self.target_min..=self.target_max).contains(&radius) {
                GameStatus::Won
            } else {
                GameStatus::Lost
            };
        }
        self.status
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}

/// Shoot the pathogens, spare the body's own cells, beat the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingGallery {
    pub targets: Vec<TargetKind>,
    pub required_hits: u32,
    pub max_friendly_fire: u32,
    clock: Countdown,
    shot: HashSet<usize>,
    hits: u32,
    friendly_fire: u32,
    status: GameStatus,
}

impl ShootingGallery {
    pub fn new(
        targets: Vec<TargetKind>,
        required_hits: u32,
        time_limit: Duration,
        max_friendly_fire: u32,
    ) -> Self {
        Self {
            targets,
            required_hits,
            max_friendly_fire,
            clock: Countdown::new(time_limit),
            shot: HashSet::new(),
            hits: 0,
            friendly_fire: 0,
            status: GameStatus::Running,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.status != GameStatus::Running {
            return;
        }
        self.clock.tick(dt);
        if self.clock.is_expired() {
            self.status = GameStatus::Lost;
        }
    }

    /// Shooting the same target twice has no further effect.
    pub fn shoot(&mut self, index: usize) -> Result<GameStatus, AnswerError> {
        let kind = *self.targets.get(index).ok_or(AnswerError::OptionOutOfRange {
            index,
            count: self.targets.len(),
        })?;

        if self.status.is_finished() || !self.shot.insert(index) {
            return Ok(self.status);
        }

        match kind {
            TargetKind::Pathogen => {
                self.hits += 1;
                if self.hits >= self.required_hits {
                    self.status = GameStatus::Won;
                }
            }
            TargetKind::SelfCell => {
                self.friendly_fire += 1;
                if self.friendly_fire > self.max_friendly_fire {
                    self.status = GameStatus::Lost;
                }
            }
        }
        Ok(self.status)
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn friendly_fire(&self) -> u32 {
        self.friendly_fire
    }

    pub fn time_remaining(&self) -> Duration {
        self.clock.remaining()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}
