//! World clock and playable bounds.
//!
//! The day/night cycle is a resource-based state machine over a time-of-day
//! scalar in `[0, 1)`. Night is the middle half of the cycle; the wave
//! director keys off the phase, one wave per night.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::constants::{NIGHT_END, NIGHT_START};
use crate::engine::config::CoreConfig;
use crate::engine::SimSet;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DayNightCycle>()
            .init_resource::<WorldBounds>()
            .add_systems(Update, advance_day_night.in_set(SimSet::Cycle));
    }
}

/// Day/night phase derived from the time-of-day scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

/// Continuously advancing world clock.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct DayNightCycle {
    /// Time of day in `[0, 1)`; wraps at 1
    pub time_of_day: f32,
    pub phase: DayPhase,
    /// Completed full cycles
    pub day_count: u32,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self {
            time_of_day: 0.0,
            phase: DayPhase::Day,
            day_count: 0,
        }
    }
}

impl DayNightCycle {
    /// Phase for a given time-of-day scalar: night on `[0.25, 0.75)`.
    pub fn phase_of(time_of_day: f32) -> DayPhase {
        if (NIGHT_START..NIGHT_END).contains(&time_of_day) {
            DayPhase::Night
        } else {
            DayPhase::Day
        }
    }
}

fn advance_day_night(config: Res<CoreConfig>, mut cycle: ResMut<DayNightCycle>) {
    let step = 1.0 / config.day_length_ticks.max(1) as f32;
    let mut t = cycle.time_of_day + step;
    if t >= 1.0 {
        t -= 1.0;
        cycle.day_count += 1;
    }
    cycle.time_of_day = t;

    let phase = DayNightCycle::phase_of(t);
    if phase != cycle.phase {
        tracing::info!(?phase, day = cycle.day_count, "phase transition");
        cycle.phase = phase;
    }
}

/// Walkable rectangle, supplied by the embedding presentation layer.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: -2400,
            min_y: -2400,
            max_x: 2400,
            max_y: 2400,
        }
    }
}

impl WorldBounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x as f32
            && p.x <= self.max_x as f32
            && p.y >= self.min_y as f32
            && p.y <= self.max_y as f32
    }

    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x as f32, self.max_x as f32),
            p.y.clamp(self.min_y as f32, self.max_y as f32),
        )
    }
}

/// Uniform random point inside the bounds.
pub fn random_point_in_bounds(rng: &mut impl Rng, bounds: &WorldBounds) -> Vec2 {
    Vec2::new(
        rng.gen_range(bounds.min_x as f32..=bounds.max_x as f32),
        rng.gen_range(bounds.min_y as f32..=bounds.max_y as f32),
    )
}

/// Random point on a jittered ring around `center`, clamped into bounds.
pub fn random_point_on_ring(
    rng: &mut impl Rng,
    bounds: &WorldBounds,
    center: Vec2,
    radius: f32,
    jitter: f32,
) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let r = radius + rng.gen_range(-jitter..=jitter);
    bounds.clamp_point(center + Vec2::from_angle(angle) * r)
}
