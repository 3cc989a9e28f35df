//! Patrol routes: cyclic waypoints with a dwell at each one.
//!
//! `PatrolRoute` неизменяем и может шариться (Arc) между агентами.
//! Прогресс конкретного агента — `PatrolProgress` (индекс + таймер паузы).

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;
use std::sync::Arc;

use crate::profile::{non_negative, ConfigError};
use crate::TIMER_EPSILON;

/// Ordered waypoints visited cyclically.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    dwell_seconds: f32,
}

impl PatrolRoute {
    /// Validated route. An empty list is allowed (the agent simply never patrols).
    pub fn new(waypoints: Vec<Vec3>, dwell_seconds: f32) -> Result<Self, ConfigError> {
        if let Some(index) = waypoints.iter().position(|w| !w.is_finite()) {
            return Err(ConfigError::InvalidWaypoint { index });
        }
        non_negative("dwell_seconds", dwell_seconds)?;

        Ok(Self {
            waypoints,
            dwell_seconds,
        })
    }

    /// Random wander route around `center` (XZ disc of `radius`).
    ///
    /// Детерминирован для одного и того же seed.
    pub fn scatter(
        center: Vec3,
        radius: f32,
        count: usize,
        dwell_seconds: f32,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        non_negative("wander_radius", radius)?;

        let waypoints = (0..count)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                // sqrt: равномерно по площади круга
                let distance = radius * rng.gen::<f32>().sqrt();
                center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
            })
            .collect();

        Self::new(waypoints, dwell_seconds)
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn dwell_seconds(&self) -> f32 {
        self.dwell_seconds
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// What happened to patrol progress this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolStep {
    /// Moving toward the current waypoint
    Travel,
    /// Waiting at the current waypoint
    Dwelling,
    /// Dwell finished; now heading to waypoint `index`
    Advanced { index: usize },
    /// No waypoints
    NoRoute,
}

/// Per-agent position along a route.
#[derive(Component, Debug, Clone)]
pub struct PatrolProgress {
    route: Arc<PatrolRoute>,
    index: usize,
    dwell_remaining: Option<f32>,
}

impl PatrolProgress {
    pub fn new(route: Arc<PatrolRoute>) -> Self {
        Self {
            route,
            index: 0,
            dwell_remaining: None,
        }
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn has_route(&self) -> bool {
        !self.route.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.route.waypoints.get(self.index).copied()
    }

    pub fn is_dwelling(&self) -> bool {
        self.dwell_remaining.is_some()
    }

    /// Abandon an in-progress dwell (re-entering Patrol resumes travel).
    pub fn reset_dwell(&mut self) {
        self.dwell_remaining = None;
    }

    /// Advance dwell/index bookkeeping by one tick.
    ///
    /// Пауза начинается на тике прибытия и дальше уже не зависит от
    /// `arrived`: агента могут подвинуть, пока он стоит.
    pub fn update(&mut self, arrived: bool, delta: f32) -> PatrolStep {
        if !self.has_route() {
            return PatrolStep::NoRoute;
        }

        let remaining = match self.dwell_remaining {
            None if !arrived => return PatrolStep::Travel,
            None => self.route.dwell_seconds,
            Some(remaining) => remaining - delta,
        };

        if remaining <= TIMER_EPSILON {
            self.dwell_remaining = None;
            self.index = (self.index + 1) % self.route.len();
            PatrolStep::Advanced { index: self.index }
        } else {
            self.dwell_remaining = Some(remaining);
            PatrolStep::Dwelling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square() -> Arc<PatrolRoute> {
        Arc::new(
            PatrolRoute::new(
                vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 10.0),
                ],
                0.1,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_route_rejects_bad_input() {
        let bad = PatrolRoute::new(vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)], 1.0);
        assert!(matches!(bad, Err(ConfigError::InvalidWaypoint { index: 1 })));

        let negative = PatrolRoute::new(vec![Vec3::ZERO], -1.0);
        assert!(matches!(negative, Err(ConfigError::Negative { .. })));

        assert!(PatrolRoute::new(Vec::new(), 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_travel_until_arrival() {
        let mut progress = PatrolProgress::new(square());
        assert_eq!(progress.current_waypoint(), Some(Vec3::ZERO));
        assert_eq!(progress.update(false, 0.05), PatrolStep::Travel);
        assert_eq!(progress.index(), 0);
    }

    #[test]
    fn test_dwell_then_advance() {
        let mut progress = PatrolProgress::new(square());

        // Тик прибытия: пауза 0.1 начинается
        assert_eq!(progress.update(true, 0.05), PatrolStep::Dwelling);
        assert!(progress.is_dwelling());
        assert_eq!(progress.update(true, 0.05), PatrolStep::Dwelling);
        assert_eq!(progress.update(true, 0.05), PatrolStep::Advanced { index: 1 });
        assert_eq!(progress.current_waypoint(), Some(Vec3::new(10.0, 0.0, 0.0)));
        assert!(!progress.is_dwelling());
    }

    #[test]
    fn test_index_wraps() {
        let mut progress = PatrolProgress::new(square());
        let mut visited = Vec::new();
        for _ in 0..(3 * 4) {
            if let PatrolStep::Advanced { index } = progress.update(true, 0.05) {
                visited.push(index);
            }
        }
        assert_eq!(visited, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_zero_dwell_advances_on_arrival() {
        let route = Arc::new(PatrolRoute::new(vec![Vec3::ZERO, Vec3::X], 0.0).unwrap());
        let mut progress = PatrolProgress::new(route);
        assert_eq!(progress.update(true, 0.05), PatrolStep::Advanced { index: 1 });
    }

    #[test]
    fn test_empty_route() {
        let route = Arc::new(PatrolRoute::new(Vec::new(), 1.0).unwrap());
        let mut progress = PatrolProgress::new(route);
        assert!(!progress.has_route());
        assert_eq!(progress.current_waypoint(), None);
        assert_eq!(progress.update(true, 0.05), PatrolStep::NoRoute);
    }

    #[test]
    fn test_scatter_stays_in_disc_and_is_deterministic() {
        let center = Vec3::new(5.0, 1.0, -3.0);
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);

        let a = PatrolRoute::scatter(center, 8.0, 6, 1.0, &mut rng_a).unwrap();
        let b = PatrolRoute::scatter(center, 8.0, 6, 1.0, &mut rng_b).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        for waypoint in a.waypoints() {
            assert_eq!(waypoint.y, center.y);
            assert!(waypoint.distance(center) <= 8.0 + 1e-4);
        }
    }
}
