//! Agent profiles: perception, combat and movement tuning.
//!
//! Профиль неизменяем и шарится между всеми агентами одного типа
//! через `AgentArchetype(Arc<AgentProfile>)`. Валидация — один раз,
//! при загрузке/спавне; системы дальше доверяют инвариантам.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod error;


pub use error::ConfigError;

/// How far and how wide an agent perceives.
///
/// Invariant (checked by [`AgentProfile::validate`]):
/// `chase_range >= detection_range >= CombatProfile::attack_range >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Distance at which an idle/patrolling agent notices a target (meters)
    pub detection_range: f32,
    /// Maximum pursuit distance; perception fails beyond it (meters)
    pub chase_range: f32,
    /// Full horizontal cone angle (degrees). 360 disables the angle test.
    pub field_of_view_degrees: f32,
    /// Eye point height above the agent origin (meters)
    pub eye_height_offset: f32,
    /// Raycast from the eye point before reporting the target as visible
    pub occlusion_test_enabled: bool,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            detection_range: 15.0,
            chase_range: 20.0,
            field_of_view_degrees: 120.0,
            eye_height_offset: 1.6,
            occlusion_test_enabled: true,
        }
    }
}

impl PerceptionConfig {
    pub fn half_fov_radians(&self) -> f32 {
        (self.field_of_view_degrees * 0.5).to_radians()
    }
}

/// Melee attack timing and damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CombatProfile {
    /// Distance at which Chase switches to Attack (meters)
    pub attack_range: f32,
    /// Delay between attack start and damage application (seconds)
    pub windup_seconds: f32,
    /// Lockout after the strike before a new attack may start (seconds)
    pub cooldown_seconds: f32,
    pub damage: u32,
    /// Extra reach accepted by the strike-time range re-check (meters)
    pub tolerance_margin: f32,
}

impl Default for CombatProfile {
    fn default() -> Self {
        Self {
            attack_range: 2.0,
            windup_seconds: 0.6,
            cooldown_seconds: 2.0,
            damage: 10,
            tolerance_margin: 0.5,
        }
    }
}

impl CombatProfile {
    /// Reach used when the windup expires.
    pub fn strike_reach(&self) -> f32 {
        self.attack_range + self.tolerance_margin
    }
}

/// Locomotion and operating-area limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct MovementProfile {
    /// Speed used by navigation and by the direct-line return fallback (m/s)
    pub move_speed: f32,
    /// Max yaw rate while tracking a target (degrees/second)
    pub turn_rate_degrees: f32,
    /// Distance under which a waypoint/origin counts as reached (meters)
    pub arrival_epsilon: f32,
    /// Chase/Attack give up once this far from origin (meters)
    pub leash_radius: Option<f32>,
    /// Corpse lifetime after death; `None` keeps the entity forever
    pub corpse_seconds: Option<f32>,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            turn_rate_degrees: 360.0,
            arrival_epsilon: 0.5,
            leash_radius: None,
            corpse_seconds: Some(2.0),
        }
    }
}

/// Complete per-type configuration bundle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct AgentProfile {
    pub perception: PerceptionConfig,
    pub combat: CombatProfile,
    pub movement: MovementProfile,
}

impl AgentProfile {
    /// Parse a RON profile and validate it.
    ///
    /// Missing fields fall back to defaults, so a file may override only
    /// what differs (e.g. `(combat: (damage: 25))`).
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let profile: AgentProfile = ron::from_str(source)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.perception;
        let c = &self.combat;
        let m = &self.movement;

        let ordered = c.attack_range.is_finite()
            && p.detection_range.is_finite()
            && p.chase_range.is_finite()
            && c.attack_range >= 0.0
            && p.detection_range >= c.attack_range
            && p.chase_range >= p.detection_range;
        if !ordered {
            return Err(ConfigError::RangeOrder {
                attack: c.attack_range,
                detection: p.detection_range,
                chase: p.chase_range,
            });
        }

        if !(p.field_of_view_degrees > 0.0 && p.field_of_view_degrees <= 360.0) {
            return Err(ConfigError::FieldOfView(p.field_of_view_degrees));
        }

        non_negative("eye_height_offset", p.eye_height_offset.abs())?;
        non_negative("windup_seconds", c.windup_seconds)?;
        non_negative("cooldown_seconds", c.cooldown_seconds)?;
        non_negative("tolerance_margin", c.tolerance_margin)?;
        positive("move_speed", m.move_speed)?;
        positive("turn_rate_degrees", m.turn_rate_degrees)?;
        positive("arrival_epsilon", m.arrival_epsilon)?;

        if let Some(seconds) = m.corpse_seconds {
            non_negative("corpse_seconds", seconds)?;
        }

        if let Some(leash) = m.leash_radius {
            positive("leash_radius", leash)?;
            if leash < p.chase_range {
                return Err(ConfigError::LeashTooShort {
                    leash,
                    chase: p.chase_range,
                });
            }
        }

        Ok(())
    }

    /// Validate and wrap for sharing between agents of the same type.
    pub fn into_archetype(self) -> Result<AgentArchetype, ConfigError> {
        self.validate()?;
        Ok(AgentArchetype(Arc::new(self)))
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Shared, validated profile attached to every agent of one type.
///
/// Only obtainable through [`AgentProfile::into_archetype`].
#[derive(Component, Debug, Clone)]
pub struct AgentArchetype(Arc<AgentProfile>);

impl std::ops::Deref for AgentArchetype {
    type Target = AgentProfile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
