//! Configuration errors.

use thiserror::Error;

/// Rejected agent configuration.
///
/// Agents are never spawned from a profile that fails validation, so the
/// runtime systems can rely on the range ordering without re-checking it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ranges must satisfy chase ({chase}) >= detection ({detection}) >= attack ({attack}) >= 0")]
    RangeOrder { attack: f32, detection: f32, chase: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("field of view must be in (0, 360] degrees, got {0}")]
    FieldOfView(f32),

    #[error("leash radius {leash} is shorter than chase range {chase}")]
    LeashTooShort { leash: f32, chase: f32 },

    #[error("patrol waypoint #{index} is not a finite position")]
    InvalidWaypoint { index: usize },

    #[error("failed to parse agent profile: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
