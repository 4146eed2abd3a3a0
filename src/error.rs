//! Configuration errors
//!
//! The simulation itself never fails: every operation is total and edge cases
//! are no-ops. The only thing rejected is a bad `WorldConfig`, at world creation.

use std::fmt;

/// Why a world configuration was refused.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid unit must be strictly positive.
    InvalidCell { cell: f32 },
    /// Arena must leave at least one free cell inside the walls.
    ArenaTooSmall { width: u32, height: u32 },
    /// Decay factor must be in (0, 1).
    InvalidDecay { decay: f32 },
    /// Minimum rebound speed cannot be negative.
    NegativeRebound { min_rebound: f32 },
    /// A numeric field is NaN or infinite.
    NonFinite { field: &'static str },
    /// Obstacles need a non-zero maximum side.
    EmptyObstacleSize,
    /// Squares need a non-zero side.
    EmptyBody,
    /// JSON could not be parsed.
    Parse(String),
    /// Config file could not be read or written.
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCell { cell } => write!(f, "cell size must be > 0 (got {cell})"),
            Self::ArenaTooSmall { width, height } => {
                write!(f, "arena {width}x{height} cells is smaller than 3x3")
            }
            Self::InvalidDecay { decay } => {
                write!(f, "bounce decay must be in (0, 1) (got {decay})")
            }
            Self::NegativeRebound { min_rebound } => {
                write!(f, "minimum rebound must be >= 0 (got {min_rebound})")
            }
            Self::NonFinite { field } => write!(f, "{field} is not a finite number"),
            Self::EmptyObstacleSize => write!(f, "obstacle_max_cells must be >= 1"),
            Self::EmptyBody => write!(f, "body_cells must be >= 1"),
            Self::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
            Self::Io(msg) => write!(f, "config I/O failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_value() {
        let e = ConfigError::InvalidCell { cell: -2.0 };
        assert!(e.to_string().contains("-2"));

        let e = ConfigError::ArenaTooSmall { width: 2, height: 9 };
        assert!(e.to_string().contains("2x9"));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: ConfigError = err.into();
        assert!(matches!(e, ConfigError::Parse(_)));
    }
}
