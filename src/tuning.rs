//! Data-driven flight tuning
//!
//! Every physics constant the simulation reads, grouped into one value that can be
//! loaded from JSON and checked before an engine is built from it. Tuning is fixed
//! for the lifetime of an engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning value is rejected
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} range is empty or inverted: {min}..{max}")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Physics tuning for one flip session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipTuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    pub initial_y_velocity_min: f32,
    pub initial_y_velocity_max: f32,
    pub initial_angular_velocity_min: f32,
    pub initial_angular_velocity_max: f32,
    /// Fraction of spin lost per second
    pub angular_damping_factor: f32,
    /// Height of the landing surface (px)
    pub landing_y_offset: f32,
    pub bottle_width: f32,
    pub bottle_height: f32,
}

impl Default for FlipTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            initial_y_velocity_min: INITIAL_Y_VELOCITY_MIN,
            initial_y_velocity_max: INITIAL_Y_VELOCITY_MAX,
            initial_angular_velocity_min: INITIAL_ANGULAR_VELOCITY_MIN,
            initial_angular_velocity_max: INITIAL_ANGULAR_VELOCITY_MAX,
            angular_damping_factor: ANGULAR_DAMPING_FACTOR,
            landing_y_offset: LANDING_Y_OFFSET,
            bottle_width: BOTTLE_WIDTH,
            bottle_height: BOTTLE_HEIGHT,
        }
    }
}

impl FlipTuning {
    /// Parse tuning from JSON and validate it. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value describes a flight the simulation can run
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("gravity", self.gravity),
            ("initial_y_velocity_min", self.initial_y_velocity_min),
            ("initial_y_velocity_max", self.initial_y_velocity_max),
            ("initial_angular_velocity_min", self.initial_angular_velocity_min),
            ("initial_angular_velocity_max", self.initial_angular_velocity_max),
            ("angular_damping_factor", self.angular_damping_factor),
            ("landing_y_offset", self.landing_y_offset),
            ("bottle_width", self.bottle_width),
            ("bottle_height", self.bottle_height),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field });
            }
        }

        for (field, value) in [
            ("gravity", self.gravity),
            ("initial_y_velocity_min", self.initial_y_velocity_min),
            ("initial_angular_velocity_min", self.initial_angular_velocity_min),
            ("bottle_width", self.bottle_width),
            ("bottle_height", self.bottle_height),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if self.angular_damping_factor < 0.0 {
            return Err(TuningError::Negative {
                field: "angular_damping_factor",
                value: self.angular_damping_factor,
            });
        }

        check_range(
            "initial_y_velocity",
            self.initial_y_velocity_min,
            self.initial_y_velocity_max,
        )?;
        check_range(
            "initial_angular_velocity",
            self.initial_angular_velocity_min,
            self.initial_angular_velocity_max,
        )?;

        Ok(())
    }

    /// Base height of a bottle resting on its side after a failed landing
    pub fn fail_rest_height(&self) -> f32 {
        self.landing_y_offset - self.bottle_height / 2.0 + self.bottle_width / 2.0
    }
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if max <= min {
        return Err(TuningError::InvalidRange { field, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = FlipTuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gravity, 2800.0);
        assert_eq!(tuning.landing_y_offset, 50.0);
    }

    #[test]
    fn test_fail_rest_height() {
        // 50 - 75 + 27.5
        assert_eq!(FlipTuning::default().fail_rest_height(), 2.5);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let tuning = FlipTuning::from_json(r#"{ "gravity": 1500.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 1500.0);
        assert_eq!(tuning.initial_y_velocity_max, INITIAL_Y_VELOCITY_MAX);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = FlipTuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let tuning = FlipTuning {
            initial_y_velocity_min: 900.0,
            initial_y_velocity_max: 800.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvalidRange {
                field: "initial_y_velocity",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let zero_gravity = FlipTuning {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_gravity.validate(),
            Err(TuningError::NotPositive { field: "gravity", .. })
        ));

        let negative_damping = FlipTuning {
            angular_damping_factor: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative_damping.validate(),
            Err(TuningError::Negative { .. })
        ));

        let nan_offset = FlipTuning {
            landing_y_offset: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_offset.validate(),
            Err(TuningError::NotFinite {
                field: "landing_y_offset"
            })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = TuningError::InvalidRange {
            field: "initial_y_velocity",
            min: 2.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "initial_y_velocity range is empty or inverted: 2..1"
        );
    }
}
