//! Sampling configuration and its validation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

const VALID_RATES: RangeInclusive<f64> = 0.0..=1.0;

/// Sample rates per category.
///
/// Both rates are required and must lie within `[0, 1]`.
///
/// ```json
/// {"errorSampleRate": 1.0, "performanceSampleRate": 0.1}
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    /// The rate applied to `error` events.
    pub error_sample_rate: f64,

    /// The rate applied to all other events, including performance measurements and web vitals.
    pub performance_sample_rate: f64,
}

impl SamplingConfig {
    /// Checks that both rates lie within `[0, 1]`.
    pub fn validate(&self) -> Result<(), SamplingConfigError> {
        validate_rate("errorSampleRate", self.error_sample_rate)?;
        validate_rate("performanceSampleRate", self.performance_sample_rate)?;
        Ok(())
    }
}

fn validate_rate(name: &'static str, rate: f64) -> Result<(), SamplingConfigError> {
    // NaN is not contained in any range.
    if VALID_RATES.contains(&rate) {
        Ok(())
    } else {
        Err(SamplingConfigError::InvalidRate { name, rate })
    }
}

/// An error returned when the sampling configuration is invalid.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum SamplingConfigError {
    /// A sample rate lies outside of `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {rate}")]
    InvalidRate {
        /// The name of the offending option.
        name: &'static str,
        /// The rejected rate.
        rate: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(error_sample_rate: f64, performance_sample_rate: f64) -> SamplingConfig {
        SamplingConfig {
            error_sample_rate,
            performance_sample_rate,
        }
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(config(0.0, 1.0).validate().is_ok());
        assert!(config(1.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            config(1.5, 1.0).validate(),
            Err(SamplingConfigError::InvalidRate {
                name: "errorSampleRate",
                rate: 1.5
            })
        );
        assert_eq!(
            config(1.0, -0.1).validate(),
            Err(SamplingConfigError::InvalidRate {
                name: "performanceSampleRate",
                rate: -0.1
            })
        );
    }

    #[test]
    fn test_nan_rejected() {
        assert!(config(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_error_message() {
        let error = config(2.0, 1.0).validate().unwrap_err();
        assert_eq!(error.to_string(), "errorSampleRate must be between 0 and 1, got 2");
    }

    #[test]
    fn test_both_rates_required() {
        assert!(serde_json::from_str::<SamplingConfig>(r#"{"errorSampleRate": 0.5}"#).is_err());

        let config: SamplingConfig =
            serde_json::from_str(r#"{"errorSampleRate": 0.5, "performanceSampleRate": 0.1}"#)
                .unwrap();
        assert_eq!(config.performance_sample_rate, 0.1);
    }
}
