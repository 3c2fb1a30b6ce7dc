//! Paramètres typés des transformations.
//!
//! Values are range-checked at construction; out-of-range or non-finite input
//! fails with [`CoreError::Config`] instead of leaking NaN into pixel math.

use std::fmt;

use am_core::error::CoreError;
use serde::{Deserialize, Serialize};

macro_rules! bounded_param {
    ($(#[$meta:meta])* $name:ident, $min:expr, $max:expr, $default:expr, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            /// Inclusive lower bound.
            pub const MIN: f64 = $min;
            /// Inclusive upper bound.
            pub const MAX: f64 = $max;

            /// # Errors
            /// Returns [`CoreError::Config`] if `value` is non-finite or out of range.
            pub fn new(value: f64) -> Result<Self, CoreError> {
                if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(CoreError::config(format!(
                        concat!($label, " hors limites : {} (attendu [{}, {}])"),
                        value,
                        Self::MIN,
                        Self::MAX
                    )))
                }
            }

            /// Raw value.
            #[must_use]
            pub fn get(self) -> f64 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = CoreError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

bounded_param!(
    /// Additive brightness shift in [-1, 1], scaled by 255 per channel.
    ///
    /// # Example
    /// ```
    /// use am_transform::BrightnessLevel;
    /// assert!(BrightnessLevel::new(0.3).is_ok());
    /// assert!(BrightnessLevel::new(1.5).is_err());
    /// ```
    BrightnessLevel,
    -1.0,
    1.0,
    0.2,
    "luminosité"
);

bounded_param!(
    /// Contrast stretch in [0, 1]: 0 = identity, 1 = hard threshold at mid-gray.
    ContrastLevel,
    0.0,
    1.0,
    0.5,
    "contraste"
);

bounded_param!(
    /// Noise intensity in [0, 100]; per-channel amplitude is `intensity * 2.55`.
    ///
    /// # Example
    /// ```
    /// use am_transform::NoiseIntensity;
    /// assert!(NoiseIntensity::new(f64::NAN).is_err());
    /// assert_eq!(NoiseIntensity::default().get(), 20.0);
    /// ```
    NoiseIntensity,
    0.0,
    100.0,
    20.0,
    "intensité du bruit"
);

impl NoiseIntensity {
    /// Maximum per-channel deviation.
    #[must_use]
    pub fn amplitude(self) -> f64 {
        self.0 * 2.55
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(BrightnessLevel::new(-1.0).is_ok());
        assert!(BrightnessLevel::new(1.0).is_ok());
        assert!(ContrastLevel::new(0.0).is_ok());
        assert!(ContrastLevel::new(1.0).is_ok());
        assert!(NoiseIntensity::new(100.0).is_ok());
        assert!(NoiseIntensity::new(-0.1).is_err());
        assert!(ContrastLevel::new(f64::INFINITY).is_err());
    }

    #[test]
    fn deserialisation_validates() {
        #[derive(Deserialize)]
        struct Wrap {
            level: ContrastLevel,
        }
        let ok: Wrap = toml::from_str("level = 0.25").unwrap();
        assert_eq!(ok.level.get(), 0.25);
        assert!(toml::from_str::<Wrap>("level = 2.0").is_err());
    }

    #[test]
    fn amplitude_scales_to_255() {
        assert!((NoiseIntensity::new(100.0).unwrap().amplitude() - 255.0).abs() < 1e-9);
    }
}
