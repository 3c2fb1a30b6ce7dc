use std::fmt;
use std::str::FromStr;

use am_core::error::CoreError;
use am_core::frame::PixelBuffer;
use serde::{Deserialize, Serialize};

use crate::params::{BrightnessLevel, ContrastLevel, NoiseIntensity};
use crate::pixel;

/// Transforme un buffer de pixels.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::Transform;
///
/// struct Identity;
/// impl Transform for Identity {
///     fn apply(&self, buffer: PixelBuffer) -> PixelBuffer { buffer }
///     fn name(&self) -> &'static str { "identity" }
/// }
/// ```
pub trait Transform: Send + Sync {
    /// Consume a buffer and return the transformed one (same dimensions).
    fn apply(&self, buffer: PixelBuffer) -> PixelBuffer;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}

/// One step of a transform plan, strongly typed at the orchestration boundary.
///
/// Serialised with an `op` tag, e.g. `{ op = "contrast", level = 0.5 }`.
///
/// # Example
/// ```
/// use am_transform::{TransformOp, ContrastLevel};
/// let op = TransformOp::Contrast { level: ContrastLevel::new(0.5).unwrap() };
/// assert_eq!(op.to_string(), "contrast(0.5)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    /// `c := 255 - c`.
    Invert,
    /// Additive shift.
    Brightness {
        /// Shift in [-1, 1].
        level: BrightnessLevel,
    },
    /// Stretch around mid-gray.
    Contrast {
        /// Level in [0, 1].
        level: ContrastLevel,
    },
    /// Uniform per-channel noise.
    Noise {
        /// Intensity in [0, 100].
        intensity: NoiseIntensity,
    },
    /// BT.709 greyscale.
    Greyscale,
}

impl Transform for TransformOp {
    fn apply(&self, buffer: PixelBuffer) -> PixelBuffer {
        match *self {
            Self::Invert => pixel::invert(buffer),
            Self::Brightness { level } => pixel::adjust_brightness(buffer, level),
            Self::Contrast { level } => pixel::enhance_contrast(buffer, level),
            Self::Noise { intensity } => pixel::add_noise(buffer, intensity),
            Self::Greyscale => pixel::greyscale(buffer),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Invert => "invert",
            Self::Brightness { .. } => "brightness",
            Self::Contrast { .. } => "contrast",
            Self::Noise { .. } => "noise",
            Self::Greyscale => "greyscale",
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness { level } => write!(f, "brightness({level})"),
            Self::Contrast { level } => write!(f, "contrast({level})"),
            Self::Noise { intensity } => write!(f, "noise({intensity})"),
            Self::Invert | Self::Greyscale => f.write_str(self.name()),
        }
    }
}

/// Parse the command-line form: `invert`, `greyscale`, `brightness=0.3`,
/// `contrast=0.5`, `noise=20`. A bare parameterised name takes its default.
///
/// # Example
/// ```
/// use am_transform::TransformOp;
/// let op: TransformOp = "contrast=0.8".parse().unwrap();
/// assert_eq!(op.to_string(), "contrast(0.8)");
/// assert_eq!("noise".parse::<TransformOp>().unwrap().to_string(), "noise(20)");
/// ```
impl FromStr for TransformOp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = match s.split_once('=') {
            Some((n, v)) => (n.trim(), Some(v.trim())),
            None => (s.trim(), None),
        };
        let number = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| CoreError::config(format!("valeur numérique invalide « {v} »")))
        };
        match (name.to_ascii_lowercase().as_str(), value) {
            ("invert", None) => Ok(Self::Invert),
            ("greyscale" | "grayscale", None) => Ok(Self::Greyscale),
            ("brightness", v) => Ok(Self::Brightness {
                level: v.map_or(Ok(BrightnessLevel::default()), |v| BrightnessLevel::new(number(v)?))?,
            }),
            ("contrast", v) => Ok(Self::Contrast {
                level: v.map_or(Ok(ContrastLevel::default()), |v| ContrastLevel::new(number(v)?))?,
            }),
            ("noise", v) => Ok(Self::Noise {
                intensity: v.map_or(Ok(NoiseIntensity::default()), |v| NoiseIntensity::new(number(v)?))?,
            }),
            ("invert" | "greyscale" | "grayscale", Some(_)) => Err(CoreError::config(format!(
                "« {name} » ne prend pas de paramètre"
            ))),
            _ => Err(CoreError::config(format!("transformation inconnue « {s} »"))),
        }
    }
}

/// Apply a plan in order.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::{apply_plan, TransformOp};
/// let src = PixelBuffer::filled(2, 2, [10, 20, 30, 255]);
/// let out = apply_plan(src.clone(), &[TransformOp::Invert, TransformOp::Invert]);
/// assert_eq!(out, src);
/// ```
#[must_use]
pub fn apply_plan(buffer: PixelBuffer, plan: &[TransformOp]) -> PixelBuffer {
    plan.iter().fold(buffer, |buf, op| {
        log::debug!("Transformation : {op}");
        op.apply(buf)
    })
}
