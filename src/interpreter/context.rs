use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Smallest number of decimal places the display accepts.
pub const MIN_PRECISION: u8 = 1;
/// Largest number of decimal places the display accepts.
pub const MAX_PRECISION: u8 = 15;
/// Longest input a context accepts, whatever the settings ask for.
pub const MAX_EXPRESSION_LENGTH: usize = 4096;

/// Unit in which trigonometric functions take and return angles.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    /// Angles in degrees (the power-on default).
    #[default]
    Degrees,
    /// Angles in radians.
    Radians,
}

impl AngleMode {
    /// Converts an angle typed by the user into radians.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::context::AngleMode;
    ///
    /// assert!((AngleMode::Degrees.to_radians(180.0) - std::f64::consts::PI).abs() < 1e-15);
    /// assert_eq!(AngleMode::Radians.to_radians(1.5), 1.5);
    /// ```
    #[must_use]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    /// Converts an angle in radians into the unit shown to the user.
    #[must_use]
    pub fn from_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_degrees(),
            Self::Radians => angle,
        }
    }
}

/// Session-wide settings as persisted by the storage layer.
///
/// Every field has a default, so a stored JSON document may omit any of them
/// and documents written by older firmware still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Angle unit for trigonometric functions.
    pub angle_mode:            AngleMode,
    /// Whether square roots and logarithms of negative reals promote to
    /// complex results instead of failing.
    pub complex_mode:          bool,
    /// Decimal places shown; clamped to `1..=15` when a context is built.
    pub precision:             u8,
    /// Always display reals in scientific notation.
    pub scientific_notation:   bool,
    /// Magnitudes at or above this switch to scientific notation.
    pub sci_upper:             f64,
    /// Non-zero magnitudes below this switch to scientific notation.
    pub sci_lower:             f64,
    /// Wall-clock limit of one evaluation, in milliseconds.
    pub timeout_ms:            u64,
    /// Maximum number of evaluation steps of one evaluation.
    pub node_budget:           u64,
    /// Longest accepted input, in bytes; clamped to `1..=4096` when a
    /// context is built.
    pub max_expression_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { angle_mode:            AngleMode::Degrees,
               complex_mode:          false,
               precision:             10,
               scientific_notation:   false,
               sci_upper:             1e10,
               sci_lower:             1e-6,
               timeout_ms:            1000,
               node_budget:           10_000,
               max_expression_length: 128, }
    }
}

impl Settings {
    /// Loads settings from the JSON document kept by the storage layer.
    ///
    /// # Errors
    /// Returns the `serde_json` error if the document is malformed.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::context::{AngleMode, Settings};
    ///
    /// let settings = Settings::from_json(r#"{ "angle_mode": "radians" }"#).unwrap();
    /// assert_eq!(settings.angle_mode, AngleMode::Radians);
    /// assert_eq!(settings.precision, 10);
    /// ```
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes the settings for the storage layer.
    ///
    /// # Errors
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Immutable parameters of one evaluation.
///
/// Built fresh for each call from [`Settings`] and passed by reference
/// through parsing, evaluation and formatting; nothing mutates it mid-call.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    /// Angle unit at the trigonometric function boundary.
    pub angle_mode:            AngleMode,
    /// Promote roots and logarithms of negative reals to complex.
    pub complex_mode:          bool,
    /// Decimal places shown, always within `1..=15`.
    pub decimal_places:        usize,
    /// Force scientific notation.
    pub scientific_notation:   bool,
    /// Upper magnitude threshold for scientific notation.
    pub sci_upper:             f64,
    /// Lower magnitude threshold for scientific notation.
    pub sci_lower:             f64,
    /// Wall-clock limit of the evaluation.
    pub deadline:              Duration,
    /// Maximum number of evaluation steps.
    pub node_budget:           u64,
    /// Longest accepted input, in bytes.
    pub max_expression_length: usize,
}

impl From<&Settings> for EvaluationContext {
    /// Derives the per-call context, clamping the precision and the input
    /// length.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::context::{EvaluationContext, Settings};
    ///
    /// let settings = Settings { precision: 40,
    ///                           max_expression_length: usize::MAX,
    ///                           ..Settings::default() };
    /// let ctx = EvaluationContext::from(&settings);
    /// assert_eq!(ctx.decimal_places, 15);
    /// assert_eq!(ctx.max_expression_length, 4096);
    /// ```
    fn from(settings: &Settings) -> Self {
        Self { angle_mode:            settings.angle_mode,
               complex_mode:          settings.complex_mode,
               decimal_places:        usize::from(settings.precision
                                                          .clamp(MIN_PRECISION, MAX_PRECISION)),
               scientific_notation:   settings.scientific_notation,
               sci_upper:             settings.sci_upper,
               sci_lower:             settings.sci_lower,
               deadline:              Duration::from_millis(settings.timeout_ms),
               node_budget:           settings.node_budget,
               max_expression_length: settings.max_expression_length
                                                .clamp(1, MAX_EXPRESSION_LENGTH), }
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn settings_survive_json() {
        let settings = Settings { angle_mode: AngleMode::Radians,
                                  complex_mode: true,
                                  precision: 4,
                                  ..Settings::default() };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn precision_is_clamped_from_below() {
        let settings = Settings { precision: 0,
                                  ..Settings::default() };
        assert_eq!(EvaluationContext::from(&settings).decimal_places, 1);
    }

    #[test]
    fn input_length_is_clamped() {
        let huge = Settings { max_expression_length: usize::MAX,
                              ..Settings::default() };
        assert_eq!(EvaluationContext::from(&huge).max_expression_length, MAX_EXPRESSION_LENGTH);

        let zero = Settings { max_expression_length: 0,
                              ..Settings::default() };
        assert_eq!(EvaluationContext::from(&zero).max_expression_length, 1);
    }
}
