//! Sliding-number configuration.
//!
//! `Config` is the serializable form (JSON, wasm). `Options` is the runtime form
//! and may carry closures for duration and easing.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::digits::MAX_DECIMAL_POINTS;
use crate::easing::{Easing, EasingPreset};
use crate::error::SlidingNumberError;

/// Default transition length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 250.0;

/// Transition length: fixed, or computed from `(from, to)` at every `set`.
#[derive(Clone)]
pub enum DurationSpec {
    Fixed(f64),
    Dynamic(Rc<dyn Fn(f64, f64) -> f64>),
}

impl DurationSpec {
    /// Resolve the duration for a transition. Dynamic results that are negative
    /// or non-finite are clamped to 0.
    pub fn resolve(&self, from: f64, to: f64) -> f64 {
        match self {
            Self::Fixed(ms) => *ms,
            Self::Dynamic(f) => {
                let ms = f(from, to);
                if ms.is_finite() && ms >= 0.0 {
                    ms
                } else {
                    log::warn!(
                        "sliding-number: duration fn returned {ms} for {from} -> {to}; using 0"
                    );
                    0.0
                }
            }
        }
    }
}

impl Default for DurationSpec {
    fn default() -> Self {
        Self::Fixed(DEFAULT_DURATION_MS)
    }
}

impl From<f64> for DurationSpec {
    fn from(ms: f64) -> Self {
        Self::Fixed(ms)
    }
}

impl fmt::Debug for DurationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(ms) => f.debug_tuple("Fixed").field(ms).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

/// What the final (9th) tick emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// Final tick emits the literal target value.
    #[default]
    Exact,
    /// Final tick emits the rounded interpolation at `easing(1.0)`, which drifts
    /// from the target if the easing does not end at exactly 1.
    Interpolated,
}

/// Runtime options for [`SlidingNumber`](crate::SlidingNumber).
#[derive(Clone, Default)]
pub struct Options {
    pub duration: DurationSpec,
    pub easing: Option<Rc<dyn Easing>>,
    pub decimal_points: u32,
    pub convergence: Convergence,
    preset: Option<EasingPreset>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, ms: f64) -> Self {
        self.duration = DurationSpec::Fixed(ms);
        self
    }

    pub fn with_duration_fn(mut self, f: impl Fn(f64, f64) -> f64 + 'static) -> Self {
        self.duration = DurationSpec::Dynamic(Rc::new(f));
        self
    }

    pub fn with_easing(mut self, easing: impl Easing + 'static) -> Self {
        self.easing = Some(Rc::new(easing));
        self.preset = None;
        self
    }

    pub fn with_easing_preset(mut self, preset: EasingPreset) -> Self {
        self.easing = Some(Rc::new(preset));
        self.preset = Some(preset);
        self
    }

    pub fn with_decimal_points(mut self, decimal_points: u32) -> Self {
        self.decimal_points = decimal_points;
        self
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    /// Reject configurations the digit math cannot honor.
    pub fn validate(&self) -> Result<(), SlidingNumberError> {
        if let DurationSpec::Fixed(ms) = self.duration {
            if !ms.is_finite() || ms < 0.0 {
                return Err(SlidingNumberError::InvalidDuration { duration: ms });
            }
        }
        if self.decimal_points > MAX_DECIMAL_POINTS {
            return Err(SlidingNumberError::too_many_decimal_points(
                self.decimal_points,
            ));
        }
        if let Some(preset) = &self.preset {
            preset.validate()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("duration", &self.duration)
            .field("easing", &self.easing.as_ref().map(|_| "<easing>"))
            .field("decimal_points", &self.decimal_points)
            .field("convergence", &self.convergence)
            .finish()
    }
}

/// Serializable configuration. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<EasingPreset>,
    pub decimal_points: u32,
    pub convergence: Convergence,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: None,
            decimal_points: 0,
            convergence: Convergence::default(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> Result<Self, SlidingNumberError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SlidingNumberError> {
        Options::from(self.clone()).validate()
    }
}

impl From<Config> for Options {
    fn from(cfg: Config) -> Self {
        let opts = Options::new()
            .with_duration(cfg.duration_ms)
            .with_decimal_points(cfg.decimal_points)
            .with_convergence(cfg.convergence);
        match cfg.easing {
            Some(preset) => opts.with_easing_preset(preset),
            None => opts,
        }
    }
}
