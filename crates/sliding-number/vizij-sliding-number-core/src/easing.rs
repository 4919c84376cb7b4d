//! Easing strategies:
//! - `Easing` trait (blanket impl for closures)
//! - `EasingPreset` named curves, serde-friendly for JSON/wasm configs
//! - cubic-bezier timing (CSS semantics) solved by bisection on x

use serde::{Deserialize, Serialize};

use crate::error::SlidingNumberError;

/// Maps normalized progress `t ∈ [0,1]` to eased progress.
pub trait Easing {
    fn ease(&self, t: f64) -> f64;
}

impl<F> Easing for F
where
    F: Fn(f64) -> f64,
{
    #[inline]
    fn ease(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Named easing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingPreset {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl EasingPreset {
    /// Look up a preset by its snake_case name (`"quad_in"`, `"cubic_in_out"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "linear" => Self::Linear,
            "quad_in" => Self::QuadIn,
            "quad_out" => Self::QuadOut,
            "quad_in_out" => Self::QuadInOut,
            "cubic_in" => Self::CubicIn,
            "cubic_out" => Self::CubicOut,
            "cubic_in_out" => Self::CubicInOut,
            "ease" => Self::CubicBezier {
                x1: 0.25,
                y1: 0.1,
                x2: 0.25,
                y2: 1.0,
            },
            "ease_in" => Self::CubicBezier {
                x1: 0.42,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
            "ease_out" => Self::CubicBezier {
                x1: 0.0,
                y1: 0.0,
                x2: 0.58,
                y2: 1.0,
            },
            "ease_in_out" => Self::CubicBezier {
                x1: 0.42,
                y1: 0.0,
                x2: 0.58,
                y2: 1.0,
            },
            _ => return None,
        })
    }

    /// Bezier x control points must stay in [0,1] so x(t) is monotonic.
    pub fn validate(&self) -> Result<(), SlidingNumberError> {
        if let Self::CubicBezier { x1, y1, x2, y2 } = *self {
            if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
                return Err(SlidingNumberError::InvalidEasing {
                    reason: "cubic_bezier control points must be finite".to_string(),
                });
            }
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(SlidingNumberError::InvalidEasing {
                    reason: format!("cubic_bezier x control points must lie in [0, 1], got x1={x1}, x2={x2}"),
                });
            }
        }
        Ok(())
    }
}

impl Easing for EasingPreset {
    fn ease(&self, t: f64) -> f64 {
        match *self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
fn bezier_ease_t(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Endpoints are fixed at (0,0) and (1,1)
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = t;
    for _ in 0..48 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-9 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [EasingPreset; 8] = [
        EasingPreset::Linear,
        EasingPreset::QuadIn,
        EasingPreset::QuadOut,
        EasingPreset::QuadInOut,
        EasingPreset::CubicIn,
        EasingPreset::CubicOut,
        EasingPreset::CubicInOut,
        EasingPreset::CubicBezier {
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
        },
    ];

    #[test]
    fn presets_hit_endpoints() {
        for preset in ALL {
            assert_abs_diff_eq!(preset.ease(0.0), 0.0, epsilon = 1e-12);
            assert_eq!(preset.ease(1.0), 1.0, "{preset:?}");
        }
    }

    #[test]
    fn ease_in_lags_linear() {
        for preset in [EasingPreset::QuadIn, EasingPreset::CubicIn] {
            assert!(preset.ease(0.5) < 0.5);
        }
        assert!(EasingPreset::QuadOut.ease(0.5) > 0.5);
    }

    #[test]
    fn symmetric_in_out_passes_midpoint() {
        assert_abs_diff_eq!(EasingPreset::QuadInOut.ease(0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(EasingPreset::CubicInOut.ease(0.5), 0.5, epsilon = 1e-12);
        let bez = EasingPreset::from_name("ease_in_out").unwrap();
        assert_abs_diff_eq!(bez.ease(0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn linear_bezier_fast_path() {
        let bez = EasingPreset::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        for i in 0..=9 {
            let t = i as f64 / 9.0;
            assert_eq!(bez.ease(t), t);
        }
    }

    #[test]
    fn closures_are_easings() {
        let square = |t: f64| t * t;
        assert_eq!(square.ease(0.5), 0.25);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(EasingPreset::from_name("quad_in"), Some(EasingPreset::QuadIn));
        assert!(EasingPreset::from_name("bounce").is_none());
    }

    #[test]
    fn bezier_validation() {
        assert!(EasingPreset::from_name("ease").unwrap().validate().is_ok());
        let bad = EasingPreset::CubicBezier {
            x1: 1.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0,
        };
        assert!(matches!(
            bad.validate(),
            Err(SlidingNumberError::InvalidEasing { .. })
        ));
    }

    #[test]
    fn preset_json_shape() {
        let json = serde_json::to_string(&EasingPreset::QuadIn).unwrap();
        assert_eq!(json, r#"{"type":"quad_in"}"#);
        let bez: EasingPreset =
            serde_json::from_str(r#"{"type":"cubic_bezier","x1":0.1,"y1":0.2,"x2":0.3,"y2":0.4}"#)
                .unwrap();
        assert_eq!(
            bez,
            EasingPreset::CubicBezier {
                x1: 0.1,
                y1: 0.2,
                x2: 0.3,
                y2: 0.4
            }
        );
    }
}
