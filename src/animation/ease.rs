//! Easing curves.
//!
//! Named the way timeline libraries name them: `power1`..`power4` with an
//! `in`, `out` or `inOut` direction, plus `linear`. `powerN` is a polynomial
//! of degree N+1, so `power3.out` is `1 - (1 - t)^4`. CSS transitions use
//! [`Ease::CubicBezier`] instead.

use std::str::FromStr;

/// Direction of a power curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

/// An easing function mapping linear progress `0..=1` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    Power(u8, EaseDir),
    /// CSS `cubic-bezier(x1, y1, x2, y2)`. Both x values must be in `0..=1`.
    CubicBezier(f64, f64, f64, f64),
}

/// Bisection steps when inverting a bezier's x curve.
const BEZIER_STEPS: u32 = 40;

impl Ease {
    /// The decelerating curve used by the entrance sequence.
    pub const POWER3_OUT: Ease = Ease::Power(3, EaseDir::Out);

    /// The default curve of CSS color transitions, `cubic-bezier(0.4, 0, 0.2, 1)`.
    pub const STANDARD: Ease = Ease::CubicBezier(0.4, 0.0, 0.2, 1.0);

    /// Apply the curve. Input is clamped to `0..=1`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power(power, dir) => {
                let exp = power as i32 + 1;
                match dir {
                    EaseDir::In => t.powi(exp),
                    EaseDir::Out => 1.0 - (1.0 - t).powi(exp),
                    EaseDir::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(exp) / 2.0
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(exp) / 2.0
                        }
                    }
                }
            }
            Ease::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                // x(s) is monotonic on 0..=1, so bisect for the s where x(s) = t
                let (mut lo, mut hi) = (0.0, 1.0);
                for _ in 0..BEZIER_STEPS {
                    let mid = (lo + hi) / 2.0;
                    if bezier(x1, x2, mid) < t {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                bezier(y1, y2, (lo + hi) / 2.0)
            }
        }
    }
}

/// One axis of a bezier from (0, 0) to (1, 1) with control values `p1`, `p2`.
fn bezier(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * p1 * inv * inv * s + 3.0 * p2 * inv * s * s + s * s * s
}

impl Default for Ease {
    fn default() -> Self {
        Ease::POWER3_OUT
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("linear") || s.eq_ignore_ascii_case("none") {
            return Ok(Ease::Linear);
        }

        let (name, dir) = match s.split_once('.') {
            Some((name, dir)) => (name, Some(dir)),
            None => (s, None),
        };

        let power = name
            .strip_prefix("power")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(|| format!("unknown ease `{s}`"))?;

        let dir = match dir {
            None | Some("out") => EaseDir::Out,
            Some("in") => EaseDir::In,
            Some("inOut") => EaseDir::InOut,
            Some(other) => return Err(format!("unknown ease direction `{other}`")),
        };

        Ok(Ease::Power(power, dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_endpoints_are_fixed() {
        for ease in [
            Ease::Linear,
            Ease::POWER3_OUT,
            Ease::Power(1, EaseDir::In),
            Ease::Power(2, EaseDir::InOut),
            Ease::STANDARD,
        ] {
            assert!(ease.apply(0.0).abs() < EPS, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < EPS, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_power3_out_decelerates() {
        let ease = Ease::POWER3_OUT;
        assert!((ease.apply(0.5) - (1.0 - 0.5f64.powi(4))).abs() < EPS);
        // Front-loaded: more than half the distance in the first half
        assert!(ease.apply(0.5) > 0.9);
        assert!(ease.apply(0.25) > ease.apply(0.1));
    }

    #[test]
    fn test_standard_bezier_samples() {
        // Reference values of cubic-bezier(0.4, 0, 0.2, 1)
        let ease = Ease::STANDARD;
        assert!((ease.apply(0.25) - 0.236_587).abs() < 1e-5);
        assert!((ease.apply(0.5) - 0.775_561).abs() < 1e-5);
        assert!((ease.apply(0.75) - 0.959_368).abs() < 1e-5);
    }

    #[test]
    fn test_bezier_with_linear_controls_is_linear() {
        let ease = Ease::CubicBezier(0.0, 0.0, 1.0, 1.0);
        for t in [0.1, 0.3, 0.6, 0.9] {
            assert!((ease.apply(t) - t).abs() < 1e-6, "at {t}");
        }
    }

    #[test]
    fn test_clamps_input() {
        assert_eq!(Ease::POWER3_OUT.apply(-1.0), 0.0);
        assert_eq!(Ease::POWER3_OUT.apply(3.0), 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power3.out".parse::<Ease>(), Ok(Ease::POWER3_OUT));
        assert_eq!("power3".parse::<Ease>(), Ok(Ease::POWER3_OUT));
        assert_eq!("power2.inOut".parse::<Ease>(), Ok(Ease::Power(2, EaseDir::InOut)));
        assert_eq!("linear".parse::<Ease>(), Ok(Ease::Linear));
        assert!("power9.out".parse::<Ease>().is_err());
        assert!("elastic".parse::<Ease>().is_err());
        assert!("power1.sideways".parse::<Ease>().is_err());
    }
}
