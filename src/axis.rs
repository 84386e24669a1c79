//! Continuous axes mapping domain values to pixel coordinates.
//!
//! The placement stage only needs `place()` to be monotonic, so linear and log axes are
//! interchangeable there.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    Log,
}

/// A continuous axis: `domain` in data units, `range` in pixels.
///
/// For a vertical axis the range is `(bottom, top)`, so larger values map to smaller y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub scale_type: ScaleType,
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl Axis {
    /// Build an axis. A log axis needs a positive domain minimum; non-positive minimums are
    /// replaced by `min(1, domain max)`.
    pub fn new(scale_type: ScaleType, domain: (f64, f64), range: (f64, f64)) -> Self {
        let domain = match scale_type {
            ScaleType::Linear => domain,
            ScaleType::Log if domain.0 > 0.0 => domain,
            ScaleType::Log => {
                let max = domain.1.max(f64::MIN_POSITIVE);
                (1.0_f64.min(max), max)
            }
        };
        Self {
            scale_type,
            domain,
            range,
        }
    }

    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::new(ScaleType::Linear, domain, range)
    }

    /// Maps a domain value to a pixel coordinate.
    pub fn place(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = match self.scale_type {
            ScaleType::Linear => {
                let denom = d1 - d0;
                if denom == 0.0 {
                    return r0;
                }
                (v - d0) / denom
            }
            ScaleType::Log => {
                if v <= 0.0 {
                    return r0;
                }
                let denom = d1.log10() - d0.log10();
                if denom == 0.0 {
                    return r0;
                }
                (v.log10() - d0.log10()) / denom
            }
        };
        r0 + t * (r1 - r0)
    }

    /// The domain value every bar width is measured from.
    pub fn origin(&self) -> f64 {
        self.domain.0
    }

    /// Pixel length of the span from the origin to `v`.
    pub fn extent(&self, v: f64) -> f64 {
        self.place(v) - self.place(self.origin())
    }

    /// Pixel length of the whole range.
    pub fn length(&self) -> f64 {
        (self.range.1 - self.range.0).abs()
    }

    /// "Nice-ish" tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self.scale_type {
            ScaleType::Linear => nice_ticks(self.domain.0, self.domain.1, count),
            ScaleType::Log => log_ticks(self.domain.0, self.domain.1),
        }
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }
    let start = (min / step).ceil() * step;
    let n = ((max - start) / step).floor();
    if !n.is_finite() || n < 0.0 {
        return vec![min, max];
    }
    (0..=(n.min(10_000.0) as u64))
        .map(|i| start + step * i as f64)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let base = 10_f64.powf(step.log10().floor());
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

fn log_ticks(min: f64, max: f64) -> Vec<f64> {
    if min <= 0.0 || max < min {
        return Vec::new();
    }
    let lo = (min.log10() - 1e-9).ceil() as i32;
    let hi = (max.log10() + 1e-9).floor() as i32;
    (lo..=hi).map(|p| 10_f64.powi(p)).collect()
}
