//! Scales map data values onto pixel coordinates.
//!
//! Band padding is applied both between and around bands. Linear ticks land
//! on 1, 2 or 5 times a power of ten.

use std::collections::HashMap;

/// Something an axis can be drawn from.
pub trait AxisScale {
    /// Pixel range as `(start, end)`.
    fn range(&self) -> (f64, f64);

    /// Tick positions in pixels with their labels.
    fn tick_marks(&self) -> Vec<(f64, String)>;
}

/// Maps discrete categories to evenly spaced bands.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    step: f64,
    bandwidth: f64,
    start: f64,
    reverse: bool,
}

impl BandScale {
    /// Build a band scale with equal inner and outer padding. Duplicate
    /// categories are dropped, keeping first-seen order.
    pub fn new<I, S>(domain: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys = Vec::new();
        let mut index = HashMap::new();
        for key in domain {
            let key = key.into();
            if !index.contains_key(&key) {
                index.insert(key.clone(), keys.len());
                keys.push(key);
            }
        }

        let padding_inner = padding.clamp(0.0, 1.0);
        let padding_outer = padding.max(0.0);
        let n = keys.len() as f64;
        let reverse = range.1 < range.0;
        let (lo, hi) = if reverse {
            (range.1, range.0)
        } else {
            (range.0, range.1)
        };

        let step = (hi - lo) / (n - padding_inner + padding_outer * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding_inner)) * 0.5;
        let bandwidth = step * (1.0 - padding_inner);

        Self {
            domain: keys,
            index,
            range,
            step,
            bandwidth,
            start,
            reverse,
        }
    }

    /// Leading edge of the band for `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        let i = *self.index.get(key)?;
        let slot = if self.reverse {
            self.domain.len() - 1 - i
        } else {
            i
        };
        Some(self.start + self.step * slot as f64)
    }

    /// Middle of the band for `key`.
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

impl AxisScale for BandScale {
    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn tick_marks(&self) -> Vec<(f64, String)> {
        self.domain
            .iter()
            .filter_map(|key| Some((self.center(key)?, key.clone())))
            .collect()
    }
}

/// Affine map from a numeric domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Default number of ticks requested for an axis.
pub const DEFAULT_TICKS: usize = 10;

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map `value` into the range. A zero-width domain maps everything to
    /// the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }

        let reverse = stop < start;
        let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
        let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
            return Vec::new();
        };

        let mut ticks: Vec<f64> = (i1..=i2)
            .map(|i| {
                let i = i as f64;
                if inc < 0.0 {
                    i / -inc
                } else {
                    i * inc
                }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }

    /// Distance between consecutive ticks for `count` requested ticks.
    pub fn tick_step(&self, count: usize) -> Option<f64> {
        let (start, stop) = self.domain;
        let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
        if count == 0 || lo == hi {
            return None;
        }
        let (_, _, inc) = tick_spec(lo, hi, count as f64)?;
        Some(if inc < 0.0 { 1.0 / -inc } else { inc })
    }

    /// Format a tick value with just enough decimals for `step` and a
    /// thousands separator.
    pub fn tick_format(value: f64, step: f64) -> String {
        let decimals = if step > 0.0 && step < 1.0 {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        let text = format!("{:.*}", decimals, value);
        let text = if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
            text[1..].to_string()
        } else {
            text
        };
        group_thousands(&text)
    }
}

impl AxisScale for LinearScale {
    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn tick_marks(&self) -> Vec<(f64, String)> {
        let step = self.tick_step(DEFAULT_TICKS).unwrap_or(1.0);
        self.ticks(DEFAULT_TICKS)
            .into_iter()
            .map(|t| (self.apply(t), Self::tick_format(t, step)))
            .collect()
    }
}

/// Maps categories onto a cycling list of outputs, usually colors.
#[derive(Debug, Clone)]
pub struct OrdinalScale<T> {
    index: HashMap<String, usize>,
    outputs: Vec<T>,
}

impl<T> OrdinalScale<T> {
    pub fn new<I, S>(domain: I, outputs: Vec<T>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        for key in domain {
            let next = index.len();
            index.entry(key.into()).or_insert(next);
        }
        Self { index, outputs }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        if self.outputs.is_empty() {
            return None;
        }
        let i = *self.index.get(key)?;
        self.outputs.get(i % self.outputs.len())
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick bounds and increment for `lo..=hi`. A negative increment
/// means "divide by" to keep sub-unit steps exact.
fn tick_spec(lo: f64, hi: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (hi - lo) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scaled = 10f64.powf(-power) / factor;
        i1 = js_round(lo * scaled);
        i2 = js_round(hi * scaled);
        if i1 / scaled < lo {
            i1 += 1.0;
        }
        if i2 / scaled > hi {
            i2 -= 1.0;
        }
        inc = -scaled;
    } else {
        let scaled = 10f64.powf(power) * factor;
        i1 = js_round(lo / scaled);
        i2 = js_round(hi / scaled);
        if i1 * scaled < lo {
            i1 += 1.0;
        }
        if i2 * scaled > hi {
            i2 -= 1.0;
        }
        inc = scaled;
    }

    if i2 < i1 {
        if (0.5..2.0).contains(&count) {
            return tick_spec(lo, hi, count * 2.0);
        }
        return None;
    }
    Some((i1 as i64, i2 as i64, inc))
}

/// Round half toward positive infinity.
fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(dot) => (&rest[..dot], &rest[dot..]),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_band_scale_without_padding() {
        let scale = BandScale::new(["A", "B"], (0.0, 100.0), 0.0);
        assert_eq!(scale.position("A"), Some(0.0));
        assert_eq!(scale.position("B"), Some(50.0));
        assert_eq!(scale.bandwidth(), 50.0);
        assert_eq!(scale.position("C"), None);
    }

    #[test]
    fn test_band_scale_inner_and_outer_padding() {
        let scale = BandScale::new(["A", "B"], (0.0, 100.0), 0.5);
        assert_eq!(scale.position("B").unwrap() - scale.position("A").unwrap(), 40.0);
        assert_eq!(scale.bandwidth(), 20.0);
        assert_eq!(scale.position("A"), Some(20.0));
        assert_eq!(scale.position("B"), Some(60.0));
        assert_eq!(scale.center("B"), Some(70.0));

        // Three platforms across a 600px canvas with 30px margins.
        let scale = BandScale::new(["A", "B", "C"], (30.0, 570.0), 0.1);
        let step = scale.position("B").unwrap() - scale.position("A").unwrap();
        assert!(close(step, 540.0 / 3.1));
        assert!(close(scale.bandwidth(), 540.0 / 3.1 * 0.9));
        assert!(close(scale.position("A").unwrap(), 30.0 + 540.0 / 3.1 * 0.1));
    }

    #[test]
    fn test_band_scale_dedupes_in_first_seen_order() {
        let scale = BandScale::new(["b", "a", "b", "c", "a"], (0.0, 30.0), 0.0);
        assert_eq!(scale.domain(), &["b", "a", "c"]);
        assert_eq!(scale.position("c"), Some(20.0));
    }

    #[test]
    fn test_band_ticks_sit_at_band_centers() {
        let scale = BandScale::new(["x", "y"], (0.0, 100.0), 0.0);
        assert_eq!(
            scale.tick_marks(),
            vec![(25.0, "x".to_string()), (75.0, "y".to_string())]
        );
    }

    #[test]
    fn test_linear_scale_maps_and_inverts_range() {
        let scale = LinearScale::new((0.0, 200.0), (370.0, 30.0));
        assert_eq!(scale.apply(0.0), 370.0);
        assert_eq!(scale.apply(200.0), 30.0);
        assert_eq!(scale.apply(100.0), 200.0);

        let flat = LinearScale::new((5.0, 5.0), (370.0, 30.0));
        assert_eq!(flat.apply(5.0), 200.0);
    }

    #[test]
    fn test_linear_ticks() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        assert_eq!(
            scale.ticks(10),
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
        );

        let scale = LinearScale::new((5.0, 305.0), (0.0, 1.0));
        assert_eq!(
            scale.ticks(10),
            (1..=15).map(|i| i as f64 * 20.0).collect::<Vec<_>>()
        );

        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(scale.tick_step(5), Some(0.2));
    }

    #[test]
    fn test_tick_format() {
        assert_eq!(LinearScale::tick_format(40.0, 20.0), "40");
        assert_eq!(LinearScale::tick_format(0.2, 0.2), "0.2");
        assert_eq!(LinearScale::tick_format(0.25, 0.05), "0.25");
        assert_eq!(LinearScale::tick_format(12000.0, 2000.0), "12,000");
        assert_eq!(LinearScale::tick_format(-1500.0, 500.0), "-1,500");
    }

    #[test]
    fn test_ordinal_scale_cycles() {
        let scale = OrdinalScale::new(["Image", "Video", "Link", "Story"], vec![1, 2, 3]);
        assert_eq!(scale.get("Image"), Some(&1));
        assert_eq!(scale.get("Link"), Some(&3));
        assert_eq!(scale.get("Story"), Some(&1));
        assert_eq!(scale.get("Poll"), None);
    }
}
