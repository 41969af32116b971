//! Luminance histograms
//!
//! A [`Histogram`] holds 256 counts indexed by luminance value. The sum of
//! the counts equals the number of pixels it was built from.

use crate::raster::Raster;

/// 256-bin luminance histogram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Histogram { counts: [0; 256] }
    }

    /// Build the luminance histogram of a raster.
    pub fn from_raster(raster: &Raster) -> Self {
        Self::from_values(&raster.luminance_values())
    }

    /// Build a histogram from a sequence of 8-bit values.
    pub fn from_values(values: &[u8]) -> Self {
        let mut hist = Self::new();
        for &v in values {
            hist.counts[v as usize] += 1;
        }
        hist
    }

    /// Get the bin counts.
    pub fn counts(&self) -> &[u32; 256] {
        &self.counts
    }

    /// Get the count for one luminance value.
    #[inline]
    pub fn count(&self, value: u8) -> u32 {
        self.counts[value as usize]
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Mean luminance, or `None` for an empty histogram.
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.weighted_sum() as f64 / total as f64)
    }

    /// Smallest occupied bin.
    pub fn min_value(&self) -> Option<u8> {
        self.counts.iter().position(|&c| c > 0).map(|i| i as u8)
    }

    /// Largest occupied bin.
    pub fn max_value(&self) -> Option<u8> {
        self.counts.iter().rposition(|&c| c > 0).map(|i| i as u8)
    }

    /// Cumulative distribution: `cdf[i]` is the number of samples `<= i`.
    pub fn cdf(&self) -> [u64; 256] {
        let mut cdf = [0u64; 256];
        let mut acc = 0u64;
        for (i, &c) in self.counts.iter().enumerate() {
            acc += c as u64;
            cdf[i] = acc;
        }
        cdf
    }

    /// Sum of `value * count` over all bins.
    pub fn weighted_sum(&self) -> u64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| i as u64 * c as u64)
            .sum()
    }

    /// Otsu's global threshold.
    ///
    /// Scans every candidate `t`, splitting the histogram into `<= t`
    /// (background class B) and `> t` (foreground class F), and maximizes
    /// the between-class variance `wB * wF * (mB - mF)^2`. Splits with an
    /// empty class are skipped. When several consecutive candidates share
    /// the maximum the midpoint of the first and last is returned.
    ///
    /// A histogram with a single occupied bin has no valid split; that
    /// bin's value is returned. An empty histogram yields 0.
    pub fn otsu_threshold(&self) -> u8 {
        let total = self.total() as f64;
        let sum_all = self.weighted_sum() as f64;

        let mut w_b = 0.0f64;
        let mut sum_b = 0.0f64;
        let mut best: Option<(f64, usize, usize)> = None;

        for t in 0..256usize {
            let c = self.counts[t] as f64;
            w_b += c;
            if w_b == 0.0 {
                continue;
            }
            let w_f = total - w_b;
            if w_f == 0.0 {
                break;
            }
            sum_b += t as f64 * c;
            let m_b = sum_b / w_b;
            let m_f = (sum_all - sum_b) / w_f;
            let between = w_b * w_f * (m_b - m_f) * (m_b - m_f);

            best = match best {
                None => Some((between, t, t)),
                Some((max, first, _)) if between == max => Some((max, first, t)),
                Some((max, ..)) if between > max => Some((between, t, t)),
                keep => keep,
            };
        }

        match best {
            Some((_, first, last)) => ((first + last) / 2) as u8,
            None => self.min_value().unwrap_or(0),
        }
    }
}
