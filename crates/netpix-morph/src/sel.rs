//! Structuring elements
//!
//! A structuring element is a small grid of hit / don't-care positions
//! with an origin. Morphological operations visit the pixels under the
//! hit positions when the origin is placed on each output pixel.

use crate::{MorphError, MorphResult};

/// Structuring element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    hits: Vec<bool>,
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::cross()
    }
}

impl StructuringElement {
    /// Create an element from a row-major hit grid and an origin.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if the grid is empty, its length
    /// does not match `width * height`, it has no hits, or the origin lies
    /// outside it.
    pub fn new(width: u32, height: u32, hits: Vec<bool>, cx: u32, cy: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "empty element {width}x{height}"
            )));
        }
        if hits.len() != width as usize * height as usize {
            return Err(MorphError::InvalidSel(format!(
                "expected {} cells, got {}",
                width as usize * height as usize,
                hits.len()
            )));
        }
        if cx >= width || cy >= height {
            return Err(MorphError::InvalidSel(format!(
                "origin ({cx}, {cy}) outside {width}x{height}"
            )));
        }
        if !hits.iter().any(|&h| h) {
            return Err(MorphError::InvalidSel("element has no hits".into()));
        }
        Ok(Self {
            width,
            height,
            cx,
            cy,
            hits,
        })
    }

    /// The 3x3 plus shape: the origin and its four edge neighbors.
    pub fn cross() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            hits: vec![false, true, false, true, true, true, false, true, false],
        }
    }

    /// A `size` x `size` square of hits centered on the origin.
    ///
    /// `size` must be odd.
    pub fn square(size: u32) -> MorphResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(MorphError::InvalidParameters(format!(
                "square size must be odd, got {size}"
            )));
        }
        let n = size as usize * size as usize;
        Self::new(size, size, vec![true; n], size / 2, size / 2)
    }

    /// Parse an element from text rows: `x` is a hit, `.` is don't care.
    ///
    /// Rows are separated by newlines and must all have the same length.
    pub fn from_string(pattern: &str, cx: u32, cy: u32) -> MorphResult<Self> {
        let rows: Vec<&str> = pattern
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        let mut hits = Vec::with_capacity(rows.len() * width as usize);
        for row in &rows {
            if row.chars().count() as u32 != width {
                return Err(MorphError::InvalidSel("rows differ in length".into()));
            }
            for c in row.chars() {
                match c {
                    'x' | 'X' => hits.push(true),
                    '.' => hits.push(false),
                    other => {
                        return Err(MorphError::InvalidSel(format!(
                            "unexpected character '{other}'"
                        )));
                    }
                }
            }
        }
        Self::new(width, rows.len() as u32, hits, cx, cy)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin
    #[inline]
    pub fn origin(&self) -> (u32, u32) {
        (self.cx, self.cy)
    }

    /// Count the hit positions
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h).count()
    }

    /// Hit positions relative to the origin, in row-major order.
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;
        self.hits.iter().enumerate().filter_map(move |(idx, &hit)| {
            hit.then(|| {
                let x = (idx as u32 % width) as i32;
                let y = (idx as u32 / width) as i32;
                (x - cx, y - cy)
            })
        })
    }
}
