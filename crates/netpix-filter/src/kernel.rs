//! Fixed 3x3 integer kernels

/// A 3x3 integer convolution kernel, indexed `[row][column]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel3 {
    weights: [[i32; 3]; 3],
}

impl Kernel3 {
    /// Approximate Gaussian, normalized by 16.
    pub const GAUSSIAN: Kernel3 = Kernel3::new([[1, 2, 1], [2, 4, 2], [1, 2, 1]]);

    /// Horizontal Sobel gradient.
    pub const SOBEL_X: Kernel3 = Kernel3::new([[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]);

    /// Vertical Sobel gradient.
    pub const SOBEL_Y: Kernel3 = Kernel3::new([[-1, -2, -1], [0, 0, 0], [1, 2, 1]]);

    /// Create a kernel from its rows.
    pub const fn new(weights: [[i32; 3]; 3]) -> Self {
        Self { weights }
    }

    /// Weight at offset `(dx, dy)` from the center, each in `-1..=1`.
    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> i32 {
        self.weights[(dy + 1) as usize][(dx + 1) as usize]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> i32 {
        self.weights.iter().flatten().sum()
    }
}

/// Clamp a signed coordinate into `0..len`.
#[inline]
pub(crate) fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

/// Offsets `(dx, dy)` of a 3x3 neighborhood in row-major order.
pub(crate) fn offsets() -> impl Iterator<Item = (i32, i32)> {
    (-1..=1).flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_sums() {
        assert_eq!(Kernel3::GAUSSIAN.sum(), 16);
        assert_eq!(Kernel3::SOBEL_X.sum(), 0);
        assert_eq!(Kernel3::SOBEL_Y.sum(), 0);
    }

    #[test]
    fn test_kernel_at() {
        assert_eq!(Kernel3::GAUSSIAN.at(0, 0), 4);
        assert_eq!(Kernel3::SOBEL_X.at(1, 0), 2);
        assert_eq!(Kernel3::SOBEL_Y.at(0, -1), -2);
    }

    #[test]
    fn test_clamp_coord() {
        assert_eq!(clamp_coord(-1, 5), 0);
        assert_eq!(clamp_coord(5, 5), 4);
        assert_eq!(clamp_coord(2, 5), 2);
    }

    #[test]
    fn test_offsets_order() {
        let all: Vec<_> = offsets().collect();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], (-1, -1));
        assert_eq!(all[4], (0, 0));
        assert_eq!(all[8], (1, 1));
    }
}
