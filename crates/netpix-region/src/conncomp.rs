//! Connected component analysis
//!
//! Components are found by breadth-first traversal with 4-connectivity
//! over a [`BinaryMask`]. Seeds are taken in row-major scan order, so
//! components are reported top-to-bottom, left-to-right by their first
//! pixel.

use netpix_core::BinaryMask;
use std::collections::VecDeque;

/// Pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl Point {
    /// Create a point
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A 4-connected set of foreground pixels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectedComponent {
    /// Pixels in breadth-first visiting order, seed first
    pub points: Vec<Point>,
}

impl ConnectedComponent {
    /// Number of pixels in the component
    pub fn pixel_count(&self) -> usize {
        self.points.len()
    }

    /// Whether the component has no pixels
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive bounding box `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        ))
    }
}

/// Neighbor offsets visited from each pixel.
const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Flood one component from `seed`, marking pixels in `visited`.
fn bfs(mask: &BinaryMask, visited: &mut [bool], seed: Point) -> ConnectedComponent {
    let w = mask.width() as i64;
    let h = mask.height() as i64;
    let bits = mask.as_slice();

    let mut queue = VecDeque::new();
    let mut points = Vec::new();
    visited[(seed.y as i64 * w + seed.x as i64) as usize] = true;
    queue.push_back(seed);

    while let Some(p) = queue.pop_front() {
        points.push(p);
        for (dx, dy) in DIRECTIONS {
            let nx = p.x as i64 + dx;
            let ny = p.y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                continue;
            }
            let idx = (ny * w + nx) as usize;
            if bits[idx] && !visited[idx] {
                visited[idx] = true;
                queue.push_back(Point::new(nx as u32, ny as u32));
            }
        }
    }

    ConnectedComponent { points }
}

/// Find every 4-connected foreground component.
///
/// Each foreground pixel belongs to exactly one returned component.
pub fn find_connected_components(mask: &BinaryMask) -> Vec<ConnectedComponent> {
    let (w, h) = (mask.width(), mask.height());
    let bits = mask.as_slice();
    let mut visited = vec![false; bits.len()];
    let mut components = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y as usize * w as usize + x as usize;
            if bits[idx] && !visited[idx] {
                components.push(bfs(mask, &mut visited, Point::new(x, y)));
            }
        }
    }

    components
}

/// Pick the component with the most pixels.
///
/// On ties the first in scan order wins. Returns `None` for an empty slice.
pub fn select_largest(components: &[ConnectedComponent]) -> Option<&ConnectedComponent> {
    let mut best: Option<&ConnectedComponent> = None;
    for c in components {
        if best.is_none_or(|b| c.pixel_count() > b.pixel_count()) {
            best = Some(c);
        }
    }
    best
}

/// Find the largest 4-connected foreground component of a mask.
pub fn largest_component(mask: &BinaryMask) -> Option<ConnectedComponent> {
    let components = find_connected_components(mask);
    select_largest(&components).cloned()
}
