//! netpix Region - Connected components and segmentation
//!
//! This crate provides:
//!
//! - **Connected component analysis** ([`conncomp`]): 4-connected
//!   breadth-first labeling of a [`BinaryMask`](netpix_core::BinaryMask)
//!   and selection of the largest component
//! - **Segmentation** ([`segment`](mod@segment)): Otsu foreground mask,
//!   largest dark region, green pixel coverage and highlighting
//!
//! # Example
//!
//! ```
//! use netpix_core::BinaryMask;
//! use netpix_region::largest_component;
//!
//! let mask = BinaryMask::from_fn(6, 2, |x, _| x != 2).unwrap();
//! let largest = largest_component(&mask).unwrap();
//! assert_eq!(largest.pixel_count(), 6);
//! ```

pub mod conncomp;
mod error;
pub mod segment;

pub use conncomp::{
    ConnectedComponent, Point, find_connected_components, largest_component, select_largest,
};
pub use error::{RegionError, RegionResult};
pub use segment::{
    HIGHLIGHT_RED, SegmentOptions, Segmentation, green_percentage, highlight, is_green, segment,
};
