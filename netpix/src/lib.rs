//! netpix - NetPBM decoding and classic image analysis
//!
//! # Overview
//!
//! netpix decodes the six NetPBM sub-formats into a [`Raster`] and runs
//! classic image analysis on it:
//!
//! - Image I/O: NetPBM P1 to P6 with comments, plus PNG, JPEG and WebP
//!   behind cargo features ([`io`])
//! - Binarization: manual, percentile, iterative, Otsu, Niblack and
//!   Bernsen ([`binarize`](mod@binarize))
//! - Filtering: box, median, Sobel and Gaussian 3x3 filters, histogram
//!   stretch and equalization, pointwise transforms ([`filter`])
//! - Grayscale morphology ([`morph`])
//! - Connected components and segmentation ([`region`])
//!
//! # Example
//!
//! ```
//! use netpix::io::decode_pnm;
//!
//! let image = decode_pnm(b"P1\n2 2\n0 1\n1 0\n").unwrap();
//! assert_eq!(image.raster.width(), 2);
//! assert_eq!(image.raster.get_gray(1, 0), Some(0));
//! assert!(image.comments.is_empty());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use netpix_core::*;

// Re-export domain crates as modules to avoid name conflicts.
// `color` is the core pixel helper module, so binarization is `binarize`.
pub use netpix_color as binarize;
pub use netpix_filter as filter;
pub use netpix_io as io;
pub use netpix_morph as morph;
pub use netpix_region as region;
