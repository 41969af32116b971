//! Filter regression test
//!
//! Covers the 3x3 neighborhood filters on flat and impulse images,
//! histogram stretch and equalization, and the pointwise transforms.

use netpix_core::{Histogram, PixelLayout};
use netpix_filter::{
    GrayMethod, RgbOp, RgbOperation, SpatialFilter, apply_filter, apply_rgb_op,
    equalize_histogram, median_filter, set_alpha, sobel_edge, stretch_histogram, to_gray,
};
use netpix_test::{RegParams, synth};

#[test]
fn filter_reg() {
    let mut rp = RegParams::new("filter");

    // --- Test 1: flat images pass through the smoothing filters ---
    eprintln!("=== Flat input ===");
    let flat = synth::uniform(7, 5, PixelLayout::Rgb8, 90).expect("uniform");
    for filter in [
        SpatialFilter::Average,
        SpatialFilter::Median,
        SpatialFilter::Gaussian,
    ] {
        let out = apply_filter(&flat, filter).expect("filter");
        rp.compare_raster(&flat, &out);
    }
    let edges = sobel_edge(&flat).expect("sobel");
    rp.compare_values(0.0, edges.data().iter().map(|&v| v as f64).sum(), 0.0);

    // --- Test 2: median removes an isolated impulse ---
    eprintln!("=== Median impulse ===");
    let spot = synth::dot(9, 9, 4, 4, 200, 0).expect("dot");
    let cleaned = median_filter(&spot).expect("median");
    rp.compare_values(200.0, cleaned.get_gray(4, 4).unwrap_or(0) as f64, 0.0);
    rp.write_raster(&cleaned).expect("write");

    // --- Test 3: Sobel responds along a step edge ---
    eprintln!("=== Sobel step ===");
    let step = synth::bimodal(8, 4, 0, 255).expect("bimodal");
    let edges = sobel_edge(&step).expect("sobel");
    rp.compare_values(255.0, edges.get_gray(3, 2).unwrap_or(0) as f64, 0.0);
    rp.compare_values(0.0, edges.get_gray(0, 2).unwrap_or(255) as f64, 0.0);
    rp.compare_values(0.0, edges.get_gray(7, 2).unwrap_or(255) as f64, 0.0);

    // --- Test 4: stretch reaches the full range or leaves flat input alone ---
    eprintln!("=== Stretch ===");
    let narrow = synth::bimodal(10, 3, 40, 200).expect("bimodal");
    let stretched = stretch_histogram(&narrow).expect("stretch");
    let hist = Histogram::from_raster(&stretched);
    rp.compare_values(0.0, hist.min_value().unwrap_or(255) as f64, 0.0);
    rp.compare_values(255.0, hist.max_value().unwrap_or(0) as f64, 0.0);
    let same = stretch_histogram(&flat).expect("stretch");
    rp.compare_raster(&flat, &same);
    rp.compare_values(1.0, if same.ptr_eq(&flat) { 1.0 } else { 0.0 }, 0.0);

    // --- Test 5: equalize spreads two levels to the extremes ---
    eprintln!("=== Equalize ===");
    let eq = equalize_histogram(&narrow).expect("equalize");
    let hist = Histogram::from_raster(&eq);
    rp.compare_values(15.0, hist.count(0) as f64, 0.0);
    rp.compare_values(15.0, hist.count(255) as f64, 0.0);
    let eq_flat = equalize_histogram(&flat).expect("equalize");
    rp.compare_values(90.0, eq_flat.get_gray(3, 3).unwrap_or(0) as f64, 0.0);

    // --- Test 6: pointwise transforms ---
    eprintln!("=== Pointwise ===");
    let gray = to_gray(&flat, GrayMethod::Average).expect("gray");
    rp.compare_values(90.0, gray.get_gray(0, 0).unwrap_or(0) as f64, 0.0);
    let faded = set_alpha(&flat, 128).expect("alpha");
    rp.compare_values(128.0, faded.get_rgba(6, 4).map_or(0, |p| p.3) as f64, 0.0);
    let brighter = apply_rgb_op(&flat, &RgbOp::new(RgbOperation::Add, 200, 0, 10))
        .expect("rgb op");
    rp.compare_values(255.0, brighter.get_rgb(0, 0).map_or(0, |p| p.0) as f64, 0.0);
    rp.compare_values(100.0, brighter.get_rgb(0, 0).map_or(0, |p| p.2) as f64, 0.0);
    let zero_div = apply_rgb_op(&flat, &RgbOp::new(RgbOperation::Divide, 0, 1, 1));
    rp.compare_values(1.0, if zero_div.is_err() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "filter regression test failed");
}
