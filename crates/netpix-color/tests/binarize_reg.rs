//! Binarization regression test
//!
//! Runs all six strategies on synthetic images and checks the shared
//! polarity, the boundary case of the manual threshold, percentile
//! clamping and parameter validation.

use netpix_color::{
    BernsenOptions, BinarizeMethod, IterativeOptions, ManualOptions, NiblackOptions,
    PercentileOptions, binarize, compute_iterative_threshold, compute_otsu_threshold,
    compute_percentile_threshold,
};
use netpix_core::PixelLayout;
use netpix_test::{RegParams, synth};

#[test]
fn binarize_reg() {
    let mut rp = RegParams::new("binarize");

    // --- Test 1: manual threshold equal to a uniform luminance ---
    eprintln!("=== Manual boundary ===");
    let mid = synth::uniform(16, 16, PixelLayout::Rgb8, 127).expect("uniform");
    let mask = binarize(&mid, &BinarizeMethod::Manual(ManualOptions { threshold: 127 }))
        .expect("manual");
    rp.compare_values(256.0, mask.count_foreground() as f64, 0.0);
    let mask = binarize(&mid, &BinarizeMethod::Manual(ManualOptions { threshold: 126 }))
        .expect("manual");
    rp.compare_values(0.0, mask.count_foreground() as f64, 0.0);

    // --- Test 2: every strategy agrees on a dark/light split ---
    eprintln!("=== Shared polarity ===");
    let two = synth::bimodal(32, 8, 30, 220).expect("bimodal");
    let methods = [
        BinarizeMethod::Manual(ManualOptions { threshold: 128 }),
        BinarizeMethod::Percentile(PercentileOptions { percent: 25.0 }),
        BinarizeMethod::Iterative(IterativeOptions::default()),
        BinarizeMethod::Otsu,
    ];
    for method in &methods {
        let mask = binarize(&two, method).expect("binarize");
        rp.compare_values(128.0, mask.count_foreground() as f64, 0.0);
        rp.compare_values(1.0, if mask.get(0, 0) == Some(true) { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, if mask.get(31, 7) == Some(false) { 1.0 } else { 0.0 }, 0.0);
    }
    let otsu = compute_otsu_threshold(&two);
    rp.compare_values(1.0, if otsu > 30 && otsu < 220 { 1.0 } else { 0.0 }, 0.0);
    let iso = compute_iterative_threshold(&two, &IterativeOptions::default()).expect("iso");
    rp.compare_values(125.0, iso as f64, 0.0);
    rp.write_raster(&binarize(&two, &BinarizeMethod::Otsu).expect("otsu").to_raster())
        .expect("write");

    // --- Test 3: percentile clamps at 100% ---
    eprintln!("=== Percentile ===");
    let ramp = synth::gradient(256, 1).expect("gradient");
    let t = compute_percentile_threshold(&ramp, &PercentileOptions { percent: 100.0 })
        .expect("percentile");
    rp.compare_values(255.0, t as f64, 0.0);
    let t = compute_percentile_threshold(&ramp, &PercentileOptions { percent: 50.0 })
        .expect("percentile");
    rp.compare_values(128.0, t as f64, 0.0);

    // --- Test 4: adaptive strategies on a checkerboard ---
    eprintln!("=== Adaptive ===");
    let board = synth::checkerboard(24, 24, 4).expect("checkerboard");
    let niblack = binarize(
        &board,
        &BinarizeMethod::Niblack(NiblackOptions {
            window_size: 5,
            k: 0.0,
        }),
    )
    .expect("niblack");
    let bernsen = binarize(
        &board,
        &BinarizeMethod::Bernsen(BernsenOptions {
            window_size: 9,
            contrast_threshold: 30,
        }),
    )
    .expect("bernsen");
    // Black squares of the board are the foreground for both.
    for mask in [&niblack, &bernsen] {
        rp.compare_values(1.0, if mask.get(1, 1) == Some(true) { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, if mask.get(5, 1) == Some(false) { 1.0 } else { 0.0 }, 0.0);
    }
    rp.compare_values(288.0, bernsen.count_foreground() as f64, 0.0);

    // --- Test 5: validation happens before any work ---
    eprintln!("=== Validation ===");
    let invalid = [
        BinarizeMethod::Manual(ManualOptions { threshold: 256 }),
        BinarizeMethod::Percentile(PercentileOptions { percent: 101.0 }),
        BinarizeMethod::Iterative(IterativeOptions {
            max_iterations: 500,
        }),
        BinarizeMethod::Niblack(NiblackOptions {
            window_size: 4,
            k: 0.2,
        }),
        BinarizeMethod::Bernsen(BernsenOptions {
            window_size: 1,
            contrast_threshold: 10,
        }),
    ];
    for method in &invalid {
        rp.compare_values(1.0, if method.validate().is_err() { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, if binarize(&board, method).is_err() { 1.0 } else { 0.0 }, 0.0);
    }

    assert!(rp.cleanup(), "binarize regression test failed");
}
