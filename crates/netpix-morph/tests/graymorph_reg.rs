//! Grayscale morphology regression test
//!
//! Checks closing and opening on isolated pixels, the duality between
//! dilation and erosion, and that opening and closing chain their stages.

use netpix_core::{PixelLayout, Raster};
use netpix_morph::{
    MorphOp, StructuringElement, close_gray, dilate_gray, erode_gray, morph, open_gray,
};
use netpix_test::{RegParams, synth};

fn invert(raster: &Raster) -> Raster {
    let data = raster.data().iter().map(|&v| 255 - v).collect();
    Raster::from_data(raster.width(), raster.height(), PixelLayout::Gray8, data)
        .expect("invert")
}

#[test]
fn graymorph_reg() {
    let mut rp = RegParams::new("graymorph");
    let cross = StructuringElement::cross();

    // --- Test 1: closing removes an isolated dark pixel ---
    eprintln!("=== Close isolated dark pixel ===");
    let spot = synth::dot(9, 9, 4, 4, 255, 0).expect("dot");
    let closed = close_gray(&spot, &cross).expect("close");
    let white = synth::uniform(9, 9, PixelLayout::Gray8, 255).expect("uniform");
    rp.compare_raster(&white, &closed);
    rp.write_raster(&closed).expect("write");

    // --- Test 2: opening removes an isolated bright pixel ---
    eprintln!("=== Open isolated bright pixel ===");
    let bright = synth::dot(9, 9, 4, 4, 0, 255).expect("dot");
    let opened = open_gray(&bright, &cross).expect("open");
    let black = synth::uniform(9, 9, PixelLayout::Gray8, 0).expect("uniform");
    rp.compare_raster(&black, &opened);

    // --- Test 3: dilation and erosion are dual under inversion ---
    eprintln!("=== Duality ===");
    let board = synth::checkerboard(12, 12, 3).expect("checkerboard");
    let square = StructuringElement::square(3).expect("square");
    let dilated = dilate_gray(&board, &square).expect("dilate");
    let eroded_inv = invert(&erode_gray(&invert(&board), &square).expect("erode"));
    rp.compare_raster(&dilated, &eroded_inv);

    // --- Test 4: composed operations read the first stage's output ---
    eprintln!("=== Chained composition ===");
    let ramp = synth::gradient(16, 6).expect("gradient");
    let chained = erode_gray(&dilate_gray(&ramp, &cross).expect("dilate"), &cross)
        .expect("erode");
    let via_op = morph(&ramp, MorphOp::Close, &cross).expect("morph");
    rp.compare_raster(&chained, &via_op);
    let dilated = morph(&ramp, MorphOp::Dilate, &cross).expect("morph");
    rp.compare_values(
        ramp.get_gray(1, 3).unwrap_or(0) as f64,
        dilated.get_gray(0, 3).unwrap_or(0) as f64,
        0.0,
    );

    // --- Test 5: hit-or-miss with the cross is empty ---
    eprintln!("=== Hit-or-miss ===");
    let hm = morph(&white, MorphOp::HitMiss, &cross).expect("hit-miss");
    rp.compare_raster(&black, &hm);

    assert!(rp.cleanup(), "graymorph regression test failed");
}
