//! Decode queue regression test
//!
//! Submits a mix of valid and invalid images from memory and from files
//! and checks ordering, statuses and decoded content.

use netpix_io::{DecodeQueue, ImageFormat, JobStatus, PnmFormat, encode_pnm};
use netpix_test::{RegParams, synth};
use std::fs;

#[test]
fn queue_reg() {
    let mut rp = RegParams::new("queue");
    let queue = DecodeQueue::new().expect("queue");

    let ramp = synth::gradient(16, 4).expect("gradient");
    let p5 = encode_pnm(&ramp, PnmFormat::P5, &[" ramp".to_string()]).expect("encode");

    let dir = std::env::temp_dir().join(format!("netpix_queue_reg_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("ramp.pgm");
    fs::write(&path, &p5).expect("write file");

    eprintln!("=== Submit ===");
    let ids = [
        queue.submit_bytes("mem", p5.clone()).expect("submit mem"),
        queue.submit_file(&path).expect("submit file"),
        queue.submit_bytes("junk", b"not an image".to_vec()).expect("submit junk"),
    ];

    eprintln!("=== Events ===");
    for (i, &id) in ids.iter().enumerate() {
        let event = queue.recv_event().expect("event");
        rp.compare_values(id as f64, event.id as f64, 0.0);
        match (i, event.result) {
            (0 | 1, Ok(decoded)) => {
                rp.compare_raster(&ramp, &decoded.raster);
                rp.compare_values(
                    1.0,
                    if decoded.format == ImageFormat::Pnm(PnmFormat::P5) { 1.0 } else { 0.0 },
                    0.0,
                );
                rp.compare_strings(b" ramp", decoded.comments.concat().as_bytes());
            }
            (2, Err(_)) => {
                rp.compare_values(1.0, 1.0, 0.0);
            }
            _ => {
                rp.compare_values(1.0, 0.0, 0.0);
            }
        }
    }

    eprintln!("=== Statuses ===");
    rp.compare_strings(
        b"completed",
        queue.status(ids[0]).map(|s| s.to_string()).unwrap_or_default().as_bytes(),
    );
    rp.compare_values(
        1.0,
        if matches!(queue.status(ids[2]), Some(JobStatus::Failed(_))) { 1.0 } else { 0.0 },
        0.0,
    );

    eprintln!("=== Forget ===");
    for &id in &ids {
        rp.compare_values(1.0, if queue.forget(id).is_some() { 1.0 } else { 0.0 }, 0.0);
    }
    rp.compare_values(0.0, queue.tracked_jobs() as f64, 0.0);
    rp.compare_values(1.0, if queue.status(ids[0]).is_none() { 1.0 } else { 0.0 }, 0.0);
    queue.shutdown();
    let _ = fs::remove_dir_all(&dir);

    assert!(rp.cleanup(), "queue regression test failed");
}
