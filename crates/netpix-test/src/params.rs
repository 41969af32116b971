//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use netpix_core::{BinaryMask, Raster};
use netpix_io::PnmFormat;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Run comparisons only (default)
    #[default]
    Compare,
    /// Run comparisons and write produced rasters for inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "threshold")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        if mode == RegTestMode::Display {
            let _ = fs::create_dir_all(regout_dir());
        }

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two rasters for exact equality of size, layout and samples
    pub fn compare_raster(&mut self, raster1: &Raster, raster2: &Raster) -> bool {
        self.index += 1;

        if !raster1.sizes_equal(raster2) || raster1.layout() != raster2.layout() {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - dimension mismatch \
                 ({}x{} {:?} vs {}x{} {:?})",
                self.test_name,
                self.index,
                raster1.width(),
                raster1.height(),
                raster1.layout(),
                raster2.width(),
                raster2.height(),
                raster2.layout()
            );
            return self.fail(msg);
        }

        for y in 0..raster1.height() {
            for x in 0..raster1.width() {
                if raster1.get_rgba(x, y) != raster2.get_rgba(x, y) {
                    let msg = format!(
                        "Failure in {}_reg: raster comparison for index {} - pixel mismatch at ({}, {})",
                        self.test_name, self.index, x, y
                    );
                    return self.fail(msg);
                }
            }
        }

        true
    }

    /// Compare two binary masks for exact equality
    pub fn compare_masks(&mut self, mask1: &BinaryMask, mask2: &BinaryMask) -> bool {
        self.index += 1;

        if mask1.width() != mask2.width() || mask1.height() != mask2.height() {
            let msg = format!(
                "Failure in {}_reg: mask comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            return self.fail(msg);
        }

        let mismatch = mask1
            .as_slice()
            .iter()
            .zip(mask2.as_slice())
            .position(|(a, b)| a != b);
        if let Some(i) = mismatch {
            let w = mask1.width() as usize;
            let msg = format!(
                "Failure in {}_reg: mask comparison for index {} - mismatch at ({}, {})",
                self.test_name,
                self.index,
                i % w,
                i / w
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two byte strings
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Write a raster to `tests/regout/` in display mode
    ///
    /// Gray rasters are written as P5, color rasters as P6. Does nothing in
    /// compare mode.
    pub fn write_raster(&mut self, raster: &Raster) -> TestResult<()> {
        self.index += 1;
        if !self.display() {
            return Ok(());
        }

        let format = PnmFormat::for_layout(raster.layout());
        let path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );
        let bytes =
            netpix_io::encode_pnm(raster, format, &[]).map_err(|e| TestError::ImageWrite {
                path: path.clone(),
                message: e.to_string(),
            })?;
        fs::write(&path, bytes)?;
        eprintln!("Wrote: {}", path);
        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
