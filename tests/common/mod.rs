//! Common test utilities

#![allow(dead_code)]

use rmk::runner::{Context, Sink, SinkBuffer};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a Makefile
pub fn create_test_makefile(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Makefile");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Context rooted at `dir` whose output is captured
pub fn capture_context(dir: &TempDir) -> (Context, SinkBuffer, SinkBuffer) {
    let (out, out_buf) = Sink::buffer();
    let (err, err_buf) = Sink::buffer();
    let ctx = Context::new()
        .with_working_dir(dir.path().to_path_buf())
        .with_sinks(out, err);
    (ctx, out_buf, err_buf)
}
