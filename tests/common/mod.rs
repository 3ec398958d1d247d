//! Common test utilities for shellac tests

#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Seek};
use std::path::PathBuf;

use shellac::Sink;
use tempfile::TempDir;

/// Creates a temporary directory whose name contains spaces
pub fn create_spaced_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("Shellac Test Folder");
    std::fs::create_dir(&path).expect("Failed to create spaced dir");
    (dir, path)
}

/// Creates a file sink and a handle to read back what it received
pub fn file_sink() -> (Sink, File) {
    let file = tempfile::tempfile().expect("Failed to create temp file");
    let reader = file.try_clone().expect("Failed to clone temp file");
    (Sink::file(file), reader)
}

/// Like [`file_sink`], but writes go through a `BufWriter` that only
/// reaches the file when the sink is flushed
pub fn buffered_file_sink() -> (Sink, File) {
    let file = tempfile::tempfile().expect("Failed to create temp file");
    let reader = file.try_clone().expect("Failed to clone temp file");
    let writer = tokio::io::BufWriter::new(tokio::fs::File::from_std(file));
    (Sink::writer(writer), reader)
}

/// Reads everything a file sink received
pub fn read_sink(mut reader: File) -> String {
    let mut captured = String::new();
    reader.rewind().expect("Failed to rewind sink file");
    reader
        .read_to_string(&mut captured)
        .expect("Failed to read sink file");
    captured
}
