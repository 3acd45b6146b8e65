//! Flat-file string key/value persistence: one file per key under the client
//! data directory. Writes are best effort; a failure is logged and the caller
//! keeps going with in-memory state.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

pub fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(key.replace([':', '/'], "-"))
}

pub fn get_item(dir: &Path, key: &str) -> Option<String> {
    fs::read_to_string(key_path(dir, key)).ok()
}

pub fn set_item(dir: &Path, key: &str, value: &str) {
    if let Err(err) = fs::create_dir_all(dir) {
        warn!("client storage dir create failed: {err}");
        return;
    }
    if let Err(err) = fs::write(key_path(dir, key), value) {
        warn!("client storage write for '{key}' failed: {err}");
    }
}
