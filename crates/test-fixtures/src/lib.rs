//! Test fixture loader for the Lethe corpus, plus deterministic collaborators
//! (hashing encoder, failing providers) for integration tests across crates.

pub mod encoders;

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;

use lethe_core::IngestRecord;

pub use encoders::{FailingEncoder, FailingSimilarity, HashingEncoder};

/// Relative path of the bundled small project corpus.
pub const SMALL_PROJECT: &str = "corpus/small_project.jsonl";

/// Raw entity ids of the small project corpus.
pub mod ids {
    pub const STOREY: &str = "2O2Fr$t4X7Zf8NOew3FLOH";
    pub const WALL_101: &str = "1hOSvn6df7F8_7GcBWlR72";
    pub const WALL_102: &str = "3cUkl32yn9qRSPvBJVyWYp";
    pub const DOOR_201: &str = "0M6o7Znnv7hxsbWgeu7oQq";
    pub const SLAB_S1: &str = "2XQ$n5SLP5MBLyL442paFx";
    pub const WINDOW_WN1: &str = "1U5VkqTbf5FgY9AHJOhfhN";
    pub const BEAM_B7: &str = "0Kd8NjvPz0Fh0Gw$cq3k_L";
}

/// Root directory of the fixture data.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixture_path(relative_path).exists()
}

/// Read a fixture file as text.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture_text(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {relative_path}: {e}"))
}

/// Load a JSONL feed of ingestion records.
///
/// # Panics
/// Panics on the first malformed line.
pub fn load_records(relative_path: &str) -> Vec<IngestRecord> {
    load_fixture_text(relative_path)
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).unwrap_or_else(|e| {
                panic!("Failed to parse {relative_path} line {}: {e}", i + 1)
            })
        })
        .collect()
}

/// The small project corpus as ingestion records.
pub fn small_project() -> Vec<IngestRecord> {
    load_records(SMALL_PROJECT)
}

/// Fixed evaluation time used across tests: 2025-01-01T00:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}
