use super::test_helpers::*;
use super::*;
use crate::catalog::{StreamDescriptor, UnavailableReason};
use crate::config::Quality;
use crate::error::Error;
use crate::types::{DownloadCounter, SkipReason, TrackOutcome};
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


/// Names of the regular files and directories directly under `dir`, sorted
fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn test_config(root: &Path) -> Config {
    Config {
        download_dir: root.to_path_buf(),
        ..Config::default()
    }
}
