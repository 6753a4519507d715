//! Custom test assertions for integration tests

use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Tag;
use qobuz_dl::Event;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;

/// Collect events until `Complete` arrives or `timeout` elapses
pub async fn collect_until_complete(
    rx: &mut broadcast::Receiver<Event>,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) => {
                let done = matches!(event, Event::Complete { .. });
                events.push(event);
                if done {
                    return events;
                }
            }
            Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
            Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return events,
        }
    }
}

/// Read the primary tag of an audio file without decoding audio properties
pub fn read_primary_tag(path: &Path) -> Tag {
    let tagged = Probe::open(path)
        .expect("open audio file")
        .guess_file_type()
        .expect("detect file type")
        .options(ParseOptions::new().read_properties(false))
        .read()
        .expect("read tags");
    tagged.primary_tag().cloned().expect("file has a primary tag")
}

/// Assert that no hidden temporary download is left under `dir`
pub fn assert_no_temp_files(dir: &Path) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let entry = entry.expect("dir entry");
        let name = entry.file_name().to_string_lossy().into_owned();
        assert!(!name.starts_with('.'), "leftover temp file {name} in {dir:?}");
        if entry.path().is_dir() {
            assert_no_temp_files(&entry.path());
        }
    }
}
