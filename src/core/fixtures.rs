//! Test/recording helpers for persisting HTTP fixtures.
//! Compiled only when the `test-mode` feature is enabled.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub(crate) fn get_fixture_dir() -> PathBuf {
    env::var("EODHD_FIXDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

/// Writes `body` to `{endpoint}_{symbol}.json` in the fixture directory.
pub(crate) fn record_fixture(endpoint: &str, symbol: &str, body: &str) -> Result<(), std::io::Error> {
    let dir = get_fixture_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let sanitized = endpoint.replace(|c: char| !c.is_alphanumeric() && c != '_' && c != '-', "-");
    let filename = format!("{sanitized}_{symbol}.json");
    let path = dir.join(filename);

    let mut file = fs::File::create(&path)?;
    file.write_all(body.as_bytes())?;

    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "EODHD_RECORD: wrote fixture");
    Ok(())
}
