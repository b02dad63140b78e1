//! Golden-file JSON snapshots.
//!
//! Values are written as pretty JSON with object keys sorted, one trailing
//! newline. Tests compare against the file on disk; rerun with
//! `TUTORIAL_UPDATE_SNAPSHOTS=1` to rewrite goldens.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "TUTORIAL_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
///
/// On mismatch the error names the first differing line.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if update_requested() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return fs::write(path, &actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (run with {UPDATE_SNAPSHOTS_ENV}=1 to create it)",
            path.display()
        )
    })?;
    // Goldens checked out on Windows may carry CRLF line endings.
    let expected = expected.replace("\r\n", "\n");

    match first_difference(&expected, &actual) {
        None => Ok(()),
        Some((line, want, got)) => anyhow::bail!(
            "Snapshot mismatch at {} line {line}: expected {want:?}, got {got:?} \
             (run with {UPDATE_SNAPSHOTS_ENV}=1 to update)",
            path.display()
        ),
    }
}

/// Serialize `value` the way snapshots are stored.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut out =
        serde_json::to_string_pretty(&sort_keys(value)).context("Failed to format snapshot")?;
    out.push('\n');
    Ok(out)
}

fn update_requested() -> bool {
    std::env::var(UPDATE_SNAPSHOTS_ENV)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<(usize, &'a str, &'a str)> {
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (w, g) if w == g => line += 1,
            (w, g) => return Some((line, w.unwrap_or("<eof>"), g.unwrap_or("<eof>"))),
        }
    }
}
