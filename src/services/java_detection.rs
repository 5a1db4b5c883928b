//! Java runtime discovery for the launcher form.
//!
//! When the Java field is empty the launcher tries a fixed list of install
//! locations. Candidates may contain `*`, which matches any run of
//! characters inside a single path component (`jre1.8.0_*` matches
//! `jre1.8.0_321` but never crosses a separator).

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Candidate locations probed on Windows, in order
pub const WINDOWS_JAVA_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Java\jre1.8.0_*\bin\java.exe",
    r"C:\Program Files (x86)\Java\jre1.8.0_*\bin\java.exe",
    "java.exe",
];

/// Candidate locations probed on Linux and macOS, in order
pub const UNIX_JAVA_CANDIDATES: &[&str] = &[
    "/usr/bin/java",
    "/usr/lib/jvm/java-8-openjdk-*/bin/java",
    "/usr/lib/jvm/jre1.8.0_*/bin/java",
    "/Library/Internet Plug-Ins/JavaAppletPlugin.plugin/Contents/Home/bin/java",
];

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"version\s+"([^"]+)""#).expect("Invalid Java version regex"));

/// Candidate list for the platform this binary was built for
pub fn platform_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        WINDOWS_JAVA_CANDIDATES
    } else {
        UNIX_JAVA_CANDIDATES
    }
}

/// Find the first installed Java from the platform candidates.
pub fn detect_java() -> Option<Utf8PathBuf> {
    detect_java_from(platform_candidates())
}

/// Find the first existing path among `candidates`.
///
/// # Arguments
///
/// * `candidates` - Paths in priority order, optionally containing `*` wildcards
///
/// # Returns
///
/// The first existing match, or None when nothing matches
pub fn detect_java_from(candidates: &[&str]) -> Option<Utf8PathBuf> {
    for candidate in candidates {
        if let Some(found) = expand_wildcards(candidate).into_iter().next() {
            tracing::info!("Detected Java at {}", found);
            return Some(found);
        }
    }

    tracing::debug!("No Java installation found among {} candidates", candidates.len());
    None
}

/// Expand `*` wildcards component by component, returning existing paths
/// in sorted order.
pub fn expand_wildcards(pattern: &str) -> Vec<Utf8PathBuf> {
    let mut current = vec![Utf8PathBuf::new()];

    for component in Utf8Path::new(pattern).components() {
        let part = component.as_str();

        if !part.contains('*') {
            for path in &mut current {
                path.push(part);
            }
            continue;
        }

        let Some(matcher) = wildcard_regex(part) else {
            return Vec::new();
        };

        let mut next = Vec::new();
        for dir in &current {
            let search_dir = if dir.as_str().is_empty() {
                Utf8Path::new(".")
            } else {
                dir.as_path()
            };

            let Ok(entries) = search_dir.read_dir_utf8() else {
                continue;
            };

            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string())
                .filter(|name| matcher.is_match(name))
                .collect();
            names.sort();

            next.extend(names.into_iter().map(|name| dir.join(name)));
        }
        current = next;
    }

    current.retain(|path| path.exists());
    current
}

fn wildcard_regex(component: &str) -> Option<Regex> {
    let body = component
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    let pattern = if cfg!(target_os = "windows") {
        format!("(?i)^{}$", body)
    } else {
        format!("^{}$", body)
    };

    Regex::new(&pattern).ok()
}

/// Extract the quoted version from `java -version` output.
///
/// `openjdk version "1.8.0_392"` yields `1.8.0_392`.
pub fn parse_java_version(output: &str) -> Option<String> {
    VERSION_PATTERN
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Run `<java> -version` and report the version string it prints.
///
/// Java writes the banner to stderr; stdout is checked as well for
/// wrappers that redirect it.
pub async fn probe_java_version(java_path: &str) -> Result<Option<String>> {
    tracing::debug!("Probing Java version: {}", java_path);

    let output = timeout(
        Duration::from_secs(10),
        Command::new(java_path).arg("-version").kill_on_drop(true).output(),
    )
    .await
    .with_context(|| format!("Timed out running {} -version", java_path))?
    .with_context(|| format!("Failed to run {} -version", java_path))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let version = parse_java_version(&stderr).or_else(|| parse_java_version(&stdout));
    match &version {
        Some(v) => tracing::info!("Java at {} reports version {}", java_path, v),
        None => tracing::warn!("Could not read a version from {} -version", java_path),
    }

    Ok(version)
}
