//! Saving reports to disk

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::cli::OutputFormat;

/// Write `report` under `base` and return the final path
///
/// `base` is used as-is when it already carries the format's extension,
/// otherwise it is treated as a directory and a file name is derived from
/// the page URL.
pub fn save_report(base: &Path, url: &Url, format: OutputFormat, report: &str) -> Result<PathBuf> {
    let output_path = build_output_path(base, url, format);
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    fs::write(&output_path, report.as_bytes())
        .with_context(|| format!("failed to write output file {}", output_path.display()))?;
    Ok(output_path)
}

pub fn build_output_path(base: &Path, url: &Url, format: OutputFormat) -> PathBuf {
    let has_extension = base
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(format.extension()))
        .unwrap_or(false);

    if has_extension {
        base.to_path_buf()
    } else {
        base.join(derive_output_filename(url, format))
    }
}

pub fn derive_output_filename(url: &Url, format: OutputFormat) -> String {
    let host = url.host_str().unwrap_or("page");
    let mut path_component = url.path().trim_matches('/').replace('/', "_");
    if path_component.is_empty() {
        path_component = "index".to_string();
    }

    let mut parts = vec![
        sanitize_for_filename(host),
        sanitize_for_filename(&path_component),
    ];
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        parts.push(sanitize_for_filename(query));
    }

    format!("{}__audit.{}", parts.join("__"), format.extension())
}

fn sanitize_for_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
