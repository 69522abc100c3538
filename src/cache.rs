//! On-disk cache of upstream NGI responses.
//!
//! Each response is stored gzip-compressed under
//! `<cache_dir>/<endpoint>/<params>.json.gz`. Responses for windows that are
//! already over (end date before today) never change upstream, so they are
//! served from disk; anything touching today or later is refetched when online.

use crate::config;
use crate::error::{NgiError, Result};
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Query parameters whose date decides whether a response is final.
const CLOSING_DATE_PARAMS: [&str; 2] = ["end_date", "issue_date"];

/// Gzip file cache for upstream JSON responses.
pub struct ResponseCache {
    /// Directory where cached responses are stored.
    pub cache_dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `cache_dir`, or the platform default.
    ///
    /// Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    /// Path of the cache entry for a request.
    ///
    /// Keys and values are percent-encoded, so distinct requests never share
    /// an entry and no parameter can introduce a path separator.
    pub fn entry_path(&self, endpoint: &str, params: &[(&str, &str)]) -> PathBuf {
        let dir = urlencoding::encode(endpoint.trim_end_matches(".json"));
        let name = if params.is_empty() {
            "_".to_string()
        } else {
            params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&")
        };
        self.cache_dir
            .join(&*dir)
            .join(format!("{}.json.gz", name))
    }

    /// Whether the request covers a window that closed before `today`.
    pub fn is_final(params: &[(&str, &str)], today: NaiveDate) -> bool {
        params
            .iter()
            .filter(|(k, _)| CLOSING_DATE_PARAMS.contains(k))
            .filter_map(|(_, v)| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            .any(|date| date < today)
    }

    /// Load a cached response.
    ///
    /// Returns `Ok(None)` when there is no entry. A corrupt entry is deleted
    /// and reported as [`NgiError::NotFound`] so the caller can refetch.
    pub fn load(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<serde_json::Value>> {
        let path = self.entry_path(endpoint, params);
        if !path.exists() {
            return Ok(None);
        }

        match read_gz_json(&path) {
            Ok(value) => {
                tracing::debug!("Cache hit {}", path.display());
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!("Corrupt cache file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Err(NgiError::NotFound(format!(
                    "Cache file '{}' was corrupt and has been removed. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Store a response.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a partial entry behind.
    pub fn store(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        value: &serde_json::Value,
    ) -> Result<()> {
        let dest = self.entry_path(endpoint, params);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_dest = dest.with_extension("gz.tmp");

        let result = (|| -> Result<()> {
            let file = fs::File::create(&tmp_dest)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(&serde_json::to_vec(value)?)?;
            encoder.finish()?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Remove all cached responses.
    ///
    /// Only the per-endpoint directories are deleted. Other files in the
    /// cache directory, such as a history database kept alongside, are left
    /// alone.
    pub fn clear(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            }
        }
        Ok(())
    }
}

fn read_gz_json(path: &Path) -> Result<serde_json::Value> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(serde_json::from_str(&contents)?)
}
