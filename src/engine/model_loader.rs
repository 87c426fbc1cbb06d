use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Where the files of one model live, either a local directory or a hub cache entry.
#[derive(Clone, Debug)]
pub struct ModelSource {
    dir: PathBuf,
    remote_base: Option<String>,
}

impl ModelSource {
    /// A model id naming an existing directory is used in place; anything else
    /// is fetched from `{endpoint}/{model_id}/resolve/main/` into the cache.
    pub fn resolve(model_id: &str, endpoint: &str, cache_dir: &Path) -> Result<Self> {
        let model_id = model_id.trim();
        if model_id.is_empty() {
            return Err(anyhow!("Empty model id"));
        }

        let local = Path::new(model_id);
        if local.is_dir() {
            return Ok(Self {
                dir: local.to_path_buf(),
                remote_base: None,
            });
        }

        if !is_valid_repo_id(model_id) {
            return Err(anyhow!("Invalid model id '{}'", model_id));
        }

        Ok(Self {
            dir: cache_dir.join(model_id.replace('/', "--")),
            remote_base: Some(format!(
                "{}/{}/resolve/main",
                endpoint.trim_end_matches('/'),
                model_id
            )),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `relative`, downloading it first when the source is remote.
    pub fn fetch(&self, relative: &str) -> Result<PathBuf> {
        let path = self.dir.join(relative);
        if path.exists() {
            return Ok(path);
        }

        match &self.remote_base {
            Some(base) => {
                let url = format!("{}/{}", base, relative);
                download_file(&url, &path)
                    .with_context(|| format!("Failed to fetch {}", relative))?;
                Ok(path)
            }
            None => Err(anyhow!("Missing model file {}", path.display())),
        }
    }
}

/// `owner/name`, no traversal, no empty segments
fn is_valid_repo_id(model_id: &str) -> bool {
    let segments: Vec<&str> = model_id.split('/').collect();
    segments.len() == 2
        && segments.iter().all(|s| {
            !s.is_empty()
                && *s != "."
                && *s != ".."
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
}

// Helper function to download a file, removing partial output on failure
pub fn download_file(url: &str, path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let partial = path.with_extension("part");
    let result = download_to(url, &partial);
    match result {
        Ok(()) => {
            fs::rename(&partial, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

fn download_to(url: &str, path: &Path) -> Result<()> {
    log::info!("Downloading file from: {}", url);
    let response = ureq::get(url)
        .header("User-Agent", concat!("kokoro-desk/", env!("CARGO_PKG_VERSION")))
        .call()
        .map_err(|e| anyhow!("Download failed: {}", e))?;

    let total_size = response
        .headers()
        .get("content-length")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let mut reader = response.into_body().into_reader();
    let mut file = fs::File::create(path)?;

    let mut buffer = [0; 8192];
    let mut downloaded: u64 = 0;

    let update_interval = Duration::from_secs(2);
    let mut last_update = Instant::now();

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;

        if total_size > 0 && last_update.elapsed() >= update_interval {
            let progress = (downloaded as f32 / total_size as f32) * 100.0;
            log::info!("Downloading... {:.0}%", progress);
            last_update = Instant::now();
        }
    }

    file.flush()?;
    log::debug!("Downloaded {} bytes to {}", downloaded, path.display());
    Ok(())
}
