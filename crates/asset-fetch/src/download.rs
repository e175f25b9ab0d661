//! Image downloads into a job-scoped temporary directory.

use std::path::{Path, PathBuf};

use rand::Rng;
use shortsmith_common::error::{SmithError, SmithResult};
use tempfile::TempDir;
use url::Url;

/// Downloaded images for one render job.
///
/// The backing directory is removed when the set is dropped, on every exit
/// path. Each job must own its own set; sets are never shared across jobs.
pub struct ImageSet {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl ImageSet {
    /// An empty set with its own (already-scoped) directory.
    pub fn empty() -> SmithResult<Self> {
        Ok(Self {
            dir: TempDir::with_prefix("shortsmith-images-")?,
            paths: Vec::new(),
        })
    }

    /// Local paths of successfully downloaded images, in source order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Download each URL into a fresh job-scoped directory.
///
/// Unsupported formats (vector images) and failed downloads are skipped
/// with a warning; the render degrades to fewer or zero overlay images.
pub async fn download_images(urls: &[String]) -> SmithResult<ImageSet> {
    let mut set = ImageSet::empty()?;
    if urls.is_empty() {
        return Ok(set);
    }

    let client = reqwest::Client::new();

    for url in urls {
        if !is_supported_url(url) {
            tracing::warn!(url = %url, "Skipping unsupported image format");
            continue;
        }

        match fetch_one(&client, url, set.dir.path()).await {
            Ok(path) => {
                tracing::debug!(url = %url, path = %path.display(), "Downloaded image");
                set.paths.push(path);
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Image download failed, skipping");
            }
        }
    }

    tracing::info!(
        requested = urls.len(),
        downloaded = set.paths.len(),
        "Image downloads complete"
    );

    Ok(set)
}

/// Vector formats are not rasterizable by the compositor and are skipped.
pub fn is_supported_url(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => return false,
    };
    !path.ends_with(".svg")
}

async fn fetch_one(client: &reqwest::Client, url: &str, dest_dir: &Path) -> SmithResult<PathBuf> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| SmithError::asset(format!("fetch failed for {url}: {e}")))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SmithError::asset(format!("body read failed for {url}: {e}")))?;

    let path = dest_dir.join(local_filename(url));
    std::fs::write(&path, &bytes)?;
    Ok(path)
}

/// Derive a collision-resistant local filename from the URL's last path
/// segment.
pub fn local_filename(url: &str) -> String {
    let base = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "downloaded_image.png".to_string());

    let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{base}_{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_urls_rejected() {
        assert!(!is_supported_url("https://example.com/logo.svg"));
        assert!(!is_supported_url("https://example.com/Logo.SVG"));
        assert!(is_supported_url("https://example.com/photo.jpg"));
        assert!(is_supported_url("https://example.com/photo.png?width=200"));
    }

    #[test]
    fn test_unparsable_urls_rejected() {
        assert!(!is_supported_url("not a url"));
    }

    #[test]
    fn test_local_filename_keeps_extension() {
        let name = local_filename("https://example.com/media/photo.jpeg");
        assert!(name.starts_with("photo_"));
        assert!(name.ends_with(".jpeg"));
    }

    #[test]
    fn test_local_filename_fallback_for_bare_host() {
        let name = local_filename("https://example.com/");
        assert!(name.starts_with("downloaded_image_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_image_set_scopes_its_directory() {
        let set = ImageSet::empty().unwrap();
        let dir = set.dir().to_path_buf();
        assert!(dir.exists());
        drop(set);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_asset_error() {
        // .invalid never resolves (RFC 2606), so the request fails fast.
        let client = reqwest::Client::new();
        let dir = TempDir::with_prefix("shortsmith-test-").unwrap();
        let err = fetch_one(&client, "https://host.invalid/a.png", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SmithError::Asset { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_failed_downloads_skipped_not_fatal() {
        let urls = vec!["https://host.invalid/missing.png".to_string()];
        let set = download_images(&urls).await.unwrap();
        assert!(set.is_empty());
    }
}
