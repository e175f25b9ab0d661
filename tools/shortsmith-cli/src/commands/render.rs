//! Render a single short from explicitly named inputs.

use std::path::{Path, PathBuf};

use shortsmith_asset_fetch::{download_images, extract_image_urls, ImageSet};
use shortsmith_common::config::RenderDefaults;
use shortsmith_render_engine::{render_short, RenderJob};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    title: String,
    footage: PathBuf,
    narration: PathBuf,
    transcript: Option<PathBuf>,
    article: Option<PathBuf>,
    images: Vec<PathBuf>,
    output: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    font: Option<PathBuf>,
) -> anyhow::Result<()> {
    let image_set = fetch_article_images(article.as_deref()).await?;

    let mut image_paths = images;
    image_paths.extend(image_set.paths().iter().cloned());

    let config = RenderDefaults {
        width,
        height,
        fps,
        font_path: font,
        ..RenderDefaults::default()
    };

    let job = RenderJob {
        title,
        footage_path: footage,
        narration_path: narration,
        transcript_path: transcript,
        image_paths,
        output_path: output,
        config,
    };

    // Rendering is blocking subprocess work; keep it off the async runtime.
    let outcome = tokio::task::spawn_blocking(move || render_short(&job)).await??;
    drop(image_set);

    println!(
        "Rendered {} ({} frames, {:.1}s, {} cues, {} images)",
        outcome.output_path.display(),
        outcome.frames_rendered,
        outcome.duration_secs,
        outcome.cue_count,
        outcome.image_count,
    );

    Ok(())
}

/// Pull image URLs from an article file and download them into a
/// job-scoped directory. No article or no URLs means an empty set.
pub(crate) async fn fetch_article_images(article: Option<&Path>) -> anyhow::Result<ImageSet> {
    let Some(path) = article else {
        return Ok(ImageSet::empty()?);
    };

    let content = std::fs::read_to_string(path)?;
    let urls = extract_image_urls(&content);
    if urls.is_empty() {
        tracing::info!(article = %path.display(), "Article lists no image URLs");
        return Ok(ImageSet::empty()?);
    }

    Ok(download_images(&urls).await?)
}
