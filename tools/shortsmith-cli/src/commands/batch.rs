//! Batch-produce a short for every unprocessed narration in the data
//! directory.
//!
//! Layout under the data directory:
//!   generated_audio/<category>/<title>.mp3        narration (required)
//!   generated_transcripts/<category>/<title>.srt  transcript (optional)
//!   generated_articles/<category>/<title>.txt     article text (optional)
//!   processed_titles.txt                          ledger of finished titles
//!
//! One bad narration fails that job only; the batch carries on.

use std::path::{Path, PathBuf};

use shortsmith_common::config::AppConfig;
use shortsmith_render_engine::{output_path_for, render_short, RenderJob};

use crate::commands::render::fetch_article_images;
use crate::ledger::{FileLedger, ProcessedLedger};

pub async fn run(
    data_dir: Option<PathBuf>,
    footage: PathBuf,
    shorts_dir: Option<PathBuf>,
    limit: Option<usize>,
    force: bool,
) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    let shorts_dir = shorts_dir.unwrap_or_else(|| data_dir.join("generated_shorts"));

    let audio_root = data_dir.join("generated_audio");
    let mut narrations = Vec::new();
    collect_narrations(&audio_root, &mut narrations)?;
    narrations.sort();

    if narrations.is_empty() {
        println!("No narrations found under {}", audio_root.display());
        return Ok(());
    }

    let mut ledger = FileLedger::open(data_dir.join("processed_titles.txt"))?;
    tracing::info!(
        narrations = narrations.len(),
        processed = ledger.len(),
        ledger = %ledger.path().display(),
        "Starting batch"
    );

    let mut rendered = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for narration in narrations {
        if limit.is_some_and(|limit| rendered >= limit) {
            break;
        }

        let Some(title) = narration
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
        else {
            tracing::warn!(path = %narration.display(), "Skipping narration with unusable name");
            continue;
        };

        if !force && ledger.seen(&title) {
            tracing::debug!(title = %title, "Already processed, skipping");
            skipped += 1;
            continue;
        }

        let category = category_for(&audio_root, &narration);
        match render_one(
            &data_dir,
            &shorts_dir,
            &footage,
            &narration,
            &category,
            &title,
            &config,
        )
        .await
        {
            Ok(()) => {
                ledger.mark(&title)?;
                rendered += 1;
            }
            Err(e) => {
                tracing::error!(title = %title, error = %e, "Render failed");
                failed += 1;
            }
        }
    }

    println!("Batch complete: {rendered} rendered, {skipped} skipped, {failed} failed");
    Ok(())
}

async fn render_one(
    data_dir: &Path,
    shorts_dir: &Path,
    footage: &Path,
    narration: &Path,
    category: &str,
    title: &str,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let transcript = sidecar(data_dir, "generated_transcripts", category, title, "srt");
    if transcript.is_none() {
        tracing::warn!(title = %title, "No transcript found, rendering without captions");
    }

    let article = sidecar(data_dir, "generated_articles", category, title, "txt");
    let image_set = fetch_article_images(article.as_deref()).await?;

    let job = RenderJob {
        title: title.to_string(),
        footage_path: footage.to_path_buf(),
        narration_path: narration.to_path_buf(),
        transcript_path: transcript,
        image_paths: image_set.paths().to_vec(),
        output_path: output_path_for(shorts_dir, category, title),
        config: config.render.clone(),
    };

    tokio::task::spawn_blocking(move || render_short(&job)).await??;
    drop(image_set);
    Ok(())
}

/// Recursively gather `.mp3` files under the audio root.
fn collect_narrations(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_narrations(&path, out)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Category of a narration is its parent directory name; narrations placed
/// directly in the audio root are uncategorized.
fn category_for(audio_root: &Path, narration: &Path) -> String {
    narration
        .parent()
        .filter(|parent| *parent != audio_root)
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("")
        .to_string()
}

/// Sidecar file path for a title, or `None` when it does not exist.
fn sidecar(
    data_dir: &Path,
    subdir: &str,
    category: &str,
    title: &str,
    extension: &str,
) -> Option<PathBuf> {
    let mut path = data_dir.join(subdir);
    if !category.is_empty() {
        path.push(category);
    }
    path.push(format!("{title}.{extension}"));
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_narrations_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("generated_audio");
        std::fs::create_dir_all(root.join("History")).unwrap();
        std::fs::write(root.join("History/alpha.mp3"), b"x").unwrap();
        std::fs::write(root.join("History/notes.txt"), b"x").unwrap();
        std::fs::write(root.join("beta.MP3"), b"x").unwrap();

        let mut found = Vec::new();
        collect_narrations(&root, &mut found).unwrap();
        found.sort();

        assert_eq!(found.len(), 2);
        assert!(found[1].ends_with("beta.MP3"));
    }

    #[test]
    fn test_collect_narrations_missing_root_is_empty() {
        let mut found = Vec::new();
        collect_narrations(Path::new("/nonexistent/audio"), &mut found).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_category_is_parent_directory_name() {
        let root = Path::new("/data/generated_audio");
        assert_eq!(
            category_for(root, &root.join("History/alpha.mp3")),
            "History"
        );
        assert_eq!(category_for(root, &root.join("beta.mp3")), "");
    }

    #[test]
    fn test_sidecar_found_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let transcripts = dir.path().join("generated_transcripts/History");
        std::fs::create_dir_all(&transcripts).unwrap();
        std::fs::write(transcripts.join("alpha.srt"), b"x").unwrap();

        let found = sidecar(dir.path(), "generated_transcripts", "History", "alpha", "srt");
        assert!(found.is_some());

        let missing = sidecar(dir.path(), "generated_transcripts", "History", "beta", "srt");
        assert!(missing.is_none());
    }

    #[test]
    fn test_uncategorized_sidecar_lives_at_subdir_root() {
        let dir = tempfile::tempdir().unwrap();
        let articles = dir.path().join("generated_articles");
        std::fs::create_dir_all(&articles).unwrap();
        std::fs::write(articles.join("solo.txt"), b"x").unwrap();

        let found = sidecar(dir.path(), "generated_articles", "", "solo", "txt");
        assert_eq!(found, Some(articles.join("solo.txt")));
    }
}
