//! Media probing via ffprobe.

use std::path::Path;
use std::process::Command;

use shortsmith_common::error::{SmithError, SmithResult};

/// Duration of a decodable media file in seconds.
pub fn probe_duration_secs(path: &Path) -> SmithResult<f64> {
    let output = run_ffprobe(path, &["-show_entries", "format=duration", "-of", "csv=p=0"])?;

    output
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .ok_or_else(|| {
            SmithError::probe(format!("no usable duration for {}", path.display()))
        })
}

/// Pixel dimensions of the first video stream.
pub fn probe_video_dimensions(path: &Path) -> SmithResult<(u32, u32)> {
    let output = run_ffprobe(
        path,
        &[
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ],
    )?;

    let parsed = output.lines().next().and_then(|line| {
        let (w, h) = line.trim().split_once('x')?;
        let width = w.parse::<u32>().ok()?;
        let height = h.parse::<u32>().ok()?;
        (width > 0 && height > 0).then_some((width, height))
    });

    parsed.ok_or_else(|| {
        SmithError::probe(format!("no usable video stream in {}", path.display()))
    })
}

fn run_ffprobe(path: &Path, args: &[&str]) -> SmithResult<String> {
    let output = Command::new("ffprobe")
        .args(["-v", "error"])
        .args(args)
        .arg(path)
        .output()
        .map_err(|e| SmithError::probe(format!("failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(SmithError::probe(format!(
            "ffprobe failed for {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| SmithError::probe("ffprobe produced non-UTF8 output"))
}

/// Check whether a binary is reachable on PATH.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
