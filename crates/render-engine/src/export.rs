//! Render job orchestration.
//!
//! Sequences one short: probe inputs, select the footage segment, build
//! the per-frame compositor, then drive a decode -> compose -> encode
//! pipeline over ffmpeg rawvideo pipes. The narration track is attached
//! during encoding and its duration bounds the output clip.

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use shortsmith_common::config::RenderDefaults;
use shortsmith_common::error::{SmithError, SmithResult};
use shortsmith_compose_core::aspect::{crop_for, CropRect};
use shortsmith_compose_core::cue::{parse_srt, SubtitleCue};
use shortsmith_compose_core::segment::select_start;

use crate::compositor::{prepare_overlay_images, Compositor, FrameStyle};
use crate::font::load_font;
use crate::probe::{probe_duration_secs, probe_video_dimensions};

/// One short to render. Immutable for the duration of the render.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Article title drawn at the top of every frame and used for the
    /// output filename.
    pub title: String,

    /// Background footage source.
    pub footage_path: PathBuf,

    /// Narration audio; its duration is authoritative for output length.
    pub narration_path: PathBuf,

    /// SRT transcript aligned to the narration. Missing transcript means
    /// a captionless render, not a failure.
    pub transcript_path: Option<PathBuf>,

    /// Pre-downloaded overlay images, in rotation order.
    pub image_paths: Vec<PathBuf>,

    /// Final artifact path.
    pub output_path: PathBuf,

    /// Frame dimensions, rate, font, and bitrates.
    pub config: RenderDefaults,
}

/// Summary of a finished render.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RenderOutcome {
    pub output_path: PathBuf,
    pub segment_start_secs: f64,
    pub duration_secs: f64,
    pub frames_rendered: u64,
    pub cue_count: usize,
    pub image_count: usize,
}

/// Render one short to `job.output_path`.
///
/// Fails fast on duration mismatch before any rendering work. All child
/// processes are reaped on every exit path; a failure here aborts this
/// job only.
pub fn render_short(job: &RenderJob) -> SmithResult<RenderOutcome> {
    tracing::info!(
        title = %job.title,
        output = %job.output_path.display(),
        "Starting render"
    );

    for path in [&job.footage_path, &job.narration_path] {
        if !path.exists() {
            return Err(SmithError::FileNotFound { path: path.clone() });
        }
    }

    let cues = load_cues(job.transcript_path.as_deref());
    let narration_secs = probe_duration_secs(&job.narration_path)?;
    let footage_secs = probe_duration_secs(&job.footage_path)?;
    let (src_w, src_h) = probe_video_dimensions(&job.footage_path)?;

    let start_secs = select_start(footage_secs, narration_secs, &mut rand::thread_rng())?;
    let crop = crop_for(src_w, src_h, job.config.width, job.config.height);

    tracing::info!(
        narration_secs,
        footage_secs,
        start_secs,
        source = format!("{src_w}x{src_h}"),
        crop = ?crop,
        "Segment selected"
    );

    let style = FrameStyle::for_frame(job.config.width, job.config.height);
    let font = load_font(job.config.font_path.as_deref())?;
    let images = prepare_overlay_images(&job.image_paths, style.image_max_dim);
    let image_count = images.len();
    let cue_count = cues.len();

    let mut compositor = Compositor::new(font, style, &job.title, cues, images, narration_secs);

    if let Some(parent) = job.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let frames_rendered = run_pipeline(job, &crop, start_secs, narration_secs, &mut compositor)?;

    let outcome = RenderOutcome {
        output_path: job.output_path.clone(),
        segment_start_secs: start_secs,
        duration_secs: narration_secs,
        frames_rendered,
        cue_count,
        image_count,
    };
    write_render_report(&outcome);

    tracing::info!(
        frames = frames_rendered,
        output = %job.output_path.display(),
        "Render finished"
    );

    Ok(outcome)
}

/// Load transcript cues; a missing or unreadable transcript degrades to a
/// captionless render.
fn load_cues(path: Option<&Path>) -> Vec<SubtitleCue> {
    let Some(path) = path else {
        return Vec::new();
    };

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cues = parse_srt(&content);
            tracing::info!(path = %path.display(), cues = cues.len(), "Loaded transcript");
            cues
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Transcript unavailable, rendering without captions"
            );
            Vec::new()
        }
    }
}

fn run_pipeline(
    job: &RenderJob,
    crop: &CropRect,
    start_secs: f64,
    duration_secs: f64,
    compositor: &mut Compositor,
) -> SmithResult<u64> {
    let fps = job.config.fps.max(1);
    let total_frames = (duration_secs * fps as f64).ceil() as u64;
    let frame_bytes = (job.config.width * job.config.height * 3) as usize;

    let mut decoder = ChildGuard::spawn(decode_command(job, crop, start_secs, duration_secs))?;
    let decoder_stdout = decoder
        .take_stdout()
        .ok_or_else(|| SmithError::render("Failed to capture decoder stdout"))?;
    let decoder_stderr = decoder.drain_stderr();

    let mut encoder = ChildGuard::spawn(encode_command(job))?;
    let encoder_stdin = encoder
        .take_stdin()
        .ok_or_else(|| SmithError::encode("Failed to capture encoder stdin"))?;
    let encoder_stderr = encoder.drain_stderr();

    let started = std::time::Instant::now();
    let mut reader = BufReader::new(decoder_stdout);
    let mut writer = BufWriter::new(encoder_stdin);
    let mut frame = vec![0u8; frame_bytes];
    let mut frames = 0u64;

    while frames < total_frames {
        match reader.read_exact(&mut frame) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                if frames == 0 {
                    let log = decoder_stderr.join().unwrap_or_default();
                    return Err(SmithError::render(format!(
                        "decoder produced no frames: {}",
                        log.trim()
                    )));
                }
                tracing::warn!(
                    frames,
                    total_frames,
                    "Decoder ended early, finishing with rendered frames"
                );
                break;
            }
            Err(e) => {
                return Err(SmithError::render(format!("failed reading frame: {e}")));
            }
        }

        let t = frames as f64 / fps as f64;
        compositor.compose(t, &mut frame);

        writer
            .write_all(&frame)
            .map_err(|e| SmithError::encode(format!("failed writing frame to encoder: {e}")))?;
        frames += 1;

        // Once per second of output.
        if frames % fps as u64 == 0 {
            tracing::info!(
                frames,
                total_frames,
                pct = (frames as f64 / total_frames as f64 * 100.0).round(),
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Rendering"
            );
        }
    }

    writer
        .flush()
        .map_err(|e| SmithError::encode(format!("failed flushing encoder pipe: {e}")))?;
    drop(writer);
    drop(reader);

    // The decoder may still be producing frames past the narration bound.
    decoder.kill_now();
    let decoder_status = decoder.finish()?;
    let encoder_status = encoder.finish()?;

    let decoder_log = decoder_stderr.join().unwrap_or_default();
    let encoder_log = encoder_stderr.join().unwrap_or_default();

    if !encoder_status.success() {
        return Err(SmithError::encode(format!(
            "ffmpeg encode failed (status {}): {}",
            encoder_status,
            encoder_log.trim()
        )));
    }

    if !decoder_status.success() && frames < total_frames {
        tracing::warn!(
            status = %decoder_status,
            log = %decoder_log.trim(),
            "Decoder exited abnormally"
        );
    }

    tracing::info!(
        frames,
        total_frames,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Encode complete"
    );

    Ok(frames)
}

fn decode_command(job: &RenderJob, crop: &CropRect, start_secs: f64, duration_secs: f64) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-v", "error", "-nostdin"])
        .args(["-ss", &format!("{start_secs:.6}")])
        .args(["-t", &format!("{duration_secs:.6}")])
        .arg("-i")
        .arg(&job.footage_path)
        .args([
            "-vf",
            &format!(
                "crop={}:{}:{}:{},scale={}:{}:flags=lanczos",
                crop.width, crop.height, crop.x, crop.y, job.config.width, job.config.height
            ),
        ])
        .args(["-r", &job.config.fps.to_string()])
        .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn encode_command(job: &RenderJob) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-v", "error"])
        .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
        .args(["-s", &format!("{}x{}", job.config.width, job.config.height)])
        .args(["-r", &job.config.fps.to_string()])
        .args(["-i", "pipe:0"])
        .arg("-i")
        .arg(&job.narration_path)
        .args(["-map", "0:v", "-map", "1:a"])
        .args(["-c:v", "libx264", "-preset", "medium", "-profile:v", "high"])
        .args(["-pix_fmt", "yuv420p"])
        .args(["-b:v", &format!("{}k", job.config.video_bitrate_kbps.max(1000))])
        .args(["-c:a", "aac"])
        .args(["-b:a", &format!("{}k", job.config.audio_bitrate_kbps.max(64))])
        .args(["-movflags", "+faststart", "-shortest"])
        .arg(&job.output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd
}

/// Child process wrapper that reaps on drop, so pipeline failures never
/// leak ffmpeg processes.
struct ChildGuard {
    child: Child,
}

impl ChildGuard {
    fn spawn(mut cmd: Command) -> SmithResult<Self> {
        let child = cmd
            .spawn()
            .map_err(|e| SmithError::render(format!("Failed to start ffmpeg: {e}")))?;
        Ok(Self { child })
    }

    fn take_stdout(&mut self) -> Option<std::process::ChildStdout> {
        self.child.stdout.take()
    }

    fn take_stdin(&mut self) -> Option<std::process::ChildStdin> {
        self.child.stdin.take()
    }

    /// Drain stderr on a thread so ffmpeg never blocks on a full pipe.
    fn drain_stderr(&mut self) -> std::thread::JoinHandle<String> {
        let stderr = self.child.stderr.take();
        std::thread::spawn(move || -> String {
            let Some(stderr) = stderr else {
                return String::new();
            };
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        })
    }

    fn kill_now(&mut self) {
        let _ = self.child.kill();
    }

    fn finish(&mut self) -> SmithResult<ExitStatus> {
        Ok(self.child.wait()?)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn write_render_report(outcome: &RenderOutcome) {
    let report_path = outcome.output_path.with_extension("render-report.json");
    let write = serde_json::to_string_pretty(outcome)
        .map_err(std::io::Error::other)
        .and_then(|json| std::fs::write(&report_path, json));
    match write {
        Ok(()) => tracing::debug!(report = %report_path.display(), "Wrote render report"),
        Err(err) => {
            tracing::warn!(error = %err, path = %report_path.display(), "Failed to write render report");
        }
    }
}

/// Strip path-unsafe characters from a filename component.
pub fn sanitize_component(raw: &str) -> String {
    raw.replace('/', "_")
        .chars()
        .filter(|c| !matches!(c, '\\' | '*' | '?' | ':' | '"' | '<' | '>' | '|' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Output path for a titled short inside its category directory.
pub fn output_path_for(base_dir: &Path, category: &str, title: &str) -> PathBuf {
    let category = sanitize_component(category);
    let category = if category.is_empty() {
        "uncategorized".to_string()
    } else {
        category
    };

    base_dir
        .join(category)
        .join(format!("{}_short.mp4", sanitize_component(title)))
}
