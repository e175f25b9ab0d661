//! SRT transcript parsing and timed-cue lookup.

/// A single timed subtitle entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubtitleCue {
    /// Start of the display window, seconds from clip start.
    pub start_secs: f64,

    /// End of the display window, seconds from clip start.
    pub end_secs: f64,

    /// Display text. Multi-line blocks are joined with single spaces.
    pub text: String,
}

/// Parse SRT content into an ordered cue list.
///
/// Each block is an index line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` range
/// line, and one or more text lines, terminated by a blank line or end of
/// input. Malformed blocks are skipped with a warning; an empty source
/// yields an empty list.
pub fn parse_srt(input: &str) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush_block(&mut block, &mut cues);
        } else {
            block.push(line);
        }
    }
    flush_block(&mut block, &mut cues);

    cues
}

fn flush_block(block: &mut Vec<&str>, cues: &mut Vec<SubtitleCue>) {
    if block.is_empty() {
        return;
    }

    match parse_block(block) {
        Some(cue) => cues.push(cue),
        None => {
            tracing::warn!(block = ?block, "Skipping malformed SRT block");
        }
    }
    block.clear();
}

fn parse_block(block: &[&str]) -> Option<SubtitleCue> {
    if block.len() < 3 {
        return None;
    }

    // The sequence index carries no timing information, but an unparsable
    // index marks the block as malformed.
    block[0].parse::<u64>().ok()?;

    let (start_raw, end_raw) = block[1].split_once(" --> ")?;
    let start_secs = parse_srt_time(start_raw.trim())?;
    let end_secs = parse_srt_time(end_raw.trim())?;

    let text = block[2..].join(" ");

    Some(SubtitleCue {
        start_secs,
        end_secs,
        text,
    })
}

/// Parse a `HH:MM:SS,mmm` timestamp into seconds.
pub fn parse_srt_time(raw: &str) -> Option<f64> {
    let (clock, millis) = raw.split_once(',')?;
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let millis: u64 = millis.parse().ok()?;

    Some((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
}

/// Format seconds as an SRT timestamp: `HH:MM:SS,mmm`.
pub fn format_srt_time(secs: f64) -> String {
    let total_ms = (secs * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// The cue displayed at time `t`: the first cue with `start <= t < end`.
pub fn active_cue_at(cues: &[SubtitleCue], t: f64) -> Option<&SubtitleCue> {
    cues.iter()
        .find(|cue| cue.start_secs <= t && t < cue.end_secs)
}
