//! Error types shared across Shortsmith crates.

use std::path::PathBuf;

/// Top-level error type for Shortsmith operations.
#[derive(Debug, thiserror::Error)]
pub enum SmithError {
    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Narration ({narration_secs:.2}s) is longer than footage ({footage_secs:.2}s)")]
    DurationMismatch {
        footage_secs: f64,
        narration_secs: f64,
    },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Asset error: {message}")]
    Asset { message: String },

    #[error("Font error: {message}")]
    Font { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SmithError.
pub type SmithResult<T> = Result<T, SmithError>;

impl SmithError {
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset {
            message: msg.into(),
        }
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_mismatch_message_names_both_durations() {
        let err = SmithError::DurationMismatch {
            footage_secs: 10.0,
            narration_secs: 12.5,
        };
        assert_eq!(
            err.to_string(),
            "Narration (12.50s) is longer than footage (10.00s)"
        );
    }

    #[test]
    fn test_asset_constructor_builds_asset_variant() {
        let err = SmithError::asset("download failed");
        assert!(matches!(err, SmithError::Asset { .. }));
        assert_eq!(err.to_string(), "Asset error: download failed");
    }
}
