//! Message classification.
//!
//! The bot posts several shapes of message for one job: progress updates,
//! the finished grid, per-tile upscales and variation batches. Only the
//! finished shapes are recognised here. The patterns are tied to the bot's
//! exact wording, so they are kept together in [`ClassifierPatterns`] and can
//! be replaced without touching the matcher or the poller.

use std::sync::LazyLock;

use regex::Regex;

use mjbridge_protocols::{ChatMessage, ImageKind};

use crate::error::PatternError;

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

/// `(0%)` .. `(100%)`: the job is still running.
pub const PROGRESS_PATTERN: &str = r"\((100|[1-9]?\d)%\)";
/// `** - Image #2 <@123>`: a single upscaled tile.
pub const UPSCALE_PATTERN: &str = r"\*\* - Image #(\d+) <@";
/// `** - @alice (fast)`: a finished grid.
pub const GRID_PATTERN: &str = r" - @.+ \(";
/// `** - Variations by @alice (fast)`: a finished variation batch.
pub const VARIATIONS_PATTERN: &str = r" - Variations by @.+ \(";

static MIDJOURNEY: LazyLock<ClassifierPatterns> = LazyLock::new(|| ClassifierPatterns {
    progress: Regex::new(PROGRESS_PATTERN).expect("built-in progress pattern"),
    upscale: Regex::new(UPSCALE_PATTERN).expect("built-in upscale pattern"),
    grid: Regex::new(GRID_PATTERN).expect("built-in grid pattern"),
    variations: Regex::new(VARIATIONS_PATTERN).expect("built-in variations pattern"),
});

/// The four patterns the classifier checks, in precedence order.
#[derive(Debug, Clone)]
pub struct ClassifierPatterns {
    pub progress: Regex,
    pub upscale: Regex,
    pub grid: Regex,
    pub variations: Regex,
}

impl ClassifierPatterns {
    /// Patterns matching the current Midjourney bot wording.
    pub fn midjourney() -> Self {
        MIDJOURNEY.clone()
    }

    /// Replace one pattern by name (`progress`, `upscale`, `grid`, `variations`).
    pub fn with_override(mut self, name: &str, pattern: &str) -> Result<Self, PatternError> {
        let slot = match name {
            "progress" => &mut self.progress,
            "upscale" => &mut self.upscale,
            "grid" => &mut self.grid,
            "variations" => &mut self.variations,
            other => return Err(PatternError::Unknown(other.to_string())),
        };
        *slot = Regex::new(pattern).map_err(|source| PatternError::Invalid {
            name: name.to_string(),
            source,
        })?;
        Ok(self)
    }
}

impl Default for ClassifierPatterns {
    fn default() -> Self {
        Self::midjourney()
    }
}

/// Decides whether a message is a finished upscale, a finished grid, or neither.
#[derive(Debug, Clone, Default)]
pub struct MessageClassifier {
    patterns: ClassifierPatterns,
}

impl MessageClassifier {
    pub fn new(patterns: ClassifierPatterns) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &ClassifierPatterns {
        &self.patterns
    }

    /// Whether the content carries a `(N%)` progress marker.
    pub fn is_in_progress(&self, content: &str) -> bool {
        self.patterns.progress.is_match(content)
    }

    /// Classify a message.
    ///
    /// A progress marker wins over everything else, and a message without an
    /// image is never a result.
    pub fn classify(&self, message: &ChatMessage) -> Option<ImageKind> {
        let content = message.content.as_str();

        if self.is_in_progress(content) {
            return None;
        }
        if !message.has_images() {
            return None;
        }

        if self.patterns.upscale.is_match(content) {
            Some(ImageKind::Upscale)
        } else if self.patterns.grid.is_match(content) || self.patterns.variations.is_match(content)
        {
            Some(ImageKind::Grid)
        } else {
            None
        }
    }
}
