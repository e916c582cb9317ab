//! HUD text
//!
//! Everything the front end prints is derived here from the phase and counters,
//! so the wording can be checked without a browser.

use crate::sim::FlipPhase;

/// Title used when sharing a score
pub const SHARE_TITLE: &str = "My Bottle Flip Score!";

/// How long share feedback stays on screen (ms)
pub const SHARE_FEEDBACK_MS: i32 = 3000;

/// Delay between resetting a landed bottle and launching the next flip (ms)
pub const RELAUNCH_DELAY_MS: i32 = 50;

/// Main status line under the play area
pub fn status_message(phase: FlipPhase, wins: u32) -> String {
    match phase {
        FlipPhase::Idle => "Click 'Flip!' to Start".to_string(),
        FlipPhase::InFlight => "Flipping...".to_string(),
        FlipPhase::LandedSuccess => format!("Perfect Landing! Wins: {}", wins),
        FlipPhase::LandedFail => "Oops! Try Again.".to_string(),
    }
}

pub fn flip_button_label(phase: FlipPhase) -> &'static str {
    if phase == FlipPhase::InFlight {
        "Flipping..."
    } else {
        "Flip!"
    }
}

/// Sharing is only offered while the bottle is not in the air
pub fn share_enabled(phase: FlipPhase) -> bool {
    phase != FlipPhase::InFlight
}

pub fn share_text(wins: u32, tries: u32) -> String {
    format!(
        "I flipped my way to {} wins in {} tries in the Bottle Flip Challenge! 🍾 Can you do better?",
        wins, tries
    )
}

/// Result of trying to share a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Native share sheet completed
    Shared,
    /// Native share sheet cancelled or errored
    ShareFailed,
    /// No share sheet, score written to the clipboard instead
    Copied,
    CopyFailed,
}

impl ShareOutcome {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "shared" => Some(ShareOutcome::Shared),
            "share_failed" => Some(ShareOutcome::ShareFailed),
            "copied" => Some(ShareOutcome::Copied),
            "copy_failed" => Some(ShareOutcome::CopyFailed),
            _ => None,
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            ShareOutcome::Shared => "Shared successfully!",
            ShareOutcome::ShareFailed => "Share cancelled or failed.",
            ShareOutcome::Copied => "Score copied to clipboard!",
            ShareOutcome::CopyFailed => "Failed to copy score. Please share manually.",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ShareOutcome::ShareFailed | ShareOutcome::CopyFailed)
    }
}

/// Inline style placing the bottle element for the given base height and rotation
pub fn bottle_style(height: f32, rotation: f32) -> String {
    format!(
        "bottom: {:.2}px; transform: translateX(-50%) rotate({:.2}deg);",
        height, rotation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message(FlipPhase::Idle, 0), "Click 'Flip!' to Start");
        assert_eq!(status_message(FlipPhase::InFlight, 3), "Flipping...");
        assert_eq!(
            status_message(FlipPhase::LandedSuccess, 3),
            "Perfect Landing! Wins: 3"
        );
        assert_eq!(status_message(FlipPhase::LandedFail, 3), "Oops! Try Again.");
    }

    #[test]
    fn test_button_and_share_gating() {
        assert_eq!(flip_button_label(FlipPhase::InFlight), "Flipping...");
        assert_eq!(flip_button_label(FlipPhase::LandedFail), "Flip!");
        assert!(!share_enabled(FlipPhase::InFlight));
        assert!(share_enabled(FlipPhase::Idle));
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            share_text(2, 9),
            "I flipped my way to 2 wins in 9 tries in the Bottle Flip Challenge! 🍾 Can you do better?"
        );
    }

    #[test]
    fn test_share_outcome_codes() {
        assert_eq!(ShareOutcome::from_code("copied"), Some(ShareOutcome::Copied));
        assert_eq!(ShareOutcome::from_code("nope"), None);
        assert!(ShareOutcome::CopyFailed.is_failure());
        assert_eq!(
            ShareOutcome::ShareFailed.feedback(),
            "Share cancelled or failed."
        );
    }

    #[test]
    fn test_bottle_style() {
        assert_eq!(
            bottle_style(2.5, -90.0),
            "bottom: 2.50px; transform: translateX(-50%) rotate(-90.00deg);"
        );
    }
}
