//! Console output formatter for conversation results

use colored::Colorize;
use relay_application::{ConversationOutcome, StopCause};
use relay_domain::{OutputFormat, Transcript};

/// Formats a finished conversation for stdout
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format according to `format`
    pub fn format(
        format: OutputFormat,
        outcome: &ConversationOutcome,
        transcript: &Transcript,
    ) -> String {
        match format {
            OutputFormat::Text => Self::format_text(outcome),
            OutputFormat::Json => Self::format_json(outcome),
            OutputFormat::Transcript => Self::format_transcript(transcript),
        }
    }

    /// Answer text, with a note when the round limit cut the loop short
    pub fn format_text(outcome: &ConversationOutcome) -> String {
        let mut output = outcome.answer.clone();
        if outcome.stop == StopCause::RoundLimit {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(
                &format!(
                    "[stopped after {} rounds: the model was still requesting tools]",
                    outcome.rounds
                )
                .yellow()
                .to_string(),
            );
        }
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &ConversationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// One JSON object per transcript message
    pub fn format_transcript(transcript: &Transcript) -> String {
        transcript
            .messages()
            .iter()
            .filter_map(|message| serde_json::to_string(message).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
