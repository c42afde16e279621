//! Automated reply drafting.
//!
//! The generated text is not contractual. What is enforced here: the reply is
//! trimmed, never repeats the instruction template, and fits `max_chars`.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::AppError;
use crate::models::ReplySettings;
use crate::services::{GenerationParams, ModelCapabilities};

const PROMPT_HEADER: &str = "You are a professional customer support representative.";
const COMPLAINT_MARKER: &str = "Customer complaint:";

const INSTRUCTIONS: [&str; 4] = [
    "Write a short, empathetic and professional reply.",
    "Apologize for the inconvenience.",
    "Reassure the customer that the issue is being investigated.",
    "Keep it under 3 sentences.",
];

// Constant patterns, compiled once. See test_patterns_compile.
static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(reply|response|answer)\s*:\s*").expect("Invalid regex: leading label")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace run"));

/// Instruction prompt embedding the complaint.
pub fn build_prompt(complaint: &str) -> String {
    format!(
        "\n{}\n\n{}\n{}\n\n{}\n",
        PROMPT_HEADER,
        COMPLAINT_MARKER,
        complaint,
        INSTRUCTIONS.join("\n")
    )
}

/// Deterministic decoding parameters for the configured settings.
pub fn generation_params(settings: &ReplySettings) -> GenerationParams {
    GenerationParams {
        max_length: settings.max_length,
        do_sample: false,
        repetition_penalty: settings.repetition_penalty,
        no_repeat_ngram_size: settings.no_repeat_ngram_size,
    }
}

/// Cleans raw model output into a storable reply.
///
/// No part of the prompt survives: an echoed prompt, template lines and a
/// leading copy of the complaint are all removed.
pub fn sanitize_reply(raw: &str, complaint: &str, max_chars: usize) -> String {
    let mut text = raw.trim();

    // Some servers return prompt + completion
    let prompt = build_prompt(complaint);
    if let Some(rest) = text.strip_prefix(prompt.trim()) {
        text = rest.trim_start();
    }

    let complaint = complaint.trim();
    if !complaint.is_empty() {
        if let Some(rest) = text.strip_prefix(complaint) {
            text = rest.trim_start();
        }
    }

    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !is_template_line(line) && (complaint.is_empty() || *line != complaint))
        .collect();
    let joined = kept.join(" ");

    let unlabeled = LEADING_LABEL.replace(&joined, "");
    let collapsed = WHITESPACE_RUN.replace_all(&unlabeled, " ");

    truncate_on_word(collapsed.trim(), max_chars)
}

fn is_template_line(line: &str) -> bool {
    line == PROMPT_HEADER
        || line.starts_with(COMPLAINT_MARKER)
        || INSTRUCTIONS.iter().any(|instruction| *instruction == line)
}

fn truncate_on_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];

    match head.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => head[..idx].trim_end().to_string(),
        _ => head.to_string(),
    }
}

/// Drafts a reply through the generation capability.
pub async fn draft<C>(
    capabilities: &C,
    complaint: &str,
    settings: &ReplySettings,
) -> Result<String, AppError>
where
    C: ModelCapabilities + ?Sized,
{
    let prompt = build_prompt(complaint);
    let params = generation_params(settings);

    let raw = capabilities.generate(&prompt, &params).await?;
    let reply = sanitize_reply(&raw, complaint, settings.max_chars);
    debug!("Drafted reply ({} chars)", reply.chars().count());
    Ok(reply)
}
