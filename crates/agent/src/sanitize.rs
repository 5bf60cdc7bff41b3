//! Outbound SMS sanitization
//!
//! Every reply leaves through here: strip residual markup, keep the body
//! within one SMS segment preferring sentence boundaries, and guarantee
//! terminal punctuation. Empty input becomes the fixed apology, so the
//! output is never blank.

use once_cell::sync::Lazy;
use regex::Regex;

use sms_agent_config::constants::{replies, sms};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static ELLIPSIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}").unwrap());
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]").unwrap());

fn ends_with_terminal(text: &str) -> bool {
    matches!(text.chars().last(), Some('.') | Some('!') | Some('?'))
}

/// Sanitize model output into a valid SMS body of at most `max_len` chars
pub fn sanitize(input: &str, max_len: usize) -> String {
    let stripped = TAG_RE.replace_all(input, "");
    let collapsed = ELLIPSIS_RE.replace_all(&stripped, ".");
    let mut text = collapsed.trim().to_string();

    if text.is_empty() {
        return replies::EMPTY_APOLOGY.to_string();
    }

    if !ends_with_terminal(&text) {
        text.push('.');
    }

    if text.chars().count() > max_len {
        text = shorten(&text, max_len);
    }

    text
}

/// Rebuild an over-long reply from whole sentences; fall back to a hard
/// cut when even the first sentence does not fit.
fn shorten(text: &str, max_len: usize) -> String {
    // Leave the same punctuation headroom the 160/157 split gives
    let soft_len = max_len.saturating_sub(sms::MAX_LEN - sms::SOFT_LEN).max(1);

    let mut result = String::new();
    for sentence in SENTENCE_RE.find_iter(text) {
        let candidate_len = result.chars().count() + sentence.as_str().chars().count();
        if candidate_len > soft_len {
            break;
        }
        result.push_str(sentence.as_str());
    }

    let mut result = result.trim().to_string();
    if result.is_empty() {
        // First sentence alone was too long; cut mid-sentence
        result = text.chars().take(soft_len).collect::<String>();
        result = result.trim_end().to_string();
    }

    if !ends_with_terminal(&result) {
        result.push('.');
    }
    result
}
