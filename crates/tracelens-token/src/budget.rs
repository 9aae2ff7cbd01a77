//! Prompt budgeting.
//!
//! Cuts text down to a maximum number of cl100k_base tokens. Only a
//! prefix proportional to the budget is ever encoded, so the cost is
//! bounded by the budget rather than by the input.

use tiktoken_rs::cl100k_base_singleton;
use tracing::debug;

/// Approximate bytes per token used when decoding the cut fails.
const BYTES_PER_TOKEN: usize = 4;

/// Bytes of input encoded per token of budget.
const WINDOW_BYTES_PER_TOKEN: usize = 16;

/// Text after budgeting.
#[derive(Debug, Clone)]
pub struct Budgeted {
    pub text: String,
    /// Token count of `text`; estimated from its length after a byte cut.
    pub tokens: usize,
    pub truncated: bool,
}

/// Count cl100k_base tokens in `text`.
pub fn count_tokens(text: &str) -> usize {
    let bpe = cl100k_base_singleton();
    let bpe = bpe.lock();
    bpe.encode_with_special_tokens(text).len()
}

/// Truncate `text` to at most `max_tokens` tokens.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> Budgeted {
    let window = truncate_to_char_boundary(text, max_tokens.saturating_mul(WINDOW_BYTES_PER_TOKEN));
    let windowed = window.len() < text.len();

    let bpe = cl100k_base_singleton();
    let bpe = bpe.lock();

    let tokens = bpe.encode_with_special_tokens(window);
    if tokens.len() <= max_tokens {
        return Budgeted {
            text: window.to_string(),
            tokens: tokens.len(),
            truncated: windowed,
        };
    }

    debug!(tokens = tokens.len(), max_tokens, "Truncating text to token budget");

    match bpe.decode(tokens[..max_tokens].to_vec()) {
        Ok(decoded) => Budgeted {
            text: decoded,
            tokens: max_tokens,
            truncated: true,
        },
        Err(_) => truncate_by_bytes(window, max_tokens),
    }
}

fn truncate_by_bytes(text: &str, max_tokens: usize) -> Budgeted {
    let cut = truncate_to_char_boundary(text, max_tokens.saturating_mul(BYTES_PER_TOKEN));
    Budgeted {
        tokens: cut.len().div_ceil(BYTES_PER_TOKEN),
        text: cut.to_string(),
        truncated: true,
    }
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
