use crate::error::LlmError;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Markers whose following token is a credential. Prefix markers (the key
/// format itself) are redacted together with the token; field markers keep
/// the field name visible.
const SECRET_MARKERS: [(&str, bool); 12] = [
    ("AIza", true),
    ("ya29.", true),
    ("sk-", true),
    ("eyJ", true),
    ("Bearer ", false),
    ("bearer ", false),
    ("x-goog-api-key: ", false),
    ("?key=", false),
    ("&key=", false),
    ("api_key=", false),
    ("\"api_key\":\"", false),
    ("\"access_token\":\"", false),
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

/// Key-format prefixes only count at the start of a word.
fn starts_word(input: &str, at: usize) -> bool {
    input[..at]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '-' | '_')))
}

fn redact_after(scrubbed: &mut String, marker: &str, include_marker: bool) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let token_start = start + marker.len();
        let end = token_end(scrubbed, token_start);

        // Bare marker with nothing after it, or a prefix inside another word.
        if end == token_start || (include_marker && !starts_word(scrubbed, start)) {
            search_from = token_start;
            continue;
        }

        let replace_from = if include_marker { start } else { token_start };
        scrubbed.replace_range(replace_from..end, REDACTED);
        search_from = replace_from + REDACTED.len();
    }
}

/// Redact API keys and bearer tokens from text that may be shown to the user
/// or written to logs.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !SECRET_MARKERS
        .iter()
        .any(|(marker, _)| input.contains(marker))
    {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for (marker, include_marker) in SECRET_MARKERS {
        redact_after(&mut scrubbed, marker, include_marker);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and truncate provider error text.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let truncated: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{truncated}...")
}

/// Build a sanitized provider error from a failed HTTP response.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    LlmError::Status {
        provider: provider.to_string(),
        status,
        body: sanitize_api_error(&body),
    }
    .into()
}
