//! Recover a JSON payload from free-form model output.
//!
//! Models wrap their JSON in prose, in markdown fences, or send it bare.
//! Strategies are tried in a fixed order and the first one that yields text
//! wins. Nothing here parses JSON: a bad candidate is reported by the
//! validator one stage later, and extraction is not retried.

/// Key that marks an object as a world payload.
const PAYLOAD_KEY: &str = "themeConfig";

/// Opening tag of a JSON-labelled markdown fence.
const JSON_FENCE: &str = "```json";

/// Markdown fence delimiter.
const FENCE: &str = "```";

/// Which strategy produced the candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Contents of a ```` ```json ```` fenced block.
    Fenced,
    /// A balanced object containing a `themeConfig` key.
    BraceMatched,
    /// The whole (trimmed) response.
    WholeResponse,
}

/// A candidate JSON string cut from a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// The candidate text.
    pub text: &'a str,
    /// How it was found.
    pub strategy: Strategy,
}

/// Cut the most likely JSON payload out of `raw`.
///
/// Order: a fenced block tagged `json`, then the first object containing a
/// `themeConfig` key up to its matching closing brace, then the whole
/// trimmed input. Never fails.
pub fn extract_json(raw: &str) -> Extraction<'_> {
    if let Some(text) = fenced_block(raw) {
        return Extraction {
            text,
            strategy: Strategy::Fenced,
        };
    }
    if let Some(text) = payload_object(raw) {
        return Extraction {
            text,
            strategy: Strategy::BraceMatched,
        };
    }
    Extraction {
        text: raw.trim(),
        strategy: Strategy::WholeResponse,
    }
}

/// Contents of the first ```` ```json ```` block, trimmed.
///
/// An opening tag with no closing fence yields nothing.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find(JSON_FENCE)?;
    let body_start = open.checked_add(JSON_FENCE.len())?;
    let body = text.get(body_start..)?;
    let end = body.find(FENCE)?;
    body.get(..end).map(str::trim)
}

/// An object whose closing brace has not been seen yet.
struct OpenObject {
    start: usize,
    has_key: bool,
}

/// The first balanced object that has a `themeConfig` key, at any depth.
///
/// Objects are ranked by their opening brace, so an enclosing object is
/// preferred over anything nested inside it. Braces are matched in a single
/// pass; quotes only open strings inside an object, so stray quotes in the
/// surrounding prose do not hide the payload.
fn payload_object(text: &str) -> Option<&str> {
    let mut open: Vec<OpenObject> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut string_start: Option<usize> = None;
    let mut escaped = false;
    let mut key_pending = false;

    for (i, c) in text.char_indices() {
        if let Some(start) = string_start {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                key_pending = text.get(start..i) == Some(PAYLOAD_KEY);
                string_start = None;
            }
            continue;
        }
        if key_pending && !c.is_whitespace() {
            key_pending = false;
            if let (':', Some(top)) = (c, open.last_mut()) {
                top.has_key = true;
            }
        }
        match c {
            '"' if !open.is_empty() => string_start = i.checked_add(1),
            '{' => open.push(OpenObject {
                start: i,
                has_key: false,
            }),
            '}' => {
                let Some(closed) = open.pop() else {
                    continue;
                };
                if !closed.has_key {
                    continue;
                }
                if let Some(parent) = open.last_mut() {
                    parent.has_key = true;
                }
                let end = i.checked_add(1)?;
                if best.is_none_or(|(start, _)| closed.start < start) {
                    best = Some((closed.start, end));
                }
            }
            _ => {}
        }
    }
    best.and_then(|(start, end)| text.get(start..end))
}
