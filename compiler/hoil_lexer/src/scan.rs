//! Region-aware scanning shared by the lexer and by callers that split
//! argument lists.

use crate::LexError;

/// A region opened by `(` or `#[`.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Region {
    Call,
    Index,
}

/// Byte offset of the first `separator` at or after `start` that sits at
/// nesting level zero and outside quotes, or `text.len()` if there is none.
pub(crate) fn item_end(text: &str, start: usize, separator: u8) -> Result<usize, LexError> {
    let bytes = text.as_bytes();
    let mut regions: Vec<Region> = Vec::new();
    let mut in_string = false;
    let mut i = start;

    while i < bytes.len() {
        let c = bytes[i];
        if in_string {
            if c == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' => in_string = true,
            b'(' => regions.push(Region::Call),
            b'#' if bytes.get(i + 1) == Some(&b'[') => {
                regions.push(Region::Index);
                i += 1;
            }
            b')' | b']' => {
                let closes = if c == b')' {
                    Region::Call
                } else {
                    Region::Index
                };
                match regions.last() {
                    Some(&open) if open == closes => {
                        regions.pop();
                    }
                    Some(_) => {
                        return Err(LexError::UnbalancedDelimiter {
                            found: char::from(c),
                            item: text[start..].to_owned(),
                        });
                    }
                    // Outside any region the byte is part of an operator spelling.
                    None => {}
                }
            }
            _ if c == separator && regions.is_empty() => return Ok(i),
            _ => {}
        }
        i += 1;
    }

    let item = || text[start..].to_owned();
    if in_string {
        return Err(LexError::UnterminatedString { item: item() });
    }
    match regions.last() {
        Some(Region::Call) => Err(LexError::UnterminatedCall { item: item() }),
        Some(Region::Index) => Err(LexError::UnterminatedIndex { item: item() }),
        None => Ok(bytes.len()),
    }
}

/// Split `text` on every top-level `separator`, trimming each part.
///
/// Always returns at least one part; empty parts are kept so callers can
/// reject them with their own diagnostic.
pub fn split_top_level(text: &str, separator: u8) -> Result<Vec<&str>, LexError> {
    let mut parts = Vec::new();
    let mut start = 0;
    loop {
        let end = item_end(text, start, separator)?;
        parts.push(text[start..end].trim());
        if end >= text.len() {
            return Ok(parts);
        }
        start = end + 1;
    }
}

/// `%name%` → `name`; anything else is returned unchanged.
pub fn strip_variable(text: &str) -> &str {
    text.strip_prefix('%')
        .and_then(|rest| rest.strip_suffix('%'))
        .filter(|name| !name.is_empty())
        .unwrap_or(text)
}
