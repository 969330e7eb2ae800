const ESCAPE_CHAR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnescapeError {
    #[error("dangling escape character at offset {offset}")]
    Dangling { offset: usize },
    #[error("unknown escape sequence `|{code}` at offset {offset}")]
    UnknownSequence { offset: usize, code: char },
    #[error("invalid unicode escape at offset {offset}")]
    InvalidUnicode { offset: usize },
}

fn escape_code(ch: char) -> Option<char> {
    match ch {
        '|' => Some('|'),
        '\'' => Some('\''),
        '\n' => Some('n'),
        '\r' => Some('r'),
        '[' => Some('['),
        ']' => Some(']'),
        '\u{0085}' => Some('x'),
        '\u{2028}' => Some('l'),
        '\u{2029}' => Some('p'),
        _ => None,
    }
}

fn unescape_code(code: char) -> Option<char> {
    match code {
        '|' => Some('|'),
        '\'' => Some('\''),
        'n' => Some('\n'),
        'r' => Some('\r'),
        '[' => Some('['),
        ']' => Some(']'),
        'x' => Some('\u{0085}'),
        'l' => Some('\u{2028}'),
        'p' => Some('\u{2029}'),
        _ => None,
    }
}

pub fn needs_escape(text: &str) -> bool {
    text.chars().any(|ch| escape_code(ch).is_some())
}

/// Escapes `text` so it can sit inside a single-quoted attribute value of one
/// service-message line.
pub fn escape_value(text: &str) -> String {
    if !needs_escape(text) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match escape_code(ch) {
            Some(code) => {
                out.push(ESCAPE_CHAR);
                out.push(code);
            }
            None => out.push(ch),
        }
    }
    out
}

pub fn unescape_value(text: &str) -> Result<String, UnescapeError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if ch != ESCAPE_CHAR {
            out.push(ch);
            continue;
        }
        let Some((_, code)) = chars.next() else {
            return Err(UnescapeError::Dangling { offset });
        };
        if code == '0' && matches!(chars.peek(), Some((_, 'x'))) {
            chars.next();
            let mut hex = String::with_capacity(4);
            for _ in 0..4 {
                match chars.next() {
                    Some((_, digit)) if digit.is_ascii_hexdigit() => hex.push(digit),
                    _ => return Err(UnescapeError::InvalidUnicode { offset }),
                }
            }
            let decoded = u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or(UnescapeError::InvalidUnicode { offset })?;
            out.push(decoded);
            continue;
        }
        let decoded = unescape_code(code).ok_or(UnescapeError::UnknownSequence { offset, code })?;
        out.push(decoded);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "escape_test.rs"]
mod tests;
