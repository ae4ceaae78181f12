//! Decoding of JavaScript string literal text.

use std::iter::Peekable;
use std::str::Chars;

/// Decodes a complete literal including its delimiters (`'`, `"` or `` ` ``).
///
/// Returns `None` when the delimiters do not match or an escape sequence is
/// malformed.
#[must_use]
pub fn decode_literal(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let open = chars.next()?;
    let close = chars.next_back()?;

    if open != close || !matches!(open, '\'' | '"' | '`') {
        return None;
    }

    unescape(chars.as_str())
}

/// Resolves escape sequences in the body of a string or template literal.
#[must_use]
pub fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            'x' => out.push(char::from_u32(take_hex(&mut chars, 2)?)?),
            'u' => out.push(decode_unicode_escape(&mut chars)?),
            // line continuation
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    Some(out)
}

/// Decodes the part of a `\u` escape after the `u`, joining surrogate pairs.
fn decode_unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let code = if chars.peek() == Some(&'{') {
        chars.next();
        let mut code = 0u32;
        let mut digits = 0;
        loop {
            let c = chars.next()?;
            if c == '}' {
                break;
            }
            code = code.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
            digits += 1;
        }
        if digits == 0 {
            return None;
        }
        code
    } else {
        take_hex(chars, 4)?
    };

    if (0xD800..=0xDBFF).contains(&code) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\')
            && lookahead.next() == Some('u')
            && let Some(low) = take_hex(&mut lookahead, 4)
            && (0xDC00..=0xDFFF).contains(&low)
        {
            *chars = lookahead;
            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(combined);
        }
        return Some(char::REPLACEMENT_CHARACTER);
    }

    if (0xDC00..=0xDFFF).contains(&code) {
        return Some(char::REPLACEMENT_CHARACTER);
    }

    char::from_u32(code)
}

/// Reads exactly `count` hex digits.
fn take_hex(chars: &mut Peekable<Chars<'_>>, count: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}
