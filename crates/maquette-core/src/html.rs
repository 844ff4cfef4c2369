//! Minimal HTML text utilities for story content.
//!
//! Story text in a layout document may carry a single wrapping HTML tag
//! pair (`"<p>…</p>"`) and a handful of character entities. Field
//! derivation needs the plain text; rehydration needs to put edited text
//! back *inside* the original wrapper. This module covers exactly that —
//! it is not a general HTML parser.

/// A single wrapping tag pair detected around story content.
///
/// `open` includes any attributes exactly as written, so rebuilding
/// `open + inner + close` reproduces the original markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlWrapper<'a> {
    pub open: &'a str,
    pub inner: &'a str,
    pub close: &'a str,
}

/// Detects a story of the shape `^<TAG …>…</TAG>$`.
///
/// Returns `None` when the text is not wrapped by exactly one matching
/// tag pair spanning the whole string.
pub fn wrapper(story: &str) -> Option<HtmlWrapper<'_>> {
    let trimmed = story.trim();
    if !trimmed.starts_with('<') || !trimmed.ends_with('>') {
        return None;
    }

    let open_end = trimmed.find('>')?;
    let open = &trimmed[..=open_end];
    // Self-closing or closing tag at the front disqualifies.
    if open.starts_with("</") || open.ends_with("/>") {
        return None;
    }

    let tag: String = trimmed[1..open_end]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if tag.is_empty() {
        return None;
    }

    let close_pattern = format!("</{tag}>");
    if !trimmed.ends_with(close_pattern.as_str()) {
        return None;
    }

    let inner = &trimmed[open_end + 1..trimmed.len() - close_pattern.len()];
    // A second tag of the same kind inside means the string is not a
    // single wrapper.
    if inner.contains(close_pattern.as_str()) {
        return None;
    }

    let close = &trimmed[trimmed.len() - close_pattern.len()..];
    Some(HtmlWrapper { open, inner, close })
}

/// Strips every tag and decodes entities, yielding plain text.
pub fn strip_tags(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }
    decode_entities(&plain)
}

/// Decodes the common named entities and numeric character references.
pub fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find(';') {
            // Entities are short; anything longer is treated as a bare
            // ampersand.
            Some(end) if end <= 8 => {
                let entity = &candidate[1..end];
                match decode_entity(entity) {
                    Some(c) => decoded.push(c),
                    None => decoded.push_str(&candidate[..=end]),
                }
                rest = &candidate[end + 1..];
            }
            _ => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00a0}'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
