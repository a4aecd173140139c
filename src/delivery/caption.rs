//! Message text in Telegram MarkdownV2.

use crate::domain::{Article, PAYWALL_GLYPH};

/// Longest caption Telegram accepts on a photo.
pub const PHOTO_CAPTION_LIMIT: usize = 1024;
/// Longest text message Telegram accepts.
pub const TEXT_MESSAGE_LIMIT: usize = 4096;

const ELLIPSIS: char = '…';

const SPECIAL_CHARACTERS: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '<', '>', '(', ')', '#', '+', '-', '.', '!', '|', '~',
    '=',
];

fn is_special(c: char) -> bool {
    SPECIAL_CHARACTERS.contains(&c)
}

/// Backslash-escape every character MarkdownV2 reserves.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_special(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape `text`, cutting it with an ellipsis if the result would exceed `budget` characters.
///
/// Cuts happen on source characters, so an escape sequence is never split.
fn escape_within(text: &str, budget: usize) -> String {
    let escaped = escape_markdown(text);
    if escaped.chars().count() <= budget {
        return escaped;
    }
    if budget == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let width = if is_special(c) { 2 } else { 1 };
        if used + width + 1 > budget {
            break;
        }
        if is_special(c) {
            out.push('\\');
        }
        out.push(c);
        used += width;
    }
    out.push(ELLIPSIS);
    out
}

/// `{paywall}{glyph} *{title}*`, a blank line, then the description.
pub fn render(article: &Article, limit: usize) -> String {
    let paywall = if article.paywalled { PAYWALL_GLYPH } else { "" };
    let prefix = format!("{}{} *", paywall, article.marker.glyph());
    let fixed = prefix.chars().count() + "*\n\n".len() + "\n".len();

    let title = escape_within(&article.title, limit.saturating_sub(fixed));
    let remaining = limit.saturating_sub(fixed + title.chars().count());
    let description = escape_within(&article.description, remaining);

    format!("{}{}*\n\n{}\n", prefix, title, description)
}
