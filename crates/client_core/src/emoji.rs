//! Group icons travel as code point notation (`U+1F4C1`), not as raw emoji.

pub const DEFAULT_GROUP_EMOJI: &str = "📁";

/// `"📁"` becomes `"U+1F4C1"`; multi-code-point emoji are joined with `-`.
pub fn emoji_to_unified(emoji: &str) -> String {
    emoji
        .chars()
        .map(|ch| format!("U+{:X}", u32::from(ch)))
        .collect::<Vec<_>>()
        .join("-")
}

/// Inverse of [`emoji_to_unified`]. The `U+` prefix is optional and case-insensitive.
pub fn unified_to_emoji(unified: &str) -> Option<String> {
    let unified = unified.trim();
    if unified.is_empty() {
        return None;
    }
    unified
        .split('-')
        .map(|part| {
            let hex = part
                .strip_prefix("U+")
                .or_else(|| part.strip_prefix("u+"))
                .unwrap_or(part);
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        })
        .collect()
}

/// Emoji for a stored icon value, falling back to the default folder icon.
pub fn group_icon(icon_url: &str) -> String {
    unified_to_emoji(icon_url).unwrap_or_else(|| DEFAULT_GROUP_EMOJI.to_string())
}

#[cfg(test)]
#[path = "tests/emoji_tests.rs"]
mod tests;
