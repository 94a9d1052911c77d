//! Free-text sanitization shared by intake and the report store.

/// Strips every character outside printable ASCII (`0x20..=0x7E`) except
/// whitespace.
///
/// Whitespace is the set the web form's `\s` class matches: ASCII tab, line
/// feed, vertical tab, form feed and carriage return, the Unicode space
/// separators, U+2028/U+2029 and U+FEFF. Emoji, accented letters,
/// zero-width characters and control codes (including C1 controls such as
/// U+0085) are removed. The function is idempotent: sanitizing clean text
/// returns it unchanged.
///
/// ```rust
/// use ingest::sanitize_text;
///
/// assert_eq!(sanitize_text("Caf\u{e9} key\u{7}ring\n"), "Caf keyring\n");
/// assert_eq!(sanitize_text("plain text"), "plain text");
/// ```
pub fn sanitize_text(input: &str) -> String {
    input.chars().filter(|&c| is_kept(c)).collect()
}

/// Returns true when `input` would pass through [`sanitize_text`] unchanged.
pub fn is_sanitized(input: &str) -> bool {
    input.chars().all(is_kept)
}

fn is_kept(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7e}') || is_form_whitespace(c)
}

fn is_form_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0b}'
            | '\u{0c}'
            | '\r'
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}
