//! Terminal output sanitization utilities
//!
//! # Security: Terminal Injection Prevention
//!
//! History files are user-controlled and may contain ANSI escape sequences or raw
//! control bytes. Written to a raw-mode terminal verbatim they could clear the screen,
//! move the cursor or corrupt the picker layout, so every command is passed through
//! [`display_chars`] before it is drawn.

/// Shown in place of a newline inside a multi-line command.
pub const NEWLINE_GLYPH: char = '↵';

/// Maps a command to the characters that are safe to draw on one row.
///
/// Each output pair carries the index of the source character it came from, so match
/// positions (which are source character offsets) can still be highlighted after
/// escape sequences have been removed.
///
/// - CSI sequences (`ESC [`, parameters, then a final byte in `@..=~`) are removed
///   entirely, as are OSC sequences (`ESC ]` up to `BEL` or `ESC \`)
/// - `\n` becomes [`NEWLINE_GLYPH`] and `\t` becomes a space
/// - Any other control character is dropped
///
/// # Examples
///
/// ```
/// use unforget::utils::terminal::display_chars;
///
/// let shown: String = display_chars("a\x1b[31mb\nc").into_iter().map(|(_, c)| c).collect();
/// assert_eq!(shown, "ab↵c");
/// ```
pub fn display_chars(text: &str) -> Vec<(usize, char)> {
    let mut result = Vec::with_capacity(text.len());
    let mut chars = text.chars().enumerate().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch == '\x1b' {
            match chars.peek().map(|&(_, c)| c) {
                Some('[') => {
                    chars.next();
                    for (_, next_ch) in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next_ch) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some((_, next_ch)) = chars.next() {
                        if next_ch == '\x07' {
                            break;
                        }
                        if next_ch == '\x1b' && chars.peek().map(|&(_, c)| c) == Some('\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        match ch {
            '\n' => result.push((idx, NEWLINE_GLYPH)),
            '\t' => result.push((idx, ' ')),
            c if c.is_control() => {}
            c => result.push((idx, c)),
        }
    }

    result
}

/// [`display_chars`] collected into a string.
pub fn sanitize_for_display(text: &str) -> String {
    display_chars(text).into_iter().map(|(_, ch)| ch).collect()
}
