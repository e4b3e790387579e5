use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Applies an editing key to `target` at the char index `cursor`.
/// Returns true when the text itself changed.
pub(crate) fn apply_input_key(
    target: &mut String,
    cursor: &mut usize,
    key: KeyEvent,
    multiline: bool,
) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }
    *cursor = clamp_cursor(*cursor, target);
    match key.code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                remove_char_at(target, *cursor - 1);
                *cursor -= 1;
                return true;
            }
        }
        KeyCode::Delete => {
            if *cursor < text_char_len(target) {
                remove_char_at(target, *cursor);
                return true;
            }
        }
        KeyCode::Enter if multiline => {
            insert_char_at(target, cursor, '\n');
            return true;
        }
        KeyCode::Char(c) => {
            insert_char_at(target, cursor, c);
            return true;
        }
        KeyCode::Left => move_cursor_left(target, cursor),
        KeyCode::Right => move_cursor_right(target, cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = text_char_len(target),
        _ => {}
    }
    false
}

pub(crate) fn text_char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn clamp_cursor(cursor: usize, text: &str) -> usize {
    cursor.min(text_char_len(text))
}

fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

fn insert_char_at(text: &mut String, cursor: &mut usize, ch: char) {
    let idx = char_to_byte_idx(text, *cursor);
    text.insert(idx, ch);
    *cursor += 1;
}

fn remove_char_at(text: &mut String, char_idx: usize) {
    let start = char_to_byte_idx(text, char_idx);
    let end = char_to_byte_idx(text, char_idx + 1);
    if start < end {
        text.replace_range(start..end, "");
    }
}

fn move_cursor_left(text: &str, cursor: &mut usize) {
    *cursor = clamp_cursor(*cursor, text);
    if *cursor > 0 {
        *cursor -= 1;
    }
}

fn move_cursor_right(text: &str, cursor: &mut usize) {
    *cursor = clamp_cursor(*cursor, text);
    if *cursor < text_char_len(text) {
        *cursor += 1;
    }
}

/// Zero-based (line, column) of a char cursor, counting explicit newlines only.
pub(crate) fn cursor_line_col(text: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0usize;
    let mut col = 0usize;
    for ch in text.chars().take(cursor) {
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{apply_input_key, cursor_line_col};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn inserts_and_deletes_multibyte_text() {
        let mut text = String::new();
        let mut cursor = 0;
        for ch in "añb".chars() {
            assert!(apply_input_key(&mut text, &mut cursor, key(KeyCode::Char(ch)), false));
        }
        assert_eq!(text, "añb");
        apply_input_key(&mut text, &mut cursor, key(KeyCode::Left), false);
        assert!(apply_input_key(&mut text, &mut cursor, key(KeyCode::Backspace), false));
        assert_eq!(text, "ab");
        assert_eq!(cursor, 1);
        apply_input_key(&mut text, &mut cursor, key(KeyCode::Home), false);
        assert!(apply_input_key(&mut text, &mut cursor, key(KeyCode::Delete), false));
        assert_eq!(text, "b");
    }

    #[test]
    fn cursor_moves_do_not_count_as_edits() {
        let mut text = "abc".to_string();
        let mut cursor = 3;
        assert!(!apply_input_key(&mut text, &mut cursor, key(KeyCode::Left), false));
        assert!(!apply_input_key(&mut text, &mut cursor, key(KeyCode::End), false));
        assert!(!apply_input_key(&mut text, &mut cursor, key(KeyCode::Right), false));
        assert_eq!(cursor, 3);
    }

    #[test]
    fn enter_only_edits_multiline_fields() {
        let mut text = "a".to_string();
        let mut cursor = 1;
        assert!(!apply_input_key(&mut text, &mut cursor, key(KeyCode::Enter), false));
        assert!(apply_input_key(&mut text, &mut cursor, key(KeyCode::Enter), true));
        assert_eq!(text, "a\n");
        assert_eq!(cursor_line_col(&text, cursor), (1, 0));
    }

    #[test]
    fn control_chords_are_ignored() {
        let mut text = String::new();
        let mut cursor = 0;
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!apply_input_key(&mut text, &mut cursor, ctrl_s, false));
        assert!(text.is_empty());
    }
}
