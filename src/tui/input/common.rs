use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Fold Shift into the character so bindings can match `Char('G')` with no
/// modifiers, whatever the terminal reports.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    key
}

/// Ctrl+S, the save chord
pub(super) fn is_save(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S'))
}

/// Cursor movement shared by every list: -1 up, +1 down
pub(super) fn list_step(key: &KeyEvent) -> Option<isize> {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => Some(-1),
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => Some(1),
        _ => None,
    }
}

/// Move `cursor` by `step` within `0..len`
pub(super) fn step_cursor(cursor: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(step).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_letters_become_uppercase() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('G'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);

        let key = normalize_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('?'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn step_cursor_clamps() {
        assert_eq!(step_cursor(0, -1, 3), 0);
        assert_eq!(step_cursor(2, 1, 3), 2);
        assert_eq!(step_cursor(1, 1, 3), 2);
        assert_eq!(step_cursor(4, 1, 0), 0);
    }
}
