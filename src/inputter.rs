use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Single line prompt editor. The cursor counts characters, not bytes.
#[derive(Default)]
pub struct Inputter {
    current_input: String,
    cursor_pos: usize,
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub changed: bool,
    pub cursor_pos: usize,
}

impl Inputter {
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        let before = self.current_input.clone();
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.finished = true,
            (KeyCode::Esc, _) => {
                self.clear();
                self.canceled = true;
                self.finished = true;
            }
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.cursor_pos = self.cursor_pos.saturating_sub(1),
            (KeyCode::Right, _) => {
                self.cursor_pos = (self.cursor_pos + 1).min(self.current_input.chars().count())
            }
            (KeyCode::Home, _) => self.cursor_pos = 0,
            (KeyCode::End, _) => self.cursor_pos = self.current_input.chars().count(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.current_input.clear();
                self.cursor_pos = 0;
            }
            (KeyCode::Char(chr), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert(chr),
            (code, modifiers) => trace!("Ignored prompt key {code:?} {modifiers:?}"),
        }
        let mut result = self.get();
        result.changed = before != self.current_input;
        result
    }

    /// Starts over with `s` as the current input, cursor at the end.
    pub fn set(&mut self, s: &str) {
        self.clear();
        self.current_input = s.to_string();
        self.cursor_pos = s.chars().count();
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            input: self.current_input.clone(),
            finished: self.finished,
            canceled: self.canceled,
            changed: false,
            cursor_pos: self.cursor_pos,
        }
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.current_input.clear();
        self.cursor_pos = 0;
    }

    fn insert(&mut self, chr: char) {
        let at = self.byte_pos(self.cursor_pos);
        self.current_input.insert(at, chr);
        self.cursor_pos += 1;
    }

    fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let at = self.byte_pos(self.cursor_pos - 1);
            self.current_input.remove(at);
            self.cursor_pos -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor_pos < self.current_input.chars().count() {
            let at = self.byte_pos(self.cursor_pos);
            self.current_input.remove(at);
        }
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.current_input
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut Inputter, s: &str) -> InputResult {
        let mut last = input.get();
        for c in s.chars() {
            last = input.read(key(KeyCode::Char(c)));
        }
        last
    }

    #[test]
    fn typing_reports_changes() {
        let mut input = Inputter::default();
        let r = type_str(&mut input, "añn");
        assert_eq!(r.input, "añn");
        assert!(r.changed);
        assert_eq!(r.cursor_pos, 3);

        let r = input.read(key(KeyCode::Left));
        assert!(!r.changed);
    }

    #[test]
    fn editing_in_the_middle_is_char_aware() {
        let mut input = Inputter::default();
        type_str(&mut input, "aéc");
        input.read(key(KeyCode::Left));
        let r = input.read(key(KeyCode::Backspace));
        assert_eq!(r.input, "ac");
        let r = type_str(&mut input, "ü");
        assert_eq!(r.input, "aüc");
        input.read(key(KeyCode::Home));
        let r = input.read(key(KeyCode::Delete));
        assert_eq!(r.input, "üc");
    }

    #[test]
    fn enter_finishes_and_escape_cancels() {
        let mut input = Inputter::default();
        input.set("tom");
        let r = input.read(key(KeyCode::Enter));
        assert!(r.finished && !r.canceled);
        assert_eq!(r.input, "tom");

        input.set("tom");
        let r = input.read(key(KeyCode::Esc));
        assert!(r.finished && r.canceled && r.changed);
        assert!(r.input.is_empty());
    }
}
