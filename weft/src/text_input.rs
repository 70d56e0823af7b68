use crate::event::{Key, KeyCombo, Modifiers};

/// Editable text with a cursor and an optional selection anchor.
///
/// Cursor and anchor positions are character indices, not byte offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
    /// Anchor position for selection. When Some and != cursor, text is selected.
    anchor: Option<usize>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            anchor: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole text, placing the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }

    /// Get the selection range as (start, end) where start <= end.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.anchor.and_then(|a| {
            if a != self.cursor {
                Some(if a < self.cursor {
                    (a, self.cursor)
                } else {
                    (self.cursor, a)
                })
            } else {
                None
            }
        })
    }

    /// Check if there's an active selection.
    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    /// Clear the selection anchor.
    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Select all text.
    pub fn select_all(&mut self) {
        if !self.text.is_empty() {
            self.anchor = Some(0);
            self.cursor = self.char_count();
        }
    }

    /// Handle a key press for text editing.
    pub fn handle_key(&mut self, combo: &KeyCombo) -> TextEditResult {
        let modifiers: Modifiers = combo.modifiers;
        match combo.key {
            Key::Char('a') if modifiers.ctrl => {
                self.select_all();
                TextEditResult::Handled
            }

            Key::Char(c) if !c.is_control() && !modifiers.ctrl && !modifiers.alt => {
                self.insert_char(c);
                TextEditResult::Changed
            }

            Key::Backspace if modifiers.none() => {
                if self.delete_back() {
                    TextEditResult::Changed
                } else {
                    TextEditResult::Handled
                }
            }

            Key::Delete if modifiers.none() => {
                if self.delete_forward() {
                    TextEditResult::Changed
                } else {
                    TextEditResult::Handled
                }
            }

            Key::Left if !modifiers.ctrl => {
                self.move_cursor(-1, modifiers.shift);
                TextEditResult::Handled
            }

            Key::Right if !modifiers.ctrl => {
                self.move_cursor(1, modifiers.shift);
                TextEditResult::Handled
            }

            Key::Home if !modifiers.ctrl => {
                self.move_to(0, modifiers.shift);
                TextEditResult::Handled
            }

            Key::End if !modifiers.ctrl => {
                let end = self.char_count();
                self.move_to(end, modifiers.shift);
                TextEditResult::Handled
            }

            Key::Enter => TextEditResult::Submitted,

            _ => TextEditResult::Ignored,
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Remove the selected range, leaving the cursor at its start.
    fn remove_range(&mut self, start: usize, end: usize) {
        let start_byte = char_to_byte_index(&self.text, start);
        let end_byte = char_to_byte_index(&self.text, end);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
        self.clear_selection();
    }

    /// Insert a character at cursor, replacing selection if any.
    fn insert_char(&mut self, c: char) {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
        }
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Delete character before cursor or delete selection.
    /// Returns true if text changed.
    fn delete_back(&mut self) -> bool {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
            true
        } else if self.cursor > 0 {
            self.remove_range(self.cursor - 1, self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete character after cursor or delete selection.
    /// Returns true if text changed.
    fn delete_forward(&mut self) -> bool {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
            true
        } else if self.cursor < self.char_count() {
            self.remove_range(self.cursor, self.cursor + 1);
            true
        } else {
            false
        }
    }

    /// Move cursor by delta characters.
    fn move_cursor(&mut self, delta: i32, extend_selection: bool) {
        if !extend_selection {
            // If we have a selection and not extending, move to edge of selection
            if let Some((start, end)) = self.selection() {
                self.cursor = if delta < 0 { start } else { end };
                self.clear_selection();
                return;
            }
        }
        let target = (self.cursor as i32 + delta).clamp(0, self.char_count() as i32) as usize;
        self.move_to(target, extend_selection);
    }

    fn move_to(&mut self, position: usize, extend_selection: bool) {
        if extend_selection && self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        } else if !extend_selection {
            self.clear_selection();
        }
        self.cursor = position.min(self.char_count());
    }
}

/// Result of handling a text editing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditResult {
    /// Text was modified.
    Changed,
    /// Enter was pressed.
    Submitted,
    /// Key was handled but text didn't change (e.g., cursor movement).
    Handled,
    /// Key was not handled, should be passed through.
    Ignored,
}

/// Convert character index to byte index in a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
