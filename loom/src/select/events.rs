//! Event handling implementation for Select.

use weft::{Key, KeyCombo};

use crate::events::{EventResult, WidgetEvents};

use super::state::{Select, SelectValue};

impl<T: SelectValue> Select<T> {
    /// Handle a key press while the trigger has focus.
    pub fn dispatch_key(&self, key: &KeyCombo) -> EventResult {
        if self.is_disabled() || key.modifiers.ctrl || key.modifiers.alt {
            return EventResult::Ignored;
        }

        if !self.is_open() {
            if key.key.is_activation() {
                self.open();
                return EventResult::Consumed;
            }
            return EventResult::Ignored;
        }

        let tracker = self.key_manager();
        match key.key {
            Key::Up | Key::Down | Key::Home | Key::End => {
                tracker.on_keydown(key);
                EventResult::Consumed
            }
            Key::Char(' ') if tracker.is_typing() => tracker.on_keydown(key).into(),
            Key::Enter | Key::Char(' ') => {
                if let Some(option) = tracker.active_item() {
                    option.select_via_interaction();
                }
                EventResult::Consumed
            }
            Key::Escape => {
                self.close();
                EventResult::Consumed
            }
            Key::Tab | Key::BackTab => {
                // Close but let the host move focus; the blur that follows
                // then lands on a closed select.
                self.close();
                EventResult::Ignored
            }
            _ => tracker.on_keydown(key).into(),
        }
    }

    /// Native focus on the trigger.
    pub fn dispatch_focus(&self) {
        let changed = self
            .shared
            .inner
            .write()
            .map(|mut guard| !std::mem::replace(&mut guard.is_focused, true))
            .unwrap_or(false);
        if changed {
            self.notify();
        }
    }

    /// Native blur of the trigger.
    ///
    /// Ignored while open: focus moving into the panel is not a blur of the
    /// control. Otherwise clears focus and marks the control touched.
    pub fn dispatch_blur(&self) {
        let changed = {
            let Ok(mut guard) = self.shared.inner.write() else {
                return;
            };
            if guard.is_open {
                return;
            }
            std::mem::replace(&mut guard.is_focused, false)
        };
        self.fire_touched();
        if changed {
            self.notify();
        }
    }

    /// A click landed outside both the trigger and the panel.
    pub fn dispatch_outside_click(&self) -> EventResult {
        if !self.set_closed() {
            return EventResult::Ignored;
        }
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.is_focused = false;
        }
        log::debug!("{} closed by outside click", self.shared.id);
        self.fire_touched();
        self.notify();
        EventResult::Consumed
    }

    /// A click on the trigger toggles the panel.
    pub fn dispatch_click(&self) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        self.toggle();
        EventResult::Consumed
    }

    /// A click on a panel row. `row` is relative to the visible panel top.
    pub fn dispatch_panel_click(&self, row: u16) -> EventResult {
        let content_row = row.saturating_add(self.panel().scroll_top());
        let option = self.options().into_iter().find(|option| {
            let (offset, height) = option.bounds();
            content_row >= offset && content_row < offset.saturating_add(height)
        });
        match option {
            Some(option) => option.dispatch_click(),
            None => EventResult::Ignored,
        }
    }
}

impl<T: SelectValue> WidgetEvents for Select<T> {
    fn on_click(&self, _x: u16, _y: u16) -> EventResult {
        self.dispatch_click()
    }

    fn on_key(&self, key: &KeyCombo) -> EventResult {
        self.dispatch_key(key)
    }

    fn on_focus(&self) {
        self.dispatch_focus();
    }

    fn on_blur(&self) {
        self.dispatch_blur();
    }
}
