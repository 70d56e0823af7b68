//! Single-line text input control.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use weft::{KeyCombo, TextBuffer, TextEditResult};

use crate::events::{EventResult, WidgetEvents};
use crate::form_control::{
    ChangeCallback, FieldControl, TouchedCallback, ValueAccessor, is_filled_value,
};
use crate::stream::{EventStream, StateChanges};
use crate::validation::{ErrorDisplay, Validatable};

/// Unique identifier for an Input widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputId(usize);

impl InputId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for InputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__input_{}", self.0)
    }
}

#[derive(Default)]
struct InputInner {
    buffer: TextBuffer,
    placeholder: String,
    is_focused: bool,
    is_disabled: bool,
    error: Option<String>,
    error_display: ErrorDisplay,
    on_change: Option<ChangeCallback<String>>,
    on_touched: Option<TouchedCallback>,
}

struct InputShared {
    id: InputId,
    inner: RwLock<InputInner>,
    state_changes: StateChanges,
    submits: EventStream<String>,
    dirty: AtomicBool,
}

/// Everything needed to draw an input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputView {
    pub id: String,
    pub text: String,
    pub placeholder: String,
    /// Cursor position in characters.
    pub cursor: usize,
    /// Selected character range, if any.
    pub selection: Option<(usize, usize)>,
    pub focused: bool,
    pub disabled: bool,
    pub error: Option<String>,
    pub error_display: ErrorDisplay,
}

/// A text input that can be hosted in a [`FormField`](crate::form_field::FormField)
/// and bound to a form model.
///
/// Typing, `set_text` and Backspace/Delete report the new text through the
/// registered change callback; `write_value` from the model does not.
#[derive(Clone)]
pub struct Input {
    shared: Arc<InputShared>,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(InputShared {
                id: InputId::new(),
                inner: RwLock::new(InputInner::default()),
                state_changes: StateChanges::new(),
                submits: EventStream::new(),
                dirty: AtomicBool::new(false),
            }),
        }
    }

    /// Create an input with placeholder text.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        let input = Self::new();
        input.set_placeholder(placeholder);
        input
    }

    /// Get the unique ID for this input.
    pub fn id(&self) -> InputId {
        self.shared.id
    }

    /// Get the ID as a string (for node binding).
    pub fn id_string(&self) -> String {
        self.shared.id.to_string()
    }

    fn read<R: Default>(&self, f: impl FnOnce(&InputInner) -> R) -> R {
        self.shared.inner.read().map(|guard| f(&guard)).unwrap_or_default()
    }

    fn notify(&self) {
        self.shared.dirty.store(true, Ordering::SeqCst);
        self.shared.state_changes.emit(&());
    }

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------

    pub fn text(&self) -> String {
        self.read(|inner| inner.buffer.text().to_string())
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.read(|inner| inner.buffer.cursor())
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.read(|inner| inner.buffer.selection())
    }

    /// The text, or `None` when empty.
    pub fn value(&self) -> Option<String> {
        self.read(|inner| (!inner.buffer.is_empty()).then(|| inner.buffer.text().to_string()))
    }

    /// Replace the text as if the user had entered it.
    pub fn set_text(&self, text: impl Into<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.buffer.set_text(text);
        }
        self.text_changed();
    }

    /// Report the current text to the model and notify subscribers.
    fn text_changed(&self) {
        let (text, on_change) =
            self.read(|inner| (inner.buffer.text().to_string(), inner.on_change.clone()));
        if let Some(on_change) = on_change {
            on_change(&text);
        }
        self.notify();
    }

    pub fn placeholder(&self) -> String {
        self.read(|inner| inner.placeholder.clone())
    }

    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.placeholder = placeholder.into();
            self.shared.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Emits the text whenever Enter is pressed.
    pub fn submits(&self) -> &EventStream<String> {
        &self.shared.submits
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn is_focused(&self) -> bool {
        self.read(|inner| inner.is_focused)
    }

    pub fn is_disabled(&self) -> bool {
        self.read(|inner| inner.is_disabled)
    }

    /// Native focus. No-op when disabled or already focused.
    pub fn dispatch_focus(&self) {
        let changed = self
            .shared
            .inner
            .write()
            .map(|mut guard| {
                let changed = !guard.is_disabled && !guard.is_focused;
                if changed {
                    guard.is_focused = true;
                }
                changed
            })
            .unwrap_or(false);
        if changed {
            self.notify();
        }
    }

    /// Native blur. Marks the control touched once per focus.
    pub fn dispatch_blur(&self) {
        let changed = self
            .shared
            .inner
            .write()
            .map(|mut guard| {
                guard.buffer.clear_selection();
                std::mem::replace(&mut guard.is_focused, false)
            })
            .unwrap_or(false);
        if !changed {
            return;
        }
        if let Some(on_touched) = self.read(|inner| inner.on_touched.clone()) {
            on_touched();
        }
        self.notify();
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Handle a key press while focused.
    pub fn dispatch_key(&self, key: &KeyCombo) -> EventResult {
        let result = {
            let Ok(mut guard) = self.shared.inner.write() else {
                return EventResult::Ignored;
            };
            if guard.is_disabled {
                return EventResult::Ignored;
            }
            guard.buffer.handle_key(key)
        };

        match result {
            TextEditResult::Changed => {
                self.text_changed();
                EventResult::Consumed
            }
            TextEditResult::Submitted => {
                log::debug!("{} submitted", self.shared.id);
                self.shared.submits.emit(&self.text());
                EventResult::Consumed
            }
            TextEditResult::Handled => {
                self.shared.dirty.store(true, Ordering::SeqCst);
                EventResult::Consumed
            }
            TextEditResult::Ignored => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Form model
    // -------------------------------------------------------------------------

    /// Write text from the model without invoking the change callback.
    pub fn write_value(&self, value: Option<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.buffer.set_text(value.unwrap_or_default());
        }
        self.notify();
    }

    pub fn register_on_change(&self, callback: ChangeCallback<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.on_change = Some(callback);
        }
    }

    pub fn register_on_touched(&self, callback: TouchedCallback) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.on_touched = Some(callback);
        }
    }

    /// Enable or disable. Disabling drops focus.
    pub fn set_disabled_state(&self, disabled: bool) {
        let changed = self
            .shared
            .inner
            .write()
            .map(|mut guard| {
                let changed = guard.is_disabled != disabled;
                guard.is_disabled = disabled;
                if disabled {
                    guard.is_focused = false;
                }
                changed
            })
            .unwrap_or(false);
        if changed {
            self.notify();
        }
    }

    // -------------------------------------------------------------------------
    // Validation errors
    // -------------------------------------------------------------------------

    pub fn error(&self) -> Option<String> {
        self.read(|inner| inner.error.clone())
    }

    pub fn has_error(&self) -> bool {
        self.read(|inner| inner.error.is_some())
    }

    pub fn set_error(&self, msg: impl Into<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.error = Some(msg.into());
        }
        self.notify();
    }

    pub fn clear_error(&self) {
        let had_error = self
            .shared
            .inner
            .write()
            .map(|mut guard| guard.error.take().is_some())
            .unwrap_or(false);
        if had_error {
            self.notify();
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn view(&self) -> InputView {
        let mut view = self.read(|inner| InputView {
            text: inner.buffer.text().to_string(),
            placeholder: inner.placeholder.clone(),
            cursor: inner.buffer.cursor(),
            selection: inner.buffer.selection(),
            focused: inner.is_focused,
            disabled: inner.is_disabled,
            error: inner.error.clone(),
            error_display: inner.error_display,
            ..Default::default()
        });
        view.id = self.id_string();
        view
    }

    /// Check if the input needs re-rendering.
    pub fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.shared.dirty.store(false, Ordering::SeqCst);
    }
}

impl WidgetEvents for Input {
    fn on_click(&self, _x: u16, _y: u16) -> EventResult {
        self.dispatch_focus();
        EventResult::Consumed
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

impl FieldControl for Input {
    fn control_id(&self) -> String {
        self.id_string()
    }

    fn is_focused(&self) -> bool {
        Input::is_focused(self)
    }

    fn has_error(&self) -> bool {
        Input::has_error(self)
    }

    fn is_disabled(&self) -> bool {
        Input::is_disabled(self)
    }

    fn is_filled(&self) -> bool {
        is_filled_value(self.value().as_ref())
    }

    fn state_changes(&self) -> &StateChanges {
        &self.shared.state_changes
    }

    fn on_container_click(&self) {
        self.dispatch_focus();
    }
}

impl ValueAccessor for Input {
    type Value = String;

    fn value(&self) -> Option<String> {
        Input::value(self)
    }

    fn write_value(&self, value: Option<String>) {
        Input::write_value(self, value);
    }

    fn register_on_change(&self, callback: ChangeCallback<String>) {
        Input::register_on_change(self, callback);
    }

    fn register_on_touched(&self, callback: TouchedCallback) {
        Input::register_on_touched(self, callback);
    }

    fn set_disabled_state(&self, disabled: bool) {
        Input::set_disabled_state(self, disabled);
    }
}

impl Validatable for Input {
    type Value = String;

    fn validation_value(&self) -> String {
        self.text()
    }

    fn set_error(&self, msg: impl Into<String>) {
        Input::set_error(self, msg);
    }

    fn clear_error(&self) {
        Input::clear_error(self);
    }

    fn has_error(&self) -> bool {
        Input::has_error(self)
    }

    fn error(&self) -> Option<String> {
        Input::error(self)
    }

    fn widget_id(&self) -> String {
        self.id_string()
    }

    fn error_display(&self) -> ErrorDisplay {
        self.read(|inner| inner.error_display)
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.error_display = display;
            self.shared.dirty.store(true, Ordering::SeqCst);
        }
    }
}
