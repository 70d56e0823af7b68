//! Form-control and validation plumbing for Select.

use crate::form_control::{
    ChangeCallback, FieldControl, TouchedCallback, ValueAccessor, is_filled_value,
};
use crate::stream::StateChanges;
use crate::validation::{ErrorDisplay, Validatable};

use super::state::{Select, SelectValue};

impl<T: SelectValue> FieldControl for Select<T> {
    fn control_id(&self) -> String {
        self.id_string()
    }

    fn is_focused(&self) -> bool {
        Select::is_focused(self)
    }

    fn has_error(&self) -> bool {
        Select::has_error(self)
    }

    fn is_disabled(&self) -> bool {
        Select::is_disabled(self)
    }

    /// Filled when a non-blank value is present, regardless of the open state.
    fn is_filled(&self) -> bool {
        self.read(|inner| is_filled_value(inner.value.as_ref()))
    }

    fn state_changes(&self) -> &StateChanges {
        Select::state_changes(self)
    }

    /// Opens the panel; `open` also marks the select focused.
    fn on_container_click(&self) {
        self.open();
    }
}

impl<T: SelectValue> ValueAccessor for Select<T> {
    type Value = T;

    fn value(&self) -> Option<T> {
        Select::value(self)
    }

    fn write_value(&self, value: Option<T>) {
        Select::write_value(self, value);
    }

    fn register_on_change(&self, callback: ChangeCallback<T>) {
        Select::register_on_change(self, callback);
    }

    fn register_on_touched(&self, callback: TouchedCallback) {
        Select::register_on_touched(self, callback);
    }

    fn set_disabled_state(&self, disabled: bool) {
        Select::set_disabled_state(self, disabled);
    }
}

impl<T: SelectValue> Validatable for Select<T> {
    type Value = Option<T>;

    fn validation_value(&self) -> Self::Value {
        self.value()
    }

    fn set_error(&self, msg: impl Into<String>) {
        Select::set_error(self, msg);
    }

    fn clear_error(&self) {
        Select::clear_error(self);
    }

    fn has_error(&self) -> bool {
        Select::has_error(self)
    }

    fn error(&self) -> Option<String> {
        Select::error(self)
    }

    fn widget_id(&self) -> String {
        self.id_string()
    }

    fn error_display(&self) -> ErrorDisplay {
        Select::error_display(self)
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        Select::set_error_display(self, display);
    }
}
