//! The contract between a form field wrapper, an external form model, and
//! the control they both talk to.
//!
//! [`FieldControl`] is what a [`FormField`](crate::form_field::FormField)
//! needs: read-only state getters plus a payload-free change stream. It is
//! object safe so a field can hold any control behind `Arc<dyn FieldControl>`.
//!
//! [`ValueAccessor`] is what a form model needs: typed value read/write and
//! registration of change and touched callbacks.

use std::sync::Arc;

use crate::stream::StateChanges;

/// Callback invoked with the new value after a user-driven change.
pub type ChangeCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Callback invoked when the control is blurred.
pub type TouchedCallback = Arc<dyn Fn() + Send + Sync>;

/// State a form field wrapper mirrors from its control.
pub trait FieldControl: Send + Sync {
    /// Stable identifier of the control.
    fn control_id(&self) -> String;

    fn is_focused(&self) -> bool;

    fn has_error(&self) -> bool;

    fn is_disabled(&self) -> bool;

    /// Whether the control holds a non-blank value.
    fn is_filled(&self) -> bool;

    /// Emits once per observable state transition. Subscribers re-read the
    /// getters above.
    fn state_changes(&self) -> &StateChanges;

    /// Called when the surrounding field container is clicked.
    fn on_container_click(&self);
}

/// Typed value access for an external form model.
pub trait ValueAccessor {
    type Value: Clone;

    fn value(&self) -> Option<Self::Value>;

    /// Write a value from the model. Never invokes the change callback.
    fn write_value(&self, value: Option<Self::Value>);

    fn register_on_change(&self, callback: ChangeCallback<Self::Value>);

    fn register_on_touched(&self, callback: TouchedCallback);

    fn set_disabled_state(&self, disabled: bool);
}

/// A control usable both inside a field wrapper and by a form model.
pub trait FormControl: FieldControl + ValueAccessor {}

impl<C: FieldControl + ValueAccessor> FormControl for C {}

/// Values that may count as empty even when present.
///
/// Custom select values opt in with an empty impl: they are never blank.
pub trait FieldValue {
    fn is_blank(&self) -> bool {
        false
    }
}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for &str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! never_blank {
    ($($ty:ty),* $(,)?) => {
        $(impl FieldValue for $ty {})*
    };
}

never_blank!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// `Some` and not blank.
pub fn is_filled_value<T: FieldValue>(value: Option<&T>) -> bool {
    value.is_some_and(|v| !v.is_blank())
}
