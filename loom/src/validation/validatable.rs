use super::ErrorDisplay;

/// A control a [`Validator`](super::Validator) can check.
///
/// Setting or clearing an error notifies the control's state-change
/// subscribers, so a hosting form field updates its error styling.
pub trait Validatable: Send + Sync {
    /// The value type rules are written against.
    type Value;

    fn validation_value(&self) -> Self::Value;

    fn set_error(&self, msg: impl Into<String>);

    fn clear_error(&self);

    fn has_error(&self) -> bool;

    fn error(&self) -> Option<String>;

    /// Control ID, reported in [`FieldError`](super::FieldError).
    fn widget_id(&self) -> String;

    fn error_display(&self) -> ErrorDisplay;

    fn set_error_display(&self, display: ErrorDisplay);
}
