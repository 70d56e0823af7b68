/// Where a control shows its validation error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDisplay {
    /// Message on the line below the control (default).
    #[default]
    Below,
    /// Message to the right of the control.
    Inline,
    /// No message; only the error styling of the field.
    None,
}
