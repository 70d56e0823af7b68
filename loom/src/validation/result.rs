/// A failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name given to [`Validator::field`](super::Validator::field).
    pub field_name: String,
    /// ID of the control, for moving focus to it.
    pub widget_id: String,
    /// First failing rule's message.
    pub message: String,
}

/// Result of validating one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed, in registration order.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub(super) fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// ID of the first invalid control, for focusing it.
    pub fn first_invalid_widget(&self) -> Option<&str> {
        self.first_error().map(|e| e.widget_id.as_str())
    }

    /// Error message for a named field, if it failed.
    pub fn error_for(&self, field_name: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|e| e.field_name == field_name)
            .map(|e| e.message.as_str())
    }
}
