//! Form validation.
//!
//! Controls never validate themselves; a [`Validator`] reads each control's
//! value, runs the rules registered for it and writes the first failing
//! message back with [`Validatable::set_error`]. Hosting form fields pick the
//! error up through the control's state changes.
//!
//! # Example
//!
//! ```ignore
//! use loom::validation::Validator;
//!
//! let result = Validator::new()
//!     .field(&name, "name")
//!         .required("Name is required")
//!         .min_length(3, "Name must be at least 3 characters")
//!     .field(&email, "email")
//!         .email("Please enter a valid email")
//!     .field(&fruit, "fruit")
//!         .selected("Pick a fruit")
//!     .validate();
//!
//! if let Some(widget_id) = result.first_invalid_widget() {
//!     log::debug!("first invalid control: {}", widget_id);
//! }
//! ```

mod error;
mod error_display;
mod result;
mod validatable;
mod validator;

pub use error::ValidationError;
pub use error_display::ErrorDisplay;
pub use result::{FieldError, ValidationResult};
pub use validatable::Validatable;
pub use validator::{BoxFuture, FieldBuilder, Validator};
