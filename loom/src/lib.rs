//! Form controls for terminal UIs: a form-bindable [`Select`](select::Select)
//! with its [`SelectOption`](option::SelectOption)s, a text
//! [`Input`](input::Input), and the [`FormField`](form_field::FormField)
//! wrapper that mirrors a control's state.

pub mod events;
pub mod form_control;
pub mod form_field;
pub mod input;
pub mod key_manager;
pub mod option;
pub mod overlay;
pub mod select;
pub mod stream;
pub mod validation;

pub use weft;

pub mod prelude {
    pub use crate::events::{EventResult, WidgetEvents};
    pub use crate::form_control::{
        ChangeCallback, FieldControl, FieldValue, FormControl, TouchedCallback, ValueAccessor,
    };
    pub use crate::form_field::{ContainerRef, FieldState, FormField, FormFieldError, FormFieldView};
    pub use crate::input::Input;
    pub use crate::key_manager::{ActiveItemTracker, KeyManagerItem};
    pub use crate::option::{OptionId, OptionSelectionChange, SelectOption};
    pub use crate::overlay::{ActiveOverlay, OverlayRequest};
    pub use crate::select::{Select, SelectConfig, SelectView};
    pub use crate::stream::{EventStream, StateChanges, Subscription};
    pub use crate::validation::{ErrorDisplay, Validatable, ValidationResult, Validator};

    pub use weft::{Key, KeyCombo, Modifiers, Rect};
}
