//! Dropdown select widget.
//!
//! A [`Select`] shows the label of its current value in a trigger and, when
//! opened, a floating panel listing its [`SelectOption`](crate::option::SelectOption)s.
//!
//! - **Opening**: Enter or Space on the focused trigger, a trigger click, or
//!   a click anywhere in the hosting form field.
//! - **Navigation**: Up/Down (wrapping), Home/End, and typeahead by label
//!   while open.
//! - **Selecting**: Enter/Space on the active option or a click on a row
//!   sets the value, notifies the form model and closes the panel.
//! - **Closing**: Escape keeps the trigger focused; Tab closes and lets the
//!   host move focus on; a click outside clears focus and marks the control
//!   touched.

mod config;
mod control;
mod events;
mod render;
mod state;

pub use config::{DEFAULT_PANEL_OFFSET, SelectConfig};
pub use render::{CHEVRON_CLOSED, CHEVRON_OPEN, OptionView, SelectView};
pub use state::{Select, SelectId, SelectValue};
