pub mod event;
pub mod layout;
pub mod overlay;
pub mod scroll;
pub mod text;
pub mod text_input;

pub use event::{Key, KeyCombo, Modifiers};
pub use layout::Rect;
pub use overlay::{
    resolve_placement, ConnectedPosition, HorizontalAlign, OverlayPlacement, VerticalAlign,
};
pub use scroll::{scroll_position_for, ScrollViewport};
pub use text_input::{TextBuffer, TextEditResult};
