//! Widget event handling types and traits.

use weft::KeyCombo;

// =============================================================================
// Event Result
// =============================================================================

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

impl From<bool> for EventResult {
    fn from(handled: bool) -> Self {
        if handled {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}

// =============================================================================
// Widget Events
// =============================================================================

/// Trait for widgets that can handle input events.
///
/// The host's event loop routes terminal input through these methods. All
/// methods default to `EventResult::Ignored`, so widgets only implement what
/// they care about.
pub trait WidgetEvents {
    /// Handle a click at the given screen position.
    fn on_click(&self, _x: u16, _y: u16) -> EventResult {
        EventResult::Ignored
    }

    /// Handle a key press while the widget has focus.
    fn on_key(&self, _key: &KeyCombo) -> EventResult {
        EventResult::Ignored
    }

    /// Called when the widget gains focus.
    fn on_focus(&self) {}

    /// Called when the widget loses focus.
    fn on_blur(&self) {}
}
