//! Overlay requests handed to the host's overlay service.

use weft::{ConnectedPosition, OverlayPlacement, Rect, resolve_placement};

/// Everything a host needs to float a widget's panel next to its anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    /// ID of the widget that owns the panel.
    pub owner_id: String,
    /// Rectangle the panel is attached to.
    pub anchor: Rect,
    /// Panel width in cells.
    pub width: u16,
    /// Panel height in rows.
    pub height: u16,
    /// Preferred placements, tried in order.
    pub positions: Vec<ConnectedPosition>,
}

impl OverlayRequest {
    /// Place the panel on `screen` using first-fit resolution.
    pub fn resolve(&self, screen: Rect) -> Option<OverlayPlacement> {
        resolve_placement(screen, self.anchor, (self.width, self.height), &self.positions)
    }
}

/// A panel currently shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveOverlay {
    pub owner_id: String,
    pub anchor: Rect,
    pub area: Rect,
}

impl ActiveOverlay {
    pub fn new(request: &OverlayRequest, placement: OverlayPlacement) -> Self {
        Self {
            owner_id: request.owner_id.clone(),
            anchor: request.anchor,
            area: placement.area,
        }
    }

    /// True when a click at (x, y) hits neither the panel nor its anchor.
    pub fn is_outside(&self, x: u16, y: u16) -> bool {
        !self.area.contains(x, y) && !self.anchor.contains(x, y)
    }

    /// Panel row under (x, y), relative to the panel's top edge.
    pub fn row_at(&self, x: u16, y: u16) -> Option<u16> {
        self.area.contains(x, y).then(|| y - self.area.y)
    }
}
