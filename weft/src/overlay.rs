//! Placement math for floating panels.
//!
//! A floating panel (dropdown, menu) is attached to an anchor rectangle with
//! an ordered list of preferred placements. The first placement whose panel
//! fits entirely on screen wins; when none fits, the first placement is used
//! and the panel is pushed back inside the screen.

use crate::layout::Rect;

/// Horizontal edge of the anchor or of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Start,
    End,
}

/// Vertical edge of the anchor or of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Bottom,
}

/// One preferred placement of a panel relative to its anchor.
///
/// The panel's `overlay_*` edge is aligned with the anchor's `origin_*` edge,
/// then shifted by the offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectedPosition {
    pub origin_x: HorizontalAlign,
    pub origin_y: VerticalAlign,
    pub overlay_x: HorizontalAlign,
    pub overlay_y: VerticalAlign,
    pub offset_x: i16,
    pub offset_y: i16,
}

impl ConnectedPosition {
    /// Panel hangs below the anchor, left edges flush.
    pub const fn below_start() -> Self {
        Self {
            origin_x: HorizontalAlign::Start,
            origin_y: VerticalAlign::Bottom,
            overlay_x: HorizontalAlign::Start,
            overlay_y: VerticalAlign::Top,
            offset_x: 0,
            offset_y: 0,
        }
    }

    /// Panel sits above the anchor, left edges flush.
    pub const fn above_start() -> Self {
        Self {
            origin_x: HorizontalAlign::Start,
            origin_y: VerticalAlign::Top,
            overlay_x: HorizontalAlign::Start,
            overlay_y: VerticalAlign::Bottom,
            offset_x: 0,
            offset_y: 0,
        }
    }

    pub const fn with_offset_y(mut self, offset_y: i16) -> Self {
        self.offset_y = offset_y;
        self
    }

    pub const fn with_offset_x(mut self, offset_x: i16) -> Self {
        self.offset_x = offset_x;
        self
    }

    /// Top-left corner of a `width` x `height` panel in this placement.
    fn origin_for(&self, anchor: Rect, width: u16, height: u16) -> (i32, i32) {
        let anchor_x = match self.origin_x {
            HorizontalAlign::Start => anchor.left() as i32,
            HorizontalAlign::End => anchor.right() as i32,
        };
        let anchor_y = match self.origin_y {
            VerticalAlign::Top => anchor.top() as i32,
            VerticalAlign::Bottom => anchor.bottom() as i32,
        };
        let x = match self.overlay_x {
            HorizontalAlign::Start => anchor_x,
            HorizontalAlign::End => anchor_x - width as i32,
        };
        let y = match self.overlay_y {
            VerticalAlign::Top => anchor_y,
            VerticalAlign::Bottom => anchor_y - height as i32,
        };
        (x + self.offset_x as i32, y + self.offset_y as i32)
    }
}

/// Where a panel ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    /// Screen rectangle for the panel.
    pub area: Rect,
    /// Index into the preference list that produced `area`.
    pub position_index: usize,
    /// False when no preference fit and the panel was pushed on screen.
    pub fits: bool,
}

/// Resolve an ordered list of preferred placements against the screen.
///
/// Returns `None` only when `positions` is empty.
pub fn resolve_placement(
    screen: Rect,
    anchor: Rect,
    content_size: (u16, u16),
    positions: &[ConnectedPosition],
) -> Option<OverlayPlacement> {
    // Constrain dimensions to screen
    let width = content_size.0.min(screen.width);
    let height = content_size.1.min(screen.height);

    for (index, position) in positions.iter().enumerate() {
        let (x, y) = position.origin_for(anchor, width, height);
        if fits_on_screen(screen, x, y, width, height) {
            return Some(OverlayPlacement {
                area: Rect::new(x as u16, y as u16, width, height),
                position_index: index,
                fits: true,
            });
        }
    }

    let first = positions.first()?;
    let (x, y) = first.origin_for(anchor, width, height);
    log::debug!(
        "resolve_placement: no preferred position fits {}x{}, constraining first",
        width,
        height
    );
    Some(OverlayPlacement {
        area: Rect::new(
            constrain(x, width, screen.x, screen.width),
            constrain(y, height, screen.y, screen.height),
            width,
            height,
        ),
        position_index: 0,
        fits: false,
    })
}

fn fits_on_screen(screen: Rect, x: i32, y: i32, width: u16, height: u16) -> bool {
    x >= screen.left() as i32
        && y >= screen.top() as i32
        && x + width as i32 <= screen.right() as i32
        && y + height as i32 <= screen.bottom() as i32
}

/// Constrain a coordinate so `[pos, pos + size)` stays within the screen span.
fn constrain(pos: i32, size: u16, start: u16, span: u16) -> u16 {
    let max = start as i32 + span.saturating_sub(size) as i32;
    pos.min(max).max(start as i32) as u16
}
