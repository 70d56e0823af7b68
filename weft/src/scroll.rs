use std::sync::{Arc, RwLock};

/// Compute the scroll offset that brings an item fully into view with the
/// least movement.
///
/// Items above the window align to its top edge, items below align to its
/// bottom edge, and items already inside leave the offset untouched.
pub fn scroll_position_for(
    item_offset: u16,
    item_height: u16,
    current_scroll: u16,
    viewport_height: u16,
) -> u16 {
    if item_offset < current_scroll {
        return item_offset;
    }

    let item_bottom = item_offset.saturating_add(item_height);
    if item_bottom > current_scroll.saturating_add(viewport_height) {
        return item_bottom.saturating_sub(viewport_height);
    }

    current_scroll
}

#[derive(Debug, Default)]
struct ViewportState {
    scroll_top: u16,
    height: u16,
    content_height: u16,
}

impl ViewportState {
    fn max_scroll_top(&self) -> u16 {
        self.content_height.saturating_sub(self.height)
    }
}

/// A vertically scrolling window over taller content.
///
/// This is a shared handle: clones observe and mutate the same window, so a
/// panel and the rows inside it can hold one each.
#[derive(Debug, Clone, Default)]
pub struct ScrollViewport {
    state: Arc<RwLock<ViewportState>>,
}

impl ScrollViewport {
    pub fn new(height: u16) -> Self {
        Self {
            state: Arc::new(RwLock::new(ViewportState {
                height,
                ..Default::default()
            })),
        }
    }

    pub fn scroll_top(&self) -> u16 {
        self.state.read().map(|s| s.scroll_top).unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.state.read().map(|s| s.height).unwrap_or(0)
    }

    pub fn content_height(&self) -> u16 {
        self.state.read().map(|s| s.content_height).unwrap_or(0)
    }

    /// Set the visible height (called when the panel is laid out).
    pub fn set_height(&self, height: u16) {
        if let Ok(mut state) = self.state.write() {
            state.height = height;
            state.scroll_top = state.scroll_top.min(state.max_scroll_top());
        }
    }

    /// Set the total content height (called when rows change).
    pub fn set_content_height(&self, content_height: u16) {
        if let Ok(mut state) = self.state.write() {
            state.content_height = content_height;
            state.scroll_top = state.scroll_top.min(state.max_scroll_top());
        }
    }

    /// Set the scroll offset, clamped to the scrollable range.
    /// Returns true if the offset changed.
    pub fn set_scroll_top(&self, top: u16) -> bool {
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        let clamped = top.min(state.max_scroll_top());
        if clamped == state.scroll_top {
            return false;
        }
        log::trace!("ScrollViewport scroll_top {} -> {}", state.scroll_top, clamped);
        state.scroll_top = clamped;
        true
    }

    /// Scroll so the last row of content is visible.
    pub fn scroll_to_bottom(&self) -> bool {
        let max = self.state.read().map(|s| s.max_scroll_top()).unwrap_or(0);
        self.set_scroll_top(max)
    }

    pub fn scroll_to_top(&self) -> bool {
        self.set_scroll_top(0)
    }

    /// Scroll by the minimal amount that shows `[offset, offset + height)`.
    pub fn scroll_into_view(&self, offset: u16, height: u16) -> bool {
        let (current, viewport) = match self.state.read() {
            Ok(state) => (state.scroll_top, state.height),
            Err(_) => return false,
        };
        self.set_scroll_top(scroll_position_for(offset, height, current, viewport))
    }

    /// Check whether `[offset, offset + height)` is fully visible.
    pub fn is_visible(&self, offset: u16, height: u16) -> bool {
        let top = self.scroll_top();
        offset >= top && offset.saturating_add(height) <= top.saturating_add(self.height())
    }
}
