//! Selectable option rows for a [`Select`](crate::select::Select).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use weft::ScrollViewport;

use crate::events::{EventResult, WidgetEvents};
use crate::key_manager::KeyManagerItem;
use crate::stream::EventStream;

/// Unique identifier for an option instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId(usize);

impl OptionId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__option_{}", self.0)
    }
}

/// Emitted whenever an option's selected state is set.
pub struct OptionSelectionChange<T> {
    /// The option that changed.
    pub source: SelectOption<T>,
    /// True when the change came from a click or an activation key.
    pub is_user_input: bool,
}

impl<T> std::fmt::Debug for OptionSelectionChange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionSelectionChange")
            .field("source", &self.source.id)
            .field("is_user_input", &self.is_user_input)
            .finish()
    }
}

#[derive(Debug, Default)]
struct OptionInner {
    label: String,
    selected: bool,
    active: bool,
    disabled: bool,
    /// Bounds set by the renderer, in panel rows.
    layout: Option<(u16, u16)>,
    /// Position in the owning registry, used when no layout was reported.
    row: u16,
    /// Panel this option scrolls within.
    viewport: Option<ScrollViewport>,
}

/// One selectable value inside a select panel.
///
/// This is a cheap handle; clones share state. The value is fixed at
/// construction while the label may change.
pub struct SelectOption<T> {
    id: OptionId,
    value: Arc<T>,
    inner: Arc<RwLock<OptionInner>>,
    selection_changes: EventStream<OptionSelectionChange<T>>,
    dirty: Arc<AtomicBool>,
}

impl<T> Clone for SelectOption<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            inner: Arc::clone(&self.inner),
            selection_changes: self.selection_changes.clone(),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SelectOption<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectOption")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("label", &self.label())
            .field("selected", &self.is_selected())
            .field("active", &self.is_active())
            .finish()
    }
}

impl<T> SelectOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(),
            value: Arc::new(value),
            inner: Arc::new(RwLock::new(OptionInner {
                label: label.into(),
                ..Default::default()
            })),
            selection_changes: EventStream::new(),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create an option that starts disabled.
    pub fn disabled(value: T, label: impl Into<String>) -> Self {
        let option = Self::new(value, label);
        option.set_disabled(true);
        option
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    /// Get the ID as a string (for aria-style active descendant references).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.label.clone())
            .unwrap_or_default()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = label.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Stream of selection changes, user-driven and programmatic.
    pub fn selection_changes(&self) -> &EventStream<OptionSelectionChange<T>> {
        &self.selection_changes
    }

    // -------------------------------------------------------------------------
    // Selection state
    // -------------------------------------------------------------------------

    pub fn is_selected(&self) -> bool {
        self.inner.read().map(|guard| guard.selected).unwrap_or(false)
    }

    /// Select in response to a click or activation key.
    ///
    /// Always emits, tagged as user input, even if already selected.
    pub fn select_via_interaction(&self) {
        if self.is_disabled() {
            return;
        }
        self.set_selected(true);
        log::debug!("{} selected via interaction", self.id);
        self.emit_change(true);
    }

    /// Select programmatically. Emits only when the state changes.
    pub fn select(&self) {
        if self.set_selected(true) {
            self.emit_change(false);
        }
    }

    /// Deselect programmatically. Emits only when the state changes.
    pub fn deselect(&self) {
        if self.set_selected(false) {
            self.emit_change(false);
        }
    }

    fn set_selected(&self, selected: bool) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if guard.selected == selected {
            return false;
        }
        guard.selected = selected;
        self.dirty.store(true, Ordering::SeqCst);
        true
    }

    fn emit_change(&self, is_user_input: bool) {
        self.selection_changes.emit(&OptionSelectionChange {
            source: self.clone(),
            is_user_input,
        });
    }

    // -------------------------------------------------------------------------
    // Active and disabled state
    // -------------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.inner.read().map(|guard| guard.active).unwrap_or(false)
    }

    /// Highlight as the keyboard-active row.
    pub fn set_active_styles(&self) {
        self.set_active(true);
    }

    pub fn set_inactive_styles(&self) {
        self.set_active(false);
    }

    fn set_active(&self, active: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.active != active
        {
            guard.active = active;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.read().map(|guard| guard.disabled).unwrap_or(false)
    }

    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.disabled != disabled
        {
            guard.disabled = disabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Layout and scrolling
    // -------------------------------------------------------------------------

    /// Report where the renderer placed this option inside the panel.
    ///
    /// Grows the attached panel's content height when the option ends below it.
    pub fn set_layout(&self, offset_top: u16, height: u16) {
        let viewport = self.inner.write().ok().and_then(|mut guard| {
            guard.layout = Some((offset_top, height));
            guard.viewport.clone()
        });
        if let Some(viewport) = viewport {
            let bottom = offset_top.saturating_add(height);
            if bottom > viewport.content_height() {
                viewport.set_content_height(bottom);
            }
        }
    }

    /// Top offset and height within the panel content.
    ///
    /// Without a reported layout, each option is one row tall at its
    /// registry position.
    pub fn bounds(&self) -> (u16, u16) {
        self.inner
            .read()
            .map(|guard| guard.layout.unwrap_or((guard.row, 1)))
            .unwrap_or((0, 1))
    }

    /// Attach to a panel viewport at the given registry position.
    pub(crate) fn attach(&self, viewport: ScrollViewport, row: u16) {
        if let Ok(mut guard) = self.inner.write() {
            guard.viewport = Some(viewport);
            guard.row = row;
        }
    }

    /// Scroll the attached panel by the minimum needed to show this option.
    /// Does nothing when not attached.
    pub fn scroll_into_view(&self) {
        let viewport = self.inner.read().ok().and_then(|guard| guard.viewport.clone());
        if let Some(viewport) = viewport {
            let (offset, height) = self.bounds();
            viewport.scroll_into_view(offset, height);
        }
    }

    // -------------------------------------------------------------------------
    // Pointer input
    // -------------------------------------------------------------------------

    /// Handle a click on this option row.
    pub fn dispatch_click(&self) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        self.select_via_interaction();
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the option needs re-rendering.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T> WidgetEvents for SelectOption<T> {
    fn on_click(&self, _x: u16, _y: u16) -> EventResult {
        self.dispatch_click()
    }
}

impl<T: Send + Sync> KeyManagerItem for SelectOption<T> {
    fn label(&self) -> String {
        SelectOption::label(self)
    }

    fn is_disabled(&self) -> bool {
        SelectOption::is_disabled(self)
    }

    fn set_active_styles(&self) {
        SelectOption::set_active_styles(self);
    }

    fn set_inactive_styles(&self) {
        SelectOption::set_inactive_styles(self);
    }

    fn is_same_item(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
