//! Select widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use weft::{Rect, ScrollViewport};

use crate::form_control::{ChangeCallback, FieldValue, TouchedCallback};
use crate::form_field::{ContainerRef, FormField, FormFieldError};
use crate::key_manager::ActiveItemTracker;
use crate::option::{OptionId, SelectOption};
use crate::overlay::OverlayRequest;
use crate::stream::{StateChanges, Subscription};
use crate::validation::ErrorDisplay;

use super::config::SelectConfig;

/// Values a [`Select`] can hold.
///
/// [`FieldValue`] decides whether a selected value counts as filled; an empty
/// string option leaves the hosting field unfilled.
pub trait SelectValue: Clone + PartialEq + FieldValue + Send + Sync + 'static {}

impl<T: Clone + PartialEq + FieldValue + Send + Sync + 'static> SelectValue for T {}

/// Unique identifier for a Select widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectId(usize);

impl SelectId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__select_{}", self.0)
    }
}

/// Internal state for a Select widget.
pub(super) struct SelectInner<T> {
    /// Current model value
    pub(super) value: Option<T>,
    pub(super) is_open: bool,
    pub(super) is_focused: bool,
    pub(super) is_disabled: bool,
    /// Registered options, in display order
    pub(super) options: Vec<SelectOption<T>>,
    /// Label of the option matching `value`
    pub(super) selected_label: String,
    /// Validation error message (if any)
    pub(super) error: Option<String>,
    /// How to display validation errors
    pub(super) error_display: ErrorDisplay,
    /// Trigger rect, used as anchor when not hosted in a form field
    pub(super) anchor_rect: Option<Rect>,
    /// Container of the hosting form field
    pub(super) container: Option<ContainerRef>,
    /// Panel width, recomputed on open and on rebinding
    pub(super) overlay_width: u16,
    pub(super) on_change: Option<ChangeCallback<T>>,
    pub(super) on_touched: Option<TouchedCallback>,
    /// Per-option selection subscriptions plus the tracker subscription
    pub(super) subscriptions: Vec<Subscription>,
    pub(super) config: SelectConfig,
}

impl<T> SelectInner<T> {
    /// Field container if laid out, else the trigger's own rect.
    fn anchor(&self) -> Option<Rect> {
        self.container
            .as_ref()
            .map(ContainerRef::rect)
            .filter(|rect| !rect.is_empty())
            .or(self.anchor_rect)
    }
}

pub(super) struct SelectShared<T> {
    pub(super) id: SelectId,
    pub(super) inner: RwLock<SelectInner<T>>,
    pub(super) tracker: ActiveItemTracker<SelectOption<T>>,
    pub(super) panel: ScrollViewport,
    pub(super) state_changes: StateChanges,
    pub(super) dirty: AtomicBool,
}

/// A form-bindable dropdown.
///
/// `Select` owns an ordered registry of [`SelectOption`]s, the current value,
/// the open/closed state of its panel and an [`ActiveItemTracker`] for
/// keyboard navigation. It is a cheap handle: clones share all state.
///
/// # Example
///
/// ```ignore
/// let fruit = Select::with_placeholder("Pick a fruit");
/// fruit.set_options(vec![
///     SelectOption::new("apple", "Apple"),
///     SelectOption::new("banana", "Banana"),
/// ]);
///
/// let field = FormField::new("Fruit");
/// fruit.host_in(&field)?;
///
/// fruit.on_key(&KeyCombo::key(Key::Enter)); // opens
/// fruit.on_key(&KeyCombo::key(Key::Down));  // activates "Apple"
/// fruit.on_key(&KeyCombo::key(Key::Enter)); // selects and closes
/// assert_eq!(fruit.value(), Some("apple"));
/// ```
pub struct Select<T> {
    pub(super) shared: Arc<SelectShared<T>>,
}

impl<T> Clone for Select<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: SelectValue> Default for Select<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SelectValue> Select<T> {
    /// Create a select with default configuration.
    pub fn new() -> Self {
        Self::with_config(SelectConfig::default())
    }

    /// Create a select with a placeholder.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self::with_config(SelectConfig::default().placeholder(placeholder))
    }

    pub fn with_config(config: SelectConfig) -> Self {
        let mut tracker = ActiveItemTracker::default()
            .with_vertical_orientation()
            .with_home_and_end();
        if config.wrap {
            tracker = tracker.with_wrap();
        }
        if let Some(debounce) = config.typeahead_debounce {
            tracker = tracker.with_typeahead(debounce);
        }

        let id = SelectId::new();
        log::debug!("{} created", id);
        Self {
            shared: Arc::new(SelectShared {
                id,
                panel: ScrollViewport::new(config.panel_rows),
                inner: RwLock::new(SelectInner {
                    value: None,
                    is_open: false,
                    is_focused: false,
                    is_disabled: false,
                    options: Vec::new(),
                    selected_label: String::new(),
                    error: None,
                    error_display: ErrorDisplay::default(),
                    anchor_rect: None,
                    container: None,
                    overlay_width: 0,
                    on_change: None,
                    on_touched: None,
                    subscriptions: Vec::new(),
                    config,
                }),
                tracker,
                state_changes: StateChanges::new(),
                dirty: AtomicBool::new(false),
            }),
        }
    }

    /// Get the unique ID for this select.
    pub fn id(&self) -> SelectId {
        self.shared.id
    }

    /// Get the ID as a string (for node binding).
    pub fn id_string(&self) -> String {
        self.shared.id.to_string()
    }

    pub(super) fn read<R: Default>(&self, f: impl FnOnce(&SelectInner<T>) -> R) -> R {
        self.shared.inner.read().map(|guard| f(&guard)).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // State getters
    // -------------------------------------------------------------------------

    /// Current value, if any.
    pub fn value(&self) -> Option<T> {
        self.read(|inner| inner.value.clone())
    }

    pub fn is_open(&self) -> bool {
        self.read(|inner| inner.is_open)
    }

    pub fn is_focused(&self) -> bool {
        self.read(|inner| inner.is_focused)
    }

    pub fn is_disabled(&self) -> bool {
        self.read(|inner| inner.is_disabled)
    }

    /// Label of the option matching the current value, or empty.
    pub fn selected_label(&self) -> String {
        self.read(|inner| inner.selected_label.clone())
    }

    pub fn placeholder(&self) -> Option<String> {
        self.read(|inner| inner.config.placeholder.clone())
    }

    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.config.placeholder = Some(placeholder.into());
            self.mark_dirty();
        }
    }

    pub fn config(&self) -> SelectConfig {
        self.read(|inner| Some(inner.config.clone()))
            .unwrap_or_default()
    }

    /// Emits once per observable state transition.
    pub fn state_changes(&self) -> &StateChanges {
        &self.shared.state_changes
    }

    /// The panel's scroll window.
    pub fn panel(&self) -> &ScrollViewport {
        &self.shared.panel
    }

    /// The keyboard tracker driving the active option.
    pub fn key_manager(&self) -> &ActiveItemTracker<SelectOption<T>> {
        &self.shared.tracker
    }

    pub fn active_option(&self) -> Option<SelectOption<T>> {
        self.shared.tracker.active_item()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.shared.tracker.active_item_index()
    }

    pub(super) fn notify(&self) {
        self.mark_dirty();
        self.shared.state_changes.emit(&());
    }

    // -------------------------------------------------------------------------
    // Option registry
    // -------------------------------------------------------------------------

    /// Registered options, in display order.
    pub fn options(&self) -> Vec<SelectOption<T>> {
        self.read(|inner| inner.options.clone())
    }

    /// Replace every option.
    pub fn set_options(&self, options: Vec<SelectOption<T>>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.options = options;
        }
        self.options_changed();
    }

    pub fn push_option(&self, option: SelectOption<T>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.options.push(option);
        }
        self.options_changed();
    }

    /// Remove an option by ID, returning it if it was registered.
    pub fn remove_option(&self, id: OptionId) -> Option<SelectOption<T>> {
        let removed = self.shared.inner.write().ok().and_then(|mut guard| {
            let index = guard.options.iter().position(|option| option.id() == id)?;
            Some(guard.options.remove(index))
        });
        if removed.is_some() {
            self.options_changed();
        }
        removed
    }

    pub fn clear_options(&self) {
        self.set_options(Vec::new());
    }

    /// Rebind to the current option registry.
    ///
    /// Called after every registry mutation. Replaces all option and tracker
    /// subscriptions, rebinds the tracker, re-syncs selection and the active
    /// option to the value, and recomputes the panel width.
    pub fn options_changed(&self) {
        let options = self.options();
        let weak = Arc::downgrade(&self.shared);

        let mut subscriptions = Vec::with_capacity(options.len() + 1);
        for (row, option) in options.iter().enumerate() {
            option.attach(self.shared.panel.clone(), u16::try_from(row).unwrap_or(u16::MAX));
            let weak = weak.clone();
            subscriptions.push(option.selection_changes().subscribe(move |change| {
                if !change.is_user_input {
                    return;
                }
                if let Some(shared) = weak.upgrade() {
                    Select { shared }.handle_option_selected(&change.source);
                }
            }));
        }

        self.shared.tracker.set_items(options.clone());
        subscriptions.push(self.shared.tracker.change().subscribe(move |&index| {
            if let Some(shared) = weak.upgrade() {
                Select { shared }.scroll_to_option(index);
            }
        }));

        let previous = self
            .shared
            .inner
            .write()
            .map(|mut guard| std::mem::replace(&mut guard.subscriptions, subscriptions))
            .unwrap_or_default();
        drop(previous);

        log::debug!("{} rebound to {} options", self.shared.id, options.len());

        self.update_panel_content();
        self.sync_to_value(true);
        self.update_overlay_width();
        self.mark_dirty();
    }

    /// Handle a user-driven selection from one of the registered options.
    pub(super) fn handle_option_selected(&self, source: &SelectOption<T>) {
        let (options, on_change) = self.read(|inner| (inner.options.clone(), inner.on_change.clone()));
        let Some(index) = options.iter().position(|option| option.id() == source.id()) else {
            log::warn!("{}: selection from unregistered {}", self.shared.id, source.id());
            return;
        };

        for option in options.iter().filter(|option| option.id() != source.id()) {
            option.deselect();
        }

        let value = source.value().clone();
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.value = Some(value.clone());
            guard.selected_label = source.label();
        }
        if let Some(on_change) = on_change {
            on_change(&value);
        }

        self.shared.tracker.set_active_item(index);
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.is_open = false;
        }
        self.shared.tracker.cancel_typeahead();

        log::debug!("{} selected {}", self.shared.id, source.id());
        self.notify();
    }

    /// Keep the newly active option visible inside the panel.
    fn scroll_to_option(&self, index: usize) {
        self.update_panel_content();
        if index == 0 {
            self.shared.panel.scroll_to_top();
            return;
        }
        let option = self.read(|inner| inner.options.get(index).cloned());
        if let Some(option) = option {
            option.scroll_into_view();
        }
    }

    /// Recompute the panel's content height from the option bounds.
    ///
    /// Runs on rebinding, on open and before every scroll, so layouts
    /// reported while the panel is shown are picked up.
    pub fn update_panel_content(&self) {
        let content_height = self
            .options()
            .iter()
            .map(|option| {
                let (offset, height) = option.bounds();
                offset.saturating_add(height)
            })
            .max()
            .unwrap_or(0);
        self.shared.panel.set_content_height(content_height);
    }

    /// Mark the option matching the value and make it active.
    ///
    /// With `mark_selection`, every other option is deselected and the
    /// trigger label is refreshed.
    fn sync_to_value(&self, mark_selection: bool) {
        let (value, options) = self.read(|inner| (inner.value.clone(), inner.options.clone()));
        let matched = value
            .as_ref()
            .and_then(|value| options.iter().position(|option| option.value() == value));

        if mark_selection {
            for (index, option) in options.iter().enumerate() {
                if Some(index) == matched {
                    option.select();
                } else {
                    option.deselect();
                }
            }
            let label = matched.map(|index| options[index].label()).unwrap_or_default();
            if let Ok(mut guard) = self.shared.inner.write() {
                guard.selected_label = label;
            }
        }

        if let Some(index) = matched {
            self.shared.tracker.set_active_item(index);
        }
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    /// Write a value from the form model.
    ///
    /// Selects the matching option (if any) and deselects the rest without
    /// invoking the change callback.
    pub fn write_value(&self, value: Option<T>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.value = value;
        }
        self.sync_to_value(true);
        self.notify();
    }

    pub fn register_on_change(&self, callback: ChangeCallback<T>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.on_change = Some(callback);
        }
    }

    pub fn register_on_touched(&self, callback: TouchedCallback) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.on_touched = Some(callback);
        }
    }

    pub(super) fn fire_touched(&self) {
        if let Some(on_touched) = self.read(|inner| inner.on_touched.clone()) {
            on_touched();
        }
    }

    /// Enable or disable. Disabling closes an open panel.
    pub fn set_disabled_state(&self, disabled: bool) {
        {
            let Ok(mut guard) = self.shared.inner.write() else {
                return;
            };
            if guard.is_disabled == disabled {
                return;
            }
            guard.is_disabled = disabled;
            if disabled {
                guard.is_open = false;
            }
        }
        log::debug!("{} disabled = {}", self.shared.id, disabled);
        self.notify();
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    /// Open the panel. No-op when disabled or already open.
    pub fn open(&self) {
        {
            let Ok(mut guard) = self.shared.inner.write() else {
                return;
            };
            if guard.is_disabled || guard.is_open {
                return;
            }
            guard.is_open = true;
            guard.is_focused = true;
        }

        self.update_overlay_width();
        self.update_panel_content();
        self.sync_to_value(false);
        if let Some(index) = self.active_index() {
            self.scroll_to_option(index);
        }

        log::debug!("{} opened", self.shared.id);
        self.notify();
    }

    /// Close the panel, keeping focus on the trigger.
    pub fn close(&self) {
        if self.set_closed() {
            log::debug!("{} closed", self.shared.id);
            self.notify();
        }
    }

    /// The overlay host detached the panel.
    pub fn on_panel_detached(&self) {
        self.close();
    }

    /// Returns true if the panel was open.
    pub(super) fn set_closed(&self) -> bool {
        let was_open = self
            .shared
            .inner
            .write()
            .map(|mut guard| std::mem::replace(&mut guard.is_open, false))
            .unwrap_or(false);
        if was_open {
            self.shared.tracker.cancel_typeahead();
        }
        was_open
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    // -------------------------------------------------------------------------
    // Overlay
    // -------------------------------------------------------------------------

    /// Record where the trigger was drawn.
    pub fn set_anchor_rect(&self, rect: Rect) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.anchor_rect = Some(rect);
        }
    }

    pub fn anchor_rect(&self) -> Option<Rect> {
        self.read(|inner| inner.anchor_rect)
    }

    /// Size and anchor the panel to a form field container.
    pub fn set_container(&self, container: ContainerRef) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.container = Some(container);
        }
    }

    /// Attach to `field` as its control and anchor the panel to its container.
    pub fn host_in(&self, field: &FormField) -> Result<(), FormFieldError> {
        field.attach_control(self.clone())?;
        self.set_container(field.container());
        Ok(())
    }

    /// Panel width as of the last open or rebinding.
    pub fn overlay_width(&self) -> u16 {
        self.read(|inner| inner.overlay_width)
    }

    /// Recompute the panel width from the field container, else the trigger.
    pub fn update_overlay_width(&self) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.overlay_width = guard.anchor().map_or(0, |rect| rect.width);
        }
    }

    /// What the overlay host should show, while open.
    pub fn overlay_request(&self) -> Option<OverlayRequest> {
        let panel_height = self
            .shared
            .panel
            .content_height()
            .min(self.shared.panel.height());
        self.read(|inner| {
            inner.is_open.then(|| OverlayRequest {
                owner_id: self.shared.id.to_string(),
                anchor: inner.anchor().unwrap_or_default(),
                width: inner.overlay_width,
                height: panel_height,
                positions: inner.config.positions.clone(),
            })
        })
    }

    // -------------------------------------------------------------------------
    // Validation errors
    // -------------------------------------------------------------------------

    pub fn error(&self) -> Option<String> {
        self.read(|inner| inner.error.clone())
    }

    pub fn has_error(&self) -> bool {
        self.read(|inner| inner.error.is_some())
    }

    pub fn set_error(&self, msg: impl Into<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.error = Some(msg.into());
        }
        self.notify();
    }

    pub fn clear_error(&self) {
        let had_error = self
            .shared
            .inner
            .write()
            .map(|mut guard| guard.error.take().is_some())
            .unwrap_or(false);
        if had_error {
            self.notify();
        }
    }

    pub fn error_display(&self) -> ErrorDisplay {
        self.read(|inner| inner.error_display)
    }

    pub fn set_error_display(&self, display: ErrorDisplay) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.error_display = display;
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the select needs re-rendering.
    pub fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.shared.dirty.store(false, Ordering::SeqCst);
    }

    pub(super) fn mark_dirty(&self) {
        self.shared.dirty.store(true, Ordering::SeqCst);
    }
}

impl<T: SelectValue + std::fmt::Debug> std::fmt::Debug for Select<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("id", &self.shared.id)
            .field("value", &self.value())
            .field("is_open", &self.is_open())
            .field("is_focused", &self.is_focused())
            .finish()
    }
}
