//! Labeled wrapper around a single form control.
//!
//! A [`FormField`] draws the label, outline and error line around one
//! control. It does not own the control's state: it subscribes to the
//! control's [`state_changes`](FieldControl::state_changes) and mirrors the
//! focused, filled, error and disabled flags.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use weft::Rect;

use crate::events::{EventResult, WidgetEvents};
use crate::form_control::FieldControl;
use crate::stream::{StateChanges, Subscription};

/// Errors from wiring a control into a field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormFieldError {
    #[error("form field {field} already hosts control {existing}")]
    ControlAlreadyAttached { field: String, existing: String },
}

/// Unique identifier for a form field instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormFieldId(usize);

impl FormFieldId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FormFieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__form_field_{}", self.0)
    }
}

/// Shared handle to the field container's screen rect.
///
/// The renderer writes it after layout; a hosted select reads it to anchor
/// and size its panel.
#[derive(Debug, Clone, Default)]
pub struct ContainerRef(Arc<RwLock<Rect>>);

impl ContainerRef {
    pub fn rect(&self) -> Rect {
        self.0.read().map(|rect| *rect).unwrap_or_default()
    }

    pub fn set_rect(&self, rect: Rect) {
        if let Ok(mut guard) = self.0.write() {
            *guard = rect;
        }
    }
}

/// Visual state token for styling a field, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    Disabled,
    Error,
    Focused,
    Filled,
    #[default]
    Default,
}

/// Everything needed to draw a form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFieldView {
    pub id: String,
    pub label: String,
    pub focused: bool,
    pub filled: bool,
    pub has_error: bool,
    pub disabled: bool,
    pub state: FieldState,
    /// Whether the label floats above the control (focused or filled).
    pub label_floating: bool,
    pub control_id: Option<String>,
}

#[derive(Default)]
struct FieldInner {
    label: String,
    is_focused: bool,
    is_filled: bool,
    has_error: bool,
    is_disabled: bool,
    control: Option<Arc<dyn FieldControl>>,
    subscription: Option<Subscription>,
}

struct FormFieldShared {
    id: FormFieldId,
    inner: RwLock<FieldInner>,
    container: ContainerRef,
    state_changes: StateChanges,
    dirty: AtomicBool,
}

/// A labeled wrapper hosting at most one control.
///
/// # Example
///
/// ```ignore
/// let name = Input::new();
/// let field = FormField::new("Name").with_control(name.clone())?;
/// name.dispatch_focus();
/// assert!(field.is_focused());
/// ```
#[derive(Clone)]
pub struct FormField {
    shared: Arc<FormFieldShared>,
}

impl FormField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(FormFieldShared {
                id: FormFieldId::new(),
                inner: RwLock::new(FieldInner {
                    label: label.into(),
                    ..Default::default()
                }),
                container: ContainerRef::default(),
                state_changes: StateChanges::new(),
                dirty: AtomicBool::new(false),
            }),
        }
    }

    /// Builder form of [`attach_control`](Self::attach_control).
    pub fn with_control<C: FieldControl + 'static>(self, control: C) -> Result<Self, FormFieldError> {
        self.attach_control(control)?;
        Ok(self)
    }

    pub fn id(&self) -> FormFieldId {
        self.shared.id
    }

    pub fn id_string(&self) -> String {
        self.shared.id.to_string()
    }

    fn read<R: Default>(&self, f: impl FnOnce(&FieldInner) -> R) -> R {
        self.shared.inner.read().map(|guard| f(&guard)).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Control
    // -------------------------------------------------------------------------

    /// Host `control` and start mirroring its state.
    pub fn attach_control<C: FieldControl + 'static>(&self, control: C) -> Result<(), FormFieldError> {
        let control: Arc<dyn FieldControl> = Arc::new(control);
        let weak = Arc::downgrade(&self.shared);
        {
            let Ok(mut guard) = self.shared.inner.write() else {
                return Ok(());
            };
            if let Some(existing) = &guard.control {
                return Err(FormFieldError::ControlAlreadyAttached {
                    field: self.shared.id.to_string(),
                    existing: existing.control_id(),
                });
            }
            guard.subscription = Some(control.state_changes().subscribe(move |_| {
                if let Some(shared) = weak.upgrade() {
                    FormField { shared }.sync_from_control();
                }
            }));
            guard.control = Some(control.clone());
        }

        log::debug!("{} hosts {}", self.shared.id, control.control_id());
        self.sync_from_control();
        Ok(())
    }

    /// Stop hosting the current control, returning it.
    pub fn detach_control(&self) -> Option<Arc<dyn FieldControl>> {
        let (control, subscription) = self
            .shared
            .inner
            .write()
            .map(|mut guard| (guard.control.take(), guard.subscription.take()))
            .unwrap_or_default();
        drop(subscription);
        if control.is_some() {
            self.sync_from_control();
        }
        control
    }

    pub fn control(&self) -> Option<Arc<dyn FieldControl>> {
        self.read(|inner| inner.control.clone())
    }

    pub fn has_control(&self) -> bool {
        self.read(|inner| inner.control.is_some())
    }

    /// Re-read the control's state and notify subscribers.
    fn sync_from_control(&self) {
        let control = self.control();
        let (focused, filled, error, disabled) = control
            .as_ref()
            .map(|c| (c.is_focused(), c.is_filled(), c.has_error(), c.is_disabled()))
            .unwrap_or_default();

        if let Ok(mut guard) = self.shared.inner.write() {
            guard.is_focused = focused;
            guard.is_filled = filled;
            guard.has_error = error;
            guard.is_disabled = disabled;
        }
        self.shared.dirty.store(true, Ordering::SeqCst);
        self.shared.state_changes.emit(&());
    }

    // -------------------------------------------------------------------------
    // Mirrored state
    // -------------------------------------------------------------------------

    pub fn is_focused(&self) -> bool {
        self.read(|inner| inner.is_focused)
    }

    pub fn is_filled(&self) -> bool {
        self.read(|inner| inner.is_filled)
    }

    pub fn has_error(&self) -> bool {
        self.read(|inner| inner.has_error)
    }

    pub fn is_disabled(&self) -> bool {
        self.read(|inner| inner.is_disabled)
    }

    /// Emits after every mirror update.
    pub fn state_changes(&self) -> &StateChanges {
        &self.shared.state_changes
    }

    pub fn label(&self) -> String {
        self.read(|inner| inner.label.clone())
    }

    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.label = label.into();
            self.shared.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Container
    // -------------------------------------------------------------------------

    /// Shared handle to the container rect.
    pub fn container(&self) -> ContainerRef {
        self.shared.container.clone()
    }

    /// Record where the container was drawn.
    pub fn set_container_rect(&self, rect: Rect) {
        self.shared.container.set_rect(rect);
    }

    /// A click at (x, y). Forwarded to the control only inside the container.
    pub fn dispatch_click(&self, x: u16, y: u16) -> EventResult {
        if !self.shared.container.rect().contains(x, y) {
            return EventResult::Ignored;
        }
        match self.control() {
            Some(control) => {
                control.on_container_click();
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn view(&self) -> FormFieldView {
        let control_id = self.control().map(|control| control.control_id());
        let mut view = self.read(|inner| FormFieldView {
            label: inner.label.clone(),
            focused: inner.is_focused,
            filled: inner.is_filled,
            has_error: inner.has_error,
            disabled: inner.is_disabled,
            state: if inner.is_disabled {
                FieldState::Disabled
            } else if inner.has_error {
                FieldState::Error
            } else if inner.is_focused {
                FieldState::Focused
            } else if inner.is_filled {
                FieldState::Filled
            } else {
                FieldState::Default
            },
            label_floating: inner.is_focused || inner.is_filled,
            ..Default::default()
        });
        view.id = self.id_string();
        view.control_id = control_id;
        view
    }

    /// Check if the field needs re-rendering.
    pub fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.shared.dirty.store(false, Ordering::SeqCst);
    }
}

impl WidgetEvents for FormField {
    fn on_click(&self, x: u16, y: u16) -> EventResult {
        self.dispatch_click(x, y)
    }
}

impl std::fmt::Debug for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormField")
            .field("id", &self.shared.id)
            .field("label", &self.label())
            .field("focused", &self.is_focused())
            .field("filled", &self.is_filled())
            .finish()
    }
}
