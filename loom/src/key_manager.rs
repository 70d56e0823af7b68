//! Keyboard-driven active item tracking for lists.
//!
//! [`ActiveItemTracker`] keeps one item of an ordered list "active" (the
//! keyboard highlight), moves it with arrow keys, Home/End and typeahead, and
//! skips disabled items. It does not select anything; callers react to
//! [`ActiveItemTracker::change`] or read [`ActiveItemTracker::active_item`].

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use weft::text::starts_with_ignore_case;
use weft::{Key, KeyCombo};

use crate::stream::EventStream;

/// An item the tracker can highlight.
pub trait KeyManagerItem: Clone + Send + Sync {
    /// Text matched by typeahead.
    fn label(&self) -> String;

    fn is_disabled(&self) -> bool {
        false
    }

    fn set_active_styles(&self) {}

    fn set_inactive_styles(&self) {}

    /// Identity used to keep the active item across list changes.
    fn is_same_item(&self, other: &Self) -> bool;
}

#[derive(Debug, Default)]
struct Typeahead {
    debounce: Duration,
    buffer: String,
    last_key: Option<Instant>,
}

impl Typeahead {
    fn is_typing_at(&self, now: Instant) -> bool {
        !self.buffer.is_empty()
            && self
                .last_key
                .is_some_and(|last| now.saturating_duration_since(last) < self.debounce)
    }
}

struct TrackerInner<I> {
    items: Vec<I>,
    active_index: Option<usize>,
    wrap: bool,
    vertical: bool,
    home_and_end: bool,
    typeahead: Option<Typeahead>,
}

impl<I: KeyManagerItem> TrackerInner<I> {
    fn is_enabled(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| !item.is_disabled())
    }

    fn first_enabled(&self) -> Option<usize> {
        (0..self.items.len()).find(|&i| self.is_enabled(i))
    }

    fn last_enabled(&self) -> Option<usize> {
        (0..self.items.len()).rev().find(|&i| self.is_enabled(i))
    }

    /// Next enabled index `delta` steps away from the active one.
    fn step(&self, delta: isize) -> Option<usize> {
        let len = self.items.len() as isize;
        let Some(active) = self.active_index else {
            return if delta > 0 {
                self.first_enabled()
            } else {
                self.last_enabled()
            };
        };

        if self.wrap {
            (1..=len)
                .map(|i| (active as isize + delta * i).rem_euclid(len) as usize)
                .find(|&i| self.is_enabled(i))
        } else {
            let mut index = active as isize + delta;
            while (0..len).contains(&index) {
                if self.is_enabled(index as usize) {
                    return Some(index as usize);
                }
                index += delta;
            }
            None
        }
    }

    /// First enabled item after the active one whose label starts with
    /// `query`, searching around the whole list.
    fn find_by_label(&self, query: &str) -> Option<usize> {
        let len = self.items.len();
        let start = self.active_index.map_or(0, |i| i + 1);
        (0..len)
            .map(|i| (start + i) % len)
            .find(|&i| self.is_enabled(i) && starts_with_ignore_case(&self.items[i].label(), query))
    }
}

/// Tracks the active item of a list and moves it in response to keys.
///
/// This is a shared handle; clones drive the same tracker.
pub struct ActiveItemTracker<I> {
    inner: Arc<RwLock<TrackerInner<I>>>,
    change: EventStream<usize>,
}

impl<I> Clone for ActiveItemTracker<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            change: self.change.clone(),
        }
    }
}

impl<I: KeyManagerItem> Default for ActiveItemTracker<I> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<I: KeyManagerItem> ActiveItemTracker<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TrackerInner {
                items,
                active_index: None,
                wrap: false,
                vertical: false,
                home_and_end: false,
                typeahead: None,
            })),
            change: EventStream::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Wrap from the last item to the first and back.
    pub fn with_wrap(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.wrap = true;
        }
        self
    }

    /// Respond to Up/Down.
    pub fn with_vertical_orientation(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.vertical = true;
        }
        self
    }

    /// Respond to Home/End.
    pub fn with_home_and_end(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.home_and_end = true;
        }
        self
    }

    /// Jump to items by typing the start of their label. Keys pressed within
    /// `debounce` of each other accumulate into one query.
    pub fn with_typeahead(self, debounce: Duration) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.typeahead = Some(Typeahead {
                debounce,
                ..Default::default()
            });
        }
        self
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Replace the item list.
    ///
    /// The active item stays active if it is still in the list (its index is
    /// updated silently); otherwise nothing is active afterwards.
    pub fn set_items(&self, items: Vec<I>) {
        let dropped = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let previous = guard.active_index.and_then(|i| guard.items.get(i).cloned());
            guard.items = items;
            if let Some(typeahead) = guard.typeahead.as_mut() {
                typeahead.buffer.clear();
            }
            match previous {
                Some(previous) => {
                    let position = guard.items.iter().position(|item| item.is_same_item(&previous));
                    guard.active_index = position;
                    position.is_none().then_some(previous)
                }
                None => None,
            }
        };

        if let Some(dropped) = dropped {
            log::trace!("ActiveItemTracker: active item left the list");
            dropped.set_inactive_styles();
        }
    }

    pub fn items(&self) -> Vec<I> {
        self.inner
            .read()
            .map(|guard| guard.items.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------
    // Active item
    // -------------------------------------------------------------------------

    /// Emits the new index whenever the active index changes.
    pub fn change(&self) -> &EventStream<usize> {
        &self.change
    }

    pub fn active_item_index(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|guard| guard.active_index)
    }

    pub fn active_item(&self) -> Option<I> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.active_index.and_then(|i| guard.items.get(i).cloned()))
    }

    /// Make the item at `index` active. Out-of-range indices are ignored.
    pub fn set_active_item(&self, index: usize) {
        let (previous, next, changed) = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let Some(next) = guard.items.get(index).cloned() else {
                return;
            };
            let previous = guard
                .active_index
                .filter(|&i| i != index)
                .and_then(|i| guard.items.get(i).cloned());
            let changed = guard.active_index != Some(index);
            guard.active_index = Some(index);
            (previous, next, changed)
        };

        if let Some(previous) = previous {
            previous.set_inactive_styles();
        }
        next.set_active_styles();

        if changed {
            log::trace!("ActiveItemTracker: active index -> {}", index);
            self.change.emit(&index);
        }
    }

    /// Clear the active item without emitting.
    pub fn clear_active_item(&self) {
        let previous = self.inner.write().ok().and_then(|mut guard| {
            let previous = guard.active_index.and_then(|i| guard.items.get(i).cloned());
            guard.active_index = None;
            previous
        });
        if let Some(previous) = previous {
            previous.set_inactive_styles();
        }
    }

    pub fn set_first_item_active(&self) {
        if let Some(index) = self.read(|inner| inner.first_enabled()) {
            self.set_active_item(index);
        }
    }

    pub fn set_last_item_active(&self) {
        if let Some(index) = self.read(|inner| inner.last_enabled()) {
            self.set_active_item(index);
        }
    }

    pub fn set_next_item_active(&self) {
        if let Some(index) = self.read(|inner| inner.step(1)) {
            self.set_active_item(index);
        }
    }

    pub fn set_previous_item_active(&self) {
        if let Some(index) = self.read(|inner| inner.step(-1)) {
            self.set_active_item(index);
        }
    }

    fn read<R>(&self, f: impl FnOnce(&TrackerInner<I>) -> Option<R>) -> Option<R> {
        self.inner.read().ok().and_then(|guard| f(&guard))
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Handle a key press. Returns true if the key moved (or could have
    /// moved) the active item.
    pub fn on_keydown(&self, key: &KeyCombo) -> bool {
        self.on_keydown_at(key, Instant::now())
    }

    /// [`on_keydown`](Self::on_keydown) with an explicit clock, for typeahead.
    pub fn on_keydown_at(&self, key: &KeyCombo, now: Instant) -> bool {
        if key.modifiers.ctrl || key.modifiers.alt {
            return false;
        }

        let (vertical, home_and_end) = self
            .inner
            .read()
            .map(|guard| (guard.vertical, guard.home_and_end))
            .unwrap_or((false, false));

        match key.key {
            Key::Down if vertical => {
                self.set_next_item_active();
                true
            }
            Key::Up if vertical => {
                self.set_previous_item_active();
                true
            }
            Key::Home if home_and_end => {
                self.set_first_item_active();
                true
            }
            Key::End if home_and_end => {
                self.set_last_item_active();
                true
            }
            _ => match key.printable_char() {
                Some(c) => self.type_char(c, now),
                None => false,
            },
        }
    }

    fn type_char(&self, c: char, now: Instant) -> bool {
        let target = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            let Some(typeahead) = guard.typeahead.as_mut() else {
                return false;
            };
            if !typeahead.is_typing_at(now) {
                typeahead.buffer.clear();
            }
            typeahead.buffer.extend(c.to_lowercase());
            typeahead.last_key = Some(now);
            let query = typeahead.buffer.clone();
            guard.find_by_label(&query)
        };

        if let Some(index) = target {
            self.set_active_item(index);
        }
        true
    }

    /// Whether a typeahead query is still accumulating.
    pub fn is_typing(&self) -> bool {
        self.is_typing_at(Instant::now())
    }

    pub fn is_typing_at(&self, now: Instant) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.typeahead.as_ref().map(|t| t.is_typing_at(now)))
            .unwrap_or(false)
    }

    /// Drop any partially typed query.
    pub fn cancel_typeahead(&self) {
        if let Ok(mut guard) = self.inner.write()
            && let Some(typeahead) = guard.typeahead.as_mut()
        {
            typeahead.buffer.clear();
        }
    }
}
