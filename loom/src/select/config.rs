//! Select configuration.

use std::time::Duration;

use weft::ConnectedPosition;

/// Gap in rows between the trigger and a panel opened below it.
pub const DEFAULT_PANEL_OFFSET: i16 = 8;

/// Settings for a [`Select`](super::Select).
///
/// # Example
///
/// ```ignore
/// let config = SelectConfig::default()
///     .placeholder("Pick a fruit")
///     .panel_rows(4)
///     .typeahead_debounce(None);
/// let fruit: Select<&str> = Select::with_config(config);
/// ```
#[derive(Debug, Clone)]
pub struct SelectConfig {
    /// Text shown in the trigger when nothing is selected.
    pub placeholder: Option<String>,
    /// Whether arrow navigation wraps at the ends of the list.
    pub wrap: bool,
    /// Typeahead key debounce; `None` turns typeahead off.
    pub typeahead_debounce: Option<Duration>,
    /// Tab index exposed while enabled. Disabled selects always expose -1.
    pub tab_index: i32,
    /// Visible rows in the panel before it scrolls.
    pub panel_rows: u16,
    /// Preferred panel placements, tried in order.
    pub positions: Vec<ConnectedPosition>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            wrap: true,
            typeahead_debounce: Some(Duration::from_millis(200)),
            tab_index: 0,
            panel_rows: 6,
            positions: vec![
                ConnectedPosition::below_start().with_offset_y(DEFAULT_PANEL_OFFSET),
                ConnectedPosition::above_start(),
            ],
        }
    }
}

impl SelectConfig {
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn typeahead_debounce(mut self, debounce: Option<Duration>) -> Self {
        self.typeahead_debounce = debounce;
        self
    }

    pub fn tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = tab_index;
        self
    }

    pub fn panel_rows(mut self, rows: u16) -> Self {
        self.panel_rows = rows;
        self
    }

    pub fn positions(mut self, positions: Vec<ConnectedPosition>) -> Self {
        self.positions = positions;
        self
    }
}
