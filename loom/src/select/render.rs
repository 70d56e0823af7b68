//! Render view models for Select.
//!
//! A host renderer turns these into cells; nothing here touches a terminal.

use weft::text::{display_width, pad_to_width};

use crate::validation::ErrorDisplay;

use super::state::{Select, SelectValue};

/// Chevron drawn at the right edge of the trigger.
pub const CHEVRON_CLOSED: &str = "▾";
pub const CHEVRON_OPEN: &str = "▴";

/// One option row in the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub selected: bool,
    pub active: bool,
    pub disabled: bool,
}

/// Everything needed to draw a select and its panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectView {
    pub id: String,
    /// Selected label, or the placeholder when nothing is selected.
    pub trigger_text: String,
    pub showing_placeholder: bool,
    /// Whether the panel is expanded.
    pub expanded: bool,
    pub focused: bool,
    pub disabled: bool,
    /// -1 while disabled.
    pub tab_index: i32,
    pub error: Option<String>,
    pub error_display: ErrorDisplay,
    /// ID of the keyboard-active option while expanded.
    pub active_descendant: Option<String>,
    pub options: Vec<OptionView>,
    /// First visible panel row.
    pub scroll_top: u16,
    /// Number of visible panel rows.
    pub panel_rows: u16,
    /// Panel width in cells.
    pub panel_width: u16,
}

impl SelectView {
    pub fn chevron(&self) -> &'static str {
        if self.expanded {
            CHEVRON_OPEN
        } else {
            CHEVRON_CLOSED
        }
    }

    /// The trigger as one line of `width` cells, chevron right-aligned.
    pub fn trigger_line(&self, width: u16) -> String {
        let width = width as usize;
        let chevron_width = display_width(self.chevron()) + 1;
        let text_width = width.saturating_sub(chevron_width);
        format!("{} {}", pad_to_width(&self.trigger_text, text_width), self.chevron())
    }

    /// Visible panel rows, each padded to `panel_width`.
    ///
    /// The active row is marked with `›`, the selected one with `✓`.
    pub fn panel_lines(&self) -> Vec<String> {
        let width = self.panel_width.max(4) as usize;
        self.options
            .iter()
            .skip(self.scroll_top as usize)
            .take(self.panel_rows as usize)
            .map(|option| {
                let marker = if option.active { '›' } else { ' ' };
                let check = if option.selected { '✓' } else { ' ' };
                let label = pad_to_width(&option.label, width.saturating_sub(4));
                format!("{marker}{check} {label} ")
            })
            .collect()
    }
}

impl<T: SelectValue> Select<T> {
    /// Snapshot the state a renderer needs.
    pub fn view(&self) -> SelectView {
        let active = self.active_index();
        let options: Vec<OptionView> = self
            .options()
            .iter()
            .map(|option| OptionView {
                id: option.id_string(),
                label: option.label(),
                selected: option.is_selected(),
                active: option.is_active(),
                disabled: option.is_disabled(),
            })
            .collect();

        let (label, placeholder, expanded, focused, disabled, tab_index, error, error_display, width) =
            self.read(|inner| {
                (
                    inner.selected_label.clone(),
                    inner.config.placeholder.clone().unwrap_or_default(),
                    inner.is_open,
                    inner.is_focused,
                    inner.is_disabled,
                    inner.config.tab_index,
                    inner.error.clone(),
                    inner.error_display,
                    inner.overlay_width,
                )
            });

        let showing_placeholder = label.is_empty();
        let active_descendant = if expanded {
            active.and_then(|index| options.get(index).map(|option| option.id.clone()))
        } else {
            None
        };

        SelectView {
            id: self.id_string(),
            trigger_text: if showing_placeholder { placeholder } else { label },
            showing_placeholder,
            expanded,
            focused,
            disabled,
            tab_index: if disabled { -1 } else { tab_index },
            error,
            error_display,
            active_descendant,
            options,
            scroll_top: self.panel().scroll_top(),
            panel_rows: self.panel().height(),
            panel_width: width,
        }
    }
}
