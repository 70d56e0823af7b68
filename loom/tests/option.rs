use std::sync::{Arc, Mutex};

use loom::prelude::*;

fn record<T: Send + Sync + 'static>(
    option: &SelectOption<T>,
) -> (Arc<Mutex<Vec<bool>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let sub = option
        .selection_changes()
        .subscribe(move |change| recorded.lock().unwrap().push(change.is_user_input));
    (seen, sub)
}

#[test]
fn test_option_ids_are_unique() {
    let a = SelectOption::new(1, "One");
    let b = SelectOption::new(1, "One");
    assert_ne!(a.id(), b.id());
    assert!(a.id_string().starts_with("__option_"));
}

#[test]
fn test_clones_share_state() {
    let option = SelectOption::new("a", "A");
    let clone = option.clone();
    clone.select();
    assert!(option.is_selected());
    assert_eq!(option.id(), clone.id());
}

#[test]
fn test_select_via_interaction_always_emits_user_input() {
    let option = SelectOption::new("a", "A");
    let (seen, _sub) = record(&option);

    option.select_via_interaction();
    option.select_via_interaction();
    assert!(option.is_selected());
    assert_eq!(*seen.lock().unwrap(), vec![true, true]);
}

#[test]
fn test_programmatic_selection_emits_on_change_only() {
    let option = SelectOption::new("a", "A");
    let (seen, _sub) = record(&option);

    option.select();
    option.select();
    option.deselect();
    option.deselect();
    assert!(!option.is_selected());
    assert_eq!(*seen.lock().unwrap(), vec![false, false]);
}

#[test]
fn test_change_carries_source_option() {
    let option = SelectOption::new(7, "Seven");
    let source = Arc::new(Mutex::new(None));
    let recorded = Arc::clone(&source);
    let _sub = option.selection_changes().subscribe(move |change| {
        *recorded.lock().unwrap() = Some((change.source.id(), *change.source.value()));
    });

    option.select_via_interaction();
    assert_eq!(*source.lock().unwrap(), Some((option.id(), 7)));
}

#[test]
fn test_active_is_independent_of_selected() {
    let option = SelectOption::new("a", "A");
    option.set_active_styles();
    assert!(option.is_active());
    assert!(!option.is_selected());
    option.select();
    option.set_inactive_styles();
    assert!(!option.is_active());
    assert!(option.is_selected());
}

#[test]
fn test_disabled_option_ignores_click() {
    let option = SelectOption::disabled("a", "A");
    let (seen, _sub) = record(&option);
    assert_eq!(option.dispatch_click(), EventResult::Ignored);
    assert!(!option.is_selected());
    assert!(seen.lock().unwrap().is_empty());

    option.set_disabled(false);
    assert_eq!(option.dispatch_click(), EventResult::Consumed);
    assert_eq!(*seen.lock().unwrap(), vec![true]);
}

#[test]
fn test_scroll_into_view_without_panel_is_noop() {
    let option = SelectOption::new("a", "A");
    option.set_layout(40, 2);
    option.scroll_into_view();
    assert_eq!(option.bounds(), (40, 2));
}

#[test]
fn test_reported_layout_drives_scrolling() {
    let select = Select::with_config(SelectConfig::default().panel_rows(4));
    let options: Vec<_> = (0..6)
        .map(|n| SelectOption::new(n, format!("Row {n}")))
        .collect();
    select.set_options(options.clone());

    // Two-row options.
    for (n, option) in options.iter().enumerate() {
        option.set_layout(n as u16 * 2, 2);
    }
    assert_eq!(select.panel().content_height(), 12);

    options[3].scroll_into_view();
    assert_eq!(select.panel().scroll_top(), 4);
}

#[test]
fn test_label_updates_are_visible() {
    let option = SelectOption::new(1, "One");
    option.set_label("Uno");
    assert_eq!(option.label(), "Uno");
    assert!(option.is_dirty());
    option.clear_dirty();
    assert!(!option.is_dirty());
}
