use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use loom::prelude::*;
use loom::select::DEFAULT_PANEL_OFFSET;

fn key(k: Key) -> KeyCombo {
    KeyCombo::key(k)
}

fn fruit_select() -> (Select<&'static str>, Vec<SelectOption<&'static str>>) {
    let select = Select::with_placeholder("Pick a fruit");
    let options = vec![
        SelectOption::new("apple", "Apple"),
        SelectOption::new("banana", "Banana"),
        SelectOption::new("cherry", "Cherry"),
    ];
    select.set_options(options.clone());
    (select, options)
}

fn numbered_select(count: u32, rows: u16) -> Select<u32> {
    let select = Select::with_config(SelectConfig::default().panel_rows(rows));
    select.set_options(
        (0..count)
            .map(|n| SelectOption::new(n, format!("Item {n}")))
            .collect(),
    );
    select
}

fn counter() -> (Arc<AtomicUsize>, TouchedCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    (count, Arc::new(move || {
        inner.fetch_add(1, Ordering::SeqCst);
    }))
}

fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, ChangeCallback<T>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&seen);
    (seen, Arc::new(move |value: &T| {
        inner.lock().unwrap().push(value.clone());
    }))
}

fn selected_count<T>(options: &[SelectOption<T>]) -> usize {
    options.iter().filter(|o| o.is_selected()).count()
}

fn active_is_member<T: loom::select::SelectValue>(select: &Select<T>) -> bool {
    match select.active_option() {
        Some(active) => select.options().iter().any(|o| o.id() == active.id()),
        None => true,
    }
}

// =============================================================================
// Opening and closing
// =============================================================================

#[test]
fn test_enter_opens_closed_select() {
    let (select, _) = fruit_select();
    assert_eq!(select.dispatch_key(&key(Key::Enter)), EventResult::Consumed);
    assert!(select.is_open());
    assert!(select.is_focused());
}

#[test]
fn test_space_opens_closed_select() {
    let (select, _) = fruit_select();
    assert_eq!(select.dispatch_key(&KeyCombo::char(' ')), EventResult::Consumed);
    assert!(select.is_open());
}

#[test]
fn test_open_while_disabled_is_noop() {
    let (select, _) = fruit_select();
    select.set_disabled_state(true);

    select.open();
    assert!(!select.is_open());
    assert_eq!(select.dispatch_key(&key(Key::Enter)), EventResult::Ignored);
    assert!(!select.is_open());
    select.on_container_click();
    assert!(!select.is_open());
    assert_eq!(select.dispatch_click(), EventResult::Ignored);
    assert!(!select.is_open());
}

#[test]
fn test_arrow_keys_ignored_while_closed() {
    let (select, _) = fruit_select();
    assert_eq!(select.dispatch_key(&key(Key::Down)), EventResult::Ignored);
    assert_eq!(select.dispatch_key(&key(Key::Escape)), EventResult::Ignored);
    assert!(!select.is_open());
    assert!(select.active_option().is_none());
}

#[test]
fn test_escape_closes_and_keeps_focus() {
    let (select, _) = fruit_select();
    select.dispatch_key(&key(Key::Enter));
    assert_eq!(select.dispatch_key(&key(Key::Escape)), EventResult::Consumed);
    assert!(!select.is_open());
    assert!(select.is_focused());
}

#[test]
fn test_outside_click_closes_clears_focus_and_touches() {
    let (select, _) = fruit_select();
    let (touched, callback) = counter();
    select.register_on_touched(callback);

    select.dispatch_key(&key(Key::Enter));
    assert_eq!(select.dispatch_outside_click(), EventResult::Consumed);
    assert!(!select.is_open());
    assert!(!select.is_focused());
    assert_eq!(touched.load(Ordering::SeqCst), 1);

    // Nothing to close the second time.
    assert_eq!(select.dispatch_outside_click(), EventResult::Ignored);
    assert_eq!(touched.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panel_detached_closes_keeping_focus() {
    let (select, _) = fruit_select();
    select.open();
    select.on_panel_detached();
    assert!(!select.is_open());
    assert!(select.is_focused());
}

#[test]
fn test_tab_closes_and_lets_focus_move() {
    let (select, _) = fruit_select();
    let (touched, callback) = counter();
    select.register_on_touched(callback);

    select.open();
    assert_eq!(select.dispatch_key(&key(Key::Tab)), EventResult::Ignored);
    assert!(!select.is_open());

    select.dispatch_blur();
    assert!(!select.is_focused());
    assert_eq!(touched.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trigger_click_toggles() {
    let (select, _) = fruit_select();
    select.dispatch_click();
    assert!(select.is_open());
    select.dispatch_click();
    assert!(!select.is_open());
}

#[test]
fn test_disabling_closes_open_panel() {
    let (select, _) = fruit_select();
    select.open();
    select.set_disabled_state(true);
    assert!(!select.is_open());
    assert!(select.is_disabled());
    assert_eq!(select.view().tab_index, -1);

    select.set_disabled_state(false);
    assert_eq!(select.view().tab_index, 0);
}

#[test]
fn test_empty_options_enter_opens_without_active() {
    let select: Select<u32> = Select::new();
    assert_eq!(select.dispatch_key(&key(Key::Enter)), EventResult::Consumed);
    assert!(select.is_open());
    assert!(select.active_option().is_none());

    // Enter again with nothing active selects nothing.
    assert_eq!(select.dispatch_key(&key(Key::Enter)), EventResult::Consumed);
    assert!(select.is_open());
    assert_eq!(select.value(), None);
}

// =============================================================================
// Focus
// =============================================================================

#[test]
fn test_blur_while_open_keeps_focus() {
    let (select, _) = fruit_select();
    let (touched, callback) = counter();
    select.register_on_touched(callback);

    select.open();
    select.dispatch_blur();
    assert!(select.is_open());
    assert!(select.is_focused());
    assert_eq!(touched.load(Ordering::SeqCst), 0);
}

#[test]
fn test_blur_while_closed_clears_focus_and_touches_once() {
    let (select, _) = fruit_select();
    let (touched, callback) = counter();
    select.register_on_touched(callback);

    select.dispatch_focus();
    assert!(select.is_focused());
    select.dispatch_blur();
    assert!(!select.is_focused());
    assert_eq!(touched.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_user_selection_closes_and_sets_value() {
    let (select, options) = fruit_select();
    let (seen, callback) = recorder();
    select.register_on_change(callback);

    select.dispatch_key(&key(Key::Enter));
    select.dispatch_key(&key(Key::Down));
    select.dispatch_key(&key(Key::Down));
    assert_eq!(select.active_index(), Some(1));
    select.dispatch_key(&key(Key::Enter));

    assert_eq!(select.value(), Some("banana"));
    assert!(!select.is_open());
    assert!(select.is_focused());
    assert_eq!(select.selected_label(), "Banana");
    assert!(options[1].is_selected());
    assert_eq!(selected_count(&options), 1);
    assert_eq!(*seen.lock().unwrap(), vec!["banana"]);
}

#[test]
fn test_click_on_option_selects_it() {
    let (select, options) = fruit_select();
    select.open();
    assert_eq!(options[2].dispatch_click(), EventResult::Consumed);

    assert_eq!(select.value(), Some("cherry"));
    assert!(!select.is_open());
    assert_eq!(select.active_index(), Some(2));
}

#[test]
fn test_panel_row_click_selects_option() {
    let (select, _) = fruit_select();
    select.open();
    assert_eq!(select.dispatch_panel_click(1), EventResult::Consumed);
    assert_eq!(select.value(), Some("banana"));
    assert_eq!(select.dispatch_panel_click(9), EventResult::Ignored);
}

#[test]
fn test_disabled_option_ignores_click() {
    let select = Select::new();
    let options = vec![
        SelectOption::new(1, "One"),
        SelectOption::disabled(2, "Two"),
    ];
    select.set_options(options.clone());
    select.open();

    assert_eq!(options[1].dispatch_click(), EventResult::Ignored);
    assert_eq!(select.value(), None);
    assert!(select.is_open());
}

#[test]
fn test_at_most_one_selected_after_user_selections() {
    let (select, options) = fruit_select();
    for index in [0, 2, 1, 1, 0] {
        select.open();
        options[index].select_via_interaction();
        assert_eq!(selected_count(&options), 1);
        assert!(options[index].is_selected());
    }
    // Selections forwarded while closed behave the same.
    options[2].select_via_interaction();
    assert_eq!(selected_count(&options), 1);
    assert_eq!(select.value(), Some("cherry"));
}

#[test]
fn test_programmatic_selection_does_not_change_open_state() {
    let (select, options) = fruit_select();

    options[1].select();
    assert!(!select.is_open());
    assert_eq!(select.value(), None);

    select.open();
    options[2].select();
    options[1].deselect();
    assert!(select.is_open());
    assert_eq!(select.value(), None);
}

#[test]
fn test_selecting_same_option_again_reports_change() {
    let (select, options) = fruit_select();
    let (seen, callback) = recorder();
    select.register_on_change(callback);

    options[0].select_via_interaction();
    options[0].select_via_interaction();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

// =============================================================================
// Keyboard navigation
// =============================================================================

#[test]
fn test_arrow_down_wraps_to_first_option() {
    let (select, options) = fruit_select();
    select.open();
    select.dispatch_key(&key(Key::Down));
    assert_eq!(select.active_index(), Some(0));

    for _ in 0..options.len() {
        select.dispatch_key(&key(Key::Down));
    }
    assert_eq!(select.active_index(), Some(0));
    assert!(options[0].is_active());
    assert!(!options[2].is_active());
}

#[test]
fn test_arrow_up_wraps_to_last_option() {
    let (select, _) = fruit_select();
    select.open();
    select.dispatch_key(&key(Key::Down));
    select.dispatch_key(&key(Key::Up));
    assert_eq!(select.active_index(), Some(2));
}

#[test]
fn test_home_and_end_while_open() {
    let (select, _) = fruit_select();
    select.open();
    select.dispatch_key(&key(Key::End));
    assert_eq!(select.active_index(), Some(2));
    select.dispatch_key(&key(Key::Home));
    assert_eq!(select.active_index(), Some(0));
}

#[test]
fn test_typeahead_moves_active_without_selecting() {
    let (select, _) = fruit_select();
    select.open();
    assert_eq!(select.dispatch_key(&KeyCombo::char('c')), EventResult::Consumed);
    assert_eq!(select.active_index(), Some(2));
    assert_eq!(select.value(), None);
    assert!(select.is_open());
}

#[test]
fn test_space_continues_typeahead_query() {
    let select = Select::new();
    select.set_options(vec![
        SelectOption::new("ny", "New York"),
        SelectOption::new("nj", "New Jersey"),
        SelectOption::new("nv", "Nevada"),
    ]);
    select.open();

    for c in "new j".chars() {
        select.dispatch_key(&KeyCombo::char(c));
    }
    assert_eq!(select.active_index(), Some(1));
    assert_eq!(select.value(), None);
    assert!(select.is_open());
}

#[test]
fn test_modified_keys_are_ignored() {
    let (select, _) = fruit_select();
    assert_eq!(
        select.dispatch_key(&key(Key::Enter).ctrl()),
        EventResult::Ignored
    );
    assert!(!select.is_open());
}

// =============================================================================
// Value writes and rebinding
// =============================================================================

#[test]
fn test_write_value_then_rebind_activates_matching_option() {
    let select: Select<u32> = Select::new();
    select.write_value(Some(2));

    let options: Vec<_> = [1, 2, 3]
        .into_iter()
        .map(|n| SelectOption::new(n, n.to_string()))
        .collect();
    select.set_options(options.clone());

    let active = select.active_option().expect("an active option");
    assert_eq!(*active.value(), 2);
    assert!(options[1].is_selected());
    assert_eq!(select.selected_label(), "2");
}

#[test]
fn test_write_value_selects_without_reporting_change() {
    let (select, options) = fruit_select();
    let (seen, callback) = recorder();
    select.register_on_change(callback);
    let emissions = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&emissions);
    let _sub = select.state_changes().subscribe(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    select.write_value(Some("cherry"));

    assert!(options[2].is_selected());
    assert_eq!(selected_count(&options), 1);
    assert_eq!(select.selected_label(), "Cherry");
    assert_eq!(select.active_index(), Some(2));
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(emissions.load(Ordering::SeqCst), 1);
    assert!(!select.is_open());
}

#[test]
fn test_write_value_without_match_clears_selection() {
    let (select, options) = fruit_select();
    select.write_value(Some("apple"));
    select.write_value(Some("durian"));

    assert_eq!(selected_count(&options), 0);
    assert_eq!(select.selected_label(), "");
    assert_eq!(select.view().trigger_text, "Pick a fruit");
    assert!(select.view().showing_placeholder);
}

#[test]
fn test_active_option_always_member_after_mutations() {
    let (select, options) = fruit_select();
    select.open();
    select.dispatch_key(&key(Key::End));
    assert!(active_is_member(&select));

    let removed = select.remove_option(options[2].id());
    assert!(removed.is_some());
    assert!(select.active_option().is_none());
    assert!(!options[2].is_active());
    assert!(active_is_member(&select));

    select.dispatch_key(&key(Key::Down));
    assert_eq!(select.active_index(), Some(0));

    select.push_option(SelectOption::new("date", "Date"));
    assert_eq!(select.active_index(), Some(0));
    assert!(active_is_member(&select));

    select.set_options(vec![SelectOption::new("fig", "Fig")]);
    assert!(select.active_option().is_none());
    assert!(active_is_member(&select));

    select.clear_options();
    assert!(active_is_member(&select));
}

#[test]
fn test_rebinding_keeps_one_subscription_per_option() {
    let (select, options) = fruit_select();
    let (seen, callback) = recorder();
    select.register_on_change(callback);

    select.set_options(options.clone());
    select.options_changed();
    assert_eq!(options[0].selection_changes().subscriber_count(), 1);

    options[0].select_via_interaction();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_removed_option_no_longer_drives_select() {
    let (select, options) = fruit_select();
    select.remove_option(options[1].id());
    assert_eq!(options[1].selection_changes().subscriber_count(), 0);

    options[1].select_via_interaction();
    assert_eq!(select.value(), None);
}

#[test]
fn test_dropping_select_releases_option_subscriptions() {
    let options = vec![SelectOption::new(1, "One"), SelectOption::new(2, "Two")];
    {
        let select = Select::new();
        select.set_options(options.clone());
        assert_eq!(options[0].selection_changes().subscriber_count(), 1);
    }
    assert_eq!(options[0].selection_changes().subscriber_count(), 0);
}

// =============================================================================
// Scrolling
// =============================================================================

#[test]
fn test_active_index_zero_scrolls_panel_to_top() {
    let select = numbered_select(10, 3);
    select.open();
    select.dispatch_key(&key(Key::End));
    assert_eq!(select.panel().scroll_top(), 7);

    select.dispatch_key(&key(Key::Home));
    assert_eq!(select.active_index(), Some(0));
    assert_eq!(select.panel().scroll_top(), 0);
}

#[test]
fn test_navigation_scrolls_minimally() {
    let select = numbered_select(10, 3);
    select.open();
    for _ in 0..4 {
        select.dispatch_key(&key(Key::Down));
    }
    // Active row 3 with three visible rows.
    assert_eq!(select.active_index(), Some(3));
    assert_eq!(select.panel().scroll_top(), 1);

    select.dispatch_key(&key(Key::Up));
    assert_eq!(select.panel().scroll_top(), 1);
}

#[test]
fn test_open_scrolls_selected_option_into_view() {
    let select = numbered_select(10, 3);
    select.write_value(Some(8));
    select.panel().scroll_to_top();
    select.open();
    assert!(select.panel().is_visible(8, 1));
}

#[test]
fn test_navigation_uses_reported_option_layouts() {
    let select = Select::with_config(SelectConfig::default().panel_rows(4));
    let options: Vec<_> = (0..6u32)
        .map(|n| SelectOption::new(n, format!("Item {n}")))
        .collect();
    select.set_options(options.clone());
    for (n, option) in options.iter().enumerate() {
        option.set_layout(n as u16 * 2, 2);
    }

    select.open();
    for _ in 0..6 {
        select.dispatch_key(&key(Key::Down));
    }
    assert_eq!(select.active_index(), Some(5));
    assert_eq!(select.panel().content_height(), 12);
    assert_eq!(select.panel().scroll_top(), 8);
    assert!(select.panel().is_visible(10, 2));
}

#[test]
fn test_open_picks_up_layouts_reported_before_binding() {
    let options: Vec<_> = (0..5u32)
        .map(|n| SelectOption::new(n, format!("Item {n}")))
        .collect();
    for (n, option) in options.iter().enumerate() {
        option.set_layout(n as u16 * 3, 3);
    }
    let select = Select::with_config(SelectConfig::default().panel_rows(3));
    select.set_options(options);
    select.write_value(Some(4));
    select.panel().scroll_to_top();

    select.open();
    assert_eq!(select.panel().content_height(), 15);
    assert!(select.panel().is_visible(12, 3));
}

#[test]
fn test_rows_past_u16_range_saturate() {
    let count = u32::from(u16::MAX) + 10;
    let select = numbered_select(count, 3);
    let last = select.options().pop().unwrap();
    assert_eq!(last.bounds(), (u16::MAX, 1));
    assert_eq!(select.panel().content_height(), u16::MAX);
}

// =============================================================================
// Overlay
// =============================================================================

#[test]
fn test_overlay_request_only_while_open() {
    let (select, _) = fruit_select();
    assert!(select.overlay_request().is_none());
    select.open();
    assert!(select.overlay_request().is_some());
}

#[test]
fn test_overlay_width_follows_anchor() {
    let (select, _) = fruit_select();
    select.set_anchor_rect(Rect::new(4, 4, 20, 1));
    select.open();

    let request = select.overlay_request().expect("open select has a request");
    assert_eq!(select.overlay_width(), 20);
    assert_eq!(request.width, 20);
    assert_eq!(request.height, 3);
    assert_eq!(request.anchor, Rect::new(4, 4, 20, 1));
    assert_eq!(request.owner_id, select.id_string());
    assert_eq!(request.positions[0].offset_y, DEFAULT_PANEL_OFFSET);
    assert_eq!(request.positions.len(), 2);
}

#[test]
fn test_overlay_width_follows_form_field_container() {
    let (select, _) = fruit_select();
    let field = FormField::new("Fruit");
    select.host_in(&field).unwrap();
    select.set_anchor_rect(Rect::new(4, 4, 20, 1));
    field.set_container_rect(Rect::new(2, 3, 30, 3));

    select.open();
    assert_eq!(select.overlay_width(), 30);
    let request = select.overlay_request().unwrap();
    assert_eq!(request.anchor, Rect::new(2, 3, 30, 3));

    // Resized while closed: picked up on the next open.
    select.close();
    field.set_container_rect(Rect::new(2, 3, 40, 3));
    select.open();
    assert_eq!(select.overlay_width(), 40);
}

#[test]
fn test_overlay_request_resolves_against_screen() {
    let (select, _) = fruit_select();
    select.set_anchor_rect(Rect::new(0, 20, 10, 1));
    select.open();

    let request = select.overlay_request().unwrap();
    let placement = request.resolve(Rect::from_size(80, 24)).unwrap();
    // No room below with the offset, so the panel flips above.
    assert_eq!(placement.position_index, 1);
    assert_eq!(placement.area, Rect::new(0, 17, 10, 3));
}

// =============================================================================
// State notifications and view
// =============================================================================

#[test]
fn test_container_click_emits_once() {
    let (select, _) = fruit_select();
    let emissions = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&emissions);
    let _sub = select.state_changes().subscribe(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    select.on_container_click();
    assert!(select.is_open());
    assert!(select.is_focused());
    assert_eq!(emissions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_one_state_change_per_transition() {
    let (select, options) = fruit_select();
    let emissions = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&emissions);
    let _sub = select.state_changes().subscribe(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    select.open();
    assert_eq!(emissions.load(Ordering::SeqCst), 1);
    select.open();
    assert_eq!(emissions.load(Ordering::SeqCst), 1);
    select.dispatch_key(&key(Key::Escape));
    assert_eq!(emissions.load(Ordering::SeqCst), 2);
    select.dispatch_key(&key(Key::Escape));
    assert_eq!(emissions.load(Ordering::SeqCst), 2);
    options[0].select_via_interaction();
    assert_eq!(emissions.load(Ordering::SeqCst), 3);
}

#[test]
fn test_view_reflects_open_state() {
    let (select, _) = fruit_select();
    let view = select.view();
    assert_eq!(view.trigger_text, "Pick a fruit");
    assert!(!view.expanded);
    assert_eq!(view.active_descendant, None);
    assert_eq!(view.options.len(), 3);

    select.open();
    select.dispatch_key(&key(Key::Down));
    let view = select.view();
    assert!(view.expanded);
    assert_eq!(view.active_descendant, Some(view.options[0].id.clone()));
    assert!(view.options[0].active);
    assert_eq!(view.chevron(), loom::select::CHEVRON_OPEN);

    select.dispatch_key(&key(Key::Enter));
    let view = select.view();
    assert_eq!(view.trigger_text, "Apple");
    assert!(!view.showing_placeholder);
    assert!(view.options[0].selected);
}

#[test]
fn test_view_lines_fit_requested_width() {
    let (select, _) = fruit_select();
    select.set_anchor_rect(Rect::new(0, 0, 16, 1));
    select.open();
    let view = select.view();

    let trigger = view.trigger_line(16);
    assert_eq!(loom::weft::text::display_width(&trigger), 16);
    let lines = view.panel_lines();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|line| loom::weft::text::display_width(line) == 16));
}

#[test]
fn test_error_round_trip_notifies() {
    let (select, _) = fruit_select();
    let emissions = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&emissions);
    let _sub = select.state_changes().subscribe(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    select.set_error("Pick one");
    assert!(select.has_error());
    assert_eq!(select.view().error.as_deref(), Some("Pick one"));
    select.clear_error();
    assert!(!select.has_error());
    assert_eq!(emissions.load(Ordering::SeqCst), 2);
}
