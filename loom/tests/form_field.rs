use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use loom::prelude::*;

fn type_text(input: &Input, text: &str) {
    for c in text.chars() {
        input.dispatch_key(&KeyCombo::char(c));
    }
}

fn count_changes(field: &FormField) -> (Arc<AtomicUsize>, Subscription) {
    let count = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&count);
    let sub = field.state_changes().subscribe(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });
    (count, sub)
}

#[test]
fn test_field_wrapping_input_typing_then_blur() {
    let input = Input::new();
    let field = FormField::new("Name").with_control(input.clone()).unwrap();
    field.set_container_rect(Rect::new(0, 0, 20, 3));

    assert_eq!(field.dispatch_click(5, 1), EventResult::Consumed);
    assert!(input.is_focused());
    assert!(field.is_focused());
    assert!(!field.is_filled());

    type_text(&input, "abc");
    assert!(field.is_filled());

    input.dispatch_blur();
    assert!(field.is_filled());
    assert!(!field.is_focused());
    assert_eq!(field.view().state, FieldState::Filled);
}

#[test]
fn test_click_outside_container_is_ignored() {
    let input = Input::new();
    let field = FormField::new("Name").with_control(input.clone()).unwrap();
    field.set_container_rect(Rect::new(10, 10, 5, 1));

    assert_eq!(field.dispatch_click(0, 0), EventResult::Ignored);
    assert_eq!(field.dispatch_click(15, 10), EventResult::Ignored);
    assert!(!input.is_focused());
}

#[test]
fn test_click_without_control_is_ignored() {
    let field = FormField::new("Empty");
    field.set_container_rect(Rect::new(0, 0, 10, 1));
    assert_eq!(field.dispatch_click(1, 0), EventResult::Ignored);
    assert!(!field.has_control());
}

#[test]
fn test_second_control_is_rejected() {
    let field = FormField::new("Name");
    field.attach_control(Input::new()).unwrap();

    let err = field.attach_control(Input::new()).unwrap_err();
    assert!(matches!(err, FormFieldError::ControlAlreadyAttached { .. }));
    assert!(err.to_string().contains("already hosts"));
}

#[test]
fn test_attach_mirrors_initial_state() {
    let input = Input::new();
    input.write_value(Some("preset".into()));
    let field = FormField::new("Name").with_control(input).unwrap();
    assert!(field.is_filled());
    assert!(field.view().label_floating);
}

#[test]
fn test_mirrors_select_state() {
    let select = Select::new();
    let options = vec![SelectOption::new(1, "One"), SelectOption::new(2, "Two")];
    select.set_options(options.clone());
    let field = FormField::new("Number");
    select.host_in(&field).unwrap();
    field.set_container_rect(Rect::new(0, 0, 12, 3));

    field.dispatch_click(3, 1);
    assert!(select.is_open());
    assert!(field.is_focused());
    assert!(!field.is_filled());

    options[1].dispatch_click();
    assert!(field.is_filled());
    assert!(field.is_focused());

    select.set_error("Wrong number");
    assert!(field.has_error());
    assert_eq!(field.view().state, FieldState::Error);

    select.set_disabled_state(true);
    assert!(field.is_disabled());
    assert_eq!(field.view().state, FieldState::Disabled);
}

#[test]
fn test_select_with_blank_value_is_not_filled() {
    let select: Select<String> = Select::new();
    let options = vec![
        SelectOption::new(String::new(), "(none)"),
        SelectOption::new("a".to_string(), "A"),
    ];
    select.set_options(options.clone());
    let field = FormField::new("Letter");
    select.host_in(&field).unwrap();

    select.open();
    options[0].select_via_interaction();
    assert_eq!(select.value(), Some(String::new()));
    assert!(!field.is_filled());

    options[1].select_via_interaction();
    assert!(field.is_filled());
}

#[test]
fn test_emits_after_each_mirror_update() {
    let input = Input::new();
    let field = FormField::new("Name").with_control(input.clone()).unwrap();
    let (count, _sub) = count_changes(&field);

    input.dispatch_focus();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    input.dispatch_key(&KeyCombo::char('x'));
    assert_eq!(count.load(Ordering::SeqCst), 2);
    input.dispatch_blur();
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn test_detach_control_stops_mirroring() {
    let input = Input::new();
    let field = FormField::new("Name").with_control(input.clone()).unwrap();
    input.dispatch_focus();
    assert!(field.is_focused());

    let detached = field.detach_control();
    assert!(detached.is_some());
    assert!(!field.is_focused());
    assert_eq!(input.state_changes().subscriber_count(), 0);

    input.dispatch_blur();
    input.dispatch_focus();
    assert!(!field.is_focused());

    // A new control may be attached afterwards.
    assert!(field.attach_control(Input::new()).is_ok());
}

#[test]
fn test_dropping_field_unsubscribes_from_control() {
    let input = Input::new();
    {
        let _field = FormField::new("Name").with_control(input.clone()).unwrap();
        assert_eq!(input.state_changes().subscriber_count(), 1);
    }
    assert_eq!(input.state_changes().subscriber_count(), 0);
}

#[test]
fn test_view_state_priority() {
    let input = Input::new();
    let field = FormField::new("Name").with_control(input.clone()).unwrap();
    assert_eq!(field.view().state, FieldState::Default);

    input.dispatch_focus();
    assert_eq!(field.view().state, FieldState::Focused);

    input.set_error("Required");
    assert_eq!(field.view().state, FieldState::Error);

    let view = field.view();
    assert_eq!(view.label, "Name");
    assert_eq!(view.control_id, Some(input.id_string()));
}
