use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use weft::{Key, KeyCombo, Modifiers};

#[test]
fn test_key_from_crossterm_code() {
    assert_eq!(Key::from(KeyCode::Esc), Key::Escape);
    assert_eq!(Key::from(KeyCode::Char('x')), Key::Char('x'));
    assert_eq!(Key::from(KeyCode::F(5)), Key::F(5));
    assert_eq!(Key::from(KeyCode::BackTab), Key::BackTab);
}

#[test]
fn test_modifiers_from_crossterm() {
    let mods = Modifiers::from(KeyModifiers::CONTROL | KeyModifiers::SHIFT);
    assert!(mods.ctrl);
    assert!(mods.shift);
    assert!(!mods.alt);
    assert!(Modifiers::from(KeyModifiers::NONE).none());
}

#[test]
fn test_key_combo_from_key_event() {
    let event = KeyEvent::new(KeyCode::Down, KeyModifiers::ALT);
    let combo = KeyCombo::from(event);
    assert_eq!(combo.key, Key::Down);
    assert_eq!(combo.modifiers, Modifiers::alt());
}

#[test]
fn test_printable_char() {
    assert_eq!(KeyCombo::char('a').printable_char(), Some('a'));
    assert_eq!(KeyCombo::char('A').shift().printable_char(), Some('A'));
    assert_eq!(KeyCombo::char('a').ctrl().printable_char(), None);
    assert_eq!(KeyCombo::char('\0').printable_char(), None);
    assert_eq!(KeyCombo::key(Key::Enter).printable_char(), None);
}

#[test]
fn test_activation_and_arrow_keys() {
    assert!(Key::Enter.is_activation());
    assert!(Key::Char(' ').is_activation());
    assert!(!Key::Char('x').is_activation());
    assert!(Key::Up.is_vertical_arrow());
    assert!(!Key::Left.is_vertical_arrow());
}
