//! Select and Input inside form fields, driven by a bare crossterm loop.
//!
//! - Tab / Shift+Tab move focus between the two fields
//! - Space or Enter opens the select; arrows, Home/End and typing navigate
//! - Mouse clicks open the panel, pick a row, or close it from outside
//! - Ctrl+S validates, Ctrl+Q quits

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use log::LevelFilter;
use loom::prelude::*;
use loom::weft::text::pad_to_width;
use simplelog::{Config, WriteLogger};

const FIELD_WIDTH: u16 = 30;

struct Demo {
    fruit: Select<&'static str>,
    fruit_field: FormField,
    name: Input,
    name_field: FormField,
    focus: usize,
    overlay: Option<ActiveOverlay>,
    status: String,
}

impl Demo {
    fn new() -> Result<Self, FormFieldError> {
        let fruit = Select::with_placeholder("Pick a fruit");
        fruit.set_options(vec![
            SelectOption::new("apple", "Apple"),
            SelectOption::new("banana", "Banana"),
            SelectOption::new("blueberry", "Blueberry"),
            SelectOption::disabled("cherry", "Cherry (sold out)"),
            SelectOption::new("grape", "Grape"),
            SelectOption::new("lemon", "Lemon"),
            SelectOption::new("mango", "Mango"),
            SelectOption::new("orange", "Orange"),
        ]);
        fruit.register_on_change(Arc::new(|value: &&str| {
            log::info!("fruit changed to {}", value);
        }));

        let fruit_field = FormField::new("Fruit");
        fruit.host_in(&fruit_field)?;
        fruit_field.set_container_rect(Rect::new(2, 4, FIELD_WIDTH, 1));
        fruit.set_anchor_rect(Rect::new(2, 4, FIELD_WIDTH, 1));

        let name = Input::with_placeholder("Your name");
        let name_field = FormField::new("Name").with_control(name.clone())?;
        name_field.set_container_rect(Rect::new(2, 8, FIELD_WIDTH, 1));

        fruit.dispatch_focus();

        Ok(Self {
            fruit,
            fruit_field,
            name,
            name_field,
            focus: 0,
            overlay: None,
            status: String::new(),
        })
    }

    fn move_focus(&mut self) {
        if self.focus == 0 {
            self.fruit.dispatch_blur();
            self.name.dispatch_focus();
            self.focus = 1;
        } else {
            self.name.dispatch_blur();
            self.fruit.dispatch_focus();
            self.focus = 0;
        }
    }

    fn validate(&mut self) {
        let result = Validator::new()
            .field(&self.fruit, "fruit")
            .selected("Pick a fruit")
            .field(&self.name, "name")
            .required("Name is required")
            .min_length(2, "Name is too short")
            .validate();
        self.status = match result.first_error() {
            Some(error) => format!("{}: {}", error.field_name, error.message),
            None => "All good".to_string(),
        };
    }

    /// Returns false when the demo should exit.
    fn on_key(&mut self, combo: KeyCombo) -> bool {
        if combo.modifiers.ctrl {
            match combo.key {
                Key::Char('q') | Key::Char('c') => return false,
                Key::Char('s') => self.validate(),
                _ => {}
            }
            return true;
        }

        let result = if self.focus == 0 {
            self.fruit.dispatch_key(&combo)
        } else {
            self.name.dispatch_key(&combo)
        };
        if !result.is_handled() && matches!(combo.key, Key::Tab | Key::BackTab) {
            self.move_focus();
        }
        true
    }

    fn on_click(&mut self, x: u16, y: u16) {
        if let Some(overlay) = &self.overlay {
            if let Some(row) = overlay.row_at(x, y) {
                self.fruit.dispatch_panel_click(row);
                return;
            }
            if overlay.is_outside(x, y) {
                self.fruit.dispatch_outside_click();
            }
        }

        if self.fruit_field.dispatch_click(x, y).is_handled() {
            if self.focus == 1 {
                self.name.dispatch_blur();
            }
            self.focus = 0;
        } else if self.name_field.dispatch_click(x, y).is_handled() {
            self.focus = 1;
        }
    }

    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        queue!(out, terminal::Clear(terminal::ClearType::All))?;
        queue!(out, cursor::MoveTo(2, 1), Print("Select demo  (Ctrl+S validate, Ctrl+Q quit)"))?;

        let fruit = self.fruit.view();
        draw_field(out, &self.fruit_field.view(), 3, fruit.error.as_deref())?;
        queue!(out, cursor::MoveTo(2, 4), Print(fruit.trigger_line(FIELD_WIDTH)))?;

        let name = self.name.view();
        draw_field(out, &self.name_field.view(), 7, name.error.as_deref())?;
        let text = if name.text.is_empty() { &name.placeholder } else { &name.text };
        queue!(out, cursor::MoveTo(2, 8), Print(pad_to_width(text, FIELD_WIDTH as usize)))?;

        queue!(out, cursor::MoveTo(2, 11), Print(&self.status))?;

        self.overlay = self.fruit.overlay_request().and_then(|request| {
            let placement = request.resolve(Rect::new(0, 0, cols, rows))?;
            Some(ActiveOverlay::new(&request, placement))
        });
        if let Some(overlay) = &self.overlay {
            for (row, line) in fruit.panel_lines().iter().enumerate() {
                queue!(
                    out,
                    cursor::MoveTo(overlay.area.x, overlay.area.y + row as u16),
                    SetAttribute(Attribute::Reverse),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )?;
            }
        }

        if self.focus == 1 {
            queue!(out, cursor::Show, cursor::MoveTo(2 + name.cursor as u16, 8))?;
        } else {
            queue!(out, cursor::Hide)?;
        }
        self.fruit.clear_dirty();
        self.name.clear_dirty();
        out.flush()
    }
}

fn draw_field(
    out: &mut impl Write,
    view: &FormFieldView,
    row: u16,
    error: Option<&str>,
) -> io::Result<()> {
    let marker = match view.state {
        FieldState::Disabled => "-",
        FieldState::Error => "!",
        FieldState::Focused => ">",
        FieldState::Filled | FieldState::Default => " ",
    };
    queue!(out, cursor::MoveTo(0, row), Print(marker), cursor::MoveTo(2, row))?;
    if view.label_floating {
        queue!(out, SetAttribute(Attribute::Bold), Print(&view.label), SetAttribute(Attribute::Reset))?;
    } else {
        queue!(out, Print(&view.label))?;
    }
    if let Some(error) = error {
        queue!(out, cursor::MoveTo(2, row + 2), Print(error))?;
    }
    Ok(())
}

fn run(demo: &mut Demo) -> io::Result<()> {
    let mut out = io::stdout();
    demo.draw(&mut out)?;
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !demo.on_key(key.into()) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                demo.on_click(mouse.column, mouse.row);
            }
            Event::Resize(..) => {}
            _ => continue,
        }
        demo.draw(&mut out)?;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(log_file) = File::create("select.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let mut demo = Demo::new()?;

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, EnableMouseCapture)?;
    let result = run(&mut demo);
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;

    result?;
    Ok(())
}
