//! Full-screen keypad: display box above a grid of clickable buttons.

use crate::runtime::{DisplayView, FrontendAdapter};
use crate::state::Operator;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const DISPLAY_HEIGHT: u16 = 4;
const COLUMNS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Digit,
    Function,
    Operator,
    Equals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub id: &'static str,
    pub kind: ButtonKind,
    /// Number of grid columns the button covers.
    pub span: u16,
}

const fn button(label: &'static str, id: &'static str, kind: ButtonKind) -> Button {
    Button {
        label,
        id,
        kind,
        span: 1,
    }
}

pub const KEYPAD: [&[Button]; 5] = [
    &[
        button("C", "clear", ButtonKind::Function),
        button("\u{b1}", "toggle-sign", ButtonKind::Function),
        button("%", "percent", ButtonKind::Function),
        button("\u{f7}", "divide", ButtonKind::Operator),
    ],
    &[
        button("7", "7", ButtonKind::Digit),
        button("8", "8", ButtonKind::Digit),
        button("9", "9", ButtonKind::Digit),
        button("\u{d7}", "multiply", ButtonKind::Operator),
    ],
    &[
        button("4", "4", ButtonKind::Digit),
        button("5", "5", ButtonKind::Digit),
        button("6", "6", ButtonKind::Digit),
        button("\u{2212}", "subtract", ButtonKind::Operator),
    ],
    &[
        button("1", "1", ButtonKind::Digit),
        button("2", "2", ButtonKind::Digit),
        button("3", "3", ButtonKind::Digit),
        button("+", "add", ButtonKind::Operator),
    ],
    &[
        Button {
            label: "0",
            id: "0",
            kind: ButtonKind::Digit,
            span: 2,
        },
        button(".", "decimal", ButtonKind::Digit),
        button("=", "equals", ButtonKind::Equals),
    ],
];

/// Splits `area` into the display box and one rect per keypad button.
pub fn layout(area: Rect) -> (Rect, Vec<(Rect, Button)>) {
    let [display, pad] =
        Layout::vertical([Constraint::Length(DISPLAY_HEIGHT), Constraint::Min(0)]).areas(area);

    let rows = Layout::vertical(
        KEYPAD
            .iter()
            .map(|_| Constraint::Ratio(1, KEYPAD.len() as u32)),
    )
    .split(pad);

    let mut buttons = Vec::new();
    for (row_area, row) in rows.iter().zip(KEYPAD) {
        let cells = Layout::horizontal(
            (0..COLUMNS).map(|_| Constraint::Ratio(1, u32::from(COLUMNS))),
        )
        .split(*row_area);

        let mut column = 0usize;
        for button in row.iter() {
            let first = cells[column];
            let last = cells[column + usize::from(button.span) - 1];
            buttons.push((first.union(last), *button));
            column += usize::from(button.span);
        }
    }

    (display, buttons)
}

/// Key name understood by `Action::from_key`, or `None` for keys the
/// calculator ignores.
pub fn key_name(key: &KeyEvent) -> Option<String> {
    if key.kind != KeyEventKind::Press || key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) => Some(ch.to_string()),
        KeyCode::Enter => Some("Enter".to_string()),
        KeyCode::Esc => Some("Escape".to_string()),
        KeyCode::Backspace => Some("Backspace".to_string()),
        _ => None,
    }
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub struct KeypadFrontend {
    view: DisplayView,
    hit_map: Vec<(Rect, Button)>,
    colors_enabled: bool,
}

impl KeypadFrontend {
    pub fn new(colors_enabled: bool) -> Self {
        Self {
            view: DisplayView::default(),
            hit_map: Vec::new(),
            colors_enabled,
        }
    }

    /// Button id under the given cell, as of the last draw.
    pub fn button_at(&self, column: u16, row: u16) -> Option<&'static str> {
        self.hit_map
            .iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(_, button)| button.id)
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let (display_area, buttons) = layout(frame.area());

        let expression_style = self.style(Style::new().fg(Color::DarkGray));
        let display = Paragraph::new(vec![
            Line::from(self.view.expression.as_str()).style(expression_style),
            Line::from(self.view.primary.as_str()).style(Style::new().add_modifier(Modifier::BOLD)),
        ])
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(display, display_area);

        for (area, button) in &buttons {
            let active = self.is_active(button);
            let style = self.button_style(button.kind, active);
            let label = Paragraph::new(button.label)
                .alignment(Alignment::Center)
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style));
            frame.render_widget(label, *area);
        }

        self.hit_map = buttons;
    }

    fn is_active(&self, button: &Button) -> bool {
        self.view.active_operator.map(Operator::id) == Some(button.id)
    }

    fn button_style(&self, kind: ButtonKind, active: bool) -> Style {
        if active {
            return Style::new().add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        let style = match kind {
            ButtonKind::Digit => Style::new(),
            ButtonKind::Function => Style::new().fg(Color::Gray),
            ButtonKind::Operator => Style::new().fg(Color::Yellow),
            ButtonKind::Equals => Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
        };
        self.style(style)
    }

    fn style(&self, style: Style) -> Style {
        if self.colors_enabled {
            style
        } else {
            Style::new().add_modifier(style.add_modifier)
        }
    }
}

impl FrontendAdapter for KeypadFrontend {
    fn render(&mut self, view: &DisplayView) -> Result<()> {
        self.view = view.clone();
        Ok(())
    }
}
