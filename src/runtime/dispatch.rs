use crate::state::{CalculatorState, Operator};

/// One engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    ToggleSign,
    Percent,
    Backspace,
}

impl Action {
    /// Maps a keypad button identifier. Backspace has no button.
    pub fn from_button_id(id: &str) -> Option<Self> {
        if let Some(digit) = single_digit(id) {
            return Some(Action::Digit(digit));
        }
        if let Some(op) = Operator::from_id(id) {
            return Some(Action::Operator(op));
        }
        match id {
            "decimal" => Some(Action::Decimal),
            "equals" => Some(Action::Equals),
            "clear" => Some(Action::Clear),
            "toggle-sign" => Some(Action::ToggleSign),
            "percent" => Some(Action::Percent),
            _ => None,
        }
    }

    /// Maps a key name ("7", "+", "Enter", "Escape", ...).
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(digit) = single_digit(key) {
            return Some(Action::Digit(digit));
        }
        match key {
            "." => Some(Action::Decimal),
            "+" => Some(Action::Operator(Operator::Add)),
            "-" => Some(Action::Operator(Operator::Subtract)),
            "*" => Some(Action::Operator(Operator::Multiply)),
            "/" => Some(Action::Operator(Operator::Divide)),
            "Enter" | "=" => Some(Action::Equals),
            "Escape" | "c" | "C" => Some(Action::Clear),
            "%" => Some(Action::Percent),
            "Backspace" => Some(Action::Backspace),
            _ => None,
        }
    }
}

fn single_digit(text: &str) -> Option<u8> {
    match text.as_bytes() {
        [b @ b'0'..=b'9'] => Some(b - b'0'),
        _ => None,
    }
}

/// Raw input before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Button(String),
    Key(String),
}

impl InputEvent {
    pub fn action(&self) -> Option<Action> {
        match self {
            InputEvent::Button(id) => Action::from_button_id(id),
            InputEvent::Key(name) => Action::from_key(name),
        }
    }
}

/// Applies exactly one engine operation to `state`.
pub fn dispatch(state: &mut CalculatorState, action: Action) {
    let before = state.clone();

    match action {
        Action::Digit(digit) => state.input_digit(digit),
        Action::Decimal => state.input_decimal(),
        Action::Operator(op) => state.select_operator(op),
        Action::Equals => state.equals(),
        Action::Clear => state.clear(),
        Action::ToggleSign => state.toggle_sign(),
        Action::Percent => state.percent(),
        Action::Backspace => state.backspace(),
    }

    if *state != before {
        tracing::debug!(
            ?action,
            display = state.display_value(),
            expression = state.expression(),
            "state updated"
        );
    }
}
