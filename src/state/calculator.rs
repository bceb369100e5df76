use thiserror::Error;

/// Maximum number of digit characters accepted for a single entry.
pub const MAX_DIGITS: usize = 15;

/// Terminal display value shown after a failed evaluation.
pub const ERROR_TEXT: &str = "Error";

const INITIAL_DISPLAY: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    fn apply(self, left: f64, right: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(left / right)
            }
        }
    }

    /// Symbol used in the expression trace.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "\u{2212}",
            Operator::Multiply => "\u{d7}",
            Operator::Divide => "\u{f7}",
        }
    }

    /// Action identifier carried by the operator's button.
    pub fn id(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Subtract => "subtract",
            Operator::Multiply => "multiply",
            Operator::Divide => "divide",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Applies `operator` to the two operands.
///
/// Without an operator the right operand passes through unchanged. The engine
/// never reaches that branch through its own input vocabulary.
pub fn calculate(left: f64, right: f64, operator: Option<Operator>) -> Result<f64, CalcError> {
    match operator {
        Some(op) => op.apply(left, right),
        None => Ok(right),
    }
}

/// Parses a display value. Only finite numbers count; "Error" and partial
/// entries such as "-" yield `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Converts a number to the text stored in the display: integral values
/// carry no fraction, exponent form kicks in at 1e21 and below 1e-6.
pub fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return INITIAL_DISPLAY.to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        };
    }

    format!("{value}")
}

/// Entry and evaluation state for one calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    display_value: String,
    first_operand: Option<f64>,
    waiting_for_second_operand: bool,
    operator: Option<Operator>,
    expression: String,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display_value: INITIAL_DISPLAY.to_string(),
            first_operand: None,
            waiting_for_second_operand: false,
            operator: None,
            expression: String::new(),
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    pub fn first_operand(&self) -> Option<f64> {
        self.first_operand
    }

    pub fn is_waiting_for_second_operand(&self) -> bool {
        self.waiting_for_second_operand
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_error(&self) -> bool {
        self.display_value == ERROR_TEXT
    }

    /// Appends `digit` to the entry. Values above 9 are ignored.
    pub fn input_digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        let ch = char::from(b'0' + digit);

        if self.waiting_for_second_operand {
            self.display_value = ch.to_string();
            self.waiting_for_second_operand = false;
            return;
        }

        if digit_count(&self.display_value) >= MAX_DIGITS {
            return;
        }

        if self.display_value == INITIAL_DISPLAY || self.is_error() {
            self.display_value = ch.to_string();
        } else {
            self.display_value.push(ch);
        }
    }

    pub fn input_decimal(&mut self) {
        if self.waiting_for_second_operand || self.is_error() {
            self.display_value = "0.".to_string();
            self.waiting_for_second_operand = false;
            return;
        }

        if !self.display_value.contains('.') {
            self.display_value.push('.');
        }
    }

    pub fn select_operator(&mut self, next: Operator) {
        if self.operator.is_some() && self.waiting_for_second_operand {
            self.operator = Some(next);
            self.expression = self.pending_expression(next);
            return;
        }

        let Some(input) = parse_number(&self.display_value) else {
            return;
        };

        match (self.first_operand, self.operator) {
            (None, _) => self.first_operand = Some(input),
            (Some(first), Some(pending)) => match evaluate(first, input, pending) {
                Some(result) => {
                    self.display_value = number_to_text(result);
                    self.first_operand = Some(result);
                }
                None => {
                    // The newly chosen operator is dropped along with the chain.
                    self.enter_error();
                    return;
                }
            },
            (Some(_), None) => {}
        }

        self.waiting_for_second_operand = true;
        self.operator = Some(next);
        self.expression = self.pending_expression(next);
    }

    pub fn equals(&mut self) {
        let Some(pending) = self.operator else {
            return;
        };
        if self.waiting_for_second_operand {
            return;
        }
        let (Some(first), Some(second)) =
            (self.first_operand, parse_number(&self.display_value))
        else {
            return;
        };

        match evaluate(first, second, pending) {
            Some(result) => {
                self.expression = format!(
                    "{} {} {} =",
                    number_to_text(first),
                    pending.symbol(),
                    number_to_text(second)
                );
                self.display_value = number_to_text(result);
            }
            None => {
                self.display_value = ERROR_TEXT.to_string();
                self.expression.clear();
            }
        }

        self.first_operand = None;
        self.operator = None;
        self.waiting_for_second_operand = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_sign(&mut self) {
        if self.display_value == INITIAL_DISPLAY || self.is_error() {
            return;
        }

        self.display_value = match self.display_value.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{}", self.display_value),
        };
    }

    pub fn percent(&mut self) {
        if let Some(value) = parse_number(&self.display_value) {
            self.display_value = number_to_text(value / 100.0);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_error() {
            self.display_value = INITIAL_DISPLAY.to_string();
            return;
        }

        self.display_value.pop();
        if self.display_value.is_empty() || self.display_value == "-" {
            self.display_value = INITIAL_DISPLAY.to_string();
        }
    }

    fn pending_expression(&self, op: Operator) -> String {
        let first = self.first_operand.map_or_else(
            || INITIAL_DISPLAY.to_string(),
            number_to_text,
        );
        format!("{first} {}", op.symbol())
    }

    fn enter_error(&mut self) {
        self.display_value = ERROR_TEXT.to_string();
        self.first_operand = None;
        self.operator = None;
        self.waiting_for_second_operand = false;
        self.expression.clear();
    }
}

/// Runs one binary operation, folding division by zero and overflow to
/// infinity into `None`.
fn evaluate(left: f64, right: f64, op: Operator) -> Option<f64> {
    match calculate(left, right, Some(op)) {
        Ok(result) if result.is_finite() => Some(result),
        Ok(result) => {
            tracing::debug!(left, right, op = op.id(), result, "non-finite result");
            None
        }
        Err(e) => {
            tracing::debug!(left, right, op = op.id(), "{e}");
            None
        }
    }
}

fn digit_count(text: &str) -> usize {
    text.chars().filter(char::is_ascii_digit).count()
}
