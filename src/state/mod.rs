pub mod calculator;

pub use calculator::{
    calculate, number_to_text, parse_number, CalcError, CalculatorState, Operator, ERROR_TEXT,
    MAX_DIGITS,
};
