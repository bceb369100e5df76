pub mod dispatch;
pub mod format;
pub mod frontend;

pub use dispatch::{dispatch, Action, InputEvent};
pub use format::{format_display, DisplayView};
pub use frontend::{FrontendAdapter, RecordingFrontend};

use crate::state::CalculatorState;
use anyhow::Result;

/// Snapshot of what the frontend should show for `state`.
pub fn render(state: &CalculatorState) -> DisplayView {
    DisplayView::from_state(state)
}

/// Owns one calculator and the frontend it renders into.
pub struct Session<F: FrontendAdapter> {
    state: CalculatorState,
    frontend: F,
}

impl<F: FrontendAdapter> Session<F> {
    pub fn new(frontend: F) -> Self {
        Self {
            state: CalculatorState::new(),
            frontend,
        }
    }

    /// Normalizes `event` and applies it. Returns `false` for unrecognized
    /// input, which neither touches the state nor re-renders.
    pub fn handle(&mut self, event: &InputEvent) -> Result<bool> {
        let Some(action) = event.action() else {
            return Ok(false);
        };
        self.apply(action)?;
        Ok(true)
    }

    pub fn apply(&mut self, action: Action) -> Result<()> {
        dispatch(&mut self.state, action);
        self.refresh()
    }

    pub fn refresh(&mut self) -> Result<()> {
        let view = render(&self.state);
        self.frontend.render(&view)
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> InputEvent {
        InputEvent::Key(name.to_string())
    }

    #[test]
    fn test_session_renders_after_each_action() {
        let mut session = Session::new(RecordingFrontend::default());
        for name in ["1", "2", "3", "+", "4", "5", "6", "Enter"] {
            assert!(session.handle(&key(name)).expect("handle"));
        }

        let views = &session.frontend().views;
        assert_eq!(views.len(), 8);
        assert_eq!(views[3].expression, "123 +");
        assert_eq!(views[3].active_operator, Some(crate::state::Operator::Add));

        let last = session.frontend().last().expect("rendered");
        assert_eq!(last.primary, "579");
        assert_eq!(last.expression, "123 + 456 =");
        assert_eq!(last.active_operator, None);
    }

    #[test]
    fn test_session_ignores_unknown_input() {
        let mut session = Session::new(RecordingFrontend::default());
        assert!(!session.handle(&key("Tab")).expect("handle"));
        assert!(!session
            .handle(&InputEvent::Button("sqrt".to_string()))
            .expect("handle"));
        assert!(session.frontend().views.is_empty());
        assert_eq!(session.state(), &CalculatorState::new());
    }

    #[test]
    fn test_session_buttons_and_keys_share_engine() {
        let mut session = Session::new(RecordingFrontend::default());
        session
            .handle(&InputEvent::Button("9".to_string()))
            .expect("handle");
        session
            .handle(&InputEvent::Button("toggle-sign".to_string()))
            .expect("handle");
        session.handle(&key("%")).expect("handle");

        assert_eq!(session.state().display_value(), "-0.09");
        assert_eq!(
            session.frontend().last().map(|v| v.primary.as_str()),
            Some("-0.09")
        );
    }
}
