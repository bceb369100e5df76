use super::format::DisplayView;
use anyhow::Result;

/// A surface that shows the formatted value and the expression trace.
pub trait FrontendAdapter {
    fn render(&mut self, view: &DisplayView) -> Result<()>;
}

/// Keeps every rendered view. Useful for driving a session without a terminal.
#[derive(Debug, Default)]
pub struct RecordingFrontend {
    pub views: Vec<DisplayView>,
}

impl RecordingFrontend {
    pub fn last(&self) -> Option<&DisplayView> {
        self.views.last()
    }
}

impl FrontendAdapter for RecordingFrontend {
    fn render(&mut self, view: &DisplayView) -> Result<()> {
        self.views.push(view.clone());
        Ok(())
    }
}
