pub mod keypad;
pub mod plain;
mod terminal;

use crate::config::Config;
use crate::runtime::{InputEvent, Session};
use anyhow::Result;
use crossterm::event::{MouseButton, MouseEventKind};
use keypad::{is_quit_key, key_name, KeypadFrontend};
use plain::{run_lines, LinePrinter};
use std::io::{self, IsTerminal};
use terminal::{install_panic_hook, TermEvent, Tui};
use tokio::io::BufReader;

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The line frontend is used when forced or when either end of the
    /// terminal is redirected.
    pub fn uses_plain_mode(config: &Config) -> bool {
        config.plain || !io::stdin().is_terminal() || !io::stdout().is_terminal()
    }

    pub async fn run(&mut self) -> Result<()> {
        if Self::uses_plain_mode(&self.config) {
            self.run_plain().await
        } else {
            self.run_keypad().await
        }
    }

    async fn run_plain(&mut self) -> Result<()> {
        let printer = LinePrinter::new(
            io::stdout(),
            self.config.display_width,
            self.config.colors_enabled,
        );
        let mut session = Session::new(printer);
        run_lines(BufReader::new(tokio::io::stdin()), &mut session).await
    }

    async fn run_keypad(&mut self) -> Result<()> {
        install_panic_hook();
        let mut tui = Tui::new(self.config.mouse_enabled)?;
        tui.enter()?;

        let mut session = Session::new(KeypadFrontend::new(self.config.colors_enabled));
        session.refresh()?;
        tracing::info!("keypad started");

        loop {
            tui.draw(|frame| session.frontend_mut().draw(frame))?;

            let Some(event) = tui.next().await else {
                break;
            };

            match event {
                TermEvent::Key(key) => {
                    if is_quit_key(&key) {
                        break;
                    }
                    if let Some(name) = key_name(&key) {
                        session.handle(&InputEvent::Key(name))?;
                    }
                }
                TermEvent::Mouse(mouse) => {
                    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                        continue;
                    }
                    if let Some(id) = session.frontend().button_at(mouse.column, mouse.row) {
                        session.handle(&InputEvent::Button(id.to_string()))?;
                    }
                }
                TermEvent::Resize => {}
            }
        }

        tracing::info!("keypad stopped");
        tui.exit()
    }
}
