//! Terminal setup, teardown and the crossterm event pump.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, MouseEvent},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Input forwarded from the event task.
#[derive(Debug, Clone)]
pub enum TermEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    task: JoinHandle<()>,
    cancel: CancellationToken,
    event_rx: UnboundedReceiver<TermEvent>,
    mouse_enabled: bool,
    entered: bool,
}

impl Tui {
    pub fn new(mouse_enabled: bool) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut reader = EventStream::new();
                loop {
                    tokio::select! {
                        biased;

                        _ = cancel.cancelled() => break,
                        maybe_event = reader.next() => {
                            let forwarded = match maybe_event {
                                Some(Ok(Event::Key(key))) => TermEvent::Key(key),
                                Some(Ok(Event::Mouse(mouse))) => TermEvent::Mouse(mouse),
                                Some(Ok(Event::Resize(_, _))) => TermEvent::Resize,
                                Some(Ok(_)) => continue,
                                Some(Err(e)) => {
                                    tracing::warn!("terminal event error: {e}");
                                    continue;
                                }
                                None => break,
                            };
                            if event_tx.send(forwarded).is_err() {
                                break;
                            }
                        }
                    }
                }
            })
        };

        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .context("failed to open terminal")?;

        Ok(Self {
            terminal,
            task,
            cancel,
            event_rx,
            mouse_enabled,
            entered: false,
        })
    }

    /// Enter the alternate screen and enable raw mode
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        if self.mouse_enabled {
            io::stdout().execute(EnableMouseCapture)?;
        }
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        self.entered = true;
        Ok(())
    }

    /// Leave the alternate screen and disable raw mode
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.terminal.show_cursor()?;
        if self.mouse_enabled {
            io::stdout().execute(DisableMouseCapture)?;
        }
        io::stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }

    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub async fn next(&mut self) -> Option<TermEvent> {
        self.event_rx.recv().await
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.cancel.cancel();
        let _ = self.exit();
        self.task.abort();
    }
}

/// Restores the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
        original_hook(panic_info);
    }));
}
