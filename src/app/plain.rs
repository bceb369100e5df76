use crate::runtime::{DisplayView, FrontendAdapter, InputEvent, Session};
use crate::util::pad_left;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const NAMED_KEYS: [&str; 3] = ["Enter", "Escape", "Backspace"];

/// Line-oriented display: keeps the latest view and prints it on `present`.
pub struct LinePrinter<W: Write> {
    out: W,
    width: usize,
    colors_enabled: bool,
    pending: Option<DisplayView>,
}

impl<W: Write> LinePrinter<W> {
    pub fn new(out: W, width: usize, colors_enabled: bool) -> Self {
        Self {
            out,
            width,
            colors_enabled,
            pending: None,
        }
    }

    /// Prints the most recent view, if anything changed since the last call.
    pub fn present(&mut self) -> Result<()> {
        let Some(view) = self.pending.take() else {
            return Ok(());
        };

        if !view.expression.is_empty() {
            let line = pad_left(&view.expression, self.width);
            if self.colors_enabled {
                writeln!(self.out, "\x1b[2m{line}\x1b[0m")?;
            } else {
                writeln!(self.out, "{line}")?;
            }
        }

        let line = pad_left(&view.primary, self.width);
        if self.colors_enabled {
            writeln!(self.out, "\x1b[1m{line}\x1b[0m")?;
        } else {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrontendAdapter for LinePrinter<W> {
    fn render(&mut self, view: &DisplayView) -> Result<()> {
        self.pending = Some(view.clone());
        Ok(())
    }
}

/// Splits one token into input events. Button ids and named keys are taken
/// whole; anything else is read one key per character, so "12+3=" works.
pub fn token_events(token: &str) -> Vec<InputEvent> {
    if is_escape_command(token) {
        return vec![InputEvent::Key("Escape".to_string())];
    }
    if NAMED_KEYS.contains(&token) {
        return vec![InputEvent::Key(token.to_string())];
    }
    if token.chars().count() > 1 && InputEvent::Button(token.to_string()).action().is_some() {
        return vec![InputEvent::Button(token.to_string())];
    }
    token
        .chars()
        .map(|ch| InputEvent::Key(ch.to_string()))
        .collect()
}

pub fn is_quit_command(input: &str) -> bool {
    matches!(input, "q" | "quit" | "exit" | "/q" | "/quit" | "/exit")
}

fn is_escape_command(input: &str) -> bool {
    input == "\u{1b}" || matches!(input, "esc" | "/esc" | "escape" | "/escape")
}

/// Feeds `reader` line by line into the session, printing the display after
/// each line. Stops at EOF or a quit command.
pub async fn run_lines<R, W>(reader: R, session: &mut Session<LinePrinter<W>>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.refresh()?;
    session.frontend_mut().present()?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit_command(line) {
            tracing::debug!("quit requested");
            break;
        }

        for token in line.split_whitespace() {
            for event in token_events(token) {
                session.handle(&event)?;
            }
        }
        session.frontend_mut().present()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<LinePrinter<Vec<u8>>> {
        Session::new(LinePrinter::new(Vec::new(), 16, false))
    }

    fn output(session: Session<LinePrinter<Vec<u8>>>) -> String {
        String::from_utf8(session.into_frontend().into_inner()).expect("utf8")
    }

    #[test]
    fn test_token_events() {
        assert_eq!(
            token_events("toggle-sign"),
            vec![InputEvent::Button("toggle-sign".to_string())]
        );
        assert_eq!(
            token_events("Enter"),
            vec![InputEvent::Key("Enter".to_string())]
        );
        assert_eq!(
            token_events("esc"),
            vec![InputEvent::Key("Escape".to_string())]
        );
        assert_eq!(
            token_events("1+2"),
            vec![
                InputEvent::Key("1".to_string()),
                InputEvent::Key("+".to_string()),
                InputEvent::Key("2".to_string()),
            ]
        );
        assert_eq!(token_events("7"), vec![InputEvent::Key("7".to_string())]);
    }

    #[test]
    fn test_quit_commands() {
        assert!(is_quit_command("quit"));
        assert!(is_quit_command("/exit"));
        assert!(!is_quit_command("c"));
    }

    #[tokio::test]
    async fn test_run_lines_prints_after_each_line() {
        let mut session = session();
        let input: &[u8] = b"123 + 456\n=\n";
        run_lines(input, &mut session).await.expect("run");

        let expected: String = ["0", "123 +", "456", "123 + 456 =", "579"]
            .iter()
            .map(|line| format!("{line:>16}\n"))
            .collect();
        assert_eq!(output(session), expected);
    }

    #[tokio::test]
    async fn test_run_lines_stops_on_quit() {
        let mut session = session();
        let input: &[u8] = b"9\nquit\n5\n";
        run_lines(input, &mut session).await.expect("run");
        assert_eq!(session.state().display_value(), "9");
    }

    #[tokio::test]
    async fn test_run_lines_skips_unknown_tokens() {
        let mut session = session();
        let input: &[u8] = b"4 x 2\n";
        run_lines(input, &mut session).await.expect("run");
        assert_eq!(session.state().display_value(), "42");
    }
}
