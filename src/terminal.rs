use std::io::Write;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use crate::app::View;
use crate::command::{Command, HELP};
use crate::controller::{Action, Notice, NoticeKind};
use crate::render::Screen;

/// Prints every snapshot and notice to stdout.
#[derive(Debug, Default)]
pub struct TerminalView;

impl View for TerminalView {
    fn render(&mut self, screen: &Screen) {
        let mut out = std::io::stdout().lock();
        if let Err(err) = write!(out, "\n{}", screen).and_then(|_| out.flush()) {
            log::warn!("failed to draw screen: {}", err);
        }
    }

    fn notify(&mut self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => println!(">>> {}", notice.text),
            NoticeKind::Failure => println!("!!! {}", notice.text),
        }
    }
}

/// Feeds parsed commands from `input` into `events` until EOF or `quit`.
/// Dropping `events` on return is what stops the app.
pub async fn read_commands<R>(input: R, events: mpsc::Sender<Action>) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Dispatch(action)) => {
                if events.send(action).await.is_err() {
                    break;
                }
            }
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => break,
            Err(err) => eprintln!("{}", err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stops_at_quit() {
        let input: &[u8] = "sort faculty\n\nnonsense\nsubmit\nquit\nsubmit\n".as_bytes();
        let (tx, mut rx) = mpsc::channel(8);
        read_commands(input, tx).await.unwrap();

        let mut received = Vec::new();
        while let Some(action) = rx.recv().await {
            received.push(action);
        }
        assert_eq!(received.len(), 2);
        assert!(matches!(received[1], Action::Submit));
    }
}
