// file: src/shell.rs
// description: interactive terminal front end driving a search session
// reference: https://docs.rs/tokio/latest/tokio/macro.select.html

use crate::error::QueryError;
use crate::launcher::LaunchTarget;
use crate::session::{SearchSession, SessionEvent};
use crate::utils::logging::{format_failure, format_info, format_query, format_success, format_warning};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "Type what you are looking for and press Enter.\n  :reset  clear the screen\n  :help   show this message\n  :quit   exit (also :q or Ctrl-D)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Submit(String),
    Reset,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Command::Empty,
            ":reset" => Command::Reset,
            ":help" | ":h" => Command::Help,
            ":quit" | ":q" | ":exit" => Command::Quit,
            other if other.starts_with(':') && !other.contains(char::is_whitespace) => {
                Command::Unknown(other.to_string())
            }
            other => Command::Submit(other.to_string()),
        }
    }
}

pub struct Shell<R, W> {
    session: SearchSession,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    input: Lines<R>,
    output: W,
    pending: Option<u64>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        session: SearchSession,
        events: mpsc::UnboundedReceiver<SessionEvent>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            session,
            events,
            input: input.lines(),
            output,
            pending: None,
        }
    }

    /// Runs until `:quit` or end of input. Request failures are printed, never returned.
    pub async fn run(mut self) -> std::io::Result<()> {
        self.write_line(&format_info("AI Google Search Generator")).await?;
        self.write_line(HELP).await?;
        self.prompt().await?;

        let mut end_of_input = false;
        loop {
            tokio::select! {
                line = self.input.next_line() => {
                    let Some(line) = line? else {
                        end_of_input = true;
                        break;
                    };
                    if !self.handle_command(Command::parse(&line)).await? {
                        break;
                    }
                }
                Some(event) = self.events.recv() => {
                    self.handle_event(event).await?;
                }
            }
        }

        if end_of_input {
            self.drain_pending().await?;
        }
        self.write_line(&format_info("Bye")).await?;
        Ok(())
    }

    async fn handle_command(&mut self, command: Command) -> std::io::Result<bool> {
        debug!("Shell command: {:?}", command);

        match command {
            Command::Quit => return Ok(false),
            Command::Empty => {}
            Command::Help => self.write_line(HELP).await?,
            Command::Reset => self.output.write_all(b"\x1b[2J\x1b[H").await?,
            Command::Unknown(name) => {
                self.write_line(&format_warning(&format!("Unknown command {}, try :help", name)))
                    .await?
            }
            Command::Submit(text) => match self.session.submit(&text) {
                Ok(seq) => {
                    self.pending = Some(seq);
                    self.write_line(&format_info("Composing search query...")).await?;
                    return Ok(true);
                }
                Err(QueryError::Busy) => {
                    self.write_line(&format_warning(&QueryError::Busy.to_string()))
                        .await?
                }
                Err(err) => self.write_line(&format_failure(&err)).await?,
            },
        }

        self.prompt().await?;
        Ok(true)
    }

    async fn handle_event(&mut self, event: SessionEvent) -> std::io::Result<()> {
        let is_final = event.is_final();
        if is_final && self.pending == Some(event.seq()) {
            self.pending = None;
        }

        match event {
            SessionEvent::Composed { result, .. } => {
                self.write_line(&format_query(&result.refined_query)).await?;
            }
            SessionEvent::Launched { target, .. } => {
                let message = match &target {
                    LaunchTarget::Direct(url) => format!("Opening {}", url),
                    LaunchTarget::Search(url) => format!("Opening browser with {}", url),
                };
                self.write_line(&format_success(&message)).await?;
            }
            SessionEvent::Failed { error, .. } => {
                self.write_line(&format_failure(&error)).await?;
            }
            SessionEvent::Superseded { .. } => {
                self.write_line(&format_warning("Dropped an outdated response"))
                    .await?;
            }
        }

        if is_final {
            self.prompt().await?;
        }
        Ok(())
    }

    /// Lets an outstanding request report before exiting on end of input.
    async fn drain_pending(&mut self) -> std::io::Result<()> {
        while self.pending.is_some() {
            match self.events.recv().await {
                Some(event) => self.handle_event(event).await?,
                None => break,
            }
        }
        Ok(())
    }

    async fn prompt(&mut self) -> std::io::Result<()> {
        self.output.write_all(b"> ").await?;
        self.output.flush().await
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}
