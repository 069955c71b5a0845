// file: src/launcher/opener.rs
// description: hands a url to the operating system's default browser handler
// reference: https://docs.rs/tokio/latest/tokio/process

use crate::error::{QueryError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;
use url::Url;

/// How long a freshly spawned opener gets to report a failure.
const EXIT_GRACE: Duration = Duration::from_millis(500);

#[async_trait]
pub trait BrowserOpener: Send + Sync {
    async fn open(&self, url: &Url) -> Result<()>;
}

/// Program plus leading arguments; the url is appended last.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemBrowser {
    program: String,
    args: Vec<String>,
}

impl SystemBrowser {
    pub fn new(command: Option<&str>) -> Self {
        match command.map(str::trim).filter(|c| !c.is_empty()) {
            Some(command) => Self::from_command_line(command),
            None => Self::platform_default(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::from_parts("open", &[])
        } else if cfg!(target_os = "windows") {
            Self::windows_default()
        } else {
            Self::from_parts("xdg-open", &[])
        }
    }

    /// No shell in between, so `&` and friends in the url stay literal.
    fn windows_default() -> Self {
        Self::from_parts("rundll32", &["url.dll,FileProtocolHandler"])
    }

    fn from_command_line(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
        }
    }

    fn from_parts(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments handed to the program: the configured ones, then the url as one argument.
    pub fn command_args(&self, url: &Url) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(url.as_str().to_string());
        args
    }
}

#[async_trait]
impl BrowserOpener for SystemBrowser {
    /// Spawns the opener without waiting for the browser to exit. A non-zero
    /// exit inside `EXIT_GRACE` is a launch failure; still running after that
    /// counts as launched.
    async fn open(&self, url: &Url) -> Result<()> {
        let args = self.command_args(url);
        debug!("Launching {} {:?}", self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                QueryError::BrowserLaunch(format!(
                    "no default browser handler ({}): {}",
                    self.program, e
                ))
            })?;

        match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
            Ok(Ok(status)) if !status.success() => Err(QueryError::BrowserLaunch(format!(
                "{} exited with {}",
                self.program, status
            ))),
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(QueryError::BrowserLaunch(format!(
                "lost track of {}: {}",
                self.program, e
            ))),
            Err(_) => {
                debug!("{} still running, leaving it in the background", self.program);
                Ok(())
            }
        }
    }
}
