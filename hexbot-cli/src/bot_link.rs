//! Talking to a bot over the line protocol

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};

use hexbot_core::{Board, Color};

/// One end of a protocol conversation with a bot
pub trait BotLink {
    /// Name used in reports and logs
    fn name(&self) -> &str;

    /// Send a command that has no reply
    fn send(&mut self, line: &str) -> Result<()>;

    /// Send a command and read its one-line reply
    fn request(&mut self, line: &str) -> Result<String>;

    /// Ask for the bot's view of the board
    fn board(&mut self) -> Result<Board> {
        let reply = self.request("show_board")?;
        reply
            .parse::<Board>()
            .with_context(|| format!("{} sent an unreadable board `{}`", self.name(), reply))
    }
}

// ============================================================================
// CHILD PROCESS
// ============================================================================

/// A bot executable running as a child process.
///
/// Dropping it closes the bot's stdin, which ends a well-behaved bot's session.
pub struct BotProcess {
    name: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl BotProcess {
    /// Start `path` with `color` as its only argument
    pub fn spawn(path: &Path, color: Color) -> Result<Self> {
        let mut child = Command::new(path)
            .arg(color.name())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start bot {}", path.display()))?;

        let stdin = child.stdin.take().context("bot stdin was not captured")?;
        let stdout = child.stdout.take().context("bot stdout was not captured")?;

        let name = format!("{} ({})", path.display(), color);
        tracing::info!(bot = %name, pid = child.id(), "bot started");

        Ok(Self {
            name,
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Send `quit`, close the pipe and wait for the bot to exit
    pub fn shutdown(mut self) -> Result<()> {
        // A bot that already exited cannot read this; its exit status still counts
        if let Err(e) = writeln!(self.stdin, "quit") {
            tracing::debug!(bot = %self.name, error = %e, "quit not delivered");
        }
        drop(self.stdin);

        let status = self
            .child
            .wait()
            .with_context(|| format!("waiting for {} to exit", self.name))?;
        tracing::info!(bot = %self.name, %status, "bot exited");
        Ok(())
    }
}

impl BotLink for BotProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, line: &str) -> Result<()> {
        tracing::trace!(bot = %self.name, line, "send");
        writeln!(self.stdin, "{}", line)
            .and_then(|()| self.stdin.flush())
            .with_context(|| format!("{} stopped accepting input", self.name))
    }

    fn request(&mut self, line: &str) -> Result<String> {
        self.send(line)?;

        let mut reply = String::new();
        let read = self
            .stdout
            .read_line(&mut reply)
            .with_context(|| format!("reading reply to `{}` from {}", line, self.name))?;
        if read == 0 {
            bail!("{} closed its output instead of answering `{}`", self.name, line);
        }

        let reply = reply.trim_end().to_string();
        tracing::trace!(bot = %self.name, reply = %reply, "received");
        Ok(reply)
    }
}

// ============================================================================
// IN-PROCESS BOT (tests)
// ============================================================================
