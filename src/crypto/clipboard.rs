//! Clipboard backends.
//!
//! The primary backend pipes text into the platform clipboard utility. The
//! fallback writes an OSC 52 escape sequence so the terminal performs the
//! copy itself, which works over SSH and where no utility is installed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::crypto::assets::CryptoAsset;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard available")]
    Unavailable,

    #[error("no address configured for {0}")]
    UnknownAsset(CryptoAsset),

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}")]
    Failed { tool: &'static str, status: ExitStatus },

    #[error("failed to write terminal copy sequence: {0}")]
    Terminal(#[source] io::Error),
}

pub trait ClipboardBackend {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy)]
struct ClipboardTool {
    program: &'static str,
    args: &'static [&'static str],
}

const TOOLS: [ClipboardTool; 5] = [
    ClipboardTool { program: "pbcopy", args: &[] },
    ClipboardTool { program: "wl-copy", args: &[] },
    ClipboardTool { program: "xclip", args: &["-selection", "clipboard"] },
    ClipboardTool { program: "xsel", args: &["--clipboard", "--input"] },
    ClipboardTool { program: "clip", args: &[] },
];

/// The platform clipboard utility found on `PATH`, if any.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    tool: Option<ClipboardTool>,
}

impl SystemClipboard {
    pub fn detect() -> Self {
        let tool = TOOLS.into_iter().find(|tool| which::which(tool.program).is_ok());
        match tool {
            Some(tool) => tracing::debug!(tool = tool.program, "Clipboard utility found"),
            None => tracing::debug!("No clipboard utility on PATH"),
        }
        Self { tool }
    }

    /// A backend that reports itself unavailable.
    pub fn none() -> Self {
        Self { tool: None }
    }
}

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        self.tool.map(|t| t.program).unwrap_or("system")
    }

    fn is_available(&self) -> bool {
        self.tool.is_some()
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let tool = self.tool.ok_or(ClipboardError::Unavailable)?;
        let mut child = Command::new(tool.program)
            .args(tool.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn { tool: tool.program, source })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(source) = stdin.write_all(text.as_bytes()) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ClipboardError::Spawn { tool: tool.program, source });
            }
        }

        let status = child
            .wait()
            .map_err(|source| ClipboardError::Spawn { tool: tool.program, source })?;
        if !status.success() {
            return Err(ClipboardError::Failed { tool: tool.program, status });
        }
        Ok(())
    }
}

/// OSC 52 copy through the controlling terminal.
///
/// Only available when `out` reaches a terminal; a pipe or file would just
/// receive the escape sequence.
pub struct TerminalClipboard<W> {
    out: W,
    attached: bool,
}

impl TerminalClipboard<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let attached = out.is_terminal();
        Self::new(out, attached)
    }
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W, attached: bool) -> Self {
        Self { out, attached }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClipboardBackend for TerminalClipboard<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn is_available(&self) -> bool {
        self.attached
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.attached {
            return Err(ClipboardError::Unavailable);
        }
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))
            .and_then(|_| self.out.flush())
            .map_err(ClipboardError::Terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_sequence() {
        let mut clipboard = TerminalClipboard::new(Vec::new(), true);
        clipboard.write_text("bc1q").unwrap();
        assert_eq!(clipboard.into_inner(), b"\x1b]52;c;YmMxcQ==\x07".to_vec());
    }

    #[test]
    fn test_detached_terminal_writes_nothing() {
        let mut clipboard = TerminalClipboard::new(Vec::new(), false);
        assert!(!clipboard.is_available());
        assert!(matches!(clipboard.write_text("bc1q"), Err(ClipboardError::Unavailable)));
        assert!(clipboard.into_inner().is_empty());
    }

    #[test]
    fn test_missing_utility_is_unavailable() {
        let mut clipboard = SystemClipboard::none();
        assert!(!clipboard.is_available());
        assert!(matches!(clipboard.write_text("x"), Err(ClipboardError::Unavailable)));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_closing_stdin_is_an_error() {
        // `true` exits without reading, so the write hits a closed pipe.
        let mut clipboard = SystemClipboard {
            tool: Some(ClipboardTool { program: "true", args: &[] }),
        };
        let text = "x".repeat(4 * 1024 * 1024);
        assert!(matches!(
            clipboard.write_text(&text),
            Err(ClipboardError::Spawn { tool: "true", .. })
        ));
    }
}
