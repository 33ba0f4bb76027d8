//! Clipboard writers.
//!
//! [`SystemClipboard`] pipes text into the first platform clipboard tool
//! that is installed. [`FileClipboard`] writes to a file instead and serves
//! as the fallback when no tool is available (headless hosts, CI).

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Errors raised while writing to a clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("No clipboard tool found (tried: {0})")]
    NoBackend(String),

    #[error("Clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

/// Write-only clipboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), ClipboardError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// A clipboard command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Clipboard backed by platform command-line tools.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tools: Vec<ClipboardTool>,
}

impl SystemClipboard {
    /// Uses the tools appropriate for the current platform.
    pub fn new() -> Self {
        Self {
            tools: platform_tools(),
        }
    }

    /// Uses an explicit tool list, tried in order.
    pub fn with_tools(tools: Vec<ClipboardTool>) -> Self {
        Self { tools }
    }

    async fn run(tool: &ClipboardTool, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(tool.program)
            .args(tool.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(ClipboardError::Failed {
                program: tool.program.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_tools() -> Vec<ClipboardTool> {
    if cfg!(target_os = "macos") {
        return vec![ClipboardTool {
            program: "pbcopy",
            args: &[],
        }];
    }

    if cfg!(target_os = "windows") {
        return vec![ClipboardTool {
            program: "clip",
            args: &[],
        }];
    }

    let mut tools = Vec::new();
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        tools.push(ClipboardTool {
            program: "wl-copy",
            args: &[],
        });
    }
    tools.push(ClipboardTool {
        program: "xclip",
        args: &["-selection", "clipboard"],
    });
    tools.push(ClipboardTool {
        program: "xsel",
        args: &["--clipboard", "--input"],
    });
    tools
}

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        for tool in &self.tools {
            match Self::run(tool, text).await {
                Ok(()) => {
                    debug!("Copied {} bytes via {}", text.len(), tool.program);
                    return Ok(());
                }
                Err(ClipboardError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("{} not installed", tool.program);
                }
                Err(e) => return Err(e),
            }
        }

        let tried: Vec<&str> = self.tools.iter().map(|t| t.program).collect();
        Err(ClipboardError::NoBackend(tried.join(", ")))
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

/// Writes copied text to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ClipboardWriter for FileClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, text).await?;

        debug!("Copied {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
