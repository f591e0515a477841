// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline text sources.

use crate::pipeline::{PipelineError, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Where to read pipeline text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineSource {
    /// A file on disk.
    File(PathBuf),
    /// Standard input, read to end.
    Stdin,
    /// The system clipboard, via the platform's paste command.
    Clipboard,
}

impl PipelineSource {
    /// Read the raw pipeline text.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or yields no text.
    pub async fn read(&self) -> Result<String> {
        let text = match self {
            Self::File(path) => tokio::fs::read_to_string(path).await?,
            Self::Stdin => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                text
            }
            Self::Clipboard => read_clipboard().await?,
        };

        if text.trim().is_empty() {
            return Err(PipelineError::Empty);
        }
        Ok(text)
    }
}

/// Paste command for the current platform.
fn clipboard_command() -> Result<(&'static str, &'static [&'static str])> {
    const MACOS: &[&str] = &[];
    const WINDOWS: &[&str] = &["-NoProfile", "-Command", "Get-Clipboard"];
    const LINUX: &[&str] = &["-selection", "clipboard", "-o"];

    if cfg!(target_os = "macos") {
        Ok(("pbpaste", MACOS))
    } else if cfg!(target_os = "windows") {
        Ok(("powershell.exe", WINDOWS))
    } else if cfg!(target_os = "linux") {
        Ok(("xclip", LINUX))
    } else {
        Err(PipelineError::ClipboardUnsupported(std::env::consts::OS))
    }
}

async fn read_clipboard() -> Result<String> {
    let (program, args) = clipboard_command()?;
    let output = Command::new(program).args(args).output().await?;

    if !output.status.success() {
        return Err(PipelineError::ClipboardCommand {
            command: program.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
