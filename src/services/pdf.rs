//! HTML-to-PDF conversion with headless Chromium.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use url::Url;

const HEADLESS_ARGS: &[&str] = &["--headless", "--disable-gpu", "--no-sandbox"];

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("browser exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("browser did not finish within {0} seconds")]
    Timeout(u64),

    #[error("browser produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Drives a headless Chromium binary.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    binary: String,
    timeout: Duration,
}

impl PdfRenderer {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Print `html` to an A4 PDF at `pdf`.
    ///
    /// The PDF must exist and be non-empty afterwards.
    #[tracing::instrument(skip(self))]
    pub async fn render(&self, html: &Path, pdf: &Path) -> Result<(), RenderError> {
        let html = std::path::absolute(html)?;
        let source = Url::from_file_path(&html).map_err(|_| {
            RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", html.display()),
            ))
        })?;

        let mut command = self.command();
        command
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf.display()))
            .arg(source.as_str());
        self.run(command).await?;

        match tokio::fs::metadata(pdf).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(RenderError::MissingOutput(pdf.to_path_buf())),
        }
    }

    /// Launch the browser headlessly on a blank page and expect a clean exit.
    pub async fn smoke_test(&self) -> Result<(), RenderError> {
        let mut command = self.command();
        command.arg("--dump-dom").arg("about:blank");
        self.run(command).await
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(HEADLESS_ARGS)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    async fn run(&self, mut command: Command) -> Result<(), RenderError> {
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))?
            .map_err(|source| RenderError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Exit {
                status: output.status.to_string(),
                stderr: stderr.lines().last().unwrap_or_default().to_string(),
            });
        }

        Ok(())
    }
}
