use between_core::ErrorCode;
use between_core::error::CentralityError;
use between_core::pipeline::Centrality;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }

    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// What a successful run prints on stdout.
#[derive(Debug, Serialize)]
pub struct RunDiagnostics {
    pub exec_time_secs: f64,
    pub memory_kb: usize,
    pub nodes: usize,
    pub edges: usize,
    pub engine: String,
    pub output: String,
}

impl RunDiagnostics {
    pub fn new(
        elapsed: Duration,
        peak_bytes: usize,
        centrality: &Centrality,
        output: &Path,
    ) -> Self {
        Self {
            exec_time_secs: elapsed.as_secs_f64(),
            memory_kb: peak_bytes / 1024,
            nodes: centrality.node_count,
            edges: centrality.edge_count,
            engine: centrality.engine.to_string(),
            output: output.display().to_string(),
        }
    }

    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Exec. time: {}s", self.exec_time_secs)?;
        writeln!(w, "Memory usage = {}kB", self.memory_kb)
    }
}

/// Print diagnostics to stdout in the requested format.
pub fn render_diagnostics(mode: OutputMode, diagnostics: &RunDiagnostics) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, diagnostics)?;
            writeln!(out)?;
        }
        OutputMode::Human => diagnostics.render_human(&mut out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Classify by the core error or the error code attached as context.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<CentralityError>()
            .map(CentralityError::code)
            .or_else(|| err.downcast_ref::<ErrorCode>().copied());

        // An attached ErrorCode shows up as its own "E####" link; drop it.
        let message = err
            .chain()
            .map(ToString::to_string)
            .filter(|link| code.is_none_or(|code| link != code.code()))
            .collect::<Vec<_>>()
            .join(": ");

        Self {
            message,
            suggestion: code.and_then(ErrorCode::hint).map(str::to_string),
            error_code: code.map(|code| code.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            match error.error_code {
                Some(ref code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use between_core::EngineKind;
    use between_core::error::EngineError;

    #[test]
    fn output_mode_follows_json_flag() {
        assert!(OutputMode::from_json_flag(true).is_json());
        assert!(!OutputMode::from_json_flag(false).is_json());
    }

    #[test]
    fn human_diagnostics_match_expected_lines() {
        let centrality = Centrality {
            scores: vec![0.0, 1.0, 0.0],
            engine: EngineKind::Dense,
            node_count: 3,
            edge_count: 3,
            predecessor_entries: 3,
        };
        let diagnostics = RunDiagnostics::new(
            Duration::from_millis(1500),
            4096,
            &centrality,
            Path::new("out.txt"),
        );
        assert_eq!(diagnostics.engine, "dense");
        let mut buf = Vec::new();
        diagnostics.render_human(&mut buf).expect("vec writer");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "Exec. time: 1.5s\nMemory usage = 4kB\n"
        );
    }

    #[test]
    fn engine_error_carries_code_and_hint() {
        let err = anyhow::Error::new(CentralityError::from(EngineError::NegativeCycle {
            nodes: vec![0],
        }))
        .context("computing centrality");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.suggestion.is_some());
        assert!(cli.message.contains("negative weight cycle"));
    }

    #[test]
    fn context_error_code_is_found() {
        let err: anyhow::Result<()> =
            Err(anyhow::anyhow!("bad toml")).context(ErrorCode::ConfigParseError);
        let cli = CliError::from_anyhow(&err.expect_err("constructed as error"));
        assert_eq!(cli.error_code.as_deref(), Some("E3001"));
        assert_eq!(cli.message, "bad toml");
    }

    #[test]
    fn unknown_errors_have_no_code() {
        let cli = CliError::from_anyhow(&anyhow::anyhow!("something else"));
        assert!(cli.error_code.is_none());
        assert!(cli.suggestion.is_none());
    }
}
