use crate::matching::Matched;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Neighbor lines in the order queries were scored.
#[derive(Clone, Debug, Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn push(&mut self, subject: usize, label: &str, matched: &[Matched]) {
        self.lines.push(format_line(subject, label, matched));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Writes every neighbor line followed by a blank line and the elapsed
    /// time, replacing any previous report at `path`.
    pub async fn write(&self, path: &Path, elapsed: Duration) -> Result<()> {
        let mut content = String::new();
        for line in self.lines.iter() {
            content += line;
            content += "\n";
        }
        content += "\n";
        content += &format_time(elapsed);
        content += "\n";
        fs::write(path, content)
            .await
            .with_context(|| format!("unable to write report {}", path.display()))?;
        Ok(())
    }
}

fn format_line(subject: usize, label: &str, matched: &[Matched]) -> String {
    let rows = matched
        .iter()
        .map(|m| m.row.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}{}\t\t{}", subject, label, rows)
}

pub fn format_time(elapsed: Duration) -> String {
    format!("Time: {:.3} ms", elapsed.as_secs_f64() * 1000.0)
}
