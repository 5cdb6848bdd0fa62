use super::OutputFormatter;
use anyhow::Result;
use colored::*;
use std::path::Path;
use upload_artifact_core::{ArtifactStatus, Decision, PreviewEntry, RunReport};

/// Text formatter for human-readable output
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn title(&self, name: Option<&str>, label: &str) -> String {
        let name = name.unwrap_or("(unnamed)");
        format!("{} ({label})", self.colorize(name, |s| s.bold()))
    }
}

impl OutputFormatter for TextFormatter {
    fn format_preview(&self, entries: &[PreviewEntry]) -> Result<String> {
        let mut output = String::new();

        for entry in entries {
            output.push_str(&format!(
                "Artifact: {}\n",
                self.title(entry.name.as_deref(), &entry.label)
            ));

            match &entry.decision {
                Decision::Upload => {
                    let decision = self.colorize("upload", |s| s.green());
                    output.push_str(&format!("  Decision: {decision}\n"));
                }
                Decision::Skip(message) => {
                    let decision = self.colorize("skip", |s| s.yellow());
                    output.push_str(&format!("  Decision: {decision}\n"));
                    output.push_str(&format!("  {message}\n"));
                }
                Decision::Fail(message) => {
                    let decision = self.colorize("fail", |s| s.red());
                    output.push_str(&format!("  Decision: {decision}\n"));
                    output.push_str(&format!("  {message}\n"));
                }
            }

            if let Some(root) = &entry.root_directory {
                output.push_str(&format!("  Root: {}\n", root.display()));
                output.push_str(&format!("  Files ({}):\n", entry.files.len()));
                for file in &entry.files {
                    output.push_str(&format!("    {}\n", relative_display(file, root)));
                }
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        for artifact in &report.artifacts {
            let status = match &artifact.status {
                ArtifactStatus::Uploaded => self.colorize("uploaded", |s| s.green()),
                ArtifactStatus::Skipped => self.colorize("skipped", |s| s.yellow()),
                ArtifactStatus::Failed(_) => self.colorize("failed", |s| s.red()),
            };
            output.push_str(&format!(
                "{status}  {}\n",
                self.title(artifact.name.as_deref(), &artifact.label)
            ));
        }

        let uploaded = report.count(|s| *s == ArtifactStatus::Uploaded);
        let skipped = report.count(|s| *s == ArtifactStatus::Skipped);
        let failed = report.count(ArtifactStatus::is_failed);
        output.push_str(&format!(
            "\n{uploaded} uploaded, {skipped} skipped, {failed} failed\n"
        ));

        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let mut text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        text.push('\n');
        Ok(text)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_preview(&self, entries: &[PreviewEntry]) -> Result<String> {
        self.render(entries)
    }

    fn format_report(&self, report: &RunReport) -> Result<String> {
        self.render(report)
    }
}

fn relative_display(file: &Path, root: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .display()
        .to_string()
}
