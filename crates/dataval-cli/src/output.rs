//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), including the
//! rendering of validation error reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use dataval_core::ErrorReport;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation error report
    fn format_error_report(&self, report: &ErrorReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Pretty JSON stays the most readable form of a document
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_error_report(&self, report: &ErrorReport) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(report)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
            OutputFormat::Human => Ok(format_error_report_human(report)),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a validation error report; machine formats serialise it whole
    pub fn error_report(&mut self, report: &ErrorReport) -> Result<()> {
        let formatted = self.format.format_error_report(report)?;

        if self.format == OutputFormat::Human && self.use_color {
            let mut lines = formatted.lines();
            if let Some(title) = lines.next() {
                self.writeln(&title.red().bold().to_string())?;
            }
            for line in lines {
                self.writeln(line)?;
            }
            Ok(())
        } else if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header_row = headers
            .iter()
            .zip(&widths)
            .map(|(h, width)| format!("{:width$}", h, width = *width))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Numbered list of records under a summary line
fn format_error_report_human(report: &ErrorReport) -> String {
    let mut output = format!("✗ Validation failed - {} error(s)\n", report.len());

    for (i, record) in report.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, record));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataval_core::ErrorRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
        (writer, buffer)
    }

    fn sample_report() -> ErrorReport {
        ErrorReport::from(vec![
            ErrorRecord::at("age", "Expected type: unsigned; Received: -1"),
            ErrorRecord::at("tags", "Missing"),
        ])
    }

    #[test]
    fn test_human_error_report() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.error_report(&sample_report()).unwrap();
        assert_eq!(
            buffer.contents(),
            "✗ Validation failed - 2 error(s)\n  1. [age]: Expected type: unsigned; Received: -1\n  2. [tags]: Missing\n"
        );
    }

    #[test]
    fn test_json_error_report_keeps_paths_structured() {
        let (mut out, buffer) = writer(OutputFormat::Json, false);
        out.error_report(&sample_report()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(parsed["records"][1], json!({"path": ["tags"], "message": "Missing"}));
    }

    #[test]
    fn test_data_formats() {
        let (mut out, buffer) = writer(OutputFormat::Json, false);
        out.data(&json!({"a": 1})).unwrap();
        assert_eq!(buffer.contents(), "{\"a\":1}\n");

        let (mut out, buffer) = writer(OutputFormat::Yaml, false);
        out.data(&json!({"a": 1})).unwrap();
        assert_eq!(buffer.contents(), "a: 1\n");
    }

    #[test]
    fn test_quiet_suppresses_decorations_but_not_data() {
        let (mut out, buffer) = writer(OutputFormat::Human, true);
        out.info("hello").unwrap();
        out.success("done").unwrap();
        out.section("Types").unwrap();
        out.data(&json!(true)).unwrap();
        assert_eq!(buffer.contents(), "true\n");
    }

    #[test]
    fn test_messages_without_color() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.info("loading").unwrap();
        out.success("done").unwrap();
        out.section("Types").unwrap();
        assert_eq!(buffer.contents(), "INFO: loading\ndone\n\n=== Types ===\n");
    }

    #[test]
    fn test_machine_formats_skip_messages() {
        let (mut out, buffer) = writer(OutputFormat::JsonPretty, false);
        out.info("loading").unwrap();
        out.success("done").unwrap();
        out.section("Types").unwrap();
        out.table(&["a"], vec![vec!["1".to_string()]]).unwrap();
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_table_alignment() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.table(
            &["Name", "Kind"],
            vec![
                vec!["str_range".to_string(), "configurable".to_string()],
                vec!["to_str".to_string(), "shared".to_string()],
            ],
        )
        .unwrap();
        assert_eq!(
            buffer.contents(),
            [
                "Name      │ Kind        ",
                "──────────┼─────────────",
                "str_range │ configurable",
                "to_str    │ shared",
                "",
            ]
            .join("\n")
        );
    }
}
