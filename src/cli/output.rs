//! Output formatting utilities
//!
//! Provides table and JSON output formatting for console reporting.

use crate::cli::args::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Generic result message
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        self.message.clone()
    }
}

/// Outcome of one tuning step on one GPU
#[derive(Debug, Clone, Serialize)]
pub struct TuneStep {
    pub gpu_index: u32,
    pub gpu_name: String,
    pub operation: String,
    pub outcome: String,
    pub success: bool,
}

impl TableDisplay for TuneStep {
    fn to_table(&self) -> String {
        format!(
            "[{}] {}: {} - {}",
            self.gpu_index, self.gpu_name, self.operation, self.outcome
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}:{}", self.gpu_index, self.operation, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_table() {
        let msg = Message {
            message: "Setting power cap = 60.00 %".to_string(),
            success: true,
        };
        assert_eq!(msg.to_table(), "Setting power cap = 60.00 %");
    }

    #[test]
    fn test_tune_step_table() {
        let step = TuneStep {
            gpu_index: 0,
            gpu_name: "Mock GPU 0".to_string(),
            operation: "power cap".to_string(),
            outcome: "applied 180W".to_string(),
            success: true,
        };
        assert_eq!(step.to_table(), "[0] Mock GPU 0: power cap - applied 180W");
        assert_eq!(step.to_compact(), "0:power cap:applied 180W");
    }

    #[test]
    fn test_tune_step_serializes() {
        let step = TuneStep {
            gpu_index: 1,
            gpu_name: "GPU".to_string(),
            operation: "memory offset".to_string(),
            outcome: "applied 100000 kHz".to_string(),
            success: true,
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"gpu_index\":1"));
        assert!(json.contains("memory offset"));
    }
}
