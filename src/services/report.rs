use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::AppError;

/// Produces a grade report for a course in the requested format.
#[async_trait]
pub trait ReportExporter: Send + Sync {
    async fn export(&self, course_id: &str, format: &str) -> Result<(), AppError>;
}

/// Runs `<command> <course_id> --format <format>` through `sh -c`.
/// Arguments are interpolated into the shell line unquoted.
pub struct ShellReportExporter {
    command: String,
}

impl ShellReportExporter {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }

    pub fn command_line(&self, course_id: &str, format: &str) -> String {
        format!("{} {} --format {}", self.command, course_id, format)
    }
}

#[async_trait]
impl ReportExporter for ShellReportExporter {
    async fn export(&self, course_id: &str, format: &str) -> Result<(), AppError> {
        let line = self.command_line(course_id, format);
        info!("running report export: {}", line);

        let status = Command::new("sh").arg("-c").arg(&line).status().await?;
        if !status.success() {
            warn!("report export exited with {}", status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_interpolates_arguments() {
        let exporter = ShellReportExporter::new("generate_report");
        assert_eq!(
            exporter.command_line("3", "pdf"),
            "generate_report 3 --format pdf"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_exporter_tolerates_failing_command() {
        let exporter = ShellReportExporter::new("false");
        assert!(exporter.export("1", "csv").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn format_is_evaluated_by_the_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let exporter = ShellReportExporter::new("true");

        exporter
            .export("1", &format!("csv; touch {}", marker.display()))
            .await
            .unwrap();

        assert!(marker.exists());
    }
}
