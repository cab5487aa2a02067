//! Verdict reporting.
//!
//! Rendering is a pure function of the aggregate, the verdict and the policy
//! context. Everything that touches the outside world (log groups, step
//! outputs, the job summary, failure annotations) goes through the
//! [`Reporter`] trait so the pipelines can be run against a
//! [`MemoryReporter`] in tests.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::ReviewerStatus;
use crate::services::policy::PolicyContext;

/// Sink for everything the gate tells the calling environment.
pub trait Reporter {
    /// Informational line.
    fn info(&mut self, message: &str);

    /// A titled, collapsible block of lines.
    fn group(&mut self, title: &str, lines: &[String]);

    /// Publish a step output.
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), AppError>;

    /// Append Markdown to the job summary.
    fn append_summary(&mut self, markdown: &str) -> Result<(), AppError>;

    /// Raise the failure signal.
    fn fail(&mut self, message: &str);
}

/// Human-readable account of a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSummary {
    pub title: String,
    pub lines: Vec<String>,
    pub markdown: String,
}

fn verdict_label(verdict: bool) -> &'static str {
    if verdict {
        "passed"
    } else {
        "failed"
    }
}

/// Render the reviewer listing, policy counts and verdict.
pub fn render(status: &ReviewerStatus, verdict: bool, context: &PolicyContext) -> RenderedSummary {
    let title = context.title().to_string();
    let mut lines = vec!["Reviewers:".to_string()];
    let mut markdown = format!("### {}: {}\n\n", title, verdict_label(verdict));

    if status.is_empty() {
        lines.push("  (none)".to_string());
        markdown.push_str("No reviewers.\n\n");
    } else {
        markdown.push_str("| Reviewer | State |\n| --- | --- |\n");
        for (login, state) in status.iter() {
            lines.push(format!("  {}: {}", login, state));
            markdown.push_str(&format!("| {} | {} |\n", login, state));
        }
        markdown.push('\n');
    }

    match context {
        PolicyContext::Approvals(tally) => {
            lines.push(format!(
                "Approved: {} (required {})",
                tally.approved, tally.required
            ));
            lines.push(format!("Changes requested: {}", tally.changes_requested));
            markdown.push_str(&format!(
                "- Approved: {} of {} required\n- Changes requested: {}\n",
                tally.approved, tally.required, tally.changes_requested
            ));
        }
        PolicyContext::LeadReviewers(coverage) => {
            lines.push("Lead reviewers:".to_string());
            if coverage.is_empty() {
                lines.push("  (none configured)".to_string());
                markdown.push_str("- No lead reviewers configured\n");
            }
            for lead in coverage {
                let mark = if lead.present { "added" } else { "missing" };
                lines.push(format!("  {}: {}", lead.reviewer, mark));
                markdown.push_str(&format!("- {}: {}\n", lead.reviewer, mark));
            }
        }
    }

    lines.push(format!("Verdict: {}", verdict));

    RenderedSummary {
        title,
        lines,
        markdown,
    }
}

/// Emit a rendered summary and publish the verdict as a step output.
pub fn publish(
    reporter: &mut dyn Reporter,
    summary: &RenderedSummary,
    verdict: bool,
    output_name: &str,
) -> Result<(), AppError> {
    reporter.group(&summary.title, &summary.lines);
    reporter.append_summary(&summary.markdown)?;
    reporter.set_output(output_name, if verdict { "true" } else { "false" })
}

/// Escape a message for a workflow command.
fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn append_to(path: &Path, text: &str) -> Result<(), AppError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| f.write_all(text.as_bytes()))
        .map_err(|e| AppError::io(format!("Failed to write: {}", e), path.display().to_string()))
}

/// Reporter speaking the GitHub Actions runner protocol.
///
/// Groups and annotations are workflow commands on stdout; outputs and the
/// job summary are appended to the files the runner provides.
pub struct ActionsReporter {
    out: Box<dyn Write>,
    output_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
}

impl ActionsReporter {
    pub fn new(output_path: Option<PathBuf>, summary_path: Option<PathBuf>) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), output_path, summary_path)
    }

    pub fn with_writer(
        out: Box<dyn Write>,
        output_path: Option<PathBuf>,
        summary_path: Option<PathBuf>,
    ) -> Self {
        Self {
            out,
            output_path,
            summary_path,
        }
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::error!("Failed to write to stdout: {}", e);
        }
    }
}

impl Reporter for ActionsReporter {
    fn info(&mut self, message: &str) {
        self.emit(message);
    }

    fn group(&mut self, title: &str, lines: &[String]) {
        self.emit(&format!("::group::{}", escape_command_data(title)));
        for line in lines {
            self.emit(line);
        }
        self.emit("::endgroup::");
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        match &self.output_path {
            Some(path) => append_to(path, &format!("{}={}\n", name, value)),
            None => {
                log::warn!("GITHUB_OUTPUT is not set; output {}={} not published", name, value);
                Ok(())
            }
        }
    }

    fn append_summary(&mut self, markdown: &str) -> Result<(), AppError> {
        match &self.summary_path {
            Some(path) => append_to(path, markdown),
            None => Ok(()),
        }
    }

    fn fail(&mut self, message: &str) {
        self.emit(&format!("::error::{}", escape_command_data(message)));
    }
}

/// Reporter that records everything in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    pub infos: Vec<String>,
    pub groups: Vec<(String, Vec<String>)>,
    pub outputs: Vec<(String, String)>,
    pub summaries: Vec<String>,
    pub failures: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published under `name`.
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Reporter for MemoryReporter {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn group(&mut self, title: &str, lines: &[String]) {
        self.groups.push((title.to_string(), lines.to_vec()));
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn append_summary(&mut self, markdown: &str) -> Result<(), AppError> {
        self.summaries.push(markdown.to_string());
        Ok(())
    }

    fn fail(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewState;
    use crate::services::policy::{ApprovalTally, LeadCoverage};
    use std::sync::{Arc, Mutex};

    fn sample_status() -> ReviewerStatus {
        vec![
            ("alice".to_string(), ReviewState::Approved),
            ("bob".to_string(), ReviewState::ChangesRequested),
            ("carol".to_string(), ReviewState::Pending),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_approvals() {
        let status = sample_status();
        let tally = ApprovalTally::from_status(&status, 1);
        let summary = render(&status, tally.passes(), &PolicyContext::Approvals(tally));

        assert_eq!(summary.title, "Approval policy");
        assert_eq!(
            summary.lines,
            vec![
                "Reviewers:",
                "  alice: approved",
                "  bob: changes_requested",
                "  carol: pending",
                "Approved: 1 (required 1)",
                "Changes requested: 1",
                "Verdict: false",
            ]
        );
        assert!(summary.markdown.starts_with("### Approval policy: failed"));
        assert!(summary.markdown.contains("| bob | changes_requested |"));
    }

    #[test]
    fn test_render_lead_reviewers() {
        let coverage = vec![
            LeadCoverage {
                reviewer: "alice".to_string(),
                present: true,
            },
            LeadCoverage {
                reviewer: "dan".to_string(),
                present: false,
            },
        ];
        let summary = render(
            &sample_status(),
            false,
            &PolicyContext::LeadReviewers(coverage),
        );

        assert!(summary.lines.contains(&"  alice: added".to_string()));
        assert!(summary.lines.contains(&"  dan: missing".to_string()));
        assert_eq!(summary.lines.last().map(String::as_str), Some("Verdict: false"));
    }

    #[test]
    fn test_render_empty() {
        let summary = render(
            &ReviewerStatus::default(),
            true,
            &PolicyContext::LeadReviewers(Vec::new()),
        );
        assert_eq!(summary.lines[1], "  (none)");
        assert!(summary.lines.contains(&"  (none configured)".to_string()));
    }

    #[test]
    fn test_publish_to_memory() {
        let mut reporter = MemoryReporter::new();
        let summary = render(
            &ReviewerStatus::default(),
            true,
            &PolicyContext::LeadReviewers(Vec::new()),
        );
        publish(&mut reporter, &summary, true, "lead-reviewers-added").unwrap();

        assert_eq!(reporter.groups.len(), 1);
        assert_eq!(reporter.summaries.len(), 1);
        assert_eq!(reporter.output("lead-reviewers-added"), Some("true"));
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_actions_reporter_protocol() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let summary_file = dir.path().join("summary.md");
        let buffer = SharedBuffer::default();

        let mut reporter = ActionsReporter::with_writer(
            Box::new(buffer.clone()),
            Some(output.clone()),
            Some(summary_file.clone()),
        );
        reporter.group("Approval policy", &["Verdict: true".to_string()]);
        reporter.fail("line one\nline two 100%");
        reporter.set_output("approved", "true").unwrap();
        reporter.append_summary("### done\n").unwrap();

        let stdout = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            stdout,
            "::group::Approval policy\nVerdict: true\n::endgroup::\n::error::line one%0Aline two 100%25\n"
        );
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "approved=true\n");
        assert_eq!(std::fs::read_to_string(&summary_file).unwrap(), "### done\n");
    }

    #[test]
    fn test_actions_reporter_without_output_file() {
        let mut reporter =
            ActionsReporter::with_writer(Box::new(SharedBuffer::default()), None, None);
        assert!(reporter.set_output("approved", "false").is_ok());
        assert!(reporter.append_summary("x").is_ok());
    }
}
