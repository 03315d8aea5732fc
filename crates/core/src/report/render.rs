//! Plain-text rendering of a run report.

use std::fmt::Write;

use super::types::RunReport;

/// Ranked listings shown in the text report.
pub const TOP_RESULTS: usize = 20;
/// Matched skills shown per listing.
pub const TOP_SKILLS: usize = 5;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Render the human-readable report.
///
/// Depends only on the report's contents, so a reloaded record renders
/// exactly like the report it was saved from.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "JOB APPLICATION RUN REPORT");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Run: {}", report.run_id);
    let _ = writeln!(
        out,
        "Date: {}",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if report.cancelled {
        let _ = writeln!(out, "Status: cancelled (counts reflect completed work)");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "SUMMARY:");
    let _ = writeln!(out, "--------");
    let _ = writeln!(out, "Total Jobs Found: {}", report.total_found);
    let _ = writeln!(
        out,
        "Matched Jobs (Score >= {}): {}",
        report.min_score, report.matched
    );
    let _ = writeln!(out, "Successfully Applied: {}", report.applied);
    let _ = writeln!(out, "Failed Applications: {}", report.failed);
    let _ = writeln!(out, "Skipped (no driver): {}", report.skipped);

    let _ = writeln!(out);
    let _ = writeln!(out, "TOP MATCHED JOBS:");
    let _ = writeln!(out, "-----------------");
    if report.ranked.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for (i, job) in report.ranked.iter().take(TOP_RESULTS).enumerate() {
        let skills: Vec<&str> = job
            .matched_skills
            .iter()
            .take(TOP_SKILLS)
            .map(String::as_str)
            .collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {} at {}", i + 1, job.title, job.company);
        let _ = writeln!(out, "   Location: {}", job.location);
        let _ = writeln!(out, "   Match Score: {:.1}%", job.score);
        let _ = writeln!(out, "   Matched Skills: {}", skills.join(", "));
        let _ = writeln!(out, "   URL: {}", job.url);
    }

    if !report.applied_outcomes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "SUCCESSFULLY APPLIED JOBS:");
        let _ = writeln!(out, "{}", THIN_RULE);
        for outcome in &report.applied_outcomes {
            let _ = writeln!(
                out,
                "+ {} at {} ({})",
                outcome.title, outcome.company, outcome.platform
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Platform;
    use crate::matcher::{MatchResult, ScoringEngine};
    use crate::report::ReportMeta;
    use crate::sequencer::ApplicationOutcome;
    use crate::testing::fixtures;
    use std::sync::Arc;

    fn report_with(ranked_count: usize) -> RunReport {
        let engine = ScoringEngine::new(Arc::new(fixtures::profile()));
        let listings: Vec<_> = (0..ranked_count)
            .map(|i| fixtures::java_listing(&format!("https://www.linkedin.com/jobs/view/{}", i)))
            .collect();
        let ranked: Vec<MatchResult> = listings.iter().map(|l| engine.score_listing(l)).collect();
        let outcomes: Vec<ApplicationOutcome> = ranked
            .iter()
            .take(2)
            .map(|r| ApplicationOutcome::applied(r, Platform::Linkedin))
            .collect();

        RunReport::build(
            &listings,
            &ranked,
            &outcomes,
            ReportMeta {
                run_id: "run-7".to_string(),
                min_score: 70.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_render_summary_and_entries() {
        let text = render_text(&report_with(3));

        assert!(text.contains("Run: run-7"));
        assert!(text.contains("Total Jobs Found: 3"));
        assert!(text.contains("Matched Jobs (Score >= 70): 3"));
        assert!(text.contains("Successfully Applied: 2"));
        assert!(text.contains("1. Java Developer at Acme Corp"));
        assert!(text.contains("   Match Score: 90.0%"));
        assert!(text.contains("   Matched Skills: java, spring boot"));
        assert!(text.contains("+ Java Developer at Acme Corp (linkedin)"));
        assert!(!text.contains("Status: cancelled"));
    }

    #[test]
    fn test_render_caps_top_results() {
        let text = render_text(&report_with(25));

        assert!(text.contains("\n20. Java Developer"));
        assert!(!text.contains("\n21. Java Developer"));
        assert!(text.contains("Matched Jobs (Score >= 70): 25"));
    }

    #[test]
    fn test_render_empty_cancelled_report() {
        let report = RunReport::empty(ReportMeta {
            run_id: "run-8".to_string(),
            min_score: 65.5,
            cancelled: true,
            ..Default::default()
        });
        let text = render_text(&report);

        assert!(text.contains("Status: cancelled"));
        assert!(text.contains("Matched Jobs (Score >= 65.5): 0"));
        assert!(text.contains("(none)"));
        assert!(!text.contains("SUCCESSFULLY APPLIED JOBS"));
    }
}
