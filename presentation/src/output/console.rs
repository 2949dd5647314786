//! Console output formatter for consultation results

use colored::Colorize;
use health_crew_domain::{ConsultationResult, OutputFormat};

/// Formats consultation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render in the requested format.
    pub fn render(result: &ConsultationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format_text(result),
            OutputFormat::Full => Self::format(result),
            OutputFormat::Json => Self::format_json(result),
        }
    }

    /// The report only, exactly as returned.
    pub fn format_text(result: &ConsultationResult) -> String {
        result.report.clone()
    }

    /// Header, crew, every stage's answer and the final report.
    pub fn format(result: &ConsultationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Health Crew Consultation"));
        output.push('\n');

        let request = &result.request;
        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Age:".cyan().bold(),
            request.age,
            "Gender:".cyan().bold(),
            request.gender,
            "Disease:".cyan().bold(),
            request.disease_indicator
        ));

        let crew: Vec<&str> = result.pipeline.roles.iter().map(|r| r.title()).collect();
        output.push_str(&format!("{} {}\n", "Crew:".cyan().bold(), crew.join(", ")));

        for (i, stage) in result.stages.iter().enumerate() {
            output.push_str(&Self::section_header(&format!(
                "Stage {}: {}",
                i + 1,
                stage.stage.display_name()
            )));
            output.push_str(&format!(
                "{}\n",
                format!("── {} ──", stage.role.title()).yellow().bold()
            ));
            if stage.tool_calls > 0 || !stage.delegations.is_empty() {
                let consulted: Vec<&str> = stage.delegations.iter().map(|r| r.title()).collect();
                output.push_str(&format!(
                    "{}\n",
                    format!(
                        "tool calls: {}, consulted: {}",
                        stage.tool_calls,
                        if consulted.is_empty() {
                            "-".to_string()
                        } else {
                            consulted.join(", ")
                        }
                    )
                    .dimmed()
                ));
            }
            output.push_str(&stage.output);
            output.push('\n');
        }

        output.push_str(&Self::section_header("Final Report"));
        output.push_str(&result.report);
        output.push('\n');
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &ConsultationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_crew_domain::{
        ConsultationRequest, PipelineShape, Process, RoleKind, StageKind, StageOutput,
    };

    fn result() -> ConsultationResult {
        let mut nutrition = StageOutput::new(StageKind::Nutrition, RoleKind::Nutritionist, "Eat fiber.");
        nutrition.delegations.push(RoleKind::Doctor);
        ConsultationResult {
            request: ConsultationRequest::new("45", "male", "no"),
            disease_branch: false,
            pipeline: PipelineShape {
                stages: vec![StageKind::Fitness, StageKind::Nutrition, StageKind::Health],
                roles: vec![RoleKind::FitnessExpert, RoleKind::Nutritionist, RoleKind::Doctor],
                process: Process::Sequential,
            },
            stages: vec![
                StageOutput::new(StageKind::Fitness, RoleKind::FitnessExpert, "Walk daily."),
                nutrition,
                StageOutput::new(StageKind::Health, RoleKind::Doctor, "Sleep well."),
            ],
            report: "Sleep well.\n disease: no".to_string(),
        }
    }

    #[test]
    fn test_text_is_the_report_verbatim() {
        colored::control::set_override(false);
        assert_eq!(
            ConsoleFormatter::render(&result(), OutputFormat::Text),
            "Sleep well.\n disease: no"
        );
    }

    #[test]
    fn test_full_lists_every_stage() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::render(&result(), OutputFormat::Full);

        assert!(output.contains("Crew: Fitness Expert, Nutritionist, Doctor"));
        assert!(output.contains("Walk daily."));
        assert!(output.contains("consulted: Doctor"));
        assert!(output.contains("Final Report"));
        assert!(output.contains("Sleep well.\n disease: no"));
    }

    #[test]
    fn test_json_roundtrips() {
        let json = ConsoleFormatter::render(&result(), OutputFormat::Json);
        let parsed: ConsultationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result());
    }
}
