//! Progress reporting for pipeline execution

use colored::Colorize;
use health_crew_application::ports::progress::ProgressNotifier;
use health_crew_domain::{PipelineShape, RoleKind, StageKind};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a bar over the stages of the pipeline
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_pipeline_start(&self, shape: &PipelineShape) {
        let bar = ProgressBar::new(shape.stages.len() as u64);
        bar.set_style(Self::stage_style());
        bar.set_prefix("Consultation");
        bar.set_message("Assembling the crew...");
        bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_stage_start(&self, stage: StageKind, role: RoleKind, _index: usize, _total: usize) {
        self.with_bar(|bar| bar.set_message(format!("{} ({})", stage.display_name(), role)));
    }

    fn on_stage_complete(&self, stage: StageKind, success: bool) {
        self.with_bar(|bar| {
            let status = if success {
                format!("{} {}", "v".green(), stage.display_name())
            } else {
                format!("{} {}", "x".red(), stage.display_name())
            };
            bar.set_message(status);
            if success {
                bar.inc(1);
            }
        });
    }

    fn on_tool_call(&self, role: RoleKind, tool_name: &str) {
        self.with_bar(|bar| bar.set_message(format!("{role} is using {tool_name}")));
    }

    fn on_delegation(&self, from: RoleKind, to: RoleKind) {
        self.with_bar(|bar| bar.set_message(format!("{from} is asking {to}")));
    }

    fn on_pipeline_complete(&self, success: bool) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            if success {
                bar.finish_with_message(format!("{}", "complete!".green()));
            } else {
                bar.abandon_with_message(format!("{}", "failed".red()));
            }
        }
    }
}

/// Simple line-based progress for non-interactive output
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_pipeline_start(&self, shape: &PipelineShape) {
        eprintln!(
            "{} {} ({} stages)",
            "->".cyan(),
            "Consultation".bold(),
            shape.stages.len()
        );
    }

    fn on_stage_start(&self, stage: StageKind, role: RoleKind, index: usize, total: usize) {
        eprintln!("  [{}/{}] {} ({})", index + 1, total, stage.display_name(), role);
    }

    fn on_stage_complete(&self, stage: StageKind, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), stage.display_name());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), stage.display_name());
        }
    }

    fn on_delegation(&self, from: RoleKind, to: RoleKind) {
        eprintln!("    {from} -> {to}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_crew_domain::Process;

    #[test]
    fn test_reporter_tracks_completed_stages() {
        let reporter = ProgressReporter::new();
        reporter.on_pipeline_start(&PipelineShape {
            stages: vec![StageKind::Fitness, StageKind::Nutrition, StageKind::Health],
            roles: vec![RoleKind::FitnessExpert, RoleKind::Nutritionist, RoleKind::Doctor],
            process: Process::Sequential,
        });
        reporter.on_stage_start(StageKind::Fitness, RoleKind::FitnessExpert, 0, 3);
        reporter.on_stage_complete(StageKind::Fitness, true);
        reporter.on_stage_complete(StageKind::Nutrition, false);

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|bar| (bar.position(), bar.length()));
        assert_eq!(position, Some((1, Some(3))));

        reporter.on_pipeline_complete(true);
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_callbacks_before_start_are_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_stage_complete(StageKind::Health, true);
        reporter.on_pipeline_complete(false);
    }
}
