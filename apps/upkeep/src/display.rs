//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::{style, Term};
use std::io;
use upkeep_ops::{
    ConvergeReport, DisableReport, FileOutcome, FileSyncState, OperationResult, StatusReport,
};
use upkeep_types::ColorChoice;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
        }
    }

    fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => Term::stdout().features().colors_supported(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_human(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render human-readable output
    fn render_human(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Converge(report) => self.render_converge_report(report),
            OperationResult::Disable(report) => self.render_disable_report(report),
            OperationResult::Status(report) => self.render_status_report(report),
            OperationResult::Success(message) => {
                println!("{message}");
                Ok(())
            }
        }
    }

    fn render_converge_report(&self, report: &ConvergeReport) -> io::Result<()> {
        if report.platform_skipped {
            println!("Not a Debian-family host; nothing to do.");
            return Ok(());
        }

        for file in &report.files {
            match file.outcome {
                FileOutcome::Converged { changed: true } => {
                    println!("{} {}", self.ok_marker(), file.path.display());
                }
                FileOutcome::Converged { changed: false } => {
                    println!("= {} (already converged)", file.path.display());
                }
                FileOutcome::SkippedMissing => {
                    println!("- {} (absent, skipped)", file.path.display());
                }
            }
        }

        let changed = report.changed_count();
        if changed == 0 {
            println!("Unattended upgrades enabled; no changes were needed.");
        } else {
            println!("Unattended upgrades enabled; {changed} file(s) updated.");
        }
        Ok(())
    }

    fn render_disable_report(&self, report: &DisableReport) -> io::Result<()> {
        for command in &report.commands {
            match &command.command {
                Some(rendered) => println!("{} {rendered}", self.ok_marker()),
                None => println!("- {} (absent, skipped)", command.path.display()),
            }
        }
        println!(
            "Unattended upgrades disabled; {} file(s) commented out.",
            report.executed_count()
        );
        Ok(())
    }

    fn render_status_report(&self, report: &StatusReport) -> io::Result<()> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["File", "Path", "State"]);

        for file in &report.files {
            table.add_row(vec![
                Cell::new(file.file.to_string()),
                Cell::new(file.path.display().to_string()),
                Cell::new(self.sync_state_label(&file.state)),
            ]);
        }

        println!("{table}");

        if !report.debian_family {
            println!("Host is not in the Debian platform family; enable would be a no-op.");
        } else if report.in_sync() {
            println!("All managed files match the desired configuration.");
        } else {
            println!("Run `upkeep enable` to converge the drifted files.");
        }
        Ok(())
    }

    fn sync_state_label(&self, state: &FileSyncState) -> String {
        let (label, color): (&str, fn(&str) -> console::StyledObject<&str>) = match state {
            FileSyncState::InSync => ("in sync", |s| style(s).green()),
            FileSyncState::Drifted => ("drifted", |s| style(s).yellow()),
            FileSyncState::Missing => ("missing", |s| style(s).red()),
        };
        if self.colors_enabled() {
            color(label).to_string()
        } else {
            label.to_string()
        }
    }

    fn ok_marker(&self) -> String {
        if self.colors_enabled() {
            style("+").green().bold().to_string()
        } else {
            "+".to_string()
        }
    }
}
