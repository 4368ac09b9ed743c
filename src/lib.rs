//! Accomplishment Report Library
//!
//! This library turns a flat project-tracker export (one TSV row per issue)
//! into the artifacts of a semi-monthly accomplishment report: an actual
//! timeline, a projected timeline, a statistics table and the narrative
//! report embedding them.
//!
//! # Architecture
//!
//! The library is a single linear pipeline:
//! - **Loader**: `loader` - parses the TSV export into typed `TaskRow`s
//! - **Filter/Partition**: `tracker` - status filters and buckets
//! - **Projection**: `projection` - story points to estimated module spans
//! - **Statistics**: `statistics` - counts and completion percentage
//! - **Renderer**: `chart` - SVG Gantt charts
//! - **Assembler**: `report` - Handlebars report over all of the above
//!
//! # Example
//!
//! ```no_run
//! use accomplishment_report::{ReportConfig, ReportGenerator};
//! use anyhow::Result;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let config = ReportConfig::load(Path::new("report.toml"))?;
//!     let outcome = ReportGenerator::new(config).run()?;
//!     println!("{}", outcome.report.display());
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod formatting;
pub mod loader;
pub mod output;
pub mod projection;
pub mod report;
pub mod statistics;
pub mod tracker;
pub mod validation;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::info;

// Re-export commonly used types
pub use config::{ProjectConfig, ReportConfig};
pub use formatting::ProjectSummary;
pub use loader::TsvLoader;
pub use projection::{ModuleOrdering, ProjectedSpan, ProjectionSettings, project_modules};
pub use statistics::{StatisticsRecord, StatusCounts};
pub use tracker::{StatusBuckets, TaskRow, TaskStatus, TodoPriority, filter_excluding};

use output::OutputDir;
use report::{ProjectSection, ReportContext, ReportImage, ReportRenderer, TaskSections};

/// File name of the assembled report inside the output directory
pub const REPORT_FILE_NAME: &str = "accomplishment-report.md";

/// Result of a full run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Date-stamped directory holding every artifact
    pub output_dir: PathBuf,
    /// Path of the assembled report
    pub report: PathBuf,
    /// Per-project results, in configuration order
    pub projects: Vec<ProjectSummary>,
}

/// Everything derived from one project's export
///
/// Pure data: building it touches no files besides reading the export.
#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    pub rows: Vec<TaskRow>,
    pub actual_rows: Vec<TaskRow>,
    pub projected_spans: Vec<ProjectedSpan>,
    pub statistics: StatisticsRecord,
    pub sections: TaskSections,
}

impl ProjectAnalysis {
    /// Run filter, projection and statistics over a snapshot
    ///
    /// # Arguments
    /// * `rows` - Unfiltered snapshot of one project
    /// * `config` - Settings for exclusions, projection and statistics
    pub fn from_rows(rows: Vec<TaskRow>, config: &ReportConfig) -> Self {
        let actual_rows = filter_excluding(&rows, &config.timelines.actual_excluded);
        let projected_rows = filter_excluding(&rows, &config.timelines.projected_excluded);
        let projected_spans =
            project_modules(&projected_rows, &config.projection, &config.ordering);
        let statistics = StatisticsRecord::from_rows(&rows, &config.statistics);
        let sections = TaskSections::build(&rows, &config.render_dates);

        Self {
            rows,
            actual_rows,
            projected_spans,
            statistics,
            sections,
        }
    }
}

/// Drives one report run over every configured project
///
/// Loads each export, derives timelines and statistics, writes the
/// artifacts into the date-stamped output directory and finally renders the
/// narrative report.
pub struct ReportGenerator {
    config: ReportConfig,
    as_of: NaiveDate,
}

impl ReportGenerator {
    /// Create a generator dated today (local time)
    pub fn new(config: ReportConfig) -> Self {
        Self::with_date(config, Local::now().date_naive())
    }

    /// Create a generator for a fixed run date
    ///
    /// The run date picks the output directory and cutoff period, and closes
    /// open bars on the actual timeline.
    pub fn with_date(config: ReportConfig, as_of: NaiveDate) -> Self {
        Self { config, as_of }
    }

    /// Run the whole pipeline
    ///
    /// # Returns
    /// Paths of everything written plus per-project summaries. Input and
    /// resource errors abort the run.
    pub fn run(&self) -> Result<RunOutcome> {
        let renderer = match &self.config.template {
            Some(path) => ReportRenderer::from_file(path)?,
            None => ReportRenderer::new()?,
        };
        let output = OutputDir::create(&self.config.output_dir, self.as_of)?;
        info!(dir = %output.path().display(), as_of = %self.as_of, "starting report run");

        let mut sections = Vec::with_capacity(self.config.projects.len());
        let mut summaries = Vec::with_capacity(self.config.projects.len());
        for project in &self.config.projects {
            let (section, summary) = self
                .process_project(project, &output)
                .with_context(|| format!("Failed to process project '{}'", project.name))?;
            sections.push(section);
            summaries.push(summary);
        }

        let context = self.report_context(sections);
        let document = renderer.render(&context).context("Failed to render report")?;
        let report = output.write(REPORT_FILE_NAME, &document)?;
        info!(path = %report.display(), "report written");

        Ok(RunOutcome {
            output_dir: output.path().to_path_buf(),
            report,
            projects: summaries,
        })
    }

    fn process_project(
        &self,
        project: &ProjectConfig,
        output: &OutputDir,
    ) -> Result<(ProjectSection, ProjectSummary)> {
        let rows = TsvLoader::new(&project.tsv).load()?;
        let analysis = ProjectAnalysis::from_rows(rows, &self.config);
        info!(
            project = %project.name,
            rows = analysis.rows.len(),
            modules = analysis.projected_spans.len(),
            completion = %analysis.statistics.completion,
            "analysed project"
        );

        let slug = output::slugify(&project.name);
        let screenshots = match &project.images {
            Some(dir) => report::collect_images(dir)?,
            None => Vec::new(),
        };
        let images_dir = format!("{slug}-screenshots");
        let mut images = Vec::with_capacity(screenshots.len());
        for screenshot in &screenshots {
            images.push(ReportImage {
                caption: screenshot
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                link: output.copy_into(&images_dir, screenshot)?,
            });
        }
        let actual_name = format!("{slug}-actual-timeline.svg");
        let projected_name = format!("{slug}-projected-timeline.svg");
        let statistics_name = format!("{slug}-statistics.csv");

        let actual_svg = chart::render_svg(
            &format!("{} actual timeline", project.name),
            &chart::actual_bars(&analysis.actual_rows, &self.config.ordering, self.as_of),
        );
        let projected_svg = chart::render_svg(
            &format!("{} projected timeline", project.name),
            &chart::projected_bars(&analysis.projected_spans),
        );

        let artifacts = vec![
            output.write(&actual_name, &actual_svg)?,
            output.write(&projected_name, &projected_svg)?,
            output.write(&statistics_name, &analysis.statistics.to_csv())?,
        ];

        let ProjectAnalysis {
            rows,
            projected_spans,
            statistics,
            sections,
            ..
        } = analysis;

        let summary = ProjectSummary {
            name: project.name.clone(),
            rows: rows.len(),
            spans: projected_spans.clone(),
            statistics: statistics.clone(),
            artifacts,
        };
        let section = ProjectSection {
            name: project.name.clone(),
            details: project.details.clone(),
            modules: sections.modules,
            tasks: sections.tasks,
            rendered_tasks: sections.rendered_tasks,
            images,
            statistics,
            projected_spans,
            actual_timeline: actual_name,
            projected_timeline: projected_name,
        };
        Ok((section, summary))
    }

    fn report_context(&self, projects: Vec<ProjectSection>) -> ReportContext {
        let developer = &self.config.developer;
        let reviewer = &self.config.reviewer;
        ReportContext {
            developer_name: developer.name.clone(),
            developer_position: developer.position.clone(),
            reviewer_name: reviewer.name.clone(),
            reviewer_position: reviewer.position.clone(),
            cutoff_dates: report::cutoff::cutoff_period(self.as_of),
            tc: report::cutoff::cutoff_count(developer.date_hired, self.as_of),
            generated_on: self.as_of.format("%Y-%m-%d").to_string(),
            projects,
        }
    }
}
