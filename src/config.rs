//! Report configuration
//!
//! The configuration is a TOML file describing the people on the report,
//! the projects to include and the tuning of the projection. Relative paths
//! inside it are resolved against the directory holding the file.

use crate::projection::{ModuleOrdering, ProjectionSettings};
use crate::statistics::StatisticsSettings;
use crate::tracker::{TaskStatus, TodoPriority};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("Project '{name}' is not configured.\nAvailable projects: {available}")]
    UnknownProject { name: String, available: String },
}

/// Person named on the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub position: String,
}

/// Author of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    pub name: String,
    pub position: String,
    /// First day on the job; drives the cutoff count
    pub date_hired: NaiveDate,
}

/// One project exported from the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Tab-separated tracker export
    pub tsv: PathBuf,
    /// Directory of screenshots embedded in the report
    #[serde(default)]
    pub images: Option<PathBuf>,
    #[serde(default)]
    pub details: String,
}

/// Status exclusions for the two timelines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Statuses left out of the actual timeline
    pub actual_excluded: Vec<TaskStatus>,
    /// Statuses left out of the projected timeline
    pub projected_excluded: Vec<TaskStatus>,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        let mut actual_excluded = vec![TaskStatus::OnHold];
        actual_excluded.extend(TodoPriority::ALL.map(TaskStatus::Todo));
        Self {
            actual_excluded,
            projected_excluded: vec![TaskStatus::ArchivedOld, TaskStatus::ArchivedNew],
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("ACCOMPLISHMENT REPORTS")
}

/// Whole configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Root under which the date-stamped output directory is created
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Handlebars template for the narrative report; built-in one if unset
    #[serde(default)]
    pub template: Option<PathBuf>,
    /// Days whose in-flight tasks are listed separately in the report
    #[serde(default)]
    pub render_dates: Vec<NaiveDate>,
    pub developer: Developer,
    #[serde(default)]
    pub reviewer: Person,
    #[serde(default)]
    pub projection: ProjectionSettings,
    #[serde(default)]
    pub ordering: ModuleOrdering,
    #[serde(default)]
    pub statistics: StatisticsSettings,
    #[serde(default)]
    pub timelines: TimelineSettings,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

impl ReportConfig {
    /// Load, validate and resolve a configuration file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML file
    ///
    /// # Returns
    /// The configuration with every relative path resolved against the
    /// file's directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        Ok(config)
    }

    /// Parse and validate configuration text without touching paths
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.projection.points_per_day == 0 {
            return Err(ConfigError::Invalid(
                "projection.points_per_day must be greater than zero".to_string(),
            ));
        }
        if self.projection.working_days_per_cycle == 0 {
            return Err(ConfigError::Invalid(
                "projection.working_days_per_cycle must be greater than zero".to_string(),
            ));
        }
        if self.projects.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[projects]] entry is required".to_string(),
            ));
        }
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "project name cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.output_dir);
        if let Some(template) = self.template.as_mut() {
            resolve(template);
        }
        for project in &mut self.projects {
            resolve(&mut project.tsv);
            if let Some(images) = project.images.as_mut() {
                resolve(images);
            }
        }
    }

    /// Find a configured project by name (case-insensitive)
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Drop every project except `name`
    ///
    /// An unknown name leaves the configuration untouched and lists the
    /// configured projects in the error.
    pub fn restrict_to_project(&mut self, name: &str) -> Result<(), ConfigError> {
        let Some(project) = self.project(name).cloned() else {
            let available: Vec<&str> = self.projects.iter().map(|p| p.name.as_str()).collect();
            return Err(ConfigError::UnknownProject {
                name: name.to_string(),
                available: available.join(", "),
            });
        };
        self.projects = vec![project];
        Ok(())
    }
}
