//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `versions-aggregate.yaml` configuration file and the logic for parsing and
//! validating it.
//!
//! ## Key Components
//!
//! - **`Config`**: The whole file, a map from project name to its settings.
//! - **`ProjectConfig`**: The category name set of one project: the canonical
//!   name of each category role, the canonical database unit names, and what
//!   to do with database unit folders that match none of them.
//! - **`CategoryNames`**: One canonical folder name per category role, keyed
//!   by role rather than by position.
//!
//! ## Parsing
//!
//! `parse` accepts two formats:
//!
//! 1.  **Current Format**: a `projects:` map with named `categories` roles.
//!
//! 2.  **Original Format**: the `Directories` section of the legacy
//!     `appsettings.json`, where `Operations` lists the application, database
//!     and report folder names in that order and `DataBases` lists the units.
//!
//! The parser tries the current format first and falls back to the original
//! one, so existing settings files keep working without modification.
//!
//! ## Validation
//!
//! Classification is containment based, so a canonical name that is a
//! substring of another name in the same list would make the outcome depend
//! on rule order. Such name sets are rejected at load time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "versions-aggregate.yaml";

/// What to do with a database unit folder that matches no configured unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownUnitPolicy {
    /// Merge it into a derived `<suffix>(Unknown)` directory.
    #[default]
    Bucket,
    /// Abort the run.
    Fail,
}

/// Canonical folder name for each category role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryNames {
    pub application: String,
    pub database: String,
    pub report: String,
}

impl CategoryNames {
    /// Canonical name for a known category; `None` for `Category::Unknown`.
    pub fn get(&self, category: Category) -> Option<&str> {
        match category {
            Category::Application => Some(&self.application),
            Category::Database => Some(&self.database),
            Category::Report => Some(&self.report),
            Category::Unknown => None,
        }
    }

    /// Names in classification priority order.
    pub fn in_priority_order(&self) -> [(Category, &str); 3] {
        [
            (Category::Application, self.application.as_str()),
            (Category::Database, self.database.as_str()),
            (Category::Report, self.report.as_str()),
        ]
    }
}

/// Per-project category name set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub categories: CategoryNames,
    /// Canonical database unit names, in matching priority order.
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default, rename = "unknown-database-units")]
    pub unknown_database_units: UnknownUnitPolicy,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl Config {
    /// Looks up a project by name.
    pub fn project(&self, name: &str) -> Result<&ProjectConfig> {
        self.projects
            .get(name)
            .ok_or_else(|| Error::ProjectNotFound {
                project: name.to_string(),
                available: self.project_names(),
            })
    }

    /// Configured project names, sorted.
    pub fn project_names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }
}

////// ORIGINAL FORMAT //////

#[derive(Debug, Deserialize)]
struct LegacySettings {
    #[serde(rename = "Directories")]
    directories: BTreeMap<String, LegacyProject>,
}

#[derive(Debug, Deserialize)]
struct LegacyProject {
    #[serde(rename = "Operations")]
    operations: Vec<String>,
    #[serde(rename = "DataBases", default)]
    databases: Vec<String>,
}

impl LegacyProject {
    fn into_project(self, name: &str) -> Result<ProjectConfig> {
        let [application, database, report]: [String; 3] =
            self.operations.try_into().map_err(|ops: Vec<String>| Error::ConfigParse {
                message: format!(
                    "project '{}' lists {} Operations folders, expected 3",
                    name,
                    ops.len()
                ),
                hint: Some(
                    "Operations must name the application, database and report folders in that order"
                        .to_string(),
                ),
            })?;

        Ok(ProjectConfig {
            categories: CategoryNames {
                application,
                database,
                report,
            },
            databases: self.databases,
            unknown_database_units: UnknownUnitPolicy::default(),
        })
    }
}

/// Parse and validate a configuration from YAML (or JSON) text.
pub fn parse(content: &str) -> Result<Config> {
    let config = match serde_yaml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(current_err) => match parse_original_format(content) {
            Ok(config) => config,
            Err(Error::ConfigParse { message, hint }) => {
                return Err(Error::ConfigParse { message, hint })
            }
            Err(_) => {
                return Err(Error::ConfigParse {
                    message: current_err.to_string(),
                    hint: Some(
                        "expected a 'projects:' map, or a legacy 'Directories' section".to_string(),
                    ),
                })
            }
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Parse the legacy `appsettings.json` `Directories` layout.
pub fn parse_original_format(content: &str) -> Result<Config> {
    let legacy: LegacySettings = serde_yaml::from_str(content)?;

    let mut projects = BTreeMap::new();
    for (name, project) in legacy.directories {
        let project = project.into_project(&name)?;
        projects.insert(name, project);
    }

    Ok(Config { projects })
}

/// Parse a configuration file from disk.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::fs("read", path, e))?;
    parse(&content)
}

/// Resolve the configuration path: explicit flag or env value, else the
/// default file in the working directory.
pub fn locate(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Validate every project's name sets.
pub fn validate(config: &Config) -> Result<()> {
    if config.projects.is_empty() {
        return Err(Error::ConfigParse {
            message: "no projects configured".to_string(),
            hint: Some("add at least one entry under 'projects:'".to_string()),
        });
    }

    for (name, project) in &config.projects {
        if name.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "project name must not be empty".to_string(),
                hint: None,
            });
        }

        let category_names: Vec<&str> = project
            .categories
            .in_priority_order()
            .iter()
            .map(|(_, n)| *n)
            .collect();
        for folder in category_names
            .iter()
            .copied()
            .chain(project.databases.iter().map(String::as_str))
        {
            check_folder_name(name, folder)?;
        }

        check_no_overlap(name, "category", &category_names)?;
        let units: Vec<&str> = project.databases.iter().map(String::as_str).collect();
        check_no_overlap(name, "database unit", &units)?;
    }

    Ok(())
}

fn check_folder_name(project: &str, folder: &str) -> Result<()> {
    let invalid = folder.trim().is_empty()
        || folder == "."
        || folder == ".."
        || folder.contains('/')
        || folder.contains('\\');

    if invalid {
        return Err(Error::ConfigParse {
            message: format!("project '{}': invalid folder name '{}'", project, folder),
            hint: Some("folder names must be a single non-empty path component".to_string()),
        });
    }
    Ok(())
}

fn check_no_overlap(project: &str, kind: &str, names: &[&str]) -> Result<()> {
    for (i, a) in names.iter().enumerate() {
        for b in names.iter().skip(i + 1) {
            if a.contains(b) || b.contains(a) {
                return Err(Error::ConfigParse {
                    message: format!(
                        "project '{}': {} names '{}' and '{}' overlap",
                        project, kind, a, b
                    ),
                    hint: Some(format!(
                        "no {} name may be contained in another, or folders would be misclassified",
                        kind
                    )),
                });
            }
        }
    }
    Ok(())
}
