use std::{
    env::current_dir,
    io,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use log::debug;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

pub(crate) const DEFAULT_PATH: &str = "~/.jira-reporter/config.yaml";

/// Everything that can be set either on the command line or in the YAML config file.
///
/// Fields left as `None` (or empty) on the command line are filled in from the config file by
/// [`Options::merge`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Options {
    /// The URL of the Jira server, like `https://jira.example.com`
    #[serde(rename = "baseURL")]
    pub(crate) base_url: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    /// Comma-separated list of project keys
    pub(crate) project: Option<String>,
    /// Comma-separated list of issue types
    pub(crate) issue_type: Option<String>,
    /// A JQL date expression, like `-7d` or `2021-10-01`
    pub(crate) updated_since: Option<String>,
    /// Two JQL date expressions separated by `~`. Takes precedence over `updated_since`.
    pub(crate) updated_between: Option<String>,
    /// Status names which count an issue as finished
    pub(crate) finished_statuses: Option<IndexSet<String>>,
    /// Status names which drop an issue from the report entirely
    pub(crate) canceled_statuses: Option<IndexSet<String>>,
    pub(crate) max_results: Option<u32>,
    /// Title of the report, `$dateRange` is replaced with the requested range.
    pub(crate) title: Option<String>,
}

impl Options {
    /// Fill every field that `self` leaves empty with the value from `fallback`.
    #[must_use]
    pub(crate) fn merge(self, fallback: Options) -> Self {
        Self {
            base_url: prefer(self.base_url, fallback.base_url),
            username: prefer(self.username, fallback.username),
            password: prefer(self.password, fallback.password),
            project: prefer(self.project, fallback.project),
            issue_type: prefer(self.issue_type, fallback.issue_type),
            updated_since: prefer(self.updated_since, fallback.updated_since),
            updated_between: prefer(self.updated_between, fallback.updated_between),
            finished_statuses: self.finished_statuses.or(fallback.finished_statuses),
            canceled_statuses: self.canceled_statuses.or(fallback.canceled_statuses),
            max_results: self.max_results.or(fallback.max_results),
            title: prefer(self.title, fallback.title),
        }
    }
}

fn prefer(first: Option<String>, second: Option<String>) -> Option<String> {
    first.filter(|value| !value.is_empty()).or(second)
}

/// Where to look for the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    /// Nothing was passed to `--config`, so the file at [`DEFAULT_PATH`] is optional.
    Default,
    /// The user asked for this file specifically, so it must be readable.
    Explicit(String),
}

/// Load [`Options`] from the config file at `location`.
///
/// ## Errors
/// Only for [`Location::Explicit`]. A missing default file is fine; any other problem with it is
/// printed as a warning and an empty [`Options`] is returned.
pub(crate) fn load(location: &Location) -> Result<Options, Error> {
    match location {
        Location::Explicit(path) => read(path),
        Location::Default => match read(DEFAULT_PATH) {
            Ok(options) => Ok(options),
            Err(Error::Read { path, source }) if source.kind() == io::ErrorKind::NotFound => {
                debug!("No config file at {}, using flags only", path.display());
                Ok(Options::default())
            }
            Err(err) => {
                eprintln!("WARNING: Ignoring default config file: {err}");
                Ok(Options::default())
            }
        },
    }
}

fn read(path: &str) -> Result<Options, Error> {
    let path = absolute(&expand_home(path)?)?;
    debug!("Loading config from {}", path.display());
    let contents = std::fs::read_to_string(&path).map_err(|source| Error::Read {
        path: path.clone(),
        source,
    })?;
    parse(&contents).map_err(|source| Error::Parse { path, source })
}

fn parse(contents: &str) -> Result<Options, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(Options::default());
    }
    serde_yaml::from_str(contents)
}

fn expand_home(path: &str) -> Result<PathBuf, Error> {
    let rest = match path.strip_prefix('~') {
        None => return Ok(PathBuf::from(path)),
        Some(rest) if rest.is_empty() => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            // `~user` style paths are left alone
            None => return Ok(PathBuf::from(path)),
        },
    };
    let home = dirs::home_dir().ok_or_else(|| Error::HomeDir {
        path: path.to_string(),
    })?;
    Ok(home.join(rest))
}

fn absolute(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    current_dir()
        .map(|dir| dir.join(path))
        .map_err(Error::CurrentDir)
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error("Could not find a home directory to expand {path}")]
    #[diagnostic(
        code(config::home_dir),
        help("Pass an absolute path to --config instead.")
    )]
    HomeDir { path: String },
    #[error("Could not determine the current directory: {0}")]
    #[diagnostic(code(config::current_dir))]
    CurrentDir(#[source] io::Error),
    #[error("Error reading config file {path}: {source}")]
    #[diagnostic(
        code(config::read),
        help("Make sure the file passed to --config exists and you have permission to read it.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid YAML in config file {path}: {source}")]
    #[diagnostic(
        code(config::parse),
        help("The config file must be a YAML mapping with keys like `baseURL`, `project`, and `updatedSince`.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_options {
    use pretty_assertions::assert_eq;

    use super::*;

    const FULL_CONFIG: &str = r#"
baseURL: "https://jira.example.com"
username: alice
password: hunter2
project: "ABC,DEF"
issueType: Bug
updatedSince: "-7d"
updatedBetween: "2021-10-01~2021-10-10"
finishedStatuses:
  - Done
  - Released
canceledStatuses:
  - "Won't Do"
maxResults: 50
title: "Weekly report for $dateRange"
"#;

    #[test]
    fn parse_every_key() {
        let options = parse(FULL_CONFIG).unwrap();
        assert_eq!(
            options,
            Options {
                base_url: Some("https://jira.example.com".into()),
                username: Some("alice".into()),
                password: Some("hunter2".into()),
                project: Some("ABC,DEF".into()),
                issue_type: Some("Bug".into()),
                updated_since: Some("-7d".into()),
                updated_between: Some("2021-10-01~2021-10-10".into()),
                finished_statuses: Some(["Done", "Released"].map(String::from).into()),
                canceled_statuses: Some(["Won't Do"].map(String::from).into()),
                max_results: Some(50),
                title: Some("Weekly report for $dateRange".into()),
            }
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let options = parse("project: ABC\nsomethingElse: true\n").unwrap();
        assert_eq!(options.project.as_deref(), Some("ABC"));
    }

    #[test]
    fn empty_file_is_empty_options() {
        assert_eq!(parse("\n  \n").unwrap(), Options::default());
    }

    #[test]
    fn invalid_yaml() {
        assert!(parse("maxResults: lots").is_err());
    }

    #[test]
    fn command_line_wins() {
        let cli = Options {
            project: Some("CLI".into()),
            issue_type: Some(String::new()),
            ..Options::default()
        };
        let file = Options {
            base_url: Some("https://jira.example.com".into()),
            project: Some("FILE".into()),
            issue_type: Some("Story".into()),
            max_results: Some(10),
            ..Options::default()
        };

        let merged = cli.merge(file);

        assert_eq!(
            merged,
            Options {
                base_url: Some("https://jira.example.com".into()),
                project: Some("CLI".into()),
                issue_type: Some("Story".into()),
                max_results: Some(10),
                ..Options::default()
            }
        );
    }
}
