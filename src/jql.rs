use std::fmt::{self, Display};

use itertools::Itertools;
use miette::Diagnostic;

/// The window of `updatedDate` that issues must fall in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DateRange {
    Since(String),
    Between { min: String, max: String },
}

impl DateRange {
    /// `updated_between` takes precedence over `updated_since`; empty values count as missing.
    pub(crate) fn from_options(
        updated_since: Option<&str>,
        updated_between: Option<&str>,
    ) -> Result<Self, Error> {
        if let Some(between) = updated_between.filter(|value| !value.is_empty()) {
            let (min, max) = between
                .split_once('~')
                .ok_or_else(|| Error::InvalidBetween(between.to_string()))?;
            return Ok(Self::Between {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        updated_since
            .filter(|value| !value.is_empty())
            .map(|since| Self::Since(since.to_string()))
            .ok_or(Error::MissingRange)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Since(since) => write!(f, "{since}"),
            Self::Between { min, max } => write!(f, "{min}~{max}"),
        }
    }
}

/// Build the JQL for issues assigned to any of `assignees` and updated within `range`, newest
/// first.
///
/// `project` and `issue_type` are comma-separated lists which are passed through verbatim. Empty
/// filters are left out of the query.
pub(crate) fn build(
    project: Option<&str>,
    issue_type: Option<&str>,
    assignees: &[String],
    range: &DateRange,
) -> String {
    let mut clauses = Vec::with_capacity(5);
    if let Some(project) = project.filter(|value| !value.is_empty()) {
        clauses.push(format!("project in ({project})"));
    }
    if let Some(issue_type) = issue_type.filter(|value| !value.is_empty()) {
        clauses.push(format!("issuetype in ({issue_type})"));
    }
    clauses.push(format!("assignee in ({})", assignees.iter().join(",")));
    match range {
        DateRange::Since(since) => clauses.push(format!("updatedDate >= {since}")),
        DateRange::Between { min, max } => {
            clauses.push(format!("updatedDate >= {min}"));
            clauses.push(format!("updatedDate <= {max}"));
        }
    }
    format!("{} ORDER BY updated DESC", clauses.join(" AND "))
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("require `--updatedSince` or `--updatedBetween`")]
    #[diagnostic(
        code(jql::missing_date_range),
        help("Pass something like `--updatedSince=-7d`, or set `updatedSince` in the config file.")
    )]
    MissingRange,
    #[error("invalid `--updatedBetween`: {0:?}")]
    #[diagnostic(
        code(jql::invalid_date_range),
        help("The range must be two dates separated by `~`, like `2021-10-01~2021-10-10`.")
    )]
    InvalidBetween(String),
}
