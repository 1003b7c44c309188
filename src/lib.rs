#![forbid(unsafe_code)]

use log::info;
use miette::{Diagnostic, Result};

use crate::{
    jql::DateRange,
    report::{Report, StatusSets},
};

mod cli;
mod config;
mod credentials;
mod jira;
mod jql;
mod markdown;
mod prompt;
mod report;

/// The main entry point for the CLI: parse arguments, query Jira, and print the report.
///
/// # Errors
///
/// Any failure along the way is returned after the usage line is printed.
pub async fn run() -> Result<()> {
    let mut command = cli::command();
    let matches = command.get_matches_mut();
    let args = cli::Args::from(&matches);

    if let Err(err) = generate_report(args).await {
        println!("{}", command.render_usage());
        return Err(err.into());
    }
    Ok(())
}

async fn generate_report(args: cli::Args) -> Result<(), Error> {
    let cli::Args {
        assignees,
        config,
        options,
        dry_run,
    } = args;
    if assignees.is_empty() {
        return Err(Error::MissingAssignee);
    }

    let options = options.merge(config::load(&config)?);
    let date_range = DateRange::from_options(
        options.updated_since.as_deref(),
        options.updated_between.as_deref(),
    )?;
    let jql = jql::build(
        options.project.as_deref(),
        options.issue_type.as_deref(),
        &assignees,
        &date_range,
    );
    let base_url = options
        .base_url
        .as_deref()
        .map(|url| url.trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .ok_or(Error::MissingBaseUrl)?;
    let max_results = options.max_results.unwrap_or(jira::DEFAULT_MAX_RESULTS);

    if dry_run {
        println!("Would search {base_url} for up to {max_results} issues matching:");
        println!("{jql}");
        return Ok(());
    }

    let credentials = credentials::get_or_prompt(options.username, options.password)?;
    let client = jira::Client::new(base_url, &credentials);
    let issues = client.search(&jql, max_results).await?;
    info!("Jira returned {} issues", issues.len());

    let statuses = StatusSets::new(options.finished_statuses, options.canceled_statuses);
    let report = Report::from_issues(issues, &statuses);
    let title = options.title.as_deref().unwrap_or(markdown::DEFAULT_TITLE);
    print!("{}", markdown::render(&report, title, &date_range, base_url));
    Ok(())
}

#[derive(Debug, Diagnostic, thiserror::Error)]
enum Error {
    #[error("require assignee(s)")]
    #[diagnostic(
        code(missing_assignee),
        help("Pass one or more Jira usernames after the flags, like `jira-reporter --updatedSince=-7d alice bob`.")
    )]
    MissingAssignee,
    #[error("require `--baseURL`")]
    #[diagnostic(
        code(missing_base_url),
        help("Pass the URL of your Jira server with `--baseURL`, or set `baseURL` in the config file.")
    )]
    MissingBaseUrl,
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Jql(#[from] jql::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] prompt::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Jira(#[from] jira::Error),
}
