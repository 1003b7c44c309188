use clap::{command, parser::ValueSource, Arg, ArgAction, ArgMatches, Command};

use crate::config::{self, Location, Options};

const ASSIGNEE: &str = "assignee";
const CONFIG: &str = "config";
const BASE_URL: &str = "baseURL";
const USERNAME: &str = "username";
const PASSWORD: &str = "password";
const PROJECT: &str = "project";
const ISSUE_TYPE: &str = "issueType";
const UPDATED_SINCE: &str = "updatedSince";
const UPDATED_BETWEEN: &str = "updatedBetween";
const DRY_RUN: &str = "dry-run";

pub(crate) fn command() -> Command {
    command!()
        .arg(
            Arg::new(ASSIGNEE)
                .help("Jira usernames whose issues should be in the report")
                .value_name("ASSIGNEE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new(CONFIG)
                .long(CONFIG)
                .help("Config file in YAML")
                .default_value(config::DEFAULT_PATH),
        )
        .arg(
            Arg::new(BASE_URL)
                .long(BASE_URL)
                .help("Base URL of Jira server"),
        )
        .arg(
            Arg::new(USERNAME)
                .long(USERNAME)
                .env("JIRA_USERNAME")
                .help("Jira username"),
        )
        .arg(
            Arg::new(PASSWORD)
                .long(PASSWORD)
                .env("JIRA_PASSWORD")
                .hide_env_values(true)
                .help("Jira password or API token, prompted for if not set"),
        )
        .arg(
            Arg::new(PROJECT)
                .long(PROJECT)
                .help("Jira project (comma-separated)"),
        )
        .arg(
            Arg::new(ISSUE_TYPE)
                .long(ISSUE_TYPE)
                .help("Jira issue type (comma-separated)"),
        )
        .arg(
            Arg::new(UPDATED_SINCE)
                .long(UPDATED_SINCE)
                .allow_hyphen_values(true)
                .help("Date after which issues have been updated, e.g. \"-7d\""),
        )
        .arg(
            Arg::new(UPDATED_BETWEEN)
                .long(UPDATED_BETWEEN)
                .allow_hyphen_values(true)
                .help("Date range between which issues have been updated, e.g. \"2021-10-01~2021-10-10\" (precedes `updatedSince`)"),
        )
        .arg(
            Arg::new(DRY_RUN)
                .long(DRY_RUN)
                .action(ArgAction::SetTrue)
                .help("Print the query that would be sent to Jira instead of sending it"),
        )
}

/// Everything parsed from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Args {
    pub(crate) assignees: Vec<String>,
    pub(crate) config: Location,
    pub(crate) options: Options,
    pub(crate) dry_run: bool,
}

impl From<&ArgMatches> for Args {
    fn from(matches: &ArgMatches) -> Self {
        let string = |id: &str| matches.get_one::<String>(id).cloned();
        let config = match (matches.value_source(CONFIG), string(CONFIG)) {
            (Some(ValueSource::DefaultValue) | None, _) | (_, None) => Location::Default,
            (Some(_), Some(path)) => Location::Explicit(path),
        };
        Self {
            assignees: matches
                .get_many::<String>(ASSIGNEE)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            config,
            options: Options {
                base_url: string(BASE_URL),
                username: string(USERNAME),
                password: string(PASSWORD),
                project: string(PROJECT),
                issue_type: string(ISSUE_TYPE),
                updated_since: string(UPDATED_SINCE),
                updated_between: string(UPDATED_BETWEEN),
                ..Options::default()
            },
            dry_run: matches.get_flag(DRY_RUN),
        }
    }
}
