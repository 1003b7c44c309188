use base64::{prelude::BASE64_STANDARD as base64, Engine};
use log::debug;
use miette::Diagnostic;
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;

/// How many issues a single search returns unless configured otherwise.
pub(crate) const DEFAULT_MAX_RESULTS: u32 = 100;

const SEARCH_FIELDS: [&str; 4] = ["assignee", "summary", "status", "comment"];

/// A Jira REST client authenticated with basic auth.
pub(crate) struct Client {
    http: reqwest::Client,
    base_url: String,
    auth: String,
}

impl Client {
    pub(crate) fn new(base_url: &str, credentials: &Credentials) -> Self {
        let Credentials { username, password } = credentials;
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: format!(
                "Basic {}",
                base64.encode(format!("{username}:{password}"))
            ),
        }
    }

    /// Search for issues matching `jql`, returning at most `max_results` of them in the order
    /// Jira sorted them.
    pub(crate) async fn search(&self, jql: &str, max_results: u32) -> Result<Vec<Issue>, Error> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        debug!("Searching {url} for {jql}");
        let body = SearchParams {
            jql,
            max_results,
            fields: &SEARCH_FIELDS,
        };
        let response: SearchResponse = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("Authorization", &self.auth)
            .json(&body)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|source| Error::ApiRequest {
                source,
                activity: "searching for issues",
                host: self.base_url.clone(),
            })?
            .json()
            .await
            .map_err(|source| Error::ApiResponse {
                source,
                activity: "searching for issues",
                host: self.base_url.clone(),
            })?;

        let returned = response.issues.len();
        if response.total > returned {
            eprintln!(
                "WARNING: Jira found {} matching issues but only returned {returned}, the report is incomplete. Raise `maxResults` in the config file to include more.",
                response.total
            );
        }
        Ok(response.issues)
    }
}

/// The link to view an issue in the Jira web UI.
pub(crate) fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{key}", base_url.trim_end_matches('/'))
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchParams<'a> {
    jql: &'a str,
    max_results: u32,
    fields: &'a [&'a str],
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    issues: Vec<Issue>,
    #[serde(default)]
    total: usize,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Issue {
    pub(crate) key: String,
    pub(crate) fields: IssueFields,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct IssueFields {
    #[serde(default)]
    pub(crate) summary: String,
    pub(crate) status: Option<Status>,
    pub(crate) comment: Option<Comments>,
    pub(crate) assignee: Option<User>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Status {
    pub(crate) name: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Comments {
    #[serde(default)]
    pub(crate) comments: Vec<Comment>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Comment {
    #[serde(default)]
    pub(crate) body: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    pub(crate) display_name: String,
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("Problem communicating with Jira at {host} while {activity}: {source}")]
    #[diagnostic(
        code(jira::api_request_error),
        help(
            "There was a problem communicating with Jira, this may be a network issue, a wrong --baseURL, or invalid credentials."
        )
    )]
    ApiRequest {
        source: reqwest::Error,
        activity: &'static str,
        host: String,
    },
    #[error("Trouble decoding the response from Jira at {host} while {activity}: {source}")]
    #[diagnostic(
        code(jira::api_response_error),
        help("Make sure --baseURL points at a Jira server which supports the REST API v2.")
    )]
    ApiResponse {
        source: reqwest::Error,
        activity: &'static str,
        host: String,
    },
}
