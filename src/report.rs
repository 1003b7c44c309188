use std::collections::{btree_map, BTreeMap};

use indexmap::IndexSet;
use log::{debug, trace};

use crate::jira;

/// A single issue as it appears in the report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Issue {
    pub(crate) key: String,
    pub(crate) summary: String,
    pub(crate) status: String,
    /// The body of the most recent comment, flattened onto one line.
    pub(crate) last_comment: Option<String>,
}

/// The issues of one assignee, each list in the order Jira returned them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Progress {
    pub(crate) finished: Vec<Issue>,
    pub(crate) unfinished: Vec<Issue>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Classification {
    Finished,
    Canceled,
    Unfinished,
}

/// The status names which mark an issue as done or as not worth reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StatusSets {
    finished: IndexSet<String>,
    canceled: IndexSet<String>,
}

impl Default for StatusSets {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl StatusSets {
    pub(crate) fn new(
        finished: Option<IndexSet<String>>,
        canceled: Option<IndexSet<String>>,
    ) -> Self {
        Self {
            finished: finished.unwrap_or_else(default_finished),
            canceled: canceled.unwrap_or_else(default_canceled),
        }
    }

    /// Exact, case-sensitive match on the status name. Anything unknown is unfinished.
    pub(crate) fn classify(&self, status: &str) -> Classification {
        if self.finished.contains(status) {
            Classification::Finished
        } else if self.canceled.contains(status) {
            Classification::Canceled
        } else {
            Classification::Unfinished
        }
    }
}

fn default_finished() -> IndexSet<String> {
    ["Done", "Closed", "关闭", "完成"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_canceled() -> IndexSet<String> {
    ["Canceled", "Cancelled", "取消"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Progress for every assignee, ordered by assignee name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Report(BTreeMap<String, Progress>);

impl Report {
    /// Group `issues` by assignee, dropping issues that nobody is assigned to.
    pub(crate) fn from_issues(issues: Vec<jira::Issue>, statuses: &StatusSets) -> Self {
        let mut report = Self::default();
        for jira::Issue { key, fields } in issues {
            let Some(assignee) = fields.assignee else {
                debug!("Skipping {key} because it is not assigned to anyone");
                continue;
            };
            let last_comment = fields
                .comment
                .and_then(|comments| comments.comments.into_iter().last())
                .map(|comment| single_line(&comment.body))
                .filter(|comment| !comment.is_empty());
            let issue = Issue {
                key,
                summary: fields.summary,
                status: fields.status.map(|status| status.name).unwrap_or_default(),
                last_comment,
            };
            report.add(assignee.display_name, issue, statuses);
        }
        report
    }

    /// Put `issue` in the right bucket for `assignee`, creating the assignee if needed.
    pub(crate) fn add(&mut self, assignee: String, issue: Issue, statuses: &StatusSets) {
        let progress = self.0.entry(assignee).or_default();
        match statuses.classify(&issue.status) {
            Classification::Finished => progress.finished.push(issue),
            Classification::Unfinished => progress.unfinished.push(issue),
            Classification::Canceled => {
                trace!("Leaving canceled issue {} out of the report", issue.key);
            }
        }
    }

    pub(crate) fn iter(&self) -> btree_map::Iter<'_, String, Progress> {
        self.0.iter()
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}
