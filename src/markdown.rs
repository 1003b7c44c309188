use std::fmt::{self, Display};

use crate::{
    jira::browse_url,
    jql::DateRange,
    report::{Issue, Report},
};

pub(crate) const DEFAULT_TITLE: &str = "Jira Report (issues updated $dateRange)";

/// Replaced in the title with the date range that was queried.
const DATE_RANGE_VARIABLE: &str = "$dateRange";

/// Render `report` as a markdown document, one section per assignee.
pub(crate) fn render(
    report: &Report,
    title: &str,
    date_range: &DateRange,
    base_url: &str,
) -> String {
    Markdown {
        report,
        title: title.replace(DATE_RANGE_VARIABLE, &date_range.to_string()),
        base_url,
    }
    .to_string()
}

struct Markdown<'a> {
    report: &'a Report,
    title: String,
    base_url: &'a str,
}

impl Markdown<'_> {
    fn write_issue(&self, f: &mut fmt::Formatter<'_>, issue: &Issue) -> fmt::Result {
        let Issue {
            key,
            summary,
            status,
            last_comment,
        } = issue;
        let url = browse_url(self.base_url, key);
        write!(f, "    + [{summary}]({url}): {status}")?;
        if let Some(comment) = last_comment {
            write!(f, " ({comment})")?;
        }
        writeln!(f)
    }
}

impl Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        for (assignee, progress) in self.report.iter() {
            writeln!(f)?;
            writeln!(f, "## {assignee}")?;
            writeln!(f)?;
            writeln!(f, "- Finished:")?;
            for issue in &progress.finished {
                self.write_issue(f, issue)?;
            }
            writeln!(f)?;
            writeln!(f, "- Unfinished:")?;
            for issue in &progress.unfinished {
                self.write_issue(f, issue)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_render {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::report::StatusSets;

    fn issue(key: &str, summary: &str, status: &str, last_comment: Option<&str>) -> Issue {
        Issue {
            key: key.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
            last_comment: last_comment.map(String::from),
        }
    }

    #[test]
    fn sections_per_assignee_in_fetch_order() {
        let statuses = StatusSets::default();
        let mut report = Report::default();
        report.add(
            "Bob".into(),
            issue("ABC-3", "Write docs", "In Progress", Some("Half way there")),
            &statuses,
        );
        report.add(
            "Alice".into(),
            issue("ABC-2", "Ship it", "Done", None),
            &statuses,
        );
        report.add(
            "Alice".into(),
            issue("ABC-1", "Fix login", "Open", None),
            &statuses,
        );
        report.add(
            "Alice".into(),
            issue("ABC-4", "Old idea", "Canceled", None),
            &statuses,
        );
        report.add(
            "Alice".into(),
            issue("ABC-5", "Refactor", "Closed", None),
            &statuses,
        );

        let markdown = render(
            &report,
            DEFAULT_TITLE,
            &DateRange::Since("-7d".into()),
            "https://jira.example.com",
        );

        assert_eq!(
            markdown,
            "\
# Jira Report (issues updated -7d)

## Alice

- Finished:
    + [Ship it](https://jira.example.com/browse/ABC-2): Done
    + [Refactor](https://jira.example.com/browse/ABC-5): Closed

- Unfinished:
    + [Fix login](https://jira.example.com/browse/ABC-1): Open

## Bob

- Finished:

- Unfinished:
    + [Write docs](https://jira.example.com/browse/ABC-3): In Progress (Half way there)
"
        );
    }

    #[test]
    fn custom_title() {
        let markdown = render(
            &Report::default(),
            "Weekly sync: $dateRange",
            &DateRange::Between {
                min: "2021-10-01".into(),
                max: "2021-10-10".into(),
            },
            "https://jira.example.com",
        );
        assert_eq!(markdown, "# Weekly sync: 2021-10-01~2021-10-10\n");
    }
}
