use std::collections::BTreeSet;

use jiff::Timestamp;

use crate::data::{Issue, Milestone};
use crate::error::{Error, Result};

/// Marks the line of an issue body that names the people to notify.
pub const MENTION_MARKER: &str = "관련 담당자 :";

/// How to pick the milestone of a repository when its issues disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MilestoneCheck {
    /// All issues must share one milestone (title and due date).
    #[default]
    Strict,
    /// The milestone of the last issue in the list is used.
    LastWins,
}

/// The part of a deployment note that comes from one repository.
///
/// Dates are the milestone due date taken as a UTC calendar day, whatever
/// offset the API reported it with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFragment {
    /// `YYYY.MM.DD` in UTC, empty when the repository had no issues
    pub deploy_date: String,
    /// `- {repo}:YYYY-MM-DD 10:00` line, the date in UTC
    pub milestone_date: String,
    pub issue_summary: String,
    pub repo_version: String,
    pub mentioned: BTreeSet<String>,
}

impl NoteFragment {
    /// Build the fragment of `repo` from its issues, in the order given.
    pub fn build(repo: &str, issues: &[Issue], check: MilestoneCheck) -> Result<Self> {
        let mut fragment = Self::default();

        for issue in issues {
            fragment.issue_summary += &summary_line(repo, issue);
            if let Some(body) = &issue.body {
                fragment.mentioned.extend(mentioned_persons(body));
            }
        }

        if let Some((title, due_on)) = milestone_of(repo, issues, check)? {
            fragment.repo_version = format!("- [{repo}:{title}]()\n");
            fragment.milestone_date = format!("- {repo}:{} 10:00\n", due_on.strftime("%Y-%m-%d"));
            fragment.deploy_date = due_on.strftime("%Y.%m.%d").to_string();
        }

        Ok(fragment)
    }
}

fn summary_line(repo: &str, issue: &Issue) -> String {
    format!(
        "- {:?} [{repo} #{} / {}]({})\n",
        issue.label_names(),
        issue.number,
        issue.title,
        issue.html_url
    )
}

/// Reduce the milestones of `issues` to the title and due date describing
/// the repository. Every issue must carry a dated milestone.
fn milestone_of<'a>(
    repo: &str,
    issues: &'a [Issue],
    check: MilestoneCheck,
) -> Result<Option<(&'a str, Timestamp)>> {
    let mut chosen: Option<(&str, Timestamp)> = None;

    for issue in issues {
        let current = issue
            .milestone
            .as_ref()
            .and_then(|Milestone { title, due_on }| Some((title.as_str(), (*due_on)?)))
            .ok_or_else(|| Error::MissingMilestone {
                repo: repo.to_owned(),
                number: issue.number,
            })?;

        if check == MilestoneCheck::Strict
            && let Some(first) = chosen
            && first != current
        {
            return Err(Error::MilestoneMismatch {
                repo: repo.to_owned(),
                first: describe(first),
                other: describe(current),
            });
        }
        chosen = Some(current);
    }

    Ok(chosen)
}

fn describe((title, due_on): (&str, Timestamp)) -> String {
    format!("{title} (due {})", due_on.strftime("%Y-%m-%d"))
}

/// Names listed after [`MENTION_MARKER`] on any line of `body`, trimmed.
pub fn mentioned_persons(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.split_once(MENTION_MARKER))
        .map(|(_, rest)| rest.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The whole deployment note, merged from the fragments of every repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeNote {
    pub title: String,
    pub deploy_date: String,
    pub milestone_date: String,
    pub issue_summary: String,
    pub repo_version: String,
    pub mentioned: BTreeSet<String>,
}

impl CompositeNote {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Append `fragment` after everything merged so far.
    ///
    /// Nothing is ever cleared. The deploy date is the first one seen.
    pub fn merge(&mut self, fragment: NoteFragment) {
        if self.deploy_date.is_empty() {
            self.deploy_date = fragment.deploy_date;
        }
        self.milestone_date += &fragment.milestone_date;
        self.issue_summary += &fragment.issue_summary;
        self.repo_version += &fragment.repo_version;
        self.mentioned.extend(fragment.mentioned);
    }

    pub fn mentioned_persons(&self) -> String {
        self.mentioned
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
