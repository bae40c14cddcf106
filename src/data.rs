use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Issue state filter for the list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

/// Query options for listing the issues of a repository
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl IssueListOptions {
    pub fn for_milestone(milestone: impl Into<String>, state: IssueState) -> Self {
        Self {
            milestone: Some(milestone.into()),
            state: Some(state),
            ..Default::default()
        }
    }

    /// Same filter, pointed at another page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub due_on: Option<Timestamp>,
}

/// An issue as returned by `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub body: Option<String>,
    pub milestone: Option<Milestone>,
}

impl Issue {
    /// Label names in API order
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|label| label.name.as_str()).collect()
    }
}
