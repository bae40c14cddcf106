use std::time::Duration;

use reqwest::blocking::Client;

use crate::client::{Target, execute};
use crate::data::{Issue, IssueListOptions};
use crate::error::Result;
use crate::options::add_options;
use crate::response::Response;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for a GitHub-compatible REST API
pub struct GitHub {
    client: Client,
    api_url: String,
    user: String,
    password: String,
}

impl GitHub {
    /// `api_url` is the API root, e.g. `https://github.example.com/api/v3/`.
    /// Basic authentication is used only when both `user` and `password` are non-empty.
    pub fn new(
        api_url: &str,
        user: impl Into<String>,
        password: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: format!("{}/", api_url.trim_end_matches('/')),
            user: user.into(),
            password: password.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// List one page of the issues of `owner/repo` matching `opts`.
    ///
    /// `owner` and `repo` are inserted into the URL as given and must not
    /// contain URL-reserved characters. Follow `response.pagination.next`
    /// to get further pages.
    pub fn list_by_repo(
        &self,
        owner: &str,
        repo: &str,
        opts: &IssueListOptions,
    ) -> Result<(Vec<Issue>, Response)> {
        let url = format!("{}repos/{owner}/{repo}/issues", self.api_url);
        let url = add_options(&url, Some(opts))?;

        let mut request = self.client.get(url);
        if !self.user.is_empty() && !self.password.is_empty() {
            request = request.basic_auth(&self.user, Some(&self.password));
        }

        let mut issues: Vec<Issue> = Vec::new();
        let response = execute(&self.client, request.build()?, Target::Json(&mut issues))?;

        tracing::debug!(owner, repo, count = issues.len(), "Listed issues");
        Ok((issues, response))
    }

    /// List every page of the issues of `owner/repo`, one request at a time.
    pub fn list_all_by_repo(
        &self,
        owner: &str,
        repo: &str,
        opts: &IssueListOptions,
    ) -> Result<Vec<Issue>> {
        let mut all = Vec::new();
        let mut opts = opts.clone();
        loop {
            let (issues, response) = self.list_by_repo(owner, repo, &opts)?;
            all.extend(issues);

            match response.pagination.next {
                Some(next) if opts.page.is_none_or(|page| next > page) => {
                    opts = opts.with_page(next);
                }
                _ => return Ok(all),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_gets_one_trailing_slash() {
        for base in [
            "https://github.example.com/api/v3",
            "https://github.example.com/api/v3/",
            "https://github.example.com/api/v3//",
        ] {
            let hub = GitHub::new(base, "", "", None).unwrap();
            assert_eq!(hub.api_url(), "https://github.example.com/api/v3/");
        }
    }
}
