use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize as _;

use deploy_note::data::{IssueListOptions, IssueState};
use deploy_note::github::{DEFAULT_API_URL, GitHub};
use deploy_note::note::{CompositeNote, MilestoneCheck, NoteFragment};
use deploy_note::output::{Template, render};
use deploy_note::{Error, Result, logging};

const DEFAULT_TITLE: &str = "통합검색 배포 안내드립니다.";

/// Compose a deployment note from GitHub milestone issues
#[derive(Parser)]
#[command(name = "deploy-note")]
#[command(about = "Compose a deployment note from the issues of a GitHub milestone")]
#[command(long_about = r#"deploy-note - Compose a deployment note from GitHub milestone issues

Every option can also be given through the environment variable shown next to it.
The note is written to stdout, logs go to stderr."#)]
struct Args {
    /// GitHub API root, e.g. https://enterprise.github.com/api/v3/
    #[arg(long, env = "GITHUB_URL", default_value = DEFAULT_API_URL)]
    github_url: String,

    /// User for basic authentication
    #[arg(long, env = "CLIENT_ID")]
    client_id: Option<String>,

    /// Password or token for basic authentication
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Owner of the repositories
    #[arg(long, env = "OWNER")]
    owner: Option<String>,

    /// Milestone number to collect issues from
    #[arg(long, env = "MILESTONE_ID")]
    milestone_id: Option<String>,

    /// Colon-separated repository names, in note order
    #[arg(long, env = "REPOS", value_name = "REPO:REPO")]
    repos: Option<String>,

    /// Title line of the note
    #[arg(long, env = "NOTE_TITLE", default_value = DEFAULT_TITLE)]
    title: String,

    /// Template file with {{ field }} placeholders (default: built-in)
    #[arg(long, env = "NOTE_TEMPLATE", value_name = "PATH")]
    template: Option<PathBuf>,

    /// Issue state to include
    #[arg(long, value_enum, default_value_t = IssueState::All)]
    state: IssueState,

    /// Issues per page, as accepted by the API (at most 100)
    #[arg(long, value_name = "N")]
    per_page: Option<u32>,

    /// Request timeout in seconds, 0 to wait forever
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Follow pagination to fetch every page of issues
    #[arg(long)]
    all_pages: bool,

    /// Use the milestone of the last issue when issues of a repository disagree
    #[arg(long)]
    allow_mixed_milestones: bool,

    /// Log requests and rate limits
    #[arg(short, long)]
    verbose: bool,
}

/// Everything needed to fetch issues, present and non-empty
struct Settings {
    client_id: String,
    client_secret: String,
    owner: String,
    milestone_id: String,
    repos: Vec<String>,
}

impl Args {
    fn settings(&self) -> Option<Settings> {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        let repos: Vec<String> = present(&self.repos)?
            .split(':')
            .filter(|repo| !repo.is_empty())
            .map(str::to_owned)
            .collect();
        if repos.is_empty() || self.github_url.is_empty() {
            return None;
        }

        Some(Settings {
            client_id: present(&self.client_id)?,
            client_secret: present(&self.client_secret)?,
            owner: present(&self.owner)?,
            milestone_id: present(&self.milestone_id)?,
            repos,
        })
    }
}

fn usage() -> String {
    format!(
        r#"{}
    export GITHUB_URL=https://enterprise.github.com/api/v3/
    export CLIENT_ID=user
    export CLIENT_SECRET=password
    export OWNER=heshed
    export REPOS=milestones-test:milestones-test
    export MILESTONE_ID=1
    deploy-note

Run 'deploy-note --help' for all options."#,
        "Usage:".cyan().bold()
    )
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    // Incomplete configuration is not a failure: explain and leave.
    let Some(settings) = args.settings() else {
        println!("{}", usage());
        return;
    };

    if let Err(err) = run(&args, &settings) {
        tracing::error!("{err}");
        if let Error::Api(api) = &err {
            for detail in &api.errors {
                tracing::error!(%detail, "API error detail");
            }
            let rate = api.response.rate;
            tracing::error!(
                limit = rate.limit,
                remaining = rate.remaining,
                reset = ?rate.reset,
                rate_limited = api.is_rate_limited(),
                "Rate limit state of the failed request"
            );
        }
        std::process::exit(1);
    }
}

fn run(args: &Args, settings: &Settings) -> Result<()> {
    let template = match &args.template {
        Some(path) => Template::from_file(path)?,
        None => Template::builtin()?,
    };

    let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));
    let hub = GitHub::new(
        &args.github_url,
        settings.client_id.as_str(),
        settings.client_secret.as_str(),
        timeout,
    )?;

    let check = if args.allow_mixed_milestones {
        MilestoneCheck::LastWins
    } else {
        MilestoneCheck::Strict
    };

    let mut note = CompositeNote::new(args.title.as_str());
    for repo in &settings.repos {
        let opts = IssueListOptions {
            per_page: args.per_page,
            ..IssueListOptions::for_milestone(settings.milestone_id.as_str(), args.state)
        };

        let issues = if args.all_pages {
            hub.list_all_by_repo(&settings.owner, repo, &opts)?
        } else {
            let (issues, response) = hub.list_by_repo(&settings.owner, repo, &opts)?;
            if let Some(next) = response.pagination.next {
                tracing::warn!(
                    repo = repo.as_str(),
                    next,
                    "More issues on later pages; pass --all-pages to include them"
                );
            }
            issues
        };

        tracing::info!(repo = repo.as_str(), issues = issues.len(), "Collected issues");
        note.merge(NoteFragment::build(repo, &issues, check)?);
    }

    render(&note, &template, &mut std::io::stdout().lock())
}
