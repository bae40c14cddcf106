use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::note::CompositeNote;

/// The template shipped with the tool
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/deploy-note.txt");

/// Fields of a [`CompositeNote`] a template may refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    DeployDate,
    MilestoneDate,
    IssueSummary,
    RepoVersion,
    MentionedPersons,
}

impl Field {
    const ALL: [(&'static str, Field); 6] = [
        ("title", Field::Title),
        ("deploy_date", Field::DeployDate),
        ("milestone_date", Field::MilestoneDate),
        ("issue_summary", Field::IssueSummary),
        ("repo_version", Field::RepoVersion),
        ("mentioned_persons", Field::MentionedPersons),
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, field)| *field)
    }

    fn value(self, note: &CompositeNote) -> std::borrow::Cow<'_, str> {
        match self {
            Field::Title => note.title.as_str().into(),
            Field::DeployDate => note.deploy_date.as_str().into(),
            Field::MilestoneDate => note.milestone_date.as_str().into(),
            Field::IssueSummary => note.issue_summary.as_str().into(),
            Field::RepoVersion => note.repo_version.as_str().into(),
            Field::MentionedPersons => note.mentioned_persons().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A note template: plain text with `{{ field }}` placeholders
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `text`, rejecting unknown placeholders and unclosed `{{`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = text;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_owned()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                Error::Template(format!(
                    "unclosed placeholder at byte {}",
                    text.len() - rest.len() + start
                ))
            })?;

            let name = after[..end].trim();
            let field = Field::from_name(name).ok_or_else(|| {
                let known: Vec<&str> = Field::ALL.iter().map(|(name, _)| *name).collect();
                Error::Template(format!(
                    "unknown placeholder `{name}`, expected one of: {}",
                    known.join(", ")
                ))
            })?;
            segments.push(Segment::Field(field));
            rest = &after[end + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_owned()));
        }

        Ok(Self { segments })
    }

    /// The template shipped with the tool.
    pub fn builtin() -> Result<Self> {
        Self::parse(DEFAULT_TEMPLATE)
    }

    /// Read and parse a template file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Fill in the placeholders from `note`.
    pub fn fill(&self, note: &CompositeNote) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(&field.value(note)),
            }
        }
        out
    }
}

/// Render `note` through `template` and write it to `out`.
///
/// The note is rendered completely before anything is written, then flushed.
pub fn render(note: &CompositeNote, template: &Template, out: &mut impl Write) -> Result<()> {
    let text = template.fill(note);
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
