//! Compose a deployment note from the milestone issues of several GitHub repositories.
//!
//! [`github::GitHub`] lists the issues of one repository per call,
//! [`note::NoteFragment`] turns them into the repository's part of the note,
//! [`note::CompositeNote`] merges the parts in order and
//! [`output::render`] writes the result through a [`output::Template`].

pub mod client;
pub mod data;
pub mod error;
pub mod github;
pub mod logging;
pub mod note;
pub mod options;
pub mod output;
pub mod response;

pub use error::{ApiError, Error, Result};
