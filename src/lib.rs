#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assemble;
pub mod builder;
pub mod candidates;
pub mod config;
pub mod entry;
pub mod error;
pub mod models;
pub mod output;
pub mod selection;

pub use builder::{GeneratedSource, SqlEmbedBuilder, run_build_script};
pub use candidates::{CancellationToken, FileText, InlineText, ReadError, TextProvider};
pub use config::EmbedConfig;
pub use entry::IdentifierPolicy;
pub use error::{EmbedError, EmbedResult};
pub use models::{CandidateFile, ResourceEntry};
