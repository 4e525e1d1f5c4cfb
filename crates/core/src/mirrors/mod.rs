//! Mirror discovery and resolution.
//!
//! `MirrorDirectory` lists candidate mirrors; `MirrorResolver` walks them
//! under a timeout/trust schedule until one answers a query with results.

mod directory;
mod resolver;
mod types;

pub use directory::MirrorDirectory;
pub use resolver::{MirrorResolver, ResolveSchedule, ResolveStep};
pub use types::{Mirror, MirrorFilters, Resolution};

use thiserror::Error;

use crate::document::FetchError;

/// Errors that can occur while discovering or resolving mirrors.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Failed to fetch mirror directory: {0}")]
    Directory(#[from] FetchError),

    #[error("All mirrors seem to be unreachable")]
    AllMirrorsUnreachable,
}
