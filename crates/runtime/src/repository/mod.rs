//! Repository layer for saved games.
//!
//! Campaign content is static and loaded by `crawl-content`; repositories
//! only hold what changes during play.

mod error;
mod file;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::{SaveRepository, SavedGame};
