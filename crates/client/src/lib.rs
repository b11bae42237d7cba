//! Console front end for the dungeon crawler.
//!
//! # Architecture
//!
//! ```text
//! main
//!   ├─→ ClientConfig     (.env and CRAWL_* variables)
//!   ├─→ logging          (file-only tracing subscriber)
//!   ├─→ ContentFactory   (campaign files)
//!   └─→ ConsoleApp       (command loop around the turn manager)
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod console;
pub mod logging;

pub use app::ConsoleApp;
pub use command::Command;
pub use config::ClientConfig;
pub use console::{ConsoleDialogs, ConsoleInput, ConsolePresenter};
