//! # multiget
//!
//! `multiget` downloads several files over HTTP at once. It supports:
//! - One concurrent transfer per unique URL
//! - A single live status line with per-file progress
//! - Coordinated cancellation on SIGINT/SIGTERM/SIGQUIT
//! - Removal of partial files on failure or interruption
//!
//! The binary wires these pieces together; the components are exposed so
//! they can be driven directly, e.g. from tests.

pub mod aggregator;
pub mod args;
pub mod config;
pub mod coordinator;
pub mod counter;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod observer;
pub mod registry;
pub mod signals;
pub mod utils;

pub use args::Args;
pub use config::Settings;
pub use coordinator::{Coordinator, RunOutcome, RunReport};
pub use counter::{TransferCounter, TransferSnapshot};
pub use downloader::download_file;
pub use error::{ErrorKind, TransferError};
pub use observer::{ConsoleObserver, StatusObserver};
pub use registry::ProgressRegistry;
