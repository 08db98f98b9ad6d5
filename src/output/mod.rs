//! Output module for crawl side products
//!
//! This module handles:
//! - The consulted-references log written while extracting
//! - Run statistics and the printed end-of-run summary

mod references;
pub mod stats;

pub use references::ReferenceLog;
pub use stats::{print_run_statistics, print_table_counts, RunStats};
