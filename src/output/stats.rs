//! Run statistics
//!
//! Counters kept while a crawl runs, and the printed summary shown at the end
//! of a run and by `--stats`.

use crate::records::{UniversityBundle, APPROXIMATE_NOTE};
use std::time::Duration;

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Universities whose records were appended
    pub processed: usize,

    /// Universities abandoned after an error
    pub failed: usize,

    /// Universities skipped because a checkpoint placed them before the resume point
    pub skipped: usize,

    /// Dependent extractor runs that failed and were replaced by their fallback
    pub extractor_fallbacks: usize,

    /// Records tagged as approximate placeholders
    pub approximate_records: usize,

    /// Partial snapshots written during the run
    pub snapshots: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one appended university and its placeholder records
    pub fn record_bundle(&mut self, bundle: &UniversityBundle) {
        self.processed += 1;

        let notes = std::iter::once(bundle.university.notes.as_str())
            .chain(bundle.programs.iter().map(|r| r.notes.as_str()))
            .chain(bundle.labs.iter().map(|r| r.notes.as_str()))
            .chain(bundle.scholarships.iter().map(|r| r.notes.as_str()))
            .chain([
                bundle.admission.notes.as_str(),
                bundle.cost.notes.as_str(),
                bundle.outcome.notes.as_str(),
            ]);
        self.approximate_records += notes.filter(|n| n.contains(APPROXIMATE_NOTE)).count();
    }
}

/// Prints per-sheet row counts
///
/// # Arguments
///
/// * `counts` - Sheet names and their row counts, in sheet order
pub fn print_table_counts(counts: &[(String, usize)]) {
    println!("=== Table Rows ===\n");
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    for (sheet, count) in counts {
        println!("  {:<20} {:>6}", sheet, count);
    }
    println!("  {:<20} {:>6}", "Total", total);
    println!();
}

/// Prints the counters of a finished run
pub fn print_run_statistics(stats: &RunStats, elapsed: Duration) {
    println!("=== Run Statistics ===\n");
    println!("  Universities processed: {}", stats.processed);
    println!("  Universities failed: {}", stats.failed);
    if stats.skipped > 0 {
        println!("  Universities skipped (resumed): {}", stats.skipped);
    }
    println!("  Extractor fallbacks: {}", stats.extractor_fallbacks);
    println!("  Approximate records: {}", stats.approximate_records);
    println!("  Partial snapshots: {}", stats.snapshots);

    let attempted = stats.processed + stats.failed;
    let success_rate = if attempted > 0 {
        (stats.processed as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} universities) in {:.1?}",
        success_rate, stats.processed, attempted, elapsed
    );
}
