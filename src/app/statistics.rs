//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::aggregate::BatchSummary;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};

/// Prints the batch tally, the per-type counters and a one-line summary.
pub fn print_final_summary(
    summary: &BatchSummary,
    error_stats: &ProcessingStats,
    elapsed_seconds: f64,
    run_directory: &std::path::Path,
) {
    summary.log();
    print_error_statistics(error_stats);
    print_simple_summary(summary, elapsed_seconds, run_directory);
}

/// Prints a simple one-line summary of the run.
///
/// Works with both plain and JSON log formats (log::info! handles formatting).
fn print_simple_summary(summary: &BatchSummary, elapsed_seconds: f64, run_directory: &std::path::Path) {
    info!(
        "✅ Audited {} URL{} ({} succeeded, {} failed) in {:.1}s - reports in {}",
        summary.total,
        if summary.total == 1 { "" } else { "s" },
        summary.succeeded,
        summary.failed,
        elapsed_seconds,
        run_directory.display()
    );
}

/// Prints error, warning, and info statistics to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_warnings = error_stats.total_warnings();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_warnings > 0 {
        info!("Warning Counts ({} total):", total_warnings);
        for warning_type in WarningType::iter() {
            let count = error_stats.get_warning_count(warning_type);
            if count > 0 {
                info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_no_errors() {
        let stats = ProcessingStats::new();
        // Should not panic when there are no errors
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_error_statistics_all_types() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::NavigationTimeout);
        stats.increment_warning(WarningType::ScreenshotUnavailable);
        stats.increment_info(InfoType::NoViolations);
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_final_summary() {
        let stats = ProcessingStats::new();
        print_final_summary(
            &BatchSummary::default(),
            &stats,
            0.0,
            std::path::Path::new("results/2026-01-01_00-00-00"),
        );
    }
}
