//! Progress logging utilities.

use log::info;

/// Logs batch progress as `Progress: done/total (pct%)` with throughput.
///
/// # Arguments
///
/// * `start_time` - When checking started
/// * `completed` - Links checked so far
/// * `total` - Links in this run
pub fn log_progress(start_time: std::time::Instant, completed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Progress: {}/{} ({}%) in {:.1}s (~{:.2} links/sec)",
        completed,
        total,
        percentage(completed, total),
        elapsed_secs,
        rate
    );
}

/// Rounded integer percentage; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}
