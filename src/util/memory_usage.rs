use log::{info, warn};
use psutil::process::os::linux::ProcessExt;
use std::fmt::Arguments;

const BYTES_IN_MB: f64 = 1024_f64 * 1024_f64;

/// Logs the resident and virtual memory of the current process, tagged with `msg`.
#[allow(clippy::cast_precision_loss)]
pub fn log_memory_usage(msg: Arguments) {
    let statm = psutil::process::Process::new(std::process::id())
        .map_err(|e| e.to_string())
        .and_then(|process| process.procfs_statm().map_err(|e| e.to_string()));
    match statm {
        Ok(mem) => info!(
            "Memory usage: total = {:.2} MB, rss = {:.2} MB [{}]",
            mem.size as f64 / BYTES_IN_MB,
            mem.resident as f64 / BYTES_IN_MB,
            msg
        ),
        Err(e) => warn!("Could not read memory usage [{}]: {}", msg, e),
    }
}
