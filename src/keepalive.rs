use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

/// Background thread that refreshes the cached sudo timestamp while a long
/// install sequence runs, so the user is not re-prompted halfway through.
/// Purely advisory housekeeping: refresh failures are ignored.
///
/// Scoped resource: the thread is stopped and joined when the guard drops.
pub struct SudoKeepalive {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SudoKeepalive {
    pub fn start(interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                let refreshed = Command::new("sudo")
                    .args(["-n", "-v"])
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map(|status| status.success())
                    .unwrap_or(false);
                if !refreshed {
                    debug!("sudo timestamp refresh failed, continuing anyway");
                }

                // Sleep in short slices so dropping the guard does not block
                // for the whole interval.
                let mut remaining = interval;
                while !thread_stop.load(Ordering::Relaxed) && !remaining.is_zero() {
                    let step = remaining.min(Duration::from_millis(200));
                    thread::sleep(step);
                    remaining -= step;
                }
            }
        });
        SudoKeepalive {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for SudoKeepalive {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
