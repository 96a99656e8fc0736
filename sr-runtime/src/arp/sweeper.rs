use crate::arp::ArpCache;
use std::io;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

pub const SWEEPER_THREAD_NAME: &str = "arp-cache-sweep";

/// Starts the background thread that sweeps expired entries out of `cache` every
/// `sweep_interval`.
///
/// A cache gets at most one sweep thread. Returns `Ok(None)` without spawning when one was
/// already started for `cache`.
///
/// The thread only holds a weak handle, so it winds down on its first wake-up after the last
/// `Arc<ArpCache>` is dropped. Callers are free to drop the returned handle; the thread keeps
/// running detached.
pub fn spawn_sweeper(cache: &Arc<ArpCache>) -> io::Result<Option<JoinHandle<()>>> {
    if !cache.claim_sweeper() {
        debug!("ARP cache already has a sweep thread");
        return Ok(None);
    }

    let interval = cache.config().sweep_interval;
    let weak: Weak<ArpCache> = Arc::downgrade(cache);

    spawn_sweep_loop(weak, interval).map(Some).map_err(|err| {
        cache.release_sweeper();
        err
    })
}

fn spawn_sweep_loop(cache: Weak<ArpCache>, interval: Duration) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(SWEEPER_THREAD_NAME.to_string())
        .spawn(move || loop {
            thread::sleep(interval);

            let cache = match cache.upgrade() {
                Some(cache) => cache,
                None => {
                    debug!("ARP cache dropped, stopping sweep");
                    return;
                }
            };

            let removed = cache.sweep();
            if removed > 0 {
                debug!(removed, remaining = cache.len(), "Swept ARP cache");
            }
        })
}
