use sr_packets::MacAddr;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

/// How long bindings live and how often the sweep thread looks for dead ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub entry_timeout: Duration,
    pub sweep_interval: Duration,
}

impl CacheConfig {
    pub fn new(entry_timeout: Duration, sweep_interval: Duration) -> Self {
        CacheConfig {
            entry_timeout,
            sweep_interval,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            entry_timeout: Duration::from_secs(15),
            sweep_interval: Duration::from_secs(1),
        }
    }
}

/// An IPv4 to MAC binding and the moment it was learned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArpEntry {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
    pub added: Instant,
}

impl ArpEntry {
    fn expired(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.added) > timeout
    }
}

/// Address resolution cache shared by the frame path and the sweep thread.
///
/// Every operation takes the lock for the duration of a map operation only. A poisoned lock is
/// recovered rather than propagated, the map is left consistent by every operation here.
pub struct ArpCache {
    entries: Mutex<HashMap<Ipv4Addr, ArpEntry>>,
    config: CacheConfig,
    sweeper: AtomicBool,
}

impl ArpCache {
    pub fn new(config: CacheConfig) -> Self {
        ArpCache {
            entries: Mutex::new(HashMap::new()),
            config,
            sweeper: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Ipv4Addr, ArpEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a sweep thread has been started for this cache.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.load(Ordering::SeqCst)
    }

    // True for exactly one caller until `release_sweeper`
    pub(crate) fn claim_sweeper(&self) -> bool {
        self.sweeper
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release_sweeper(&self) {
        self.sweeper.store(false, Ordering::SeqCst);
    }

    /// The MAC bound to `ip`, unless the binding is missing or older than the entry timeout.
    pub fn lookup(&self, ip: Ipv4Addr) -> Option<MacAddr> {
        self.lookup_at(ip, Instant::now())
    }

    pub fn lookup_at(&self, ip: Ipv4Addr, now: Instant) -> Option<MacAddr> {
        let timeout = self.config.entry_timeout;
        self.lock()
            .get(&ip)
            .filter(|entry| !entry.expired(now, timeout))
            .map(|entry| entry.mac)
    }

    /// Binds `ip` to `mac`, restarting the entry's clock. Returns the MAC that was bound before,
    /// expired or not.
    pub fn insert(&self, ip: Ipv4Addr, mac: MacAddr) -> Option<MacAddr> {
        self.insert_at(ip, mac, Instant::now())
    }

    pub fn insert_at(&self, ip: Ipv4Addr, mac: MacAddr, now: Instant) -> Option<MacAddr> {
        let entry = ArpEntry {
            ip,
            mac,
            added: now,
        };
        self.lock().insert(ip, entry).map(|previous| previous.mac)
    }

    pub fn invalidate(&self, ip: Ipv4Addr) -> Option<MacAddr> {
        self.lock().remove(&ip).map(|entry| entry.mac)
    }

    /// Removes every expired entry, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let timeout = self.config.entry_timeout;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|ip, entry| {
            let expired = entry.expired(now, timeout);
            if expired {
                trace!(%ip, mac = %entry.mac, "ARP entry expired");
            }
            !expired
        });
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of every entry, including ones that have expired but not been swept yet.
    pub fn entries(&self) -> Vec<ArpEntry> {
        self.lock().values().copied().collect()
    }
}

impl Default for ArpCache {
    fn default() -> Self {
        ArpCache::new(CacheConfig::default())
    }
}
