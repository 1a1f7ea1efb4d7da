/*!
 * Monitor
 *
 * A `parking_lot::Mutex` paired with a single `parking_lot::Condvar`, owning
 * all of the state it guards.
 *
 * # Discipline
 *
 * - State is reachable only through `with_lock` or a `MonitorGuard`
 * - Waits are predicate-guarded: every wakeup re-evaluates the predicate and
 *   loops back to waiting if it still holds (spurious and broadcast safe)
 * - `notify_all` lives on the guard, so a broadcast always happens inside the
 *   critical section that changed the state and no wakeup can be lost
 */

use super::traits::WakeResult;
use super::wait::{WaitError, WaitResult};
use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::Serialize;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Diagnostic counters, updated around blocking calls
#[derive(Default)]
struct MonitorStats {
    waits: AtomicU64,
    broadcasts: AtomicU64,
    woken: AtomicU64,
    waiting: AtomicUsize,
}

/// Point-in-time copy of a monitor's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStatsSnapshot {
    /// Times a thread blocked on the condition variable
    pub waits: u64,
    /// `notify_all` calls
    pub broadcasts: u64,
    /// Sum of threads reported woken by broadcasts
    pub woken: u64,
    /// Threads currently blocked
    pub waiting: usize,
}

/// Mutual-exclusion lock plus condition variable guarding `T`
pub struct Monitor<T> {
    name: &'static str,
    state: Mutex<T>,
    cond: Condvar,
    stats: MonitorStats,
}

impl<T> Monitor<T> {
    pub fn new(name: &'static str, state: T) -> Self {
        Self {
            name,
            state: Mutex::new(state),
            cond: Condvar::new(),
            stats: MonitorStats::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run `critical_section` with exclusive access to the guarded state
    #[inline]
    pub fn with_lock<R>(&self, critical_section: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.state.lock();
        critical_section(&mut *guard)
    }

    /// Acquire the lock and return a guard that can wait and notify
    #[inline]
    pub fn enter(&self) -> MonitorGuard<'_, T> {
        MonitorGuard {
            monitor: self,
            guard: self.state.lock(),
        }
    }

    pub fn stats(&self) -> MonitorStatsSnapshot {
        MonitorStatsSnapshot {
            waits: self.stats.waits.load(Ordering::Relaxed),
            broadcasts: self.stats.broadcasts.load(Ordering::Relaxed),
            woken: self.stats.woken.load(Ordering::Relaxed),
            waiting: self.stats.waiting.load(Ordering::Relaxed),
        }
    }
}

impl<T> fmt::Debug for Monitor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("name", &self.name)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Lock held on a `Monitor`
///
/// Dereferences to the guarded state. Dropping the guard releases the lock.
pub struct MonitorGuard<'a, T> {
    monitor: &'a Monitor<T>,
    guard: MutexGuard<'a, T>,
}

impl<'a, T> MonitorGuard<'a, T> {
    /// Block once until notified; the caller must re-check its predicate
    ///
    /// Prefer `wait_while`, which loops for you.
    pub fn wait(&mut self) {
        let stats = &self.monitor.stats;
        stats.waits.fetch_add(1, Ordering::Relaxed);
        stats.waiting.fetch_add(1, Ordering::Relaxed);
        self.monitor.cond.wait(&mut self.guard);
        stats.waiting.fetch_sub(1, Ordering::Relaxed);
    }

    /// Wait for as long as `condition` holds
    ///
    /// The condition is evaluated before the first wait and after every
    /// wakeup, always with the lock held.
    pub fn wait_while<F>(&mut self, mut condition: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        while condition(&mut *self.guard) {
            self.wait();
        }
    }

    /// `wait_while` bounded by `timeout`
    ///
    /// Returns `Err(WaitError::Timeout)` if the condition still holds once the
    /// deadline passes. The lock is held again on return either way. A
    /// timeout too large to represent as a deadline waits without one.
    pub fn wait_while_for<F>(&mut self, timeout: Duration, mut condition: F) -> WaitResult<()>
    where
        F: FnMut(&mut T) -> bool,
    {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait_while(condition);
            return Ok(());
        };
        let stats = &self.monitor.stats;

        while condition(&mut *self.guard) {
            stats.waits.fetch_add(1, Ordering::Relaxed);
            stats.waiting.fetch_add(1, Ordering::Relaxed);
            let timed_out = self
                .monitor
                .cond
                .wait_until(&mut self.guard, deadline)
                .timed_out();
            stats.waiting.fetch_sub(1, Ordering::Relaxed);

            if timed_out {
                return if condition(&mut *self.guard) {
                    Err(WaitError::Timeout)
                } else {
                    Ok(())
                };
            }
        }
        Ok(())
    }

    /// Wake every thread blocked on this monitor
    pub fn notify_all(&self) -> WakeResult {
        let count = self.monitor.cond.notify_all();
        let stats = &self.monitor.stats;
        stats.broadcasts.fetch_add(1, Ordering::Relaxed);
        stats.woken.fetch_add(count as u64, Ordering::Relaxed);
        trace!(monitor = self.monitor.name, woken = count, "broadcast");
        WakeResult::from_count(count)
    }

    /// Release the lock while `f` runs, then re-acquire it
    ///
    /// Guarded state must be re-read after this returns.
    pub fn unlocked<R>(&mut self, f: impl FnOnce() -> R) -> R {
        MutexGuard::unlocked(&mut self.guard, f)
    }
}

impl<T> Deref for MonitorGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for MonitorGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_with_lock_mutates_state() {
        let monitor = Monitor::new("counter", 0u32);
        monitor.with_lock(|n| *n += 5);
        assert_eq!(monitor.with_lock(|n| *n), 5);
    }

    #[test]
    fn test_wait_while_wakes_on_notify() {
        let monitor = Arc::new(Monitor::new("flag", false));
        let monitor_clone = monitor.clone();

        let handle = thread::spawn(move || {
            let mut guard = monitor_clone.enter();
            guard.wait_while(|ready| !*ready);
            *guard
        });

        // Give thread time to wait
        thread::sleep(Duration::from_millis(50));
        {
            let mut guard = monitor.enter();
            *guard = true;
            guard.notify_all();
        }

        assert!(handle.join().unwrap());
        assert!(monitor.stats().broadcasts >= 1);
    }

    #[test]
    fn test_wait_while_for_times_out() {
        let monitor = Monitor::new("never", 0u8);
        let start = Instant::now();
        let mut guard = monitor.enter();

        let result = guard.wait_while_for(Duration::from_millis(50), |_| true);

        assert_eq!(result, Err(WaitError::Timeout));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_wait_while_for_unrepresentable_timeout() {
        let monitor = Arc::new(Monitor::new("flag", false));
        let monitor_clone = monitor.clone();

        let handle = thread::spawn(move || {
            monitor_clone
                .enter()
                .wait_while_for(Duration::MAX, |ready| !*ready)
        });

        thread::sleep(Duration::from_millis(50));
        {
            let mut guard = monitor.enter();
            *guard = true;
            guard.notify_all();
        }

        assert_eq!(handle.join().unwrap(), Ok(()));
    }

    #[test]
    fn test_wait_while_skips_wait_when_condition_false() {
        let monitor = Monitor::new("ready", 1u8);
        monitor.enter().wait_while(|n| *n == 0);
        assert_eq!(monitor.stats().waits, 0);
    }

    #[test]
    fn test_unlocked_releases_lock() {
        let monitor = Arc::new(Monitor::new("shared", 0u32));
        let mut guard = monitor.enter();

        let monitor_clone = monitor.clone();
        guard.unlocked(|| {
            // Another thread can take the lock while we are suspended
            thread::spawn(move || monitor_clone.with_lock(|n| *n = 7))
                .join()
                .unwrap();
        });

        assert_eq!(*guard, 7);
    }

    #[test]
    fn test_notify_without_waiters() {
        let monitor = Monitor::new("idle", ());
        assert_eq!(monitor.enter().notify_all(), WakeResult::NoWaiters);
    }
}
