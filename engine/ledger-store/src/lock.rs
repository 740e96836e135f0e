//! Per-league-type ingestion lock. The feed holds the flag for the length
//! of one update cycle; readers that need a consistent player/club snapshot
//! poll until it clears. Waits are bounded and report a timeout instead of
//! spinning forever.

use std::thread;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("league type {league_type} stayed locked for {waited_ms}ms")]
    Timeout { league_type: String, waited_ms: u64 },
}

#[derive(Debug, Default)]
pub struct LockRegistry {
    flags: DashMap<String, ()>,
}

/// Held for the duration of one ingestion cycle; releases on drop so a
/// failed cycle can never leave the league wedged.
pub struct IngestGuard<'a> {
    registry: &'a LockRegistry,
    league_type: String,
}

impl Drop for IngestGuard<'_> {
    fn drop(&mut self) {
        self.registry.flags.remove(&self.league_type);
    }
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns None when another cycle already holds the flag.
    pub fn try_acquire(&self, league_type: &str) -> Option<IngestGuard<'_>> {
        use dashmap::mapref::entry::Entry;
        match self.flags.entry(league_type.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(v) => {
                v.insert(());
                Some(IngestGuard {
                    registry: self,
                    league_type: league_type.to_string(),
                })
            }
        }
    }

    pub fn is_locked(&self, league_type: &str) -> bool {
        self.flags.contains_key(league_type)
    }

    /// Poll until the flag clears, sleeping `poll` between checks.
    pub fn wait_clear(
        &self,
        league_type: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<(), LockError> {
        let started = Instant::now();
        while self.is_locked(league_type) {
            if started.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    league_type: league_type.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            thread::sleep(poll.min(timeout));
        }
        Ok(())
    }
}
