//! Table state persisted as three independent JSON records.
//!
//! Reads never fail: absent or corrupt records fall back to defaults. The
//! first failed read or write switches the session to memory-only; later
//! writes are skipped so the failure surfaces exactly once.

use croupier_types::roulette::{Amount, HistoryEntry, Settings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

pub const BALANCE_KEY: &str = "roulette.balance";
pub const HISTORY_KEY: &str = "roulette.history";
pub const SETTINGS_KEY: &str = "roulette.settings";

/// Everything restored when a table opens.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub balance: Amount,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    pub settings: Settings,
}

#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    degraded: Option<String>,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            degraded: None,
        }
    }

    /// Why persistence stopped, if it has.
    pub fn degraded(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    pub fn load(&mut self, starting_balance: Amount) -> Snapshot {
        Snapshot {
            balance: self.read(BALANCE_KEY).unwrap_or(starting_balance),
            history: self.read(HISTORY_KEY).unwrap_or_default(),
            settings: self.read(SETTINGS_KEY).unwrap_or_default(),
        }
    }

    fn read<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        if self.degraded.is_some() {
            return None;
        }
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "storage unreadable, continuing in memory");
                self.degraded = Some(err.to_string());
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "discarding corrupt record");
                None
            }
        }
    }

    /// Returns the error only for the write that degrades the session.
    pub fn save_balance(&mut self, balance: Amount) -> Result<(), StorageError> {
        self.write(BALANCE_KEY, &balance)
    }

    pub fn save_history(&mut self, history: &[HistoryEntry]) -> Result<(), StorageError> {
        self.write(HISTORY_KEY, history)
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write(SETTINGS_KEY, settings)
    }

    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        self.apply(HISTORY_KEY, |store| store.remove(HISTORY_KEY))
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        self.apply(key, |store| {
            let encoded = serde_json::to_string(value)?;
            store.set(key, &encoded)
        })
    }

    fn apply(
        &mut self,
        key: &str,
        op: impl FnOnce(&mut S) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        if self.degraded.is_some() {
            debug!(key, "storage degraded, skipping write");
            return Ok(());
        }
        let result = op(&mut self.store);
        if let Err(err) = &result {
            warn!(key, %err, "storage write failed, continuing in memory");
            self.degraded = Some(err.to_string());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use croupier_types::roulette::{AnimationSpeed, BetRecord, BetType, Slot};

    fn entry() -> HistoryEntry {
        HistoryEntry {
            timestamp: 1_700_000_000_000,
            winning_slot: Slot::DoubleZero,
            color: Slot::DoubleZero.color(),
            bets: vec![BetRecord {
                bet_type: BetType::Straight,
                slots: vec![Slot::Number(17)],
                amount: Amount::from_units(10),
            }],
            total_staked: Amount::from_units(10),
            total_returned: Amount::ZERO,
            net_profit: -1_000,
        }
    }

    /// Reads succeed, every write fails.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }

        fn remove(&mut self, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
            panic!("write attempted on a degraded store");
        }

        fn remove(&mut self, _: &str) -> Result<(), StorageError> {
            panic!("remove attempted on a degraded store");
        }
    }

    #[test]
    fn test_absent_records_load_defaults() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let snapshot = persistence.load(Amount::from_units(1_000));
        assert_eq!(snapshot.balance, Amount::from_units(1_000));
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn test_roundtrip_through_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            sound_enabled: false,
            animation_speed: AnimationSpeed::Fast,
        };
        {
            let mut persistence = Persistence::new(FileStore::open(temp_dir.path()).unwrap());
            persistence.save_balance(Amount::from_cents(123_456)).unwrap();
            persistence.save_history(&[entry()]).unwrap();
            persistence.save_settings(&settings).unwrap();
        }

        let mut persistence = Persistence::new(FileStore::open(temp_dir.path()).unwrap());
        let snapshot = persistence.load(Amount::from_units(1_000));
        assert_eq!(snapshot.balance, Amount::from_cents(123_456));
        assert_eq!(snapshot.history, vec![entry()]);
        assert_eq!(snapshot.settings, settings);

        persistence.clear_history().unwrap();
        persistence.clear_history().unwrap();
        assert!(persistence.load(Amount::ZERO).history.is_empty());
    }

    #[test]
    fn test_corrupt_records_fall_back_independently() {
        let mut store = MemoryStore::new();
        store.set(BALANCE_KEY, "not json").unwrap();
        store.set(HISTORY_KEY, r#"[{"winning_slot":"99"}]"#).unwrap();
        store.set(SETTINGS_KEY, r#"{"soundEnabled":false}"#).unwrap();

        let mut persistence = Persistence::new(store);
        let snapshot = persistence.load(Amount::from_units(1_000));
        assert_eq!(snapshot.balance, Amount::from_units(1_000));
        assert!(snapshot.history.is_empty());
        assert!(!snapshot.settings.sound_enabled);
        assert_eq!(snapshot.settings.animation_speed, AnimationSpeed::Normal);
        assert!(persistence.degraded().is_none());
    }

    #[test]
    fn test_first_write_failure_degrades_once() {
        let mut persistence = Persistence::new(ReadOnlyStore(MemoryStore::new()));
        assert!(persistence.save_balance(Amount::from_units(5)).is_err());
        assert_eq!(persistence.degraded(), Some("storage unavailable: read-only"));
        assert!(persistence.save_balance(Amount::from_units(6)).is_ok());
        assert!(persistence.save_history(&[]).is_ok());
        assert!(persistence.clear_history().is_ok());
    }

    #[test]
    fn test_unreadable_store_degrades_and_skips_writes() {
        let mut persistence = Persistence::new(BrokenStore);
        let snapshot = persistence.load(Amount::from_units(1_000));
        assert_eq!(snapshot.balance, Amount::from_units(1_000));
        assert!(persistence.degraded().is_some());
        assert!(persistence.save_balance(Amount::from_units(1)).is_ok());
    }

    #[test]
    fn test_quota_exceeded_degrades() {
        let mut persistence = Persistence::new(MemoryStore::with_quota(16));
        persistence.save_balance(Amount::from_units(1)).unwrap();
        let history: Vec<HistoryEntry> = (0..10).map(|_| entry()).collect();
        assert!(matches!(
            persistence.save_history(&history),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert!(persistence.degraded().is_some());
    }
}
