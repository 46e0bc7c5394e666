//! The game-state authority.
//!
//! A [`Table`] owns the ledger, balance, history and settings of one player
//! session. Commands run one at a time through `&mut self`; every command
//! either applies completely and notifies observers, or returns a
//! [`TableError`] and leaves state untouched.
//!
//! A round moves `Idle -> Staking -> Resolving -> Idle`. [`Table::spin`]
//! runs the whole resolution sequence before returning:
//!
//! 1. snapshot the current bets
//! 2. debit the total stake
//! 3. draw the winning slot
//! 4. resolve every bet
//! 5. credit the total return
//! 6. append a history entry built from the snapshot
//! 7. clear the ledger
//! 8. return to idle

use croupier_types::roulette::{
    Amount, Bet, BetId, BetType, HistoryEntry, Position, PredefinedSet, RuleConfig,
    RuleConfigError, SettingUpdate, Settings, Slot,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::events::{Event, EventBus, Observer, SubscriptionId};
use crate::history::{ColorDistribution, HotCold, RoundHistory, Statistics};
use crate::ledger::{BalanceChange, BetLedger};
use crate::payout::{self, RoundResult};
use crate::persistence::Persistence;
use crate::storage::{KeyValueStore, StorageError};
use crate::validator;
use crate::wheel::OutcomeSource;
use crate::TableError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No bets on the table.
    Idle,
    /// At least one bet placed, wheel not spun.
    Staking,
    /// A spin is being resolved.
    Resolving,
}

pub struct Table<S: KeyValueStore, W: OutcomeSource> {
    rules: RuleConfig,
    ledger: BetLedger,
    history: RoundHistory,
    settings: Settings,
    wheel: W,
    persistence: Persistence<S>,
    events: EventBus,
    clock: Box<dyn Clock>,
    spinning: bool,
}

impl<S: KeyValueStore, W: OutcomeSource> Table<S, W> {
    /// Opens a session, restoring balance, history and settings from `store`.
    pub fn open(rules: RuleConfig, store: S, wheel: W) -> Result<Self, RuleConfigError> {
        rules.validate()?;
        let mut persistence = Persistence::new(store);
        let snapshot = persistence.load(rules.starting_balance);
        info!(
            balance = %snapshot.balance,
            rounds = snapshot.history.len(),
            degraded = persistence.degraded().is_some(),
            "table opened"
        );
        Ok(Self {
            ledger: BetLedger::new(snapshot.balance),
            history: RoundHistory::from_entries(snapshot.history, rules.history_capacity),
            settings: snapshot.settings,
            rules,
            wheel,
            persistence,
            events: EventBus::new(),
            clock: Box::new(SystemClock),
            spinning: false,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // Observers

    pub fn subscribe(&mut self, observer: impl Observer + 'static) -> SubscriptionId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // Queries

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn balance(&self) -> Amount {
        self.ledger.balance()
    }

    pub fn current_bets(&self) -> &[Bet] {
        self.ledger.bets()
    }

    pub fn total_staked(&self) -> Amount {
        self.ledger.total_staked()
    }

    /// Balance not yet committed to a bet this round.
    pub fn available_balance(&self) -> Amount {
        self.ledger.available()
    }

    /// Newest first.
    pub fn history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        self.history.recent(limit)
    }

    pub fn last_round(&self) -> Option<&HistoryEntry> {
        self.history.latest()
    }

    pub fn statistics(&self) -> Statistics {
        self.history.statistics()
    }

    pub fn hot_cold_slots(&self, window: usize) -> HotCold {
        self.history.hot_cold(window)
    }

    pub fn color_distribution(&self, window: usize) -> ColorDistribution {
        self.history.color_distribution(window)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        if self.spinning {
            Phase::Resolving
        } else if self.ledger.is_empty() {
            Phase::Idle
        } else {
            Phase::Staking
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Why state is no longer being persisted, if it isn't.
    pub fn storage_degraded(&self) -> Option<&str> {
        self.persistence.degraded()
    }

    // Bet commands

    pub fn place_bet(
        &mut self,
        bet_type: BetType,
        slots: Vec<Slot>,
        amount: Amount,
        position: Option<Position>,
    ) -> Result<Bet, TableError> {
        self.ensure_idle()?;
        let now = self.clock.now_millis();
        let bet = self
            .ledger
            .place(bet_type, slots, amount, position, &self.rules.limits, now)
            .map_err(|rejection| {
                warn!(%bet_type, %amount, reason = %rejection, "bet rejected");
                TableError::from(rejection)
            })?;
        info!(
            bet_id = bet.id.0,
            %amount,
            bet = %bet.describe(),
            staked = %self.ledger.total_staked(),
            "bet placed"
        );
        self.events.emit(Event::BetPlaced(bet.clone()));
        Ok(bet)
    }

    /// Places a bet whose type arrives by name, e.g. from a command line.
    pub fn place_named_bet(
        &mut self,
        bet_type: &str,
        slots: Vec<Slot>,
        amount: Amount,
        position: Option<Position>,
    ) -> Result<Bet, TableError> {
        let bet_type = validator::resolve_bet_type(bet_type).map_err(|rejection| {
            warn!(reason = %rejection, "bet rejected");
            TableError::from(rejection)
        })?;
        self.place_bet(bet_type, slots, amount, position)
    }

    /// Places an outside bet on one of the fixed number sets.
    pub fn place_set_bet(&mut self, set: PredefinedSet, amount: Amount) -> Result<Bet, TableError> {
        self.place_bet(set.bet_type(), set.slots(), amount, None)
    }

    pub fn remove_bet(&mut self, id: BetId) -> Result<Bet, TableError> {
        self.ensure_idle()?;
        let bet = self.ledger.remove_by_id(id)?;
        self.events.emit(Event::BetRemoved(bet.clone()));
        Ok(bet)
    }

    pub fn undo_last_bet(&mut self) -> Result<Bet, TableError> {
        self.ensure_idle()?;
        let bet = self.ledger.remove_last()?;
        self.events.emit(Event::BetRemoved(bet.clone()));
        Ok(bet)
    }

    /// Removes every bet. Clearing an empty table succeeds with nothing.
    pub fn clear_bets(&mut self) -> Result<Vec<Bet>, TableError> {
        self.ensure_idle()?;
        let cleared = self.ledger.clear();
        if !cleared.is_empty() {
            debug!(count = cleared.len(), "bets cleared");
            self.events.emit(Event::BetsCleared(cleared.clone()));
        }
        Ok(cleared)
    }

    /// Adds a copy of every current bet, or nothing at all.
    pub fn double_bets(&mut self) -> Result<Vec<Bet>, TableError> {
        self.ensure_idle()?;
        let now = self.clock.now_millis();
        let placed = self
            .ledger
            .double_all(&self.rules.limits, now)
            .inspect_err(|err| warn!(%err, "double rejected"))?;
        info!(
            count = placed.len(),
            staked = %self.ledger.total_staked(),
            "bets doubled"
        );
        for bet in &placed {
            self.events.emit(Event::BetPlaced(bet.clone()));
        }
        Ok(placed)
    }

    /// Replaces the current bets with the previous round's, or changes nothing.
    pub fn repeat_bets(&mut self) -> Result<Vec<Bet>, TableError> {
        self.ensure_idle()?;
        let records = self
            .history
            .latest()
            .map(|entry| entry.bets.clone())
            .unwrap_or_default();
        let now = self.clock.now_millis();
        let repeated = self
            .ledger
            .repeat_last(&records, &self.rules.limits, now)
            .inspect_err(|err| warn!(%err, "repeat rejected"))?;
        info!(
            count = repeated.placed.len(),
            staked = %self.ledger.total_staked(),
            "bets repeated"
        );
        if !repeated.cleared.is_empty() {
            self.events.emit(Event::BetsCleared(repeated.cleared));
        }
        for bet in &repeated.placed {
            self.events.emit(Event::BetPlaced(bet.clone()));
        }
        Ok(repeated.placed)
    }

    // Round

    pub fn spin(&mut self) -> Result<RoundResult, TableError> {
        if self.spinning {
            return Err(TableError::RoundInProgress);
        }
        let total_staked = self.ledger.total_staked();
        if total_staked.is_zero() {
            return Err(TableError::NoBets);
        }

        self.spinning = true;
        let bets = self.ledger.bets().to_vec();
        self.events.emit(Event::RoundStarted {
            bets: bets.clone(),
            total_staked,
        });
        let debit = self.ledger.debit(total_staked);
        self.emit_balance(debit);

        let winning_slot = self.wheel.next_outcome();
        let result = match payout::resolve_round(&bets, winning_slot) {
            Ok(result) => result,
            Err(violation) => {
                warn!(%violation, "round aborted, stake refunded");
                let refund = self.ledger.credit(total_staked);
                self.emit_balance(refund);
                self.spinning = false;
                return Err(violation.into());
            }
        };

        let credit = self.ledger.credit(result.total_returned);
        self.emit_balance(credit);

        let entry = HistoryEntry {
            timestamp: self.clock.now_millis(),
            winning_slot,
            color: winning_slot.color(),
            bets: bets.iter().map(Bet::record).collect(),
            total_staked: result.total_staked,
            total_returned: result.total_returned,
            net_profit: result.net_profit,
        };
        self.history.push(entry);
        self.ledger.clear();
        self.spinning = false;

        info!(
            %winning_slot,
            color = %winning_slot.color(),
            staked = %result.total_staked,
            returned = %result.total_returned,
            net_profit = result.net_profit,
            balance = %self.ledger.balance(),
            "round resolved"
        );

        let saved = self.persistence.save_balance(self.ledger.balance());
        self.report(saved);
        let entries = self.history.recent(None);
        let saved = self.persistence.save_history(&entries);
        self.report(saved);

        self.events.emit(Event::RoundEnded(result.clone()));
        self.events.emit(Event::HistoryUpdated { entries });
        Ok(result)
    }

    // Session commands

    /// Restores the starting balance and clears any bets on the table.
    pub fn reset_balance(&mut self) -> Result<BalanceChange, TableError> {
        self.ensure_idle()?;
        self.clear_bets()?;
        let change = self.ledger.set_balance(self.rules.starting_balance);
        info!(old = %change.old, new = %change.new, "balance reset");
        let saved = self.persistence.save_balance(change.new);
        self.report(saved);
        self.emit_balance(change);
        Ok(change)
    }

    pub fn clear_history(&mut self) -> Result<(), TableError> {
        self.ensure_idle()?;
        self.history.clear();
        info!("history cleared");
        let saved = self.persistence.clear_history();
        self.report(saved);
        self.events.emit(Event::HistoryUpdated {
            entries: Vec::new(),
        });
        Ok(())
    }

    /// Applies a preference change and returns the previous settings.
    pub fn update_setting(&mut self, update: SettingUpdate) -> Settings {
        let old = self.settings.apply(update);
        debug!(?update, "setting updated");
        let saved = self.persistence.save_settings(&self.settings);
        self.report(saved);
        self.events.emit(Event::SettingsChanged {
            old: old.clone(),
            new: self.settings.clone(),
        });
        old
    }

    fn ensure_idle(&self) -> Result<(), TableError> {
        if self.spinning {
            return Err(TableError::RoundInProgress);
        }
        Ok(())
    }

    fn emit_balance(&mut self, change: BalanceChange) {
        if change.is_noop() {
            return;
        }
        self.events.emit(Event::BalanceChanged {
            old: change.old,
            new: change.new,
            delta: change.delta,
        });
    }

    /// Surfaces the write that degraded storage; later writes are skipped.
    fn report(&mut self, saved: Result<(), StorageError>) {
        if let Err(err) = saved {
            self.events.emit(Event::StorageDegraded {
                reason: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use crate::wheel::ForcedOutcomes;

    fn table(outcomes: &[Slot]) -> Table<MemoryStore, ForcedOutcomes> {
        Table::open(
            RuleConfig::default(),
            MemoryStore::new(),
            ForcedOutcomes::new(outcomes.iter().copied()),
        )
        .unwrap()
        .with_clock(FixedClock::new(1_700_000_000_000))
    }

    #[test]
    fn test_phase_transitions() {
        let mut table = table(&[Slot::Number(3)]);
        assert_eq!(table.phase(), Phase::Idle);
        table
            .place_bet(BetType::Straight, vec![Slot::Number(3)], Amount::from_units(1), None)
            .unwrap();
        assert_eq!(table.phase(), Phase::Staking);
        table.spin().unwrap();
        assert_eq!(table.phase(), Phase::Idle);
        assert!(!table.is_spinning());
    }

    #[test]
    fn test_commands_rejected_while_resolving() {
        let mut table = table(&[]);
        table
            .place_bet(BetType::Straight, vec![Slot::Number(3)], Amount::from_units(1), None)
            .unwrap();
        table.spinning = true;
        assert_eq!(table.phase(), Phase::Resolving);

        let err = table
            .place_bet(BetType::Straight, vec![Slot::Number(4)], Amount::from_units(1), None)
            .unwrap_err();
        assert_eq!(err, TableError::RoundInProgress);
        assert_eq!(err.kind(), crate::ErrorKind::Busy);
        assert_eq!(table.spin().unwrap_err(), TableError::RoundInProgress);
        assert_eq!(table.undo_last_bet().unwrap_err(), TableError::RoundInProgress);
        assert_eq!(table.clear_bets().unwrap_err(), TableError::RoundInProgress);
        assert_eq!(table.double_bets().unwrap_err(), TableError::RoundInProgress);
        assert_eq!(table.current_bets().len(), 1);
    }

    #[test]
    fn test_invalid_rules_refused() {
        let mut rules = RuleConfig::default();
        rules.history_capacity = 0;
        assert!(Table::open(rules, MemoryStore::new(), ForcedOutcomes::new([])).is_err());
    }

    #[test]
    fn test_bet_timestamps_come_from_clock() {
        let mut table = table(&[]);
        let bet = table
            .place_set_bet(PredefinedSet::Low, Amount::from_units(5))
            .unwrap();
        assert_eq!(bet.placed_at, 1_700_000_000_000);
    }
}
