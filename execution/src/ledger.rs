//! Bet ledger: the current round's bets plus the player balance.
//!
//! Stakes stay in the balance until the round is resolved; the ledger only
//! tracks what is committed. Every mutation either fully applies or returns
//! the reason it did not, leaving the ledger untouched.

use croupier_types::roulette::{Amount, Bet, BetId, BetRecord, BetType, Position, Slot, TableLimits};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validator;
use crate::{Rejection, TableError};

/// Balance before and after a mutation. `delta` is in cents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub old: Amount,
    pub new: Amount,
    pub delta: i64,
}

impl BalanceChange {
    fn between(old: Amount, new: Amount) -> Self {
        Self {
            old,
            new,
            delta: new.signed_diff(old),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.delta == 0
    }
}

/// Bets removed and placed by [`BetLedger::repeat_last`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Repeated {
    pub cleared: Vec<Bet>,
    pub placed: Vec<Bet>,
}

#[derive(Clone, Debug)]
pub struct BetLedger {
    bets: Vec<Bet>,
    balance: Amount,
    next_id: u64,
}

impl BetLedger {
    pub fn new(balance: Amount) -> Self {
        Self {
            bets: Vec::new(),
            balance,
            next_id: 1,
        }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn get(&self, id: BetId) -> Option<&Bet> {
        self.bets.iter().find(|bet| bet.id == id)
    }

    /// Sum of every committed stake.
    pub fn total_staked(&self) -> Amount {
        self.bets.iter().map(|bet| bet.amount).sum()
    }

    /// Balance not yet committed to a bet.
    pub fn available(&self) -> Amount {
        self.balance.saturating_sub(self.total_staked())
    }

    /// Validates and appends a bet.
    pub fn place(
        &mut self,
        bet_type: BetType,
        slots: Vec<Slot>,
        amount: Amount,
        position: Option<Position>,
        limits: &TableLimits,
        now: u64,
    ) -> Result<Bet, Rejection> {
        validator::validate(
            bet_type,
            &slots,
            amount,
            self.total_staked(),
            self.balance,
            limits,
        )?;
        Ok(self.append(bet_type, slots, amount, position, now))
    }

    fn append(
        &mut self,
        bet_type: BetType,
        slots: Vec<Slot>,
        amount: Amount,
        position: Option<Position>,
        now: u64,
    ) -> Bet {
        let bet = Bet {
            id: BetId(self.next_id),
            bet_type,
            slots,
            amount,
            position,
            placed_at: now,
        };
        self.next_id += 1;
        debug!(bet_id = bet.id.0, %amount, bet = %bet.describe(), "bet appended");
        self.bets.push(bet.clone());
        bet
    }

    pub fn remove_by_id(&mut self, id: BetId) -> Result<Bet, TableError> {
        let index = self
            .bets
            .iter()
            .position(|bet| bet.id == id)
            .ok_or(TableError::NotFound(id))?;
        let bet = self.bets.remove(index);
        debug!(bet_id = id.0, "bet removed");
        Ok(bet)
    }

    /// Pops the most recently placed bet.
    pub fn remove_last(&mut self) -> Result<Bet, TableError> {
        let bet = self.bets.pop().ok_or(TableError::EmptyLedger)?;
        debug!(bet_id = bet.id.0, "bet undone");
        Ok(bet)
    }

    pub fn clear(&mut self) -> Vec<Bet> {
        std::mem::take(&mut self.bets)
    }

    /// Places a copy of every current bet. All or nothing.
    pub fn double_all(&mut self, limits: &TableLimits, now: u64) -> Result<Vec<Bet>, TableError> {
        if self.bets.is_empty() {
            return Err(TableError::EmptyLedger);
        }
        let records: Vec<BetRecord> = self.bets.iter().map(Bet::record).collect();
        Self::precheck(&records, self.total_staked(), self.balance, limits)?;

        Ok(records
            .into_iter()
            .map(|record| self.append(record.bet_type, record.slots, record.amount, None, now))
            .collect())
    }

    /// Replaces the current bets with those of a previous round. All or
    /// nothing; the current bets survive a failure.
    pub fn repeat_last(
        &mut self,
        records: &[BetRecord],
        limits: &TableLimits,
        now: u64,
    ) -> Result<Repeated, TableError> {
        if records.is_empty() {
            return Err(TableError::NoHistory);
        }
        Self::precheck(records, Amount::ZERO, self.balance, limits)?;

        let cleared = self.clear();
        let placed = records
            .iter()
            .cloned()
            .map(|record| self.append(record.bet_type, record.slots, record.amount, None, now))
            .collect();
        Ok(Repeated { cleared, placed })
    }

    /// Validates `records` as if placed one after another on top of
    /// `committed`. The combined amount is checked against the balance first.
    fn precheck(
        records: &[BetRecord],
        committed: Amount,
        balance: Amount,
        limits: &TableLimits,
    ) -> Result<(), Rejection> {
        let combined: Amount = records.iter().map(|record| record.amount).sum();
        let available = balance.saturating_sub(committed);
        if combined > available {
            return Err(Rejection::InsufficientBalance {
                needed: combined,
                available,
            });
        }

        let mut running = committed;
        for record in records {
            validator::validate(
                record.bet_type,
                &record.slots,
                record.amount,
                running,
                balance,
                limits,
            )?;
            running = running.saturating_add(record.amount);
        }
        Ok(())
    }

    pub fn set_balance(&mut self, amount: Amount) -> BalanceChange {
        let old = self.balance;
        self.balance = amount;
        BalanceChange::between(old, amount)
    }

    pub fn credit(&mut self, amount: Amount) -> BalanceChange {
        self.set_balance(self.balance.saturating_add(amount))
    }

    /// Floors at zero.
    pub fn debit(&mut self, amount: Amount) -> BalanceChange {
        self.set_balance(self.balance.saturating_sub(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use croupier_types::roulette::PredefinedSet;
    use proptest::prelude::*;

    fn units(n: u64) -> Amount {
        Amount::from_units(n)
    }

    fn straight(ledger: &mut BetLedger, n: u8, stake: u64) -> Result<Bet, Rejection> {
        ledger.place(
            BetType::Straight,
            vec![Slot::Number(n)],
            units(stake),
            None,
            &TableLimits::default(),
            0,
        )
    }

    #[test]
    fn test_place_assigns_increasing_ids() {
        let mut ledger = BetLedger::new(units(1_000));
        let a = straight(&mut ledger, 17, 10).unwrap();
        let b = straight(&mut ledger, 18, 10).unwrap();
        assert!(b.id > a.id);
        assert_eq!(ledger.total_staked(), units(20));
        assert_eq!(ledger.available(), units(980));
        // Placement does not touch the balance.
        assert_eq!(ledger.balance(), units(1_000));
    }

    #[test]
    fn test_rejected_place_mutates_nothing() {
        let mut ledger = BetLedger::new(units(1_000));
        straight(&mut ledger, 17, 10).unwrap();
        let err = straight(&mut ledger, 40, 10).unwrap_err();
        assert_eq!(err, Rejection::InvalidSlots);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_and_undo() {
        let mut ledger = BetLedger::new(units(1_000));
        let a = straight(&mut ledger, 1, 10).unwrap();
        let b = straight(&mut ledger, 2, 10).unwrap();

        assert_eq!(ledger.remove_by_id(a.id).unwrap().id, a.id);
        assert_eq!(ledger.remove_by_id(a.id), Err(TableError::NotFound(a.id)));
        assert_eq!(ledger.remove_last().unwrap().id, b.id);
        assert_eq!(ledger.remove_last(), Err(TableError::EmptyLedger));
    }

    #[test]
    fn test_double_is_all_or_nothing() {
        let mut ledger = BetLedger::new(units(100));
        straight(&mut ledger, 1, 30).unwrap();
        straight(&mut ledger, 2, 30).unwrap();

        let err = ledger.double_all(&TableLimits::default(), 0).unwrap_err();
        assert_eq!(
            err,
            TableError::Rejected(Rejection::InsufficientBalance {
                needed: units(60),
                available: units(40)
            })
        );
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_staked(), units(60));

        ledger.remove_last().unwrap();
        let doubled = ledger.double_all(&TableLimits::default(), 0).unwrap();
        assert_eq!(doubled.len(), 1);
        assert_eq!(doubled[0].bet_type, BetType::Straight);
        assert_eq!(doubled[0].slots, vec![Slot::Number(1)]);
        assert_eq!(ledger.total_staked(), units(60));
    }

    #[test]
    fn test_double_respects_table_max() {
        let limits = TableLimits {
            table_max: units(100),
            ..TableLimits::default()
        };
        let mut ledger = BetLedger::new(units(1_000));
        ledger
            .place(BetType::Red, PredefinedSet::Red.slots(), units(60), None, &limits, 0)
            .unwrap();
        let err = ledger.double_all(&limits, 0).unwrap_err();
        assert!(matches!(
            err,
            TableError::Rejected(Rejection::TableMaxExceeded { .. })
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_double_empty_ledger() {
        let mut ledger = BetLedger::new(units(100));
        assert_eq!(
            ledger.double_all(&TableLimits::default(), 0),
            Err(TableError::EmptyLedger)
        );
    }

    #[test]
    fn test_repeat_replaces_current_bets() {
        let mut ledger = BetLedger::new(units(100));
        let current = straight(&mut ledger, 5, 10).unwrap();
        let records = vec![
            BetRecord {
                bet_type: BetType::Straight,
                slots: vec![Slot::Number(17)],
                amount: units(50),
            },
            BetRecord {
                bet_type: BetType::Odd,
                slots: PredefinedSet::Odd.slots(),
                amount: units(50),
            },
        ];
        let repeated = ledger
            .repeat_last(&records, &TableLimits::default(), 0)
            .unwrap();
        assert_eq!(repeated.cleared, vec![current]);
        assert_eq!(repeated.placed.len(), 2);
        assert_eq!(ledger.total_staked(), units(100));
    }

    #[test]
    fn test_failed_repeat_keeps_current_bets() {
        let mut ledger = BetLedger::new(units(40));
        straight(&mut ledger, 5, 10).unwrap();
        let records = vec![BetRecord {
            bet_type: BetType::Straight,
            slots: vec![Slot::Number(17)],
            amount: units(50),
        }];
        let err = ledger
            .repeat_last(&records, &TableLimits::default(), 0)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Resource);
        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.repeat_last(&[], &TableLimits::default(), 0),
            Err(TableError::NoHistory)
        );
    }

    #[test]
    fn test_balance_mutators_floor_at_zero() {
        let mut ledger = BetLedger::new(units(10));
        let change = ledger.debit(units(25));
        assert_eq!(change.old, units(10));
        assert_eq!(change.new, Amount::ZERO);
        assert_eq!(change.delta, -1_000);

        let change = ledger.credit(units(5));
        assert_eq!(change.delta, 500);
        assert!(ledger.set_balance(units(5)).is_noop());
    }

    proptest! {
        #[test]
        fn prop_clear_empties_ledger(numbers in proptest::collection::vec(1u8..=36, 0..20)) {
            let mut ledger = BetLedger::new(units(10_000));
            for n in &numbers {
                let _ = straight(&mut ledger, *n, 5);
            }
            let cleared = ledger.clear();
            prop_assert_eq!(cleared.len(), numbers.len());
            prop_assert_eq!(ledger.total_staked(), Amount::ZERO);
            prop_assert!(ledger.bets().is_empty());
        }

        #[test]
        fn prop_place_then_remove_restores_ledger(
            numbers in proptest::collection::vec(1u8..=36, 0..10),
            extra in 1u8..=36,
        ) {
            let mut ledger = BetLedger::new(units(10_000));
            for n in &numbers {
                straight(&mut ledger, *n, 5).unwrap();
            }
            let before = (ledger.total_staked(), ledger.len());
            let bet = straight(&mut ledger, extra, 25).unwrap();
            ledger.remove_by_id(bet.id).unwrap();
            prop_assert_eq!((ledger.total_staked(), ledger.len()), before);
        }
    }
}
