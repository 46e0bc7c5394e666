//! Payout engine.
//!
//! Resolution is exact integer arithmetic over cents. The analytic helpers
//! (house edge, expected value) are the only floating point in the crate and
//! never feed back into balances.

use croupier_types::roulette::{Amount, Bet, BetType, Slot, WHEEL_SLOTS};
use serde::{Deserialize, Serialize};

use crate::InvariantViolation;

/// Outcome of one bet against one winning slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetResolution {
    pub bet: Bet,
    pub won: bool,
    /// Winnings excluding the returned stake; zero for a loss.
    pub payout: Amount,
    /// Stake plus winnings; zero for a loss.
    pub total_return: Amount,
}

/// Outcome of a whole round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub winning_slot: Slot,
    pub winners: Vec<BetResolution>,
    pub losers: Vec<BetResolution>,
    pub total_staked: Amount,
    pub total_returned: Amount,
    /// `total_returned - total_staked`, in cents.
    pub net_profit: i64,
}

impl RoundResult {
    pub fn resolutions(&self) -> impl Iterator<Item = &BetResolution> {
        self.winners.iter().chain(self.losers.iter())
    }
}

/// Resolves a single bet. Wins iff the winning slot is covered.
pub fn resolve_bet(bet: &Bet, winning_slot: Slot) -> Result<BetResolution, InvariantViolation> {
    debug_assert!(
        winning_slot.is_valid(),
        "winning slot {winning_slot:?} is not on the wheel"
    );
    if !winning_slot.is_valid() {
        return Err(InvariantViolation::InvalidSlot(winning_slot));
    }
    let invalid = bet.slots.iter().find(|slot| !slot.is_valid());
    debug_assert!(invalid.is_none(), "bet {} covers invalid slot {invalid:?}", bet.id);
    if let Some(slot) = invalid {
        return Err(InvariantViolation::InvalidSlot(*slot));
    }

    if !bet.covers(winning_slot) {
        return Ok(BetResolution {
            bet: bet.clone(),
            won: false,
            payout: Amount::ZERO,
            total_return: Amount::ZERO,
        });
    }

    let payout = bet
        .amount
        .checked_mul(bet.bet_type.payout_multiplier())
        .ok_or(InvariantViolation::Overflow(bet.id))?;
    let total_return = bet
        .amount
        .checked_add(payout)
        .ok_or(InvariantViolation::Overflow(bet.id))?;
    Ok(BetResolution {
        bet: bet.clone(),
        won: true,
        payout,
        total_return,
    })
}

/// Resolves every bet and totals the round.
pub fn resolve_round(bets: &[Bet], winning_slot: Slot) -> Result<RoundResult, InvariantViolation> {
    let mut winners = Vec::new();
    let mut losers = Vec::new();
    let mut total_staked = Amount::ZERO;
    let mut total_returned = Amount::ZERO;

    for bet in bets {
        let resolution = resolve_bet(bet, winning_slot)?;
        total_staked = total_staked
            .checked_add(bet.amount)
            .ok_or(InvariantViolation::Overflow(bet.id))?;
        if resolution.won {
            total_returned = total_returned
                .checked_add(resolution.total_return)
                .ok_or(InvariantViolation::Overflow(bet.id))?;
            winners.push(resolution);
        } else {
            losers.push(resolution);
        }
    }

    Ok(RoundResult {
        winning_slot,
        winners,
        losers,
        total_staked,
        total_returned,
        net_profit: total_returned.signed_diff(total_staked),
    })
}

/// Probability that a bet of this type wins on one spin.
pub fn win_probability(bet_type: BetType) -> f64 {
    bet_type.required_count() as f64 / WHEEL_SLOTS as f64
}

/// Fair odds against, `(38 - covered) / covered`.
pub fn true_odds(bet_type: BetType) -> f64 {
    let covered = bet_type.required_count() as f64;
    (WHEEL_SLOTS as f64 - covered) / covered
}

/// House edge as a percentage of stake.
pub fn house_edge(bet_type: BetType) -> f64 {
    let odds = true_odds(bet_type);
    100.0 * (odds - bet_type.payout_multiplier() as f64) / (odds + 1.0)
}

/// Expected player result per spin for a stake, in currency units.
pub fn expected_value(bet_type: BetType, amount: Amount) -> f64 {
    let p = win_probability(bet_type);
    let stake = amount.as_units_f64();
    p * stake * bet_type.payout_multiplier() as f64 - (1.0 - p) * stake
}

/// Payout odds as shown on the table, e.g. `"35:1"`.
pub fn odds_display(bet_type: BetType) -> String {
    bet_type.odds_display()
}
