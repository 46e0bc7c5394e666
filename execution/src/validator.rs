//! Bet validation.
//!
//! A pure function of the proposed bet and the table state passed in. Checks run
//! cheapest first and the first failing check determines the reported reason:
//!
//! 1. bet type is in the catalog
//! 2. slots are non-empty and on the wheel
//! 3. slot count matches the bet type
//! 4. slots are distinct
//! 5. split/corner geometry
//! 6. stake within `min_bet..=max_bet`
//! 7. stake covered by the balance not already committed
//! 8. round total stays within the table maximum
//!
//! Geometry uses the 3 x 12 grid (`row = (n-1) % 3`, `column = (n-1) / 3`).
//! Splits and corners touching 0/00 are not supported and report
//! [`Rejection::InvalidGeometry`].

use std::collections::HashSet;

use croupier_types::roulette::{Amount, BetType, Slot, TableLimits, GRID_ROWS, MAX_NUMBER};

use crate::Rejection;

/// Resolves a bet type by name (check 1).
pub fn resolve_bet_type(name: &str) -> Result<BetType, Rejection> {
    name.parse()
        .map_err(|_| Rejection::UnknownBetType(name.to_string()))
}

/// Validates a bet whose type arrives as a name from an untrusted source.
pub fn validate_named(
    bet_type: &str,
    slots: &[Slot],
    amount: Amount,
    ledger_total: Amount,
    balance: Amount,
    limits: &TableLimits,
) -> Result<BetType, Rejection> {
    let bet_type = resolve_bet_type(bet_type)?;
    validate(bet_type, slots, amount, ledger_total, balance, limits)?;
    Ok(bet_type)
}

/// Runs checks 2-8 for a typed bet.
pub fn validate(
    bet_type: BetType,
    slots: &[Slot],
    amount: Amount,
    ledger_total: Amount,
    balance: Amount,
    limits: &TableLimits,
) -> Result<(), Rejection> {
    validate_shape(bet_type, slots)?;
    validate_amount(amount, limits)?;
    validate_funds(amount, ledger_total, balance, limits)
}

/// Checks 2-5: everything that depends only on the bet itself.
pub fn validate_shape(bet_type: BetType, slots: &[Slot]) -> Result<(), Rejection> {
    if slots.is_empty() || !slots.iter().all(Slot::is_valid) {
        return Err(Rejection::InvalidSlots);
    }

    let expected = bet_type.required_count();
    if slots.len() != expected {
        return Err(Rejection::SlotCountMismatch {
            bet_type,
            expected,
            got: slots.len(),
        });
    }

    let unique: HashSet<&Slot> = slots.iter().collect();
    if unique.len() != slots.len() {
        return Err(Rejection::DuplicateSlots);
    }

    let geometry_ok = match bet_type {
        BetType::Split => is_valid_split(slots),
        BetType::Corner => is_valid_corner(slots),
        _ => true,
    };
    if !geometry_ok {
        return Err(Rejection::InvalidGeometry(bet_type));
    }

    Ok(())
}

/// Check 6.
pub fn validate_amount(amount: Amount, limits: &TableLimits) -> Result<(), Rejection> {
    if amount.is_zero() || amount < limits.min_bet || amount > limits.max_bet {
        return Err(Rejection::AmountOutOfRange {
            amount,
            min: limits.min_bet,
            max: limits.max_bet,
        });
    }
    Ok(())
}

/// Checks 7-8.
pub fn validate_funds(
    amount: Amount,
    ledger_total: Amount,
    balance: Amount,
    limits: &TableLimits,
) -> Result<(), Rejection> {
    let available = balance.saturating_sub(ledger_total);
    if available < amount {
        return Err(Rejection::InsufficientBalance {
            needed: amount,
            available,
        });
    }

    match ledger_total.checked_add(amount) {
        Some(total) if total <= limits.table_max => Ok(()),
        _ => Err(Rejection::TableMaxExceeded {
            staked: ledger_total,
            table_max: limits.table_max,
        }),
    }
}

/// Sorted numbers of the bet, or `None` if any slot is a zero.
fn sorted_numbers(slots: &[Slot]) -> Option<Vec<u8>> {
    let mut numbers = slots
        .iter()
        .map(Slot::as_number)
        .collect::<Option<Vec<u8>>>()?;
    numbers.sort_unstable();
    Some(numbers)
}

/// Two numbers side by side in a row, or stacked in a column.
pub fn is_valid_split(slots: &[Slot]) -> bool {
    let Some(numbers) = sorted_numbers(slots) else {
        return false;
    };
    let [a, b] = numbers[..] else {
        return false;
    };
    let horizontal = b == a + 1 && a % GRID_ROWS != 0;
    let vertical = b == a + GRID_ROWS;
    horizontal || vertical
}

/// Four numbers meeting at a corner: `{n, n+1, n+3, n+4}` with `n` off the
/// rightmost edge and above the last street.
pub fn is_valid_corner(slots: &[Slot]) -> bool {
    let Some(numbers) = sorted_numbers(slots) else {
        return false;
    };
    let [n, ..] = numbers[..] else {
        return false;
    };
    if n % GRID_ROWS == 0 || n > MAX_NUMBER - 4 {
        return false;
    }
    numbers == [n, n + 1, n + 3, n + 4]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(numbers: &[u8]) -> Vec<Slot> {
        numbers.iter().map(|n| Slot::Number(*n)).collect()
    }

    fn limits() -> TableLimits {
        TableLimits::default()
    }

    fn units(n: u64) -> Amount {
        Amount::from_units(n)
    }

    #[test]
    fn test_split_geometry() {
        assert!(is_valid_split(&nums(&[14, 17])));
        assert!(is_valid_split(&nums(&[17, 14])));
        assert!(is_valid_split(&nums(&[17, 18])));
        assert!(!is_valid_split(&nums(&[18, 19])));
        assert!(!is_valid_split(&nums(&[1, 3])));
        assert!(!is_valid_split(&nums(&[1, 5])));
        assert!(is_valid_split(&nums(&[33, 36])));
        assert!(!is_valid_split(&[Slot::Zero, Slot::Number(1)]));
        assert!(!is_valid_split(&[Slot::Zero, Slot::DoubleZero]));
    }

    #[test]
    fn test_corner_geometry() {
        assert!(is_valid_corner(&nums(&[1, 2, 4, 5])));
        assert!(is_valid_corner(&nums(&[5, 4, 2, 1])));
        assert!(is_valid_corner(&nums(&[32, 33, 35, 36])));
        assert!(!is_valid_corner(&nums(&[3, 4, 6, 7])));
        assert!(!is_valid_corner(&nums(&[1, 2, 3, 4])));
        assert!(!is_valid_corner(&nums(&[33, 34, 36, 37])));
        assert!(!is_valid_corner(&[
            Slot::Zero,
            Slot::Number(1),
            Slot::Number(2),
            Slot::Number(3)
        ]));
    }

    #[test]
    fn test_unknown_bet_type_is_first() {
        assert_eq!(
            validate_named("basket", &[], Amount::ZERO, Amount::ZERO, Amount::ZERO, &limits()),
            Err(Rejection::UnknownBetType("basket".to_string()))
        );
        assert_eq!(
            validate_named("Straight", &nums(&[17]), units(10), Amount::ZERO, units(100), &limits()),
            Ok(BetType::Straight)
        );
    }

    #[test]
    fn test_check_order() {
        let l = limits();
        let balance = units(1_000);

        // Empty slots beat a bad amount.
        assert_eq!(
            validate(BetType::Straight, &[], Amount::ZERO, Amount::ZERO, balance, &l),
            Err(Rejection::InvalidSlots)
        );
        assert_eq!(
            validate(BetType::Straight, &nums(&[37]), units(10), Amount::ZERO, balance, &l),
            Err(Rejection::InvalidSlots)
        );
        // Count beats duplicates.
        assert_eq!(
            validate(BetType::Street, &nums(&[1, 1]), units(10), Amount::ZERO, balance, &l),
            Err(Rejection::SlotCountMismatch {
                bet_type: BetType::Street,
                expected: 3,
                got: 2
            })
        );
        // Duplicates beat geometry.
        assert_eq!(
            validate(BetType::Split, &nums(&[5, 5]), units(10), Amount::ZERO, balance, &l),
            Err(Rejection::DuplicateSlots)
        );
        // Geometry beats amount.
        assert_eq!(
            validate(BetType::Split, &nums(&[18, 19]), Amount::ZERO, Amount::ZERO, balance, &l),
            Err(Rejection::InvalidGeometry(BetType::Split))
        );
        // Amount beats balance.
        assert!(matches!(
            validate(BetType::Straight, &nums(&[1]), Amount::ZERO, Amount::ZERO, Amount::ZERO, &l),
            Err(Rejection::AmountOutOfRange { .. })
        ));
        // Balance beats table max.
        assert!(matches!(
            validate(BetType::Straight, &nums(&[1]), units(20), units(9_990), units(10), &l),
            Err(Rejection::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_zero_split_is_geometry_error() {
        assert_eq!(
            validate(
                BetType::Split,
                &[Slot::Zero, Slot::DoubleZero],
                units(10),
                Amount::ZERO,
                units(100),
                &limits()
            ),
            Err(Rejection::InvalidGeometry(BetType::Split))
        );
    }

    #[test]
    fn test_amount_limits() {
        let l = limits();
        assert!(validate_amount(l.min_bet, &l).is_ok());
        assert!(validate_amount(l.max_bet, &l).is_ok());
        assert!(validate_amount(Amount::from_cents(99), &l).is_err());
        assert!(validate_amount(l.max_bet.saturating_add(Amount::from_cents(1)), &l).is_err());
    }

    #[test]
    fn test_insufficient_balance_counts_committed_stakes() {
        assert_eq!(
            validate_funds(units(60), units(950), units(1_000), &limits()),
            Err(Rejection::InsufficientBalance {
                needed: units(60),
                available: units(50)
            })
        );
        assert!(validate_funds(units(50), units(950), units(1_000), &limits()).is_ok());
    }

    #[test]
    fn test_table_max() {
        let l = limits();
        let balance = units(20_000);
        assert_eq!(
            validate_funds(units(20), units(9_990), balance, &l),
            Err(Rejection::TableMaxExceeded {
                staked: units(9_990),
                table_max: units(10_000)
            })
        );
        assert!(validate_funds(units(10), units(9_990), balance, &l).is_ok());
    }

    #[test]
    fn test_outside_bets_accept_predefined_sets() {
        use croupier_types::roulette::PredefinedSet;
        for set in PredefinedSet::ALL {
            assert_eq!(validate_shape(set.bet_type(), &set.slots()), Ok(()), "{set}");
        }
    }
}
