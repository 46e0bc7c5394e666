/// Number of pockets on an American wheel (1-36, 0 and 00).
pub const WHEEL_SLOTS: usize = 38;

/// Highest numbered pocket.
pub const MAX_NUMBER: u8 = 36;

/// Rows on the betting grid (1-36 laid out as 3 rows x 12 columns).
pub const GRID_ROWS: u8 = 3;

/// Red numbers on an American wheel.
pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Cents per whole currency unit.
pub const CENTS_PER_UNIT: u64 = 100;

/// Starting balance for a fresh player (in whole units).
pub const STARTING_BALANCE_UNITS: u64 = 1_000;

/// Default smallest stake accepted on a single bet (in whole units).
pub const DEFAULT_MIN_BET_UNITS: u64 = 1;

/// Default largest stake accepted on a single bet (in whole units).
pub const DEFAULT_MAX_BET_UNITS: u64 = 5_000;

/// Default cap on the sum of all stakes in one round (in whole units).
pub const DEFAULT_TABLE_MAX_UNITS: u64 = 10_000;

/// Default chip denominations (in whole units).
pub const DEFAULT_CHIPS_UNITS: [u64; 6] = [1, 5, 25, 100, 500, 1_000];

/// Chip selected when a session starts (in whole units).
pub const DEFAULT_SELECTED_CHIP_UNITS: u64 = 5;

/// Maximum number of resolved rounds kept in history.
pub const HISTORY_CAPACITY: usize = 50;

/// Largest history a rule file may ask for.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Number of slots reported on each side of a hot/cold query.
pub const HOT_COLD_COUNT: usize = 5;
