use std::cell::Cell;
use std::rc::Rc;

use chrono::Utc;

/// Millisecond timestamps for bets and history entries.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct FixedClock {
    millis: Cell<u64>,
}

impl FixedClock {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Cell::new(millis),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.millis.set(self.millis.get().saturating_add(millis));
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance(250);
        assert_eq!(clock.now_millis(), 1_250);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
