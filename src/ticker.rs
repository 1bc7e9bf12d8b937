//! Time Source
//!
//! Variants with stats, expiration, or refresh read time through a
//! [`Ticker`] rather than the system clock directly, so tests can supply a
//! deterministic source and unbounded variants can skip timekeeping
//! entirely.

/// A nanosecond-precision time source.
///
/// Values are only meaningful relative to each other; readings must be
/// monotonically non-decreasing.
pub trait Ticker {
    /// Returns the number of nanoseconds elapsed since this ticker's fixed
    /// but arbitrary origin.
    fn read(&self) -> u64;
}

/// A [`Ticker`] that always reads zero, for variants that never observe
/// time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisabledTicker;

impl Ticker for DisabledTicker {
    fn read(&self) -> u64 {
        0
    }
}

/// A [`Ticker`] backed by the monotonic system clock.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemTicker {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTicker {
    /// Creates a ticker whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Ticker for SystemTicker {
    fn read(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_ticker_reads_zero() {
        assert_eq!(DisabledTicker.read(), 0);
        assert_eq!(DisabledTicker.read(), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_ticker_is_monotonic() {
        let ticker = SystemTicker::new();
        let first = ticker.read();
        let second = ticker.read();
        assert!(second >= first);
    }
}
