//! LED controller — group queries, bulk power-off, animations, clock face.
//!
//! Everything here is composed from the four [`LightService`] operations and
//! runs strictly in sequence: each call completes (or fails) before the next
//! is issued, and the first failure aborts whatever sequence is in progress.

mod animation;
mod clock;
mod ops;

pub use clock::{ClockHands, hour_index, mix_colors, ring_index};

use crate::error::{LedringError, Result};
use crate::service::LightService;
use crate::wait::Sleeper;

/// Default ring: light ids 20 through 27.
pub const DEFAULT_GROUP_LEDS: [u32; 8] = [20, 21, 22, 23, 24, 25, 26, 27];

/// Ordered, fixed set of light ids making up the ring.
///
/// Order defines chase direction. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLedSet {
    ids: Box<[u32]>,
}

impl GroupLedSet {
    pub fn new(ids: impl Into<Vec<u32>>) -> Result<Self> {
        let ids = ids.into();
        if ids.is_empty() {
            return Err(LedringError::Config("LED ring must not be empty".into()));
        }
        Ok(Self {
            ids: ids.into_boxed_slice(),
        })
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index after `index`, wrapping at the end of the ring.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.ids.len()
    }
}

impl Default for GroupLedSet {
    fn default() -> Self {
        Self {
            ids: Box::new(DEFAULT_GROUP_LEDS),
        }
    }
}

impl std::ops::Index<usize> for GroupLedSet {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.ids[index]
    }
}

/// Drives the ring through a [`LightService`], waiting via a [`Sleeper`].
pub struct LedController<S, W> {
    service: S,
    sleeper: W,
    ring: GroupLedSet,
}

impl<S: LightService, W: Sleeper> LedController<S, W> {
    pub fn new(service: S, sleeper: W, ring: GroupLedSet) -> Self {
        Self {
            service,
            sleeper,
            ring,
        }
    }

    pub fn ring(&self) -> &GroupLedSet {
        &self.ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ring_is_twenty_to_twenty_seven() {
        let ring = GroupLedSet::default();
        assert_eq!(ring.ids(), &[20, 21, 22, 23, 24, 25, 26, 27]);
        assert_eq!(ring.len(), 8);
        assert_eq!(ring[3], 23);
    }

    #[test]
    fn empty_ring_rejected() {
        let err = GroupLedSet::new(Vec::new()).unwrap_err();
        assert!(matches!(err, LedringError::Config(_)));
    }

    #[test]
    fn next_index_wraps() {
        let ring = GroupLedSet::new(vec![5, 6, 7]).unwrap();
        assert_eq!(ring.next_index(0), 1);
        assert_eq!(ring.next_index(2), 0);
    }

    #[test]
    fn single_led_ring_wraps_to_itself() {
        let ring = GroupLedSet::new(vec![9]).unwrap();
        assert_eq!(ring.next_index(0), 0);
    }
}
