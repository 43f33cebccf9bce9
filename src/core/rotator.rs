//! # Carousel Rotator
//!
//! Index-advance policy for a rotating strip. The rotator never owns a timer
//! itself: [`CarouselRotator::attach`] and [`CarouselRotator::detach`] return a
//! [`RotationCommand`] telling the runtime to start or stop one, and each tick
//! the timer produces is tagged with the collection it was started for. A tick
//! for any other collection is ignored, so a timer that outlives its
//! collection can never move the index.
//!
//! Rendering reads [`CarouselRotator::current_index`] and nothing else.

use std::time::Duration;

use log::debug;

/// Default time between index advances.
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(2000);

/// Timer instruction for the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationCommand {
    /// Start (or replace) the rotation timer for `collection`.
    Start { collection: u64, interval: Duration },
    /// Release the running timer.
    Stop,
    /// No timer change needed.
    Idle,
}

#[derive(Debug, Clone)]
pub struct CarouselRotator {
    interval: Duration,
    index: usize,
    len: usize,
    collection: Option<u64>,
    running: bool,
}

impl Default for CarouselRotator {
    fn default() -> Self {
        Self::new(ROTATION_INTERVAL)
    }
}

impl CarouselRotator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            index: 0,
            len: 0,
            collection: None,
            running: false,
        }
    }

    /// Always in `[0, len)`, and 0 when the collection is empty.
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn collection(&self) -> Option<u64> {
        self.collection
    }

    /// Binds the rotator to a (new) collection. The index resets to 0 first;
    /// rotation only runs for more than one item.
    pub fn attach(&mut self, collection: u64, len: usize) -> RotationCommand {
        let was_running = self.running;
        self.index = 0;
        self.len = len;
        self.collection = Some(collection);
        self.running = len > 1;

        if self.running {
            debug!("Rotation started for collection {} ({} items)", collection, len);
            RotationCommand::Start {
                collection,
                interval: self.interval,
            }
        } else if was_running {
            debug!("Rotation stopped: collection {} has {} items", collection, len);
            RotationCommand::Stop
        } else {
            RotationCommand::Idle
        }
    }

    /// Unbinds from the collection (view teardown or mode change).
    pub fn detach(&mut self) -> RotationCommand {
        let was_running = self.running;
        self.index = 0;
        self.len = 0;
        self.collection = None;
        self.running = false;
        if was_running {
            RotationCommand::Stop
        } else {
            RotationCommand::Idle
        }
    }

    /// Advances by one if the tick belongs to the current collection.
    pub fn tick(&mut self, collection: u64) -> bool {
        if !self.running || self.collection != Some(collection) {
            return false;
        }
        self.index = (self.index + 1) % self.len;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_collections_never_start() {
        for len in 0..=1 {
            let mut rotator = CarouselRotator::default();
            assert_eq!(rotator.attach(7, len), RotationCommand::Idle);
            assert!(!rotator.is_running());
            assert!(!rotator.tick(7));
            assert_eq!(rotator.current_index(), 0);
        }
    }

    #[test]
    fn test_index_after_k_ticks() {
        for n in 2..6usize {
            let mut rotator = CarouselRotator::default();
            rotator.attach(1, n);
            for k in 1..=(3 * n) {
                assert!(rotator.tick(1));
                assert_eq!(rotator.current_index(), k % n);
                assert!(rotator.current_index() < n);
            }
        }
    }

    #[test]
    fn test_start_carries_interval() {
        let mut rotator = CarouselRotator::new(Duration::from_millis(500));
        assert_eq!(
            rotator.attach(3, 4),
            RotationCommand::Start {
                collection: 3,
                interval: Duration::from_millis(500)
            }
        );
    }

    #[test]
    fn test_identity_change_resets_index() {
        let mut rotator = CarouselRotator::default();
        rotator.attach(1, 5);
        for _ in 0..4 {
            rotator.tick(1);
        }
        assert_eq!(rotator.current_index(), 4);

        // Shorter replacement: index must not carry over.
        assert!(matches!(rotator.attach(2, 2), RotationCommand::Start { .. }));
        assert_eq!(rotator.current_index(), 0);
    }

    #[test]
    fn test_ticks_for_old_collection_are_ignored() {
        let mut rotator = CarouselRotator::default();
        rotator.attach(1, 3);
        rotator.attach(2, 3);
        assert!(!rotator.tick(1));
        assert_eq!(rotator.current_index(), 0);
        assert!(rotator.tick(2));
        assert_eq!(rotator.current_index(), 1);
    }

    #[test]
    fn test_shrinking_to_one_item_stops() {
        let mut rotator = CarouselRotator::default();
        rotator.attach(1, 3);
        assert_eq!(rotator.attach(2, 1), RotationCommand::Stop);
        assert!(!rotator.is_running());
    }

    #[test]
    fn test_detach_stops_and_ignores_later_ticks() {
        let mut rotator = CarouselRotator::default();
        rotator.attach(1, 3);
        rotator.tick(1);
        assert_eq!(rotator.detach(), RotationCommand::Stop);
        assert!(!rotator.tick(1));
        assert_eq!(rotator.current_index(), 0);
        assert_eq!(rotator.detach(), RotationCommand::Idle);
    }
}
