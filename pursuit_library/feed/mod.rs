//! Target sample delivery
//!
//! The input side pushes target positions into a channel whenever it
//! observes them; the tick loop asks for the most recent one. Samples that
//! arrive between two ticks are superseded, not queued.
//!
//! ```rust
//! use pursuit_library::feed::TargetFeed;
//! use pursuit_library::tracker::TargetSample;
//!
//! let (sender, mut feed) = TargetFeed::channel(TargetSample::new(5.0, 5.0));
//! sender.send(TargetSample::new(1.0, 2.0)).unwrap();
//! sender.send(TargetSample::new(3.0, 4.0)).unwrap();
//! assert_eq!(feed.latest(), TargetSample::new(3.0, 4.0));
//! ```

use crate::tracker::TargetSample;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::debug;

/// Latest-value view over a channel of target samples
pub struct TargetFeed {
    receiver: Receiver<TargetSample>,
    latest: TargetSample,
    disconnected: bool,
}

impl TargetFeed {
    /// Wrap an existing receiver, starting from `initial` until a sample arrives
    pub fn new(receiver: Receiver<TargetSample>, initial: TargetSample) -> Self {
        Self {
            receiver,
            latest: initial,
            disconnected: false,
        }
    }

    /// Create a connected sender/feed pair
    pub fn channel(initial: TargetSample) -> (Sender<TargetSample>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self::new(receiver, initial))
    }

    /// Drain pending samples without blocking and return the newest
    ///
    /// Once every sender is gone the last known sample keeps being returned.
    pub fn latest(&mut self) -> TargetSample {
        loop {
            match self.receiver.try_recv() {
                Ok(sample) => self.latest = sample,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!("target feed disconnected, holding last sample");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        self.latest
    }

    /// True once all senders have been dropped and the channel is drained
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_sample_until_first_send() {
        let (_sender, mut feed) = TargetFeed::channel(TargetSample::new(5.0, 5.0));
        assert_eq!(feed.latest(), TargetSample::new(5.0, 5.0));
        assert!(!feed.is_disconnected());
    }

    #[test]
    fn test_keeps_newest_sample() {
        let (sender, mut feed) = TargetFeed::channel(TargetSample::default());
        for i in 0..5 {
            sender.send(TargetSample::new(i as f64, -(i as f64))).unwrap();
        }
        assert_eq!(feed.latest(), TargetSample::new(4.0, -4.0));
        // Nothing new: same sample again
        assert_eq!(feed.latest(), TargetSample::new(4.0, -4.0));
    }

    #[test]
    fn test_holds_last_sample_after_disconnect() {
        let (sender, mut feed) = TargetFeed::channel(TargetSample::default());
        sender.send(TargetSample::new(1.0, 1.0)).unwrap();
        drop(sender);

        assert_eq!(feed.latest(), TargetSample::new(1.0, 1.0));
        assert!(feed.is_disconnected());
        assert_eq!(feed.latest(), TargetSample::new(1.0, 1.0));
    }

    #[test]
    fn test_samples_from_another_thread() {
        let (sender, mut feed) = TargetFeed::channel(TargetSample::default());
        std::thread::spawn(move || {
            sender.send(TargetSample::new(2.0, 3.0)).unwrap();
        })
        .join()
        .unwrap();
        assert_eq!(feed.latest(), TargetSample::new(2.0, 3.0));
    }
}
