#![forbid(unsafe_code)]

//! Frame scheduling.
//!
//! The frame loop asks a [`FrameScheduler`] for the next frame and receives
//! an opaque [`FrameHandle`]. Handles are issued in strictly increasing
//! order and never reused, so a handle that was cancelled (or superseded by
//! a restart) can be recognized as stale when it is delivered late.
//!
//! Two implementations ship here:
//!
//! - [`ManualScheduler`]: every pending frame is due immediately. Drives
//!   headless tests deterministically.
//! - [`RefreshScheduler`]: paces frames at a fixed interval against the
//!   monotonic clock (about 60 Hz by default).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Opaque identifier of one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw id, for logs.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Source of frame callbacks.
pub trait FrameScheduler {
    /// Request one frame; returns its handle.
    fn schedule(&mut self) -> FrameHandle;

    /// Cancel a pending frame. Returns `false` if it was not pending.
    fn cancel(&mut self, handle: FrameHandle) -> bool;

    /// Pop the earliest pending frame if it is due now.
    fn poll_ready(&mut self) -> Option<FrameHandle>;

    /// Time until the earliest pending frame is due, or `None` when nothing
    /// is pending.
    fn time_until_due(&self) -> Option<Duration>;

    /// Block until the earliest pending frame is due and pop it.
    fn next_frame(&mut self) -> Option<FrameHandle> {
        loop {
            if let Some(handle) = self.poll_ready() {
                return Some(handle);
            }
            let wait = self.time_until_due()?;
            std::thread::sleep(wait);
        }
    }
}

/// Monotonic handle issuer shared by the schedulers.
#[derive(Debug, Clone, Default)]
struct HandleIssuer {
    last: u64,
}

impl HandleIssuer {
    fn issue(&mut self) -> FrameHandle {
        self.last += 1;
        FrameHandle(self.last)
    }
}

/// Scheduler whose pending frames are always due.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    issuer: HandleIssuer,
    pending: VecDeque<FrameHandle>,
    cancellations: u64,
}

impl ManualScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles scheduled but not yet delivered or cancelled.
    pub fn pending(&self) -> impl Iterator<Item = FrameHandle> + '_ {
        self.pending.iter().copied()
    }

    /// Number of successful cancellations.
    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = self.issuer.issue();
        self.pending.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        let removed = self.pending.len() != before;
        if removed {
            self.cancellations += 1;
        }
        removed
    }

    fn poll_ready(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    fn time_until_due(&self) -> Option<Duration> {
        (!self.pending.is_empty()).then_some(Duration::ZERO)
    }
}

/// Scheduler pacing frames at a fixed interval.
///
/// A frame scheduled after a late delivery is due immediately rather than
/// piling up missed frames.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    issuer: HandleIssuer,
    pending: VecDeque<(FrameHandle, Instant)>,
    last_delivered: Option<Instant>,
}

impl RefreshScheduler {
    /// Create a scheduler with the given frame interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            issuer: HandleIssuer::default(),
            pending: VecDeque::new(),
            last_delivered: None,
        }
    }
}

impl FrameScheduler for RefreshScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let now = Instant::now();
        let anchor = self
            .pending
            .back()
            .map(|(_, due)| *due)
            .or(self.last_delivered);
        let due = anchor.map_or(now, |t| (t + self.interval).max(now));
        let handle = self.issuer.issue();
        self.pending.push_back((handle, due));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    fn poll_ready(&mut self) -> Option<FrameHandle> {
        let now = Instant::now();
        match self.pending.front() {
            Some((_, due)) if *due <= now => {
                let (handle, _) = self.pending.pop_front()?;
                self.last_delivered = Some(now);
                Some(handle)
            }
            _ => None,
        }
    }

    fn time_until_due(&self) -> Option<Duration> {
        self.pending
            .front()
            .map(|(_, due)| due.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_increase_monotonically() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule();
        let b = scheduler.schedule();
        assert!(b > a);
        assert!(scheduler.cancel(a));
        let c = scheduler.schedule();
        assert!(c > b);
    }

    #[test]
    fn manual_delivers_in_order() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule();
        let b = scheduler.schedule();
        assert_eq!(scheduler.time_until_due(), Some(Duration::ZERO));
        assert_eq!(scheduler.next_frame(), Some(a));
        assert_eq!(scheduler.next_frame(), Some(b));
        assert_eq!(scheduler.next_frame(), None);
        assert_eq!(scheduler.time_until_due(), None);
    }

    #[test]
    fn cancel_twice_counts_once() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule();
        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert_eq!(scheduler.cancellations(), 1);
        assert_eq!(scheduler.pending().count(), 0);
    }

    #[test]
    fn refresh_first_frame_is_immediate() {
        let mut scheduler = RefreshScheduler::new(Duration::from_millis(16));
        let a = scheduler.schedule();
        assert_eq!(scheduler.poll_ready(), Some(a));
    }

    #[test]
    fn refresh_paces_following_frames() {
        let mut scheduler = RefreshScheduler::new(Duration::from_secs(60));
        let a = scheduler.schedule();
        assert_eq!(scheduler.poll_ready(), Some(a));
        let b = scheduler.schedule();
        assert_eq!(scheduler.poll_ready(), None);
        let wait = scheduler.time_until_due().expect("pending");
        assert!(wait > Duration::from_secs(59));
        assert!(scheduler.cancel(b));
        assert_eq!(scheduler.time_until_due(), None);
    }

    #[test]
    fn refresh_next_frame_blocks_briefly() {
        let mut scheduler = RefreshScheduler::new(Duration::from_millis(5));
        scheduler.schedule();
        scheduler.next_frame();
        let start = Instant::now();
        let b = scheduler.schedule();
        assert_eq!(scheduler.next_frame(), Some(b));
        assert!(start.elapsed() >= Duration::from_millis(4));
    }
}
