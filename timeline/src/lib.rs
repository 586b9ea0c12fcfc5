#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic virtual-clock timeline for the Gatefall session engine.
//!
//! A [`Timeline`] is an ordered list of one-shot `(offset, action)` entries
//! played from t=0. The clock never reads wall time: the owner advances it
//! explicitly, so the same schedule replays identically in production and in
//! tests. Actions are plain data values, which keeps pending work inspectable
//! and makes cancellation a matter of dropping entries.

use std::time::Duration;

/// Scheduling seam through which systems contribute timeline entries.
///
/// Systems register work against this trait rather than a concrete
/// [`Timeline`] so tests can substitute recording fakes.
pub trait Schedule<A> {
    /// Registers an action at an absolute offset from the timeline origin.
    fn register_at(&mut self, offset: Duration, action: A);

    /// Registers a one-shot action relative to the current clock position.
    fn register_after(&mut self, delay: Duration, action: A);
}

/// Playback status of a [`Timeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Playback {
    /// Entries may be registered but the clock has not started.
    #[default]
    Idle,
    /// The clock advances and due entries fire.
    Playing,
    /// The clock is frozen; entries keep their offsets.
    Paused,
    /// Terminal state: all pending entries are cancelled.
    Stopped,
}

#[derive(Clone, Debug)]
struct Entry<A> {
    offset: Duration,
    action: A,
}

/// Ordered one-shot schedule driven by an explicitly advanced clock.
#[derive(Debug, Default)]
pub struct Timeline<A> {
    entries: Vec<Entry<A>>,
    fired: usize,
    now: Duration,
    playback: Playback,
}

impl<A> Timeline<A> {
    /// Creates an empty timeline in the [`Playback::Idle`] state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            fired: 0,
            now: Duration::ZERO,
            playback: Playback::Idle,
        }
    }

    /// Starts playback from the idle state.
    pub fn play(&mut self) {
        if self.playback == Playback::Idle {
            self.playback = Playback::Playing;
        }
    }

    /// Freezes the clock until [`Timeline::resume`] is called.
    pub fn pause(&mut self) {
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
        }
    }

    /// Continues a paused timeline.
    pub fn resume(&mut self) {
        if self.playback == Playback::Paused {
            self.playback = Playback::Playing;
        }
    }

    /// Cancels every pending entry and refuses further registrations.
    ///
    /// Stopping is terminal and idempotent; dropping the timeline is the
    /// only remaining teardown step.
    pub fn stop(&mut self) {
        self.playback = Playback::Stopped;
        self.entries.clear();
        self.fired = 0;
    }

    /// Current playback status.
    #[must_use]
    pub const fn playback(&self) -> Playback {
        self.playback
    }

    /// Position of the virtual clock since the timeline origin.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of registered entries that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len() - self.fired
    }

    /// Advances the clock by `dt` and collects every due action into `due`.
    ///
    /// Entries fire in non-decreasing offset order; entries sharing an offset
    /// fire in registration order. Paused, idle, and stopped timelines ignore
    /// the advance entirely.
    pub fn advance(&mut self, dt: Duration, due: &mut Vec<A>)
    where
        A: Clone,
    {
        if self.playback != Playback::Playing {
            return;
        }

        self.now = self.now.saturating_add(dt);
        while self.fired < self.entries.len() && self.entries[self.fired].offset <= self.now {
            due.push(self.entries[self.fired].action.clone());
            self.fired += 1;
        }
    }

    fn insert(&mut self, offset: Duration, action: A) {
        if self.playback == Playback::Stopped {
            return;
        }

        // An offset already behind the clock fires on the next advance.
        let offset = offset.max(self.now);
        let index = self
            .entries
            .partition_point(|entry| entry.offset <= offset);
        self.entries.insert(index, Entry { offset, action });
    }
}

impl<A> Schedule<A> for Timeline<A> {
    fn register_at(&mut self, offset: Duration, action: A) {
        self.insert(offset, action);
    }

    fn register_after(&mut self, delay: Duration, action: A) {
        let offset = self.now.saturating_add(delay);
        self.insert(offset, action);
    }
}
