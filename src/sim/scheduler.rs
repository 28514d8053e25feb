//! Timed actions
//!
//! [`SpawnScheduler`] paces a wave's drops; [`DelayQueue`] holds every other
//! one-shot delayed action (level transition, post-game-over cleanup).
//! Both are polled against the simulation clock and are fully cancellable.

use super::state::RunState;

/// One fired spawn tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTick {
    /// Countdown label shown on the drop (wave size down to 1)
    pub sequence: u32,
}

/// Wait-then-spawn pacing for the active wave
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    interval: f64,
    /// Clock time of the next tick; `None` when idle or cancelled
    next_due: Option<f64>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the schedule: the first drop spawns one interval after `now`
    pub fn start(&mut self, now: f64, interval: f32, run: &RunState) {
        self.interval = interval as f64;
        self.next_due = if run.drops_remaining_to_spawn > 0 {
            Some(now + self.interval)
        } else {
            None
        };
    }

    /// Stop scheduling. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.next_due
    }

    /// Fire the next tick if it is due at `now`.
    ///
    /// Decrements `drops_remaining_to_spawn`; the schedule ends when it reaches zero.
    pub fn poll(&mut self, now: f64, run: &mut RunState) -> Option<SpawnTick> {
        let due = self.next_due?;
        if due > now {
            return None;
        }
        if run.drops_remaining_to_spawn == 0 {
            self.next_due = None;
            return None;
        }

        run.drops_remaining_to_spawn -= 1;
        self.next_due = if run.drops_remaining_to_spawn > 0 {
            Some(due + self.interval)
        } else {
            None
        };

        Some(SpawnTick {
            sequence: run.drops_remaining_to_spawn + 1,
        })
    }
}

/// Group a delayed action belongs to, for bulk cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayKey {
    LevelTransition,
    ClearDrops,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    due: f64,
    order: u64,
    key: DelayKey,
    action: A,
}

/// One-shot delayed actions fired in deadline order (ties in insertion order)
#[derive(Debug, Clone)]
pub struct DelayQueue<A> {
    pending: Vec<Pending<A>>,
    next_order: u64,
}

impl<A> Default for DelayQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_order: 0,
        }
    }
}

impl<A> DelayQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f32, key: DelayKey, action: A) {
        let order = self.next_order;
        self.next_order += 1;
        self.pending.push(Pending {
            due: now + delay.max(0.0) as f64,
            order,
            key,
            action,
        });
    }

    /// Drop every pending action under `key`. Returns how many were removed.
    pub fn cancel(&mut self, key: DelayKey) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.key != key);
        before - self.pending.len()
    }

    pub fn contains(&self, key: DelayKey) -> bool {
        self.pending.iter().any(|p| p.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.order.cmp(&b.order))
            })
            .map(|(i, _)| i)
    }

    /// Deadline of the next action, if any
    pub fn next_due(&self) -> Option<f64> {
        self.earliest().map(|i| self.pending[i].due)
    }

    /// Remove and return the earliest action due at `now`
    pub fn pop_due(&mut self, now: f64) -> Option<(DelayKey, A)> {
        let i = self.earliest()?;
        if self.pending[i].due > now {
            return None;
        }
        let p = self.pending.swap_remove(i);
        Some((p.key, p.action))
    }
}
