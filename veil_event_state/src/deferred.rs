// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduled, cancelable, single-shot deferred actions.
//!
//! Widgets defer focus moves and listener arming past the event that caused them.
//! The queue holds plain task values; the host drives time by calling
//! [`TaskQueue::run_due`] with a millisecond timestamp and the owner executes the
//! returned tasks.
//!
//! ## Usage
//!
//! ```
//! use veil_event_state::deferred::TaskQueue;
//!
//! let mut queue = TaskQueue::new();
//! let focus = queue.defer("focus", 1000);
//! let expire = queue.schedule("expire", 1000, 1000);
//!
//! assert_eq!(queue.run_due(1000).as_slice(), &["focus"]);
//! assert!(!queue.is_pending(focus));
//! assert!(queue.cancel(expire));
//! assert!(queue.run_due(5000).is_empty());
//! ```

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use smallvec::SmallVec;

/// Handle of a scheduled task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct TaskId(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    due: u64,
    task: T,
}

/// Deferred tasks ordered by due time, then by scheduling order.
#[derive(Clone, Debug)]
pub struct TaskQueue<T> {
    next: u64,
    /// Entries keyed by scheduling sequence
    entries: BTreeMap<u64, Entry<T>>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            next: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Run `task` on the next tick.
    ///
    /// The task is due at `now`, so it is returned by the next [`run_due`](Self::run_due),
    /// never by one already in progress.
    pub fn defer(&mut self, task: T, now: u64) -> TaskId {
        self.schedule(task, now, 0)
    }

    /// Run `task` once `delay` milliseconds have passed since `now`.
    ///
    /// # Arguments
    /// * `task` - Value returned to the owner when due
    /// * `now` - Current timestamp in milliseconds
    /// * `delay` - Delay in milliseconds
    pub fn schedule(&mut self, task: T, now: u64, delay: u64) -> TaskId {
        self.next += 1;
        let seq = self.next;
        self.entries.insert(
            seq,
            Entry {
                due: now.saturating_add(delay),
                task,
            },
        );
        TaskId(seq)
    }

    /// Cancel a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.entries.remove(&id.0).is_some()
    }

    /// Cancel every pending task matching `pred`. Returns the number canceled.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| !pred(&e.task));
        before - self.entries.len()
    }

    /// Whether the task is still pending.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.contains_key(&id.0)
    }

    /// Whether any pending task matches `pred`.
    pub fn any(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.entries.values().any(|e| pred(&e.task))
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.values().map(|e| e.due).min()
    }

    /// Remove and return every task due at or before `now`, in (due, scheduling) order.
    pub fn run_due(&mut self, now: u64) -> SmallVec<[T; 4]> {
        let mut due: Vec<(u64, u64)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.due <= now)
            .map(|(seq, e)| (e.due, *seq))
            .collect();
        due.sort_unstable();
        let batch: SmallVec<[T; 4]> = due
            .into_iter()
            .filter_map(|(_, seq)| self.entries.remove(&seq))
            .map(|e| e.task)
            .collect();
        if !batch.is_empty() {
            tracing::trace!(count = batch.len(), now, "deferred tasks due");
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_tasks_come_out_in_due_then_schedule_order() {
        let mut q = TaskQueue::new();
        q.schedule('c', 0, 20);
        q.schedule('a', 0, 10);
        q.defer('x', 5);
        q.schedule('b', 0, 10);
        let batch = q.run_due(15);
        assert_eq!(batch.as_slice(), &['x', 'a', 'b']);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(20));
    }

    #[test]
    fn tasks_deferred_during_a_batch_wait_for_the_next_tick() {
        let mut q = TaskQueue::new();
        q.defer(1, 100);
        let batch = q.run_due(100);
        assert_eq!(batch.as_slice(), &[1]);
        // Executing the batch schedules follow-up work.
        q.defer(2, 100);
        assert!(q.is_pending(TaskId(2)));
        assert_eq!(q.run_due(100).as_slice(), &[2]);
    }

    #[test]
    fn cancel_is_single_shot() {
        let mut q = TaskQueue::new();
        let id = q.defer("focus", 0);
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(q.run_due(10).is_empty());
    }

    #[test]
    fn cancel_where_filters_by_task() {
        let mut q = TaskQueue::new();
        q.defer(1, 0);
        q.defer(2, 0);
        q.defer(1, 0);
        assert!(q.any(|t| *t == 2));
        assert_eq!(q.cancel_where(|t| *t == 1), 2);
        assert_eq!(q.run_due(0).as_slice(), &[2]);
        assert!(q.is_empty());
        q.defer(3, 0);
        q.clear();
        assert_eq!(q.next_due(), None);
    }
}
