use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a recurring task. Stale after `cancel`.
    pub struct TaskId;
}

/// Host tick cadence for marquee updates (~60 Hz), independent of frame time.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

struct Task {
    interval: Duration,
    next_due: Instant,
    last_run: Instant,
}

/// Recurring-timer primitive.
///
/// Tasks fire at most once per `poll`. A task that missed several intervals
/// fires once, reporting the full wall-clock time since its previous run, so
/// callers integrate real elapsed time rather than counting ticks.
pub struct Scheduler {
    tasks: SlotMap<TaskId, Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
        }
    }

    /// Schedule a task every `interval`, first due one interval after `now`.
    /// Zero intervals are bumped to 1ms.
    pub fn every(&mut self, interval: Duration, now: Instant) -> TaskId {
        let interval = interval.max(Duration::from_millis(1));
        self.tasks.insert(Task {
            interval,
            next_due: now + interval,
            last_run: now,
        })
    }

    /// Stop a task. Returns false if it was already gone.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect every task due at `now` with the time elapsed since it last
    /// ran, and reschedule each one interval after `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<(TaskId, Duration)> {
        let mut due = Vec::new();
        for (id, task) in self.tasks.iter_mut() {
            if now < task.next_due {
                continue;
            }
            due.push((id, now.duration_since(task.last_run)));
            task.last_run = now;
            task.next_due = now + task.interval;
        }
        due
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
