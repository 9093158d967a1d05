//! # Task Scheduler
//!
//! Turns the planner's raw task list into a gapless waterfall: each task
//! starts exactly when the previous one's allotted duration ends.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::skills::RawTask;
use crate::state::Task;

pub const DEFAULT_MIN_DURATION: u32 = 2;
pub const DEFAULT_MAX_DURATION: u32 = 4;

#[derive(Debug, Clone)]
pub struct TaskScheduler {
    durations: RangeInclusive<u32>,
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DURATION, DEFAULT_MAX_DURATION)
    }
}

impl TaskScheduler {
    /// Durations are drawn from `min..=max`, clamped so that `1 <= min <= max`
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        Self {
            durations: min..=max,
        }
    }

    /// Schedule with random durations from the configured range
    pub fn schedule(&self, raw: &[RawTask]) -> Vec<Task> {
        let mut rng = rand::thread_rng();
        let durations: Vec<u32> = raw
            .iter()
            .map(|_| rng.gen_range(self.durations.clone()))
            .collect();
        schedule_with_durations(raw, &durations)
    }
}

/// Waterfall schedule with caller-chosen durations.
///
/// `durations` is zipped with `raw`; a missing or zero duration counts as 1.
pub fn schedule_with_durations(raw: &[RawTask], durations: &[u32]) -> Vec<Task> {
    let stamp = chrono::Utc::now().timestamp_millis();
    let mut offset = 0;

    raw.iter()
        .enumerate()
        .map(|(index, raw_task)| {
            let duration = durations.get(index).copied().unwrap_or(1).max(1);
            let task = Task::new(
                format!("task-{}-{}", stamp, index),
                raw_task.title.clone(),
                raw_task.assigned_agent_id.clone(),
                duration,
                offset,
            );
            offset += duration;
            task
        })
        .collect()
}

/// Indices of `tasks` sorted ascending by `start_offset` (stable)
pub fn execution_order(tasks: &[Task]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&i| tasks[i].start_offset);
    order
}

/// Span of the whole schedule
pub fn total_duration(tasks: &[Task]) -> u32 {
    tasks.iter().map(Task::end_offset).max().unwrap_or(0)
}
