use crate::models::{Priority, Task};

/// Aggregate counts over the full, unfiltered task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Active tasks with high priority.
    pub high: usize,
}

pub fn compute_stats(tasks: &[Task]) -> Stats {
    tasks.iter().fold(Stats::default(), |mut s, t| {
        s.total += 1;
        if t.completed {
            s.completed += 1;
        } else {
            s.active += 1;
            if t.priority == Priority::High {
                s.high += 1;
            }
        }
        s
    })
}
