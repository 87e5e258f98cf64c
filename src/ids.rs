use std::collections::HashSet;

use chrono::Utc;

use crate::models::Task;

/// Issues task ids from the wall clock in milliseconds.
///
/// Ids never repeat: when the clock has not advanced past the last issued id
/// (two tasks in the same millisecond, or a clock that went backwards) the
/// next id is `last + 1`. Once `last` reaches `u64::MAX` ids can no longer
/// increase, so the next one is the first id at or after the clock that is
/// not used by `tasks`.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Seeds the generator so it never reissues an id already in `tasks`.
    pub fn seeded_from(tasks: &[Task]) -> IdGenerator {
        IdGenerator {
            last: tasks.iter().map(|t| t.id).max().unwrap_or(0),
        }
    }

    pub fn next_id(&mut self, tasks: &[Task]) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.next_at(now, tasks)
    }

    fn next_at(&mut self, now_ms: u64, tasks: &[Task]) -> u64 {
        match self.last.checked_add(1) {
            Some(after_last) => {
                let id = now_ms.max(after_last);
                self.last = id;
                id
            }
            None => first_unused(now_ms, tasks),
        }
    }
}

fn first_unused(start: u64, tasks: &[Task]) -> u64 {
    let taken: HashSet<u64> = tasks.iter().map(|t| t.id).collect();
    let mut id = start;
    while taken.contains(&id) {
        id = id.wrapping_add(1);
    }
    id
}
