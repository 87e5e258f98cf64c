use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Represents a single task in the task manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (creation time in milliseconds).
    pub id: u64,
    /// Short title; never empty once persisted.
    pub title: String,
    /// Free-form description, may be empty.
    #[serde(default)]
    pub description: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    /// Due date as `YYYY-MM-DD`, or empty when there is none.
    #[serde(default)]
    pub due_date: String,
    /// Timestamp when the task was created (ISO 8601, UTC).
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Next value in selector order, wrapping around.
    pub fn cycle(self, forward: bool) -> Priority {
        cycle(&Self::ALL, self, forward)
    }
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Personal,
        Category::Work,
        Category::Shopping,
        Category::Health,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Shopping => "shopping",
            Category::Health => "health",
        }
    }

    pub fn cycle(self, forward: bool) -> Category {
        cycle(&Self::ALL, self, forward)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (i + 1) % all.len()
    } else {
        (i + all.len() - 1) % all.len()
    };
    all[next]
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| anyhow!("unknown priority '{}' (expected low, medium or high)", s))
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL.into_iter().find(|c| c.as_str() == s).ok_or_else(|| {
            anyhow!(
                "unknown category '{}' (expected personal, work, shopping or health)",
                s
            )
        })
    }
}

/// Transient field set for a task that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: String,
}

impl Draft {
    /// A draft is addable once its title has non-whitespace content.
    pub fn is_addable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_uses_camel_case_field_names() {
        let task = Task {
            id: 1,
            title: "Buy milk".into(),
            description: String::new(),
            completed: false,
            priority: Priority::Low,
            category: Category::Shopping,
            due_date: "2025-01-02".into(),
            created_at: "2025-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2025-01-02");
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00.000Z");
        assert_eq!(json["priority"], "low");
        assert_eq!(json["category"], "shopping");
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"id":5,"title":"x","createdAt":"2025-01-01T00:00:00.000Z"}"#)
                .unwrap();
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, Category::Personal);
        assert_eq!(task.due_date, "");
    }

    #[test]
    fn selectors_wrap_around() {
        assert_eq!(Priority::High.cycle(true), Priority::Low);
        assert_eq!(Priority::Low.cycle(false), Priority::High);
        assert_eq!(Category::Health.cycle(true), Category::Personal);
    }

    #[test]
    fn blank_draft_is_not_addable() {
        let mut draft = Draft::default();
        assert!(!draft.is_addable());
        draft.title = "   \t".into();
        assert!(!draft.is_addable());
        draft.title = " a ".into();
        assert!(draft.is_addable());
    }
}
