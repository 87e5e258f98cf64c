use std::str::FromStr;

use crate::models::{Category, Priority, Task};

/// Filter tokens offered by the filter bar, in display order.
pub const FILTER_TOKENS: [&str; 8] = [
    "all", "active", "completed", "high", "medium", "low", "work", "personal",
];

/// Selects which tasks are visible.
///
/// Status tokens (`all`, `active`, `completed`) and attribute tokens (a
/// priority or a category name) share one namespace. Priorities are matched
/// before categories; no fixed token names both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Priority(Priority),
    Category(Category),
    /// A token that names nothing known; matches no task.
    Other(String),
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
            Filter::Priority(p) => task.priority == *p,
            Filter::Category(c) => task.category == *c,
            Filter::Other(_) => false,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
            Filter::Priority(p) => p.as_str(),
            Filter::Category(c) => c.as_str(),
            Filter::Other(s) => s,
        }
    }

    /// Button label: the token with its first letter capitalised.
    pub fn label(&self) -> String {
        let token = self.token();
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The eight filters offered by the filter bar.
    pub fn presets() -> Vec<Filter> {
        FILTER_TOKENS.iter().map(|t| Filter::from_token(t)).collect()
    }

    pub fn from_token(token: &str) -> Filter {
        match token {
            "all" => Filter::All,
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            other => {
                if let Ok(p) = other.parse::<Priority>() {
                    Filter::Priority(p)
                } else if let Ok(c) = other.parse::<Category>() {
                    Filter::Category(c)
                } else {
                    Filter::Other(other.to_string())
                }
            }
        }
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Filter::from_token(s))
    }
}

/// Case-insensitive substring match against title or description.
/// An empty term matches everything.
pub fn matches_search(task: &Task, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
}

/// Derives the visible subset, preserving list order.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &Filter, term: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| filter.matches(t) && matches_search(t, term))
        .collect()
}
