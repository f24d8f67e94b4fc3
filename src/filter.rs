// Display filter for the task list

use crate::models::Task;
use std::convert::Infallible;
use std::str::FromStr;

/// Which slice of the task list to show
///
/// Any value other than the three known names is kept verbatim in `Other`
/// and shows every task, same as `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Other(String),
}

impl Filter {
    /// Whether a task belongs to this filter's view
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
            Filter::All | Filter::Other(_) => true,
        }
    }

    /// Order-preserving view of `tasks` under this filter
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
            Filter::Other(s) => s,
        }
    }
}

impl FromStr for Filter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Filter::from(s))
    }
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        match s {
            "all" => Filter::All,
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            other => Filter::Other(other.to_string()),
        }
    }
}

impl From<String> for Filter {
    fn from(s: String) -> Self {
        Filter::from(s.as_str())
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
