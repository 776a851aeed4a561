//! Task progress and recurrence enumerations.

use serde::{Deserialize, Serialize};

/// Progress of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// In progress.
    Ongoing,
    /// Finished.
    Done,
}

text_enum!(TaskStatus, "task status", {
    Todo => "todo",
    Ongoing => "ongoing",
    Done => "done",
});

/// How often a task recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodic {
    /// One-off.
    #[default]
    None,
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

text_enum!(Periodic, "periodic", {
    None => "none",
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
    Yearly => "yearly",
});
