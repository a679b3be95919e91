use std::fmt;

/// One human-readable line in an item's "Actions Taken" cell.
///
/// Every variant carries exactly one category tag, so each change renders
/// on its own without context from its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    AddedToBoard,
    Labeled {
        label: String,
    },
    Unlabeled {
        label: String,
    },
    Closed {
        actor: String,
    },
    Reopened {
        actor: String,
    },
    Assigned {
        assignee: String,
        actor: String,
    },
    Unassigned {
        assignee: String,
        actor: String,
    },
    Milestoned {
        title: String,
    },
    Demilestoned {
        title: String,
    },
    Renamed {
        previous_title: String,
    },
    Commented {
        author: String,
        snippet: String,
        truncated: bool,
    },
    /// A timeline event with no dedicated template
    Other {
        event: String,
        actor: String,
    },
    /// The board card changed but nothing else explains why
    BoardUpdated,
}

impl Change {
    /// The category emoji that prefixes the rendered line
    pub fn tag(&self) -> &'static str {
        match self {
            Change::AddedToBoard => "🆕",
            Change::Labeled { .. } | Change::Unlabeled { .. } => "🏷",
            Change::Closed { .. } => "🔴",
            Change::Reopened { .. } => "🟢",
            Change::Assigned { .. } | Change::Unassigned { .. } => "👤",
            Change::Milestoned { .. } | Change::Demilestoned { .. } => "⛳",
            Change::Renamed { .. } => "✏️",
            Change::Commented { .. } => "💬",
            Change::Other { .. } => "❓",
            Change::BoardUpdated => "🔄",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.tag())?;
        match self {
            Change::AddedToBoard => write!(f, "**Added to Board**"),
            Change::Labeled { label } => write!(f, "Added label `{}`", label),
            Change::Unlabeled { label } => write!(f, "Removed label `{}`", label),
            Change::Closed { actor } => write!(f, "Closed by @{}", actor),
            Change::Reopened { actor } => write!(f, "Reopened by @{}", actor),
            Change::Assigned { assignee, actor } => {
                write!(f, "Assigned @{} by @{}", assignee, actor)
            }
            Change::Unassigned { assignee, actor } => {
                write!(f, "Unassigned @{} by @{}", assignee, actor)
            }
            Change::Milestoned { title } => write!(f, "Added to milestone **{}**", title),
            Change::Demilestoned { title } => write!(f, "Removed from milestone **{}**", title),
            Change::Renamed { previous_title } => write!(f, "Renamed from '{}'", previous_title),
            Change::Commented {
                author,
                snippet,
                truncated,
            } => {
                let marker = if *truncated { "..." } else { "" };
                write!(f, "Comment (@{}): \"{}{}\"", author, snippet, marker)
            }
            Change::Other { event, actor } => write!(f, "{} by @{}", event, actor),
            Change::BoardUpdated => write!(f, "Board Item Updated"),
        }
    }
}
