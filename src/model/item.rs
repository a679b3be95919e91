use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Login substituted for a missing or deleted user
pub const GHOST: &str = "ghost";

/// A single entry on the project board, as delivered by the GraphQL API.
///
/// Every field decodes leniently: a `null` or wrong-typed value becomes the
/// field's default instead of failing the whole item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    /// When the card was last moved or edited on the board
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    /// When the card was added to the board
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    /// Linked issue; `None` for drafts and for content the query does not select
    #[serde(default, deserialize_with = "non_empty_content")]
    pub content: Option<Content>,
    #[serde(default, deserialize_with = "lenient")]
    pub field_values: Nodes<FieldValue>,
}

/// The tracked issue behind a board item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub number: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    /// `OPEN` or `CLOSED`
    #[serde(default, deserialize_with = "lenient")]
    pub state: String,
    /// When the issue itself was last commented on, labeled, etc.
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Repository,
    /// Oldest first; only the most recent events are fetched
    #[serde(default, deserialize_with = "lenient")]
    pub timeline_items: Nodes<TimelineEvent>,
    /// Oldest first; only the most recent comments are fetched
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Nodes<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
}

/// GraphQL connection wrapper (`{ "nodes": [...] }`). A node that does not
/// decode is dropped; its siblings are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Nodes<T> {
    #[serde(default, deserialize_with = "lenient_nodes")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Nodes { nodes: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Nodes<T> {
    fn from(nodes: Vec<T>) -> Self {
        Nodes { nodes }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Login {
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
}

impl Login {
    pub fn new(login: &str) -> Self {
        Login {
            login: Some(login.to_string()),
        }
    }
}

fn login_or_ghost(user: &Option<Login>) -> String {
    user.as_ref()
        .and_then(|u| u.login.clone())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| GHOST.to_string())
}

/// A single-select field value. Other field kinds arrive as `{}` and
/// deserialize with both members empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldValue {
    /// Selected option name, e.g. `In Progress`
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub field: Option<FieldName>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldName {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

impl FieldValue {
    pub fn single_select(field: &str, value: &str) -> Self {
        FieldValue {
            name: Some(value.to_string()),
            field: Some(FieldName {
                name: Some(field.to_string()),
            }),
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_ref().and_then(|f| f.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub body_text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Login>,
}

impl Comment {
    pub fn author_login(&self) -> String {
        login_or_ghost(&self.author)
    }
}

// ---------------------------------------------------------------------------
// Timeline events
// ---------------------------------------------------------------------------

/// Kind-specific payload of a timeline event, keyed on `__typename`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Labeled { label: String },
    Unlabeled { label: String },
    Closed,
    Reopened,
    Assigned { assignee: String },
    Unassigned { assignee: String },
    Milestoned { title: String },
    Demilestoned { title: String },
    RenamedTitle { previous: String, current: String },
    Mentioned,
    Subscribed,
    /// Any typename not listed above, kept verbatim
    Other(String),
}

/// One entry of an issue's timeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TimelineNode")]
pub struct TimelineEvent {
    pub created_at: Option<String>,
    /// Acting user's login; `None` when the account is gone
    pub actor: Option<String>,
    pub kind: EventKind,
}

impl TimelineEvent {
    pub fn new(created_at: &str, actor: Option<&str>, kind: EventKind) -> Self {
        TimelineEvent {
            created_at: Some(created_at.to_string()),
            actor: actor.map(str::to_string),
            kind,
        }
    }

    pub fn actor_login(&self) -> &str {
        self.actor.as_deref().unwrap_or(GHOST)
    }
}

/// Wire shape of a timeline node: the union of every fragment the query selects
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineNode {
    #[serde(rename = "__typename", default, deserialize_with = "lenient")]
    typename: String,
    #[serde(default, deserialize_with = "lenient")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    actor: Option<Login>,
    #[serde(default, deserialize_with = "lenient")]
    label: Option<LabelName>,
    #[serde(default, deserialize_with = "lenient")]
    assignee: Option<Login>,
    #[serde(default, deserialize_with = "lenient")]
    milestone_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    previous_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    current_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LabelName {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

const UNKNOWN: &str = "unknown";

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl From<TimelineNode> for TimelineEvent {
    fn from(node: TimelineNode) -> Self {
        let label = || or_unknown(node.label.clone().and_then(|l| l.name));
        let assignee = || login_or_ghost(&node.assignee);
        let milestone = || or_unknown(node.milestone_title.clone());

        let kind = match node.typename.as_str() {
            "LabeledEvent" => EventKind::Labeled { label: label() },
            "UnlabeledEvent" => EventKind::Unlabeled { label: label() },
            "ClosedEvent" => EventKind::Closed,
            "ReopenedEvent" => EventKind::Reopened,
            "AssignedEvent" => EventKind::Assigned {
                assignee: assignee(),
            },
            "UnassignedEvent" => EventKind::Unassigned {
                assignee: assignee(),
            },
            "MilestonedEvent" => EventKind::Milestoned { title: milestone() },
            "DemilestonedEvent" => EventKind::Demilestoned { title: milestone() },
            "RenamedTitleEvent" => EventKind::RenamedTitle {
                previous: or_unknown(node.previous_title.clone()),
                current: or_unknown(node.current_title.clone()),
            },
            "MentionedEvent" => EventKind::Mentioned,
            "SubscribedEvent" => EventKind::Subscribed,
            other => EventKind::Other(other.to_string()),
        };

        TimelineEvent {
            created_at: node.created_at,
            actor: node
                .actor
                .and_then(|a| a.login)
                .filter(|l| !l.is_empty()),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient deserialization helpers
// ---------------------------------------------------------------------------

/// `null`, `{}` and anything that is not an object all mean "no tracked issue"
fn non_empty_content<'de, D>(deserializer: D) -> Result<Option<Content>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) if !map.is_empty() => Ok(Some(decode_or_default(Value::Object(map)))),
        _ => Ok(None),
    }
}

/// A `null` or wrong-typed value decodes as `T::default()`. Timestamps that
/// fall back to `None` here later become the sentinel instant.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(decode_or_default(Value::deserialize(deserializer)?))
}

fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "malformed value replaced by default");
        T::default()
    })
}

/// Decode a node list one element at a time, dropping `null` and
/// undecodable nodes.
fn lenient_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(nodes) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(nodes
        .into_iter()
        .filter(|node| !node.is_null())
        .filter_map(|node| match serde_json::from_value(node) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed node");
                None
            }
        })
        .collect())
}
