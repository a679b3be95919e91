use crate::model::change::Change;
use crate::model::impacted::{ImpactedItem, NO_STATUS};
use crate::model::item::{Comment, Content, EventKind, FieldValue, RawItem, TimelineEvent};
use crate::model::window::TimeWindow;
use crate::ops::timestamp::{is_sentinel, parse_timestamp};
use crate::util::text::{single_line, truncate_graphemes};

/// Longest comment excerpt shown in the report, in grapheme clusters
pub const COMMENT_SNIPPET_LEN: usize = 400;

/// Name of the single-select field that holds the board column
const STATUS_FIELD: &str = "Status";

/// Work out what changed on each board item inside `window`.
///
/// Drafts are skipped, and items with nothing in the window are dropped.
/// Output keeps input order; the reporter does its own sorting.
pub fn classify(items: &[RawItem], window: &TimeWindow) -> Vec<ImpactedItem> {
    tracing::info!("Filtering items for changes...");

    let impacted: Vec<ImpactedItem> = items
        .iter()
        .filter_map(|item| classify_item(item, window))
        .collect();

    tracing::debug!(
        scanned = items.len(),
        impacted = impacted.len(),
        "classification done"
    );
    impacted
}

/// Classify a single board item. `None` means it is not part of the report.
pub fn classify_item(item: &RawItem, window: &TimeWindow) -> Option<ImpactedItem> {
    let content = item.content.as_ref()?;

    let board_updated = parse_timestamp(item.updated_at.as_deref());
    let board_created = parse_timestamp(item.created_at.as_deref());
    let issue_updated = parse_timestamp(content.updated_at.as_deref());

    // Every event and comment bumps one of these two, so nothing can be in
    // the window. A missing stamp proves nothing; scan the item in full.
    let both_known = !is_sentinel(board_updated) && !is_sentinel(issue_updated);
    if both_known && board_updated < window.start && issue_updated < window.start {
        return None;
    }

    let mut changes = Vec::new();

    if window.contains(board_created) {
        changes.push(Change::AddedToBoard);
    }

    changes.extend(timeline_changes(content, window));
    changes.extend(comment_changes(content, window));

    if changes.is_empty() && window.contains(board_updated) {
        changes.push(Change::BoardUpdated);
    }

    if changes.is_empty() {
        return None;
    }

    tracing::debug!(
        repo = %content.repository.name,
        number = content.number,
        changes = changes.len(),
        "item changed"
    );

    Some(ImpactedItem {
        repo: content.repository.name.clone(),
        number: content.number,
        title: content.title.clone(),
        url: content.url.clone(),
        state: content.state.clone(),
        status: resolve_status(&item.field_values.nodes),
        changes,
        board_updated,
    })
}

fn timeline_changes<'a>(
    content: &'a Content,
    window: &'a TimeWindow,
) -> impl Iterator<Item = Change> + 'a {
    content
        .timeline_items
        .nodes
        .iter()
        .filter(|event| event.created_at.is_some())
        .filter(move |event| window.contains(parse_timestamp(event.created_at.as_deref())))
        .filter_map(describe_event)
}

fn comment_changes<'a>(
    content: &'a Content,
    window: &'a TimeWindow,
) -> impl Iterator<Item = Change> + 'a {
    content
        .comments
        .nodes
        .iter()
        .filter(move |comment| window.contains(parse_timestamp(comment.created_at.as_deref())))
        .map(describe_comment)
}

/// Map a timeline event to its change line. Mentions and subscriptions are
/// noise and produce nothing; unknown kinds fall back to a generic line.
pub fn describe_event(event: &TimelineEvent) -> Option<Change> {
    let actor = event.actor_login().to_string();
    let change = match &event.kind {
        EventKind::Mentioned | EventKind::Subscribed => return None,
        EventKind::Labeled { label } => Change::Labeled {
            label: label.clone(),
        },
        EventKind::Unlabeled { label } => Change::Unlabeled {
            label: label.clone(),
        },
        EventKind::Closed => Change::Closed { actor },
        EventKind::Reopened => Change::Reopened { actor },
        EventKind::Assigned { assignee } => Change::Assigned {
            assignee: assignee.clone(),
            actor,
        },
        EventKind::Unassigned { assignee } => Change::Unassigned {
            assignee: assignee.clone(),
            actor,
        },
        EventKind::Milestoned { title } => Change::Milestoned {
            title: title.clone(),
        },
        EventKind::Demilestoned { title } => Change::Demilestoned {
            title: title.clone(),
        },
        EventKind::RenamedTitle { previous, .. } => Change::Renamed {
            previous_title: previous.clone(),
        },
        EventKind::Other(kind) => Change::Other {
            event: kind.clone(),
            actor,
        },
    };
    Some(change)
}

pub fn describe_comment(comment: &Comment) -> Change {
    let (snippet, truncated) = truncate_graphemes(&comment.body_text, COMMENT_SNIPPET_LEN);
    Change::Commented {
        author: comment.author_login(),
        snippet: single_line(snippet),
        truncated,
    }
}

/// Board column from the `Status` field; the last match wins.
pub fn resolve_status(field_values: &[FieldValue]) -> String {
    field_values
        .iter()
        .filter(|fv| fv.field_name() == Some(STATUS_FIELD))
        .filter_map(|fv| fv.name.clone())
        .last()
        .unwrap_or_else(|| NO_STATUS.to_string())
}
