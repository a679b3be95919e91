use std::path::Path;

use serde::Serialize;

use crate::model::impacted::ImpactedItem;
use crate::model::window::ReportWindow;
use crate::report::sort_by_board_update;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ReportJson {
    pub org: String,
    pub project_number: u32,
    pub date: String,
    /// RFC 3339, local offset
    pub window_start: String,
    /// RFC 3339, local offset
    pub window_end: String,
    pub report: String,
    pub items: Vec<ImpactedItemJson>,
}

#[derive(Serialize)]
pub struct ImpactedItemJson {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub status: String,
    pub board_updated: String,
    pub changes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn item_to_json(item: &ImpactedItem) -> ImpactedItemJson {
    ImpactedItemJson {
        repo: item.repo.clone(),
        number: item.number,
        title: item.title.clone(),
        url: item.url.clone(),
        state: item.state.clone(),
        status: item.status.clone(),
        board_updated: item.board_updated.to_rfc3339(),
        changes: item.changes.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn report_to_json(
    items: &[ImpactedItem],
    window: &ReportWindow,
    org: &str,
    project_number: u32,
    report_path: &Path,
) -> ReportJson {
    ReportJson {
        org: org.to_string(),
        project_number,
        date: window.date().format("%Y-%m-%d").to_string(),
        window_start: window.local_start.to_rfc3339(),
        window_end: window.local_end.to_rfc3339(),
        report: report_path.display().to_string(),
        items: sort_by_board_update(items).into_iter().map(item_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Final line printed to stdout after a successful run
pub fn format_summary(report_path: &Path, count: usize) -> String {
    format!(
        "✅ Report generated: {} ({} changes found)",
        report_path.display(),
        count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::change::Change;
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn summary_line() {
        assert_eq!(
            format_summary(Path::new("board_report_2024-01-01.md"), 3),
            "✅ Report generated: board_report_2024-01-01.md (3 changes found)"
        );
    }

    #[test]
    fn json_shape() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let window = ReportWindow {
            local_start: tz.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            local_end: tz.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap(),
        };
        let item = ImpactedItem {
            repo: "widgets".into(),
            number: 5,
            title: "T".into(),
            url: "https://example.com/5".into(),
            state: "CLOSED".into(),
            status: "Done".into(),
            changes: vec![Change::Closed {
                actor: "alice".into(),
            }],
            board_updated: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(report_to_json(
            &[item],
            &window,
            "acme",
            7,
            Path::new("r.md"),
        ))
        .unwrap();

        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["window_start"], "2024-01-01T09:00:00+01:00");
        assert_eq!(json["items"][0]["state"], "CLOSED");
        assert_eq!(json["items"][0]["changes"][0], "🔴 Closed by @alice");
        assert_eq!(json["items"][0]["board_updated"], "2024-01-01T09:30:00+00:00");
    }

    #[test]
    fn json_items_follow_report_order() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let window = ReportWindow {
            local_start: tz.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            local_end: tz.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap(),
        };
        let item = |number: u64, hour: u32| ImpactedItem {
            repo: "widgets".into(),
            number,
            title: "T".into(),
            url: format!("https://example.com/{}", number),
            state: "OPEN".into(),
            status: "Todo".into(),
            changes: vec![Change::BoardUpdated],
            board_updated: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
        };
        let items = vec![item(1, 15), item(2, 10), item(3, 15), item(4, 9)];
        let json = report_to_json(&items, &window, "acme", 7, Path::new("r.md"));
        let numbers: Vec<u64> = json.items.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![4, 2, 1, 3]);
    }
}
