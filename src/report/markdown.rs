use crate::model::impacted::ImpactedItem;
use crate::model::window::ReportWindow;
use crate::report::board_url;

/// Line break used inside a table cell
const CELL_BREAK: &str = "<br>";

const NO_CHANGES: &str = "*No changes detected in the specified timeframe.*";

/// Make free text safe to drop into a Markdown table cell: no column
/// breaks, no HTML tags.
pub fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '|' => out.push_str("&#124;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode the characters that would break a Markdown link inside a
/// table cell
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '|' => out.push_str("%7C"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            _ => out.push(c),
        }
    }
    out
}

/// Oldest board update first. The sort is stable, so ties keep input order.
pub fn sort_by_board_update(items: &[ImpactedItem]) -> Vec<&ImpactedItem> {
    let mut sorted: Vec<&ImpactedItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.board_updated);
    sorted
}

/// Render the change log. Items are shown oldest board update first; items
/// with equal timestamps keep the order they were given in.
pub fn render_report(
    items: &[ImpactedItem],
    window: &ReportWindow,
    org: &str,
    board_number: u32,
) -> String {
    let mut lines = vec![
        "# Project Board Change Log".to_string(),
        String::new(),
        format!("**Date:** {}", window.date().format("%Y-%m-%d")),
        format!(
            "**Window:** {} to {}",
            window.local_start.format("%H:%M"),
            window.local_end.format("%H:%M")
        ),
        format!(
            "**Project:** [{} Project #{}]({})",
            org,
            board_number,
            board_url(org, board_number)
        ),
        String::new(),
    ];

    if items.is_empty() {
        lines.push(format!("\n{}", NO_CHANGES));
    } else {
        lines.push("\n| Issue | Board Status | Actions Taken |".to_string());
        lines.push("|---|---|---|".to_string());

        lines.extend(sort_by_board_update(items).into_iter().map(render_row));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One table row: issue, board status, actions taken
pub fn render_row(item: &ImpactedItem) -> String {
    let issue_cell = format!(
        "**{}**{}[{}#{}]({})",
        escape_cell(&item.title),
        CELL_BREAK,
        escape_cell(&item.repo),
        item.number,
        escape_url(&item.url)
    );
    let status_cell = format!("**{}**", escape_cell(&item.status));
    let actions_cell = item
        .changes
        .iter()
        .map(|c| escape_cell(&c.to_string()))
        .collect::<Vec<_>>()
        .join(CELL_BREAK);
    format!("| {} | {} | {} |", issue_cell, status_cell, actions_cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::change::Change;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn window() -> ReportWindow {
        let tz = FixedOffset::east_opt(0).unwrap();
        ReportWindow {
            local_start: tz.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            local_end: tz.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap(),
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn impacted(number: u64, title: &str, board_updated: DateTime<Utc>) -> ImpactedItem {
        ImpactedItem {
            repo: "sandbox".into(),
            number,
            title: title.into(),
            url: format!("https://github.com/cncf/sandbox/issues/{}", number),
            state: "OPEN".into(),
            status: "In Review".into(),
            changes: vec![Change::BoardUpdated],
            board_updated,
        }
    }

    fn table_rows(doc: &str) -> Vec<&str> {
        doc.lines()
            .filter(|l| l.starts_with("| ") && !l.starts_with("| Issue |"))
            .collect()
    }

    #[test]
    fn escape_replaces_table_and_markup_chars() {
        assert_eq!(escape_cell("<script>|bad>"), "&lt;script&gt;&#124;bad&gt;");
        assert_eq!(escape_cell("plain & simple"), "plain & simple");
    }

    #[test]
    fn hostile_title_and_status_are_escaped() {
        let mut item = impacted(1, "<script>|bad>", at(10, 0));
        item.status = "Done | <b>".into();
        let row = render_row(&item);
        let cells: Vec<&str> = row.trim_matches('|').split(" | ").collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(
            cells[0].trim(),
            "**&lt;script&gt;&#124;bad&gt;**<br>[sandbox#1](https://github.com/cncf/sandbox/issues/1)"
        );
        assert_eq!(cells[1], "**Done &#124; &lt;b&gt;**");
    }

    #[test]
    fn hand_edited_url_cannot_break_the_row() {
        let mut item = impacted(1, "t", at(10, 0));
        item.url = "https://example.com/a|b<c>".into();
        let row = render_row(&item);
        assert_eq!(row.matches(" | ").count(), 2);
        assert!(row.contains("(https://example.com/a%7Cb%3Cc%3E)"));
    }

    #[test]
    fn descriptions_escaped_but_breaks_kept() {
        let mut item = impacted(1, "t", at(10, 0));
        item.changes = vec![
            Change::Labeled {
                label: "a|b".into(),
            },
            Change::Commented {
                author: "x".into(),
                snippet: "<img src=x>".into(),
                truncated: false,
            },
        ];
        let row = render_row(&item);
        assert!(row.ends_with(
            "| 🏷 Added label `a&#124;b`<br>💬 Comment (@x): \"&lt;img src=x&gt;\" |"
        ));
    }

    #[test]
    fn empty_report_has_notice_and_no_table() {
        let doc = render_report(&[], &window(), "cncf", 88);
        assert!(doc.contains(NO_CHANGES));
        assert!(!doc.contains("| Issue |"));
        assert!(table_rows(&doc).is_empty());
    }

    #[test]
    fn rows_sorted_oldest_first() {
        let items = vec![
            impacted(2, "Later", at(11, 0)),
            impacted(1, "Earlier", at(9, 0)),
        ];
        let doc = render_report(&items, &window(), "cncf", 88);
        let rows = table_rows(&doc);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Earlier"));
        assert!(rows[1].contains("Later"));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let items = vec![
            impacted(3, "Third", at(10, 0)),
            impacted(1, "First", at(10, 0)),
            impacted(2, "Second", at(10, 0)),
        ];
        let doc = render_report(&items, &window(), "cncf", 88);
        let rows = table_rows(&doc);
        assert!(rows[0].contains("Third"));
        assert!(rows[1].contains("First"));
        assert!(rows[2].contains("Second"));
    }

    #[test]
    fn full_report() {
        let mut first = impacted(453, "[Sandbox] <QHTTPX>", at(9, 0));
        first.changes = vec![
            Change::AddedToBoard,
            Change::Labeled {
                label: "review".into(),
            },
        ];
        let second = impacted(12, "Graduate project", at(11, 0));
        let doc = render_report(&[second, first], &window(), "cncf", 88);
        assert_snapshot!(doc, @r"
        # Project Board Change Log

        **Date:** 2024-01-01
        **Window:** 09:00 to 17:00
        **Project:** [cncf Project #88](https://github.com/orgs/cncf/projects/88)


        | Issue | Board Status | Actions Taken |
        |---|---|---|
        | **[Sandbox] &lt;QHTTPX&gt;**<br>[sandbox#453](https://github.com/cncf/sandbox/issues/453) | **In Review** | 🆕 **Added to Board**<br>🏷 Added label `review` |
        | **Graduate project**<br>[sandbox#12](https://github.com/cncf/sandbox/issues/12) | **In Review** | 🔄 Board Item Updated |
        ");
    }

    #[test]
    fn empty_report_layout() {
        let doc = render_report(&[], &window(), "acme", 3);
        assert_eq!(
            doc,
            "# Project Board Change Log\n\
             \n\
             **Date:** 2024-01-01\n\
             **Window:** 09:00 to 17:00\n\
             **Project:** [acme Project #3](https://github.com/orgs/acme/projects/3)\n\
             \n\
             \n\
             *No changes detected in the specified timeframe.*\n"
        );
    }
}
