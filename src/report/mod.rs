pub mod markdown;

pub use markdown::{escape_cell, escape_url, render_report, sort_by_board_update};

/// Web URL of an organization's project board
pub fn board_url(org: &str, number: u32) -> String {
    format!("https://github.com/orgs/{}/projects/{}", org, number)
}
