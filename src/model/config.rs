use serde::{Deserialize, Serialize};

/// Configuration from board-report.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Which project board to scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_org")]
    pub org: String,
    #[serde(default = "default_board_number")]
    pub number: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            org: default_org(),
            number: default_board_number(),
        }
    }
}

/// Standing meeting times, used when the command line gives none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// `HH:MM`, local time
    #[serde(default)]
    pub start: Option<String>,
    /// `HH:MM`, local time
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_prefix")]
    pub report_prefix: String,
    #[serde(default = "default_data_prefix")]
    pub data_prefix: String,
    #[serde(default = "default_true")]
    pub dump_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            report_prefix: default_report_prefix(),
            data_prefix: default_data_prefix(),
            dump_json: true,
        }
    }
}

/// GraphQL endpoint and the per-item history limits baked into the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// How many of the most recent timeline events each issue carries
    #[serde(default = "default_timeline_events")]
    pub timeline_events: u32,
    /// How many of the most recent comments each issue carries
    #[serde(default = "default_comments")]
    pub comments: u32,
    #[serde(default = "default_field_values")]
    pub field_values: u32,
    /// Extra attempts per page after a connection error or 5xx
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            timeline_events: default_timeline_events(),
            comments: default_comments(),
            field_values: default_field_values(),
            retries: default_retries(),
        }
    }
}

fn default_org() -> String {
    "cncf".to_string()
}

fn default_board_number() -> u32 {
    88
}

fn default_report_prefix() -> String {
    "board_report".to_string()
}

fn default_data_prefix() -> String {
    "board_data".to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.github.com/graphql".to_string()
}

/// GitHub caps connections at 100 nodes per page
fn default_page_size() -> u32 {
    100
}

fn default_timeline_events() -> u32 {
    20
}

fn default_comments() -> u32 {
    10
}

fn default_field_values() -> u32 {
    20
}

fn default_retries() -> u32 {
    3
}
