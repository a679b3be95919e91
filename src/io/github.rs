use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::model::config::FetchConfig;

/// GraphQL error type GitHub reports when the token lacks `read:project`
const INSUFFICIENT_SCOPES: &str = "INSUFFICIENT_SCOPES";

const USER_AGENT: &str = concat!("board-report/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(
        "insufficient GitHub token scopes. You need 'read:project' scope to access Project Boards. \
         Run: gh auth refresh -h github.com -s read:project"
    )]
    InsufficientScopes,
    #[error("organization '{0}' not found or no access")]
    OrganizationNotFound(String),
    #[error("project #{number} not found in org '{org}'")]
    ProjectNotFound { org: String, number: u32 },
    #[error("GitHub API returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("GraphQL errors: {0}")]
    GraphQl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from GitHub: {0}")]
    Decode(String),
}

impl FetchError {
    /// Connection trouble and server-side failures are worth another try
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_connect() || e.is_timeout(),
            FetchError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Something that can run one GraphQL request and hand back the JSON body.
pub trait GraphqlTransport {
    fn execute(&self, query: &str, variables: &Value) -> Result<Value, FetchError>;
}

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

/// Blocking HTTPS transport against the GitHub GraphQL endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    token: String,
    retries: u32,
}

impl HttpTransport {
    pub fn new(token: String, config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(HttpTransport {
            client,
            endpoint: config.endpoint.clone(),
            token,
            retries: config.retries,
        })
    }

    fn send(&self, body: &Value) -> Result<Value, FetchError> {
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(body)
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res.json()?)
    }
}

impl GraphqlTransport for HttpTransport {
    fn execute(&self, query: &str, variables: &Value) -> Result<Value, FetchError> {
        let body = json!({ "query": query, "variables": variables });
        with_retries(self.retries, || self.send(&body), |attempt| {
            std::thread::sleep(backoff(attempt))
        })
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(attempt.saturating_sub(1).min(6)))
}

/// Run `op`, retrying up to `retries` more times on retryable errors.
/// `pause` is called with the 1-based retry number before each retry.
pub fn with_retries<T>(
    retries: u32,
    mut op: impl FnMut() -> Result<T, FetchError>,
    pause: impl Fn(u32),
) -> Result<T, FetchError> {
    let mut attempt = 0;
    loop {
        match op() {
            Err(e) if attempt < retries && e.is_retryable() => {
                attempt += 1;
                tracing::warn!(error = %e, attempt, "request failed, retrying");
                pause(attempt);
            }
            result => return result,
        }
    }
}

// ---------------------------------------------------------------------------
// Board query
// ---------------------------------------------------------------------------

const QUERY_TEMPLATE: &str = r#"
query($org: String!, $number: Int!, $cursor: String) {
  organization(login: $org) {
    projectV2(number: $number) {
      title
      url
      items(first: __PAGE_SIZE__, after: $cursor) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          updatedAt
          createdAt
          fieldValues(first: __FIELD_VALUES__) {
            nodes {
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                field { ... on ProjectV2FieldCommon { name } }
              }
            }
          }
          content {
            ... on Issue {
              title
              number
              url
              state
              updatedAt
              repository { name }
              comments(last: __COMMENTS__) {
                nodes {
                  createdAt
                  bodyText
                  author { login }
                }
              }
              timelineItems(last: __TIMELINE_EVENTS__) {
                nodes {
                  __typename
                  ... on LabeledEvent { createdAt actor { login } label { name } }
                  ... on UnlabeledEvent { createdAt actor { login } label { name } }
                  ... on ClosedEvent { createdAt actor { login } }
                  ... on ReopenedEvent { createdAt actor { login } }
                  ... on AssignedEvent { createdAt actor { login } assignee { ... on User { login } } }
                  ... on UnassignedEvent { createdAt actor { login } assignee { ... on User { login } } }
                  ... on MilestonedEvent { createdAt actor { login } milestoneTitle }
                  ... on DemilestonedEvent { createdAt actor { login } milestoneTitle }
                  ... on RenamedTitleEvent { createdAt actor { login } previousTitle currentTitle }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// The board items query with the configured connection sizes filled in
pub fn board_query(limits: &FetchConfig) -> String {
    QUERY_TEMPLATE
        .replace("__PAGE_SIZE__", &limits.page_size.clamp(1, 100).to_string())
        .replace("__FIELD_VALUES__", &limits.field_values.to_string())
        .replace("__COMMENTS__", &limits.comments.to_string())
        .replace("__TIMELINE_EVENTS__", &limits.timeline_events.to_string())
}

/// One page of board items
struct Page {
    nodes: Vec<Value>,
    next_cursor: Option<String>,
}

/// Fetch every item on the board, following pagination to the end.
///
/// Items come back as the raw JSON nodes, in the order GitHub delivered them.
pub fn fetch_raw_items(
    transport: &dyn GraphqlTransport,
    org: &str,
    number: u32,
    limits: &FetchConfig,
) -> Result<Vec<Value>, FetchError> {
    let query = board_query(limits);
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_count = 0;

    tracing::info!("Scanning {} Project #{}...", org, number);

    loop {
        page_count += 1;
        tracing::info!("Fetching page {}...", page_count);

        let variables = json!({ "org": org, "number": number, "cursor": cursor });
        let response = transport.execute(&query, &variables)?;
        let page = parse_page(&response, org, number)?;

        items.extend(page.nodes);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::info!("Fetched {} total items.", items.len());
    Ok(items)
}

fn parse_page(response: &Value, org: &str, number: u32) -> Result<Page, FetchError> {
    let errors = response
        .get("errors")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if errors
        .iter()
        .any(|e| e.get("type").and_then(Value::as_str) == Some(INSUFFICIENT_SCOPES))
    {
        return Err(FetchError::InsufficientScopes);
    }

    let data = response.get("data").filter(|d| !d.is_null());
    let Some(data) = data else {
        return Err(FetchError::GraphQl(error_messages(&errors)));
    };

    let organization = data.get("organization").filter(|o| !o.is_null());
    let Some(organization) = organization else {
        return Err(FetchError::OrganizationNotFound(org.to_string()));
    };

    let project = organization.get("projectV2").filter(|p| !p.is_null());
    let Some(project) = project else {
        return Err(FetchError::ProjectNotFound {
            org: org.to_string(),
            number,
        });
    };

    if !errors.is_empty() {
        return Err(FetchError::GraphQl(error_messages(&errors)));
    }

    let items = project
        .get("items")
        .ok_or_else(|| FetchError::Decode("projectV2.items missing".into()))?;
    let nodes = items
        .get("nodes")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| FetchError::Decode("projectV2.items.nodes missing".into()))?;

    let has_next = items
        .pointer("/pageInfo/hasNextPage")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_cursor = if has_next {
        let cursor = items
            .pointer("/pageInfo/endCursor")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Decode("hasNextPage set without an endCursor".into()))?;
        Some(cursor.to_string())
    } else {
        None
    };

    Ok(Page { nodes, next_cursor })
}

fn error_messages(errors: &[Value]) -> String {
    if errors.is_empty() {
        return "response had no data".to_string();
    }
    errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ")
}
