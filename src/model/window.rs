use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Closed interval `[start, end]` on the UTC timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeWindow { start, end }
    }

    /// Both ends inclusive
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// The report window as the user asked for it, plus its UTC form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    /// Start in the user's local offset
    pub local_start: DateTime<FixedOffset>,
    /// End in the user's local offset
    pub local_end: DateTime<FixedOffset>,
}

impl ReportWindow {
    pub fn utc(&self) -> TimeWindow {
        TimeWindow::new(
            self.local_start.with_timezone(&Utc),
            self.local_end.with_timezone(&Utc),
        )
    }

    /// Calendar date the report is for
    pub fn date(&self) -> NaiveDate {
        self.local_start.date_naive()
    }
}
