use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive 7-day display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when `[start, end]` shares at least one day with the window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|day| *day <= self.end)
            .collect()
    }
}

/// Dates and timestamps that can be moved by whole weeks without overflowing.
pub trait WeekStep: Sized {
    fn checked_forward(self, by: Duration) -> Option<Self>;
    fn checked_back(self, by: Duration) -> Option<Self>;
}

impl WeekStep for NaiveDate {
    fn checked_forward(self, by: Duration) -> Option<Self> {
        self.checked_add_signed(by)
    }

    fn checked_back(self, by: Duration) -> Option<Self> {
        self.checked_sub_signed(by)
    }
}

impl WeekStep for NaiveDateTime {
    fn checked_forward(self, by: Duration) -> Option<Self> {
        self.checked_add_signed(by)
    }

    fn checked_back(self, by: Duration) -> Option<Self> {
        self.checked_sub_signed(by)
    }
}

/// Week arithmetic for the "current week" view. Weeks start on Sunday unless
/// configured otherwise. Callers pass the reference date; nothing here reads
/// the clock. Every operation returns `None` when the result would fall
/// outside the representable date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekNavigator {
    week_start: Weekday,
}

impl Default for WeekNavigator {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl WeekNavigator {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn first_weekday(&self) -> Weekday {
        self.week_start
    }

    /// Most recent day on or before `date` that falls on the week-start weekday.
    pub fn week_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        date.checked_sub_signed(Duration::days(i64::from(offset)))
    }

    pub fn week_end(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.window(date).map(|window| window.end)
    }

    pub fn days_in_week(&self, date: NaiveDate) -> Option<Vec<NaiveDate>> {
        self.window(date).map(|window| window.days())
    }

    pub fn window(&self, date: NaiveDate) -> Option<WeekWindow> {
        let start = self.week_start(date)?;
        let end = start.checked_add_signed(Duration::days(6))?;
        Some(WeekWindow { start, end })
    }

    pub fn window_at(&self, at: NaiveDateTime) -> Option<WeekWindow> {
        self.window(at.date())
    }

    /// Same instant one week later; time of day is preserved for timestamps.
    pub fn next_week<T: WeekStep>(&self, at: T) -> Option<T> {
        at.checked_forward(Duration::weeks(1))
    }

    pub fn previous_week<T: WeekStep>(&self, at: T) -> Option<T> {
        at.checked_back(Duration::weeks(1))
    }
}
