use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::CoreError;

/// A closed calendar-date interval `[start, end]`.
///
/// Construction rejects inverted bounds, so an empty query result always means
/// "no tasks" and never "bad window".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// Sunday-to-Saturday week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let start = date.week(Weekday::Sun).first_day();
        let end = date.week(Weekday::Sun).last_day();
        Self { start, end }
    }

    /// The weeks covering the month of `date`, as a month calendar grid shows them.
    pub fn month_grid_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(date);
        Self {
            start: Self::week_of(first).start,
            end: Self::week_of(last).end,
        }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    #[inline]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        end >= self.start && start <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
