use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Every calendar day from `start` to `end` inclusive, ascending. Empty when
/// `start` is after `end`.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// The Sunday on or before `date`, or `None` past the start of the calendar.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(offset))
}

/// Sunday and Saturday of the week holding `date`. `None` when either end
/// falls outside the representable calendar.
pub fn week_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start = week_start(date)?;
    let end = start.checked_add_days(Days::new(6))?;
    Some((start, end))
}

/// Weekdays to drop from a range before summarizing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayFilter {
    excluded: Vec<Weekday>,
}

impl WeekdayFilter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn weekends() -> Self {
        Self {
            excluded: vec![Weekday::Sat, Weekday::Sun],
        }
    }

    pub fn keeps(&self, date: &NaiveDate) -> bool {
        !self.excluded.contains(&date.weekday())
    }

    pub fn apply(&self, dates: Vec<NaiveDate>) -> Vec<NaiveDate> {
        dates.into_iter().filter(|d| self.keeps(d)).collect()
    }
}
