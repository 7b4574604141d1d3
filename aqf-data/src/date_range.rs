use chrono::NaiveDate;
use std::mem::replace;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// The `days` consecutive dates following `last`.
    pub fn following(last: NaiveDate, days: usize) -> DateRange {
        let start = last.succ_opt().unwrap_or(NaiveDate::MAX);
        if days == 0 {
            // start > end yields nothing
            return DateRange(start, last);
        }
        let end = last
            .checked_add_days(chrono::Days::new(days as u64))
            .unwrap_or(NaiveDate::MAX);
        DateRange(start, end)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            match self.0.succ_opt() {
                Some(next) => Some(replace(&mut self.0, next)),
                None => {
                    // NaiveDate::MAX has no successor; shrink the range so iteration ends
                    let current = self.0;
                    self.1 = current.pred_opt()?;
                    Some(current)
                }
            }
        } else {
            None
        }
    }
}
