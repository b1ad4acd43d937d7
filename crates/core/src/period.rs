use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Smallest inclusive range covering every date, or `None` for no dates.
    pub fn spanning<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Option<Self> {
        dates.into_iter().fold(None, |range, date| match range {
            None => Some(DateRange::new(date, date)),
            Some(r) => Some(DateRange::new(r.start.min(date), r.end.max(date))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_range_display() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 12, 31));
        assert_eq!(range.to_string(), "2024-01-01 to 2024-12-31");
    }

    #[test]
    fn spanning_ignores_input_order() {
        let range = DateRange::spanning([d(2024, 3, 5), d(2024, 1, 2), d(2024, 2, 29)]).unwrap();
        assert_eq!(range, DateRange::new(d(2024, 1, 2), d(2024, 3, 5)));
    }

    #[test]
    fn spanning_single_and_empty() {
        assert_eq!(
            DateRange::spanning([d(2024, 1, 1)]),
            Some(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)))
        );
        assert_eq!(DateRange::spanning(std::iter::empty()), None);
    }
}
