use chrono::{Datelike, NaiveDate, Weekday};

/// Monday to Friday. Exchange holidays are not modelled.
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
