//! Age calculation.
//!
//! Calendar subtraction with borrow: when the day component goes negative,
//! one month is borrowed using the length of the month before the reference
//! date's month (and the one before that, if still negative); a negative
//! month component borrows a year.

use chrono::{Datelike, NaiveDate};
use shared::Age;

use super::errors::DomainError;

/// Full `{years, months, days}` age of someone born on `birth_date`, as of `today`
pub fn calculate_age(birth_date: NaiveDate, today: NaiveDate) -> Result<Age, DomainError> {
    if birth_date > today {
        return Err(DomainError::validation("Birth date cannot be in the future"));
    }

    let mut years = today.year() - birth_date.year();
    let mut months = today.month() as i32 - birth_date.month() as i32;
    let mut days = today.day() as i32 - birth_date.day() as i32;

    let (mut borrow_year, mut borrow_month) = (today.year(), today.month());
    while days < 0 {
        // A single borrow can fall short (Jan 31 -> Mar 1), so keep walking back
        months -= 1;
        (borrow_year, borrow_month) = previous_month(borrow_year, borrow_month);
        days += days_in_month(borrow_year, borrow_month) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Ok(Age {
        years: years as u32,
        months: months as u32,
        days: days as u32,
    })
}

/// Parse a `YYYY-MM-DD` birth date string and compute the age
pub fn calculate_age_from_str(birth_date: &str, today: NaiveDate) -> Result<Age, DomainError> {
    let parsed = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("Invalid birth date: {}", birth_date)))?;
    calculate_age(parsed, today)
}

/// Coarse age used for recipe age bounds: current year minus birth year
pub fn age_in_calendar_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - birth_date.year()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
