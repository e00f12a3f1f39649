//! Loan model, lifecycle state and due-date rules

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Default loan period applied when no due date is supplied
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Loan lifecycle state.
///
/// `Open` holds one availability decrement on the referenced book; the
/// decrement is released when the loan is returned or deleted. There is no
/// supported transition out of `Returned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum LoanState {
    Open = 0,
    Returned = 1,
}

impl LoanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanState::Open => "open",
            LoanState::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LoanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<i16> for LoanState {
    fn from(v: i16) -> Self {
        match v {
            1 => LoanState::Returned,
            _ => LoanState::Open,
        }
    }
}

impl std::str::FromStr for LoanState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(LoanState::Open),
            "returned" => Ok(LoanState::Returned),
            _ => Err(format!("Invalid loan state: {}", s)),
        }
    }
}

/// Due date applied when the caller does not supply one
pub fn default_due_date(loan_date: NaiveDate) -> NaiveDate {
    loan_date + Duration::days(LOAN_PERIOD_DAYS)
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub state: LoanState,
}

/// Loan with member and book display fields joined in.
///
/// The joined fields are `None` when the referenced record was deleted after
/// the loan was closed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub member_id: i32,
    pub member_name: Option<String>,
    pub book_id: i32,
    pub book_title: Option<String>,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub state: LoanState,
    pub is_overdue: bool,
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub member_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    /// Defaults to `loan_date` plus seven days
    pub due_date: Option<NaiveDate>,
}

/// Update loan request (full field replacement)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub member_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub state: LoanState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_defaults_to_one_week() {
        let loan_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            default_due_date(loan_date),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
    }

    #[test]
    fn due_date_default_crosses_month_boundary() {
        let loan_date = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        assert_eq!(
            default_due_date(loan_date),
            NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
        );
    }

    #[test]
    fn loan_state_round_trips() {
        assert_eq!(LoanState::from(0), LoanState::Open);
        assert_eq!(LoanState::from(1), LoanState::Returned);
        assert_eq!("open".parse::<LoanState>().unwrap(), LoanState::Open);
        assert_eq!("Returned".parse::<LoanState>().unwrap(), LoanState::Returned);
        assert!("pending".parse::<LoanState>().is_err());
    }

    #[test]
    fn loan_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LoanState::Open).unwrap(),
            "\"open\""
        );
        assert_eq!(
            serde_json::from_str::<LoanState>("\"returned\"").unwrap(),
            LoanState::Returned
        );
    }
}
