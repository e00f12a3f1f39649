//! Book title model and copy-count arithmetic

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book title from the catalog, with copy counters.
///
/// Invariant: `0 <= available_copies <= total_copies`. The counters are only
/// mutated through the loan ledger and the copy-count edit rule below.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Create book request. New titles start with all copies available.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub author: String,
    #[validate(length(min = 1, max = 20))]
    pub isbn: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(range(min = 0))]
    pub total_copies: i32,
}

/// Update book request (full field replacement)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub author: String,
    #[validate(length(min = 1, max = 20))]
    pub isbn: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(range(min = 0))]
    pub total_copies: i32,
}

/// Number of copies of a title currently out on loan.
pub fn copies_on_loan(total_copies: i32, available_copies: i32) -> i32 {
    total_copies - available_copies
}

/// Recompute `available_copies` after `total_copies` changes.
///
/// The count of copies on loan is preserved; availability is clamped at zero
/// when the new total drops below it.
pub fn recompute_available(new_total: i32, on_loan: i32) -> i32 {
    (new_total - on_loan).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_total_preserves_copies_on_loan() {
        // 5 copies, 2 on loan, total edited down to 3
        let on_loan = copies_on_loan(5, 3);
        assert_eq!(on_loan, 2);
        assert_eq!(recompute_available(3, on_loan), 1);
    }

    #[test]
    fn available_clamps_at_zero() {
        // 4 copies, all on loan, total edited down to 2
        let on_loan = copies_on_loan(4, 0);
        assert_eq!(recompute_available(2, on_loan), 0);
    }

    #[test]
    fn growing_total_frees_new_copies() {
        let on_loan = copies_on_loan(2, 0);
        assert_eq!(recompute_available(6, on_loan), 4);
    }

    #[test]
    fn recomputed_available_never_exceeds_new_total() {
        for total in 0..6 {
            for available in 0..=total {
                let on_loan = copies_on_loan(total, available);
                for new_total in 0..6 {
                    let next = recompute_available(new_total, on_loan);
                    assert!(next >= 0);
                    assert!(next <= new_total);
                }
            }
        }
    }
}
