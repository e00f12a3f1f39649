//! Data models for Biblioteca

pub mod book;
pub mod loan;
pub mod member;
pub mod reservation;

// Re-export commonly used types
pub use book::Book;
pub use loan::{Loan, LoanDetails, LoanState};
pub use member::Member;
pub use reservation::{Reservation, ReservationDetails};
