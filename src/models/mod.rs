//! Data models for Libris

pub mod book;
pub mod ids;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookStatus, BookView};
pub use ids::{BookId, Isbn, LoanId, UserId};
pub use loan::{Loan, LoanView};
pub use user::{User, UserStatus};
