//! Borrower and lender page controllers.
//!
//! Each page owns its form fields, a single [`status::ActionStatus`] and the
//! read models it displays. Actions run in three short phases (prepare,
//! await the contract, finish) so that no `RefCell` borrow spans an await.

pub mod borrower;
mod error;
pub mod lender;
pub mod status;
pub mod units;

#[cfg(test)]
mod testing;

pub use borrower::BorrowerPage;
pub use error::FormError;
pub use lender::LenderPage;
pub use status::{ActionStatus, Ticket};
