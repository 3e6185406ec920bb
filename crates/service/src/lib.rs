//! Service layer for expenses on top of `models`.
//! - Repositories abstract persistence behind async traits (SeaORM and in-memory mocks).
//! - `ExpenseService` resolves public ids on save and renders the expense datatables.
//! - `view` holds the injected presentation collaborators.

pub mod errors;
pub mod auth;
pub mod view;
pub mod datatable;
pub mod expense;
#[cfg(test)]
pub mod test_support;
