//! Expense module: typed input and row models, repository abstraction, the
//! service, and the datatable columns/actions used to list expenses.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod columns;
pub mod actions;
pub mod service;

pub use service::ExpenseService;
