//! sea-orm entities for the invoicing schema plus small create/lookup helpers.

pub mod errors;
pub mod db;
pub mod account;
pub mod user;
pub mod client;
pub mod vendor;
pub mod invoice;
pub mod expense;

#[cfg(test)]
mod tests;
