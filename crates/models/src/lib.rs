//! SeaORM entities for the catalog tables plus the field validation shared by
//! every writer.

pub mod errors;
pub mod db;
pub mod provider;
pub mod service;
pub mod account;

#[cfg(test)]
mod tests;
