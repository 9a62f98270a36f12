/// Constraint behaviour of the catalog schema
pub mod constraint_tests;
