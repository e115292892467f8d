// tests/property/mod.rs

pub mod encoding_invariants_test;
pub mod index_laws_test;
