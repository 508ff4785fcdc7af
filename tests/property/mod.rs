//! Property-based tests

mod reconcile;
