//! Property-based tests for fingerprints and convergence

mod convergence;
