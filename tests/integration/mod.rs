//! Integration tests for the mirrorsync folder mirroring system


mod config_env;
mod convergence;
mod deletion_propagation;
mod fault_isolation;
mod lock_contention;
