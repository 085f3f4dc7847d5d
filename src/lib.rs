//! Root package: environment-driven configuration for the engine
//! binaries. The engine itself (Runner, strategies, resolver) lives in
//! the `opseq-*` workspace members; this crate only wires them to a
//! process environment.

pub mod config;
