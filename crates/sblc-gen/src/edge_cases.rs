//! Generated-code tests for sblc-gen.
//!
//! The Python output is checked structurally: the right forms, tables,
//! and backtracking scaffolding must appear, in an order that imports
//! cleanly (definitions before the tuples that reference them).
