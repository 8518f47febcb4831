//! Workspace-level integration test package. See `tests/golden.rs`.
