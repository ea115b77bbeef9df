//! Integration tests for vtdb live under `tests/`.
