//! Unit tests for the tracking module.
