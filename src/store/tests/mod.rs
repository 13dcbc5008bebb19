//! Unit tests for the store connector.
