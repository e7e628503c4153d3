//! End-to-end renderer bootstrap scenarios
