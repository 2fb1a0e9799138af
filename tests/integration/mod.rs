//! Library-level integration tests for search and replace.

mod properties;
mod replace;
mod search;
