//! Cross-module tests: specification scenarios and round-trip properties.

mod reader;
mod writer;
