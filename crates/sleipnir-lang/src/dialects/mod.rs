//! Built-in dialects.

pub mod chpext;
