//! Command handlers for election-dumper.

pub mod dump;
