//! CLI Commands

pub mod quote;
