//! Library surface for statwatch: fetch, parse and evaluate host stats.

pub mod evaluate;
pub mod fetch;
pub mod monitor;
pub mod parse;
pub mod types;
