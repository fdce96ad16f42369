// Library root: re-exports all modules so integration tests and host
// programs can drive the draft engine directly.

pub mod ai;
pub mod app;
pub mod compensatory;
pub mod config;
pub mod console;
pub mod db;
pub mod draft;
pub mod protocol;
pub mod valuation;
