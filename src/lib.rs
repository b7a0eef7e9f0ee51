// Library surface for the binary and the headless/integration tests.
pub mod app_dirs;
pub mod compare;
pub mod config;
pub mod digits;
pub mod error;
pub mod practice;
pub mod report;
pub mod runtime;
pub mod stats;
pub mod storage;
pub mod validation;
