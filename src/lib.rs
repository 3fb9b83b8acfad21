pub mod config;
pub mod logging;

// Core modules
pub mod job;
pub mod orchestrate;
pub mod retry;
