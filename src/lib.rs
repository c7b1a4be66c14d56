// ABOUTME: Library root for monkeyterm — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod config;
pub mod controller;
pub mod engine;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod transcript;
pub mod tui;
