//! periodr - registry of academic periods and their coordinators
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod ui;
