// Library module for modsweep
// Re-exports modules for use in integration tests and the binary

pub mod cleaner;
pub mod ui;
