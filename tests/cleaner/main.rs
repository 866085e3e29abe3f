// Test entry point for cleaner tests
// All cleaner integration tests are organized here

mod pipeline_tests;
mod rank_tests;
mod scan_tests;
