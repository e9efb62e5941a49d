mod cache_tests;
mod scan_tests;
