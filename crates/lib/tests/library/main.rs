mod cache_flow_tests;
mod common;
