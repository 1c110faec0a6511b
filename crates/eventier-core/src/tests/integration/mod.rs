#![cfg(test)]

pub mod common;
pub mod concurrency_tests;
pub mod namespace_tests;
