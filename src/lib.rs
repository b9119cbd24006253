//! Benchlens - benchmark snapshots, regression analysis and reports
//!
//! This library turns BenchmarkDotNet result tables into per-class snapshot
//! documents, compares a current snapshot against a stored baseline, and
//! renders the outcome as HTML or JSON reports.

pub mod assembly;
pub mod cli;
pub mod config;
pub mod convert;
pub mod environment;
pub mod error;
pub mod ingest;
pub mod model;
pub mod regression;
pub mod report;
pub mod store;
pub mod units;
