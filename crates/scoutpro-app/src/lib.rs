// Library root: configuration files, data loading, scout reports, and the
// backtest harness on top of the scoring core.

pub mod averages;
pub mod backtest;
pub mod config;
pub mod database;
pub mod report;
