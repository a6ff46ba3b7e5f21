//! Monthly material demand forecasting behind a small HTTP API.
//!
//! A request names a material; its history is read from `material_data`, a
//! seasonal ARIMA(1,1,1)(1,1,1,12) model is fitted from scratch, and ten
//! months of forecasts are returned together with a noisy echo of past years.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod logging;
