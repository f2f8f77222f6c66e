//! Vineyard crop evapotranspiration and irrigation advice.
//!
//! The calculation lives in [`logic`]; [`logic::advise`] is the one entry
//! point that turns a day of weather into an [`models::EtcResult`].

pub mod cli;
pub mod config;
pub mod datasources;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;
pub mod report;

pub use error::{Result, VineSightError};
pub use logic::{advise, advise_with_reference, compute_irrigation_advice, AdviceReport, AdviceRequest};
