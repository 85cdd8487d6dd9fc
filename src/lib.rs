#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod constants;
pub mod error;
pub mod export;
pub mod geometry;
pub mod height;
pub mod import;
mod logging;
pub mod models;
pub mod pipeline;
pub mod proximity;
pub mod settings;
pub mod spatial;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, ProcessReport};
pub use settings::ConversionSettings;
