//! Infrastructure layer - Sampling, evaluation services and output

pub mod experiment;
pub mod export;
pub mod logging;
pub mod services;
