//! Library half of the loan feature pipeline CLI: logging setup and the
//! chunked pipeline driver.

pub mod logging;
pub mod pipeline;
