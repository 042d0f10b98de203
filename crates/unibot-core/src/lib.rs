#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod kind;
pub mod logging;
pub mod snapshot;
pub mod text;
pub mod traits;
pub mod types;

pub use error::{Error, GenerateError, Result};
