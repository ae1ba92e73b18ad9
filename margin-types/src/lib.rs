#![doc = include_str!("../README.md")]

pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod stream;

pub use config::*;
pub use editor::*;
pub use error::*;
pub use model::*;
pub use stream::*;
