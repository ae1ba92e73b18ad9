#![doc = include_str!("../README.md")]

pub mod processor;
pub mod suggest;
pub mod trigger;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use processor::{InlineProcessor, ProcessorState};
pub use trigger::{TRIGGER_WORD, Trigger};
