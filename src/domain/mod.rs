//! Domain types for dexpull
//!
//! This module contains the core domain types:
//! - EntityLocator: name + address of one unit of work
//! - Record: one fully enriched output unit, plus the completeness predicate
//! - BuildOutcome: tagged result of building a record (Success, Failure)

pub mod locator;
pub mod outcome;
pub mod record;

pub use locator::EntityLocator;
pub use outcome::BuildOutcome;
pub use record::{Record, Sprites, is_complete, record_name};
