//! This crate fetches waste collection dates of the Abfallwirtschaft Zollernalbkreis and turns them
//! into collection records for a waste collection schedule host.
//!
//! The dates are read from <https://www.abfallkalender-zak.de>.

pub mod collection;
pub mod ics;
pub mod source;
