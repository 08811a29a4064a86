//! Helpers shared between the MPL front end crates

pub mod nom_helpers;
