//! Endpoint catalog, grouped by resource.
//!
//! Every function returns an unlocked request; bind a `Secret` with
//! `locking` before rendering or executing it.

pub mod media;
pub mod posts;
pub mod stories;
