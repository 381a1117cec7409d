//! Pure utility functions shared across the workspace

pub mod duration;
pub mod title;
