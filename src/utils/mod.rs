//! Shared helpers that do not belong to a single component.

pub mod numeric;
