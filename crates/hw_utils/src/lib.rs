//! Small shared utilities for the `hookwire` crates.
//!
//! - [`hash`]: hash containers with a fixed, process-independent hash state.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`ascii`]: allocation-free ASCII case folding helpers used by name lookup.
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod ascii;
pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
