//! Object graph generator and benchmark utilities for deepcmp.
//!
//! This crate provides deterministic generation of people, addresses, pets
//! and friend cycles for benchmarking and property-based testing of
//! `deepcmp-core`.

pub mod generator;

pub use generator::{GeneratorConfig, Population, SizeTier, generate_population};
