//! msxpack - MSX memory-pack compiler
//!
//! This crate compiles hierarchical slot/bank hardware descriptions into the
//! fixed-layout binary pack files consumed by an MSX emulator's
//! memory-mapping subsystem.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,

    // All warnings must be fixed
    warnings,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]

pub mod api;
pub mod exceptions;
pub mod exit_codes;
pub mod logger;
pub mod msx;
pub mod version;

// Re-export main API functions
pub use api::{build_extension_pack, build_machine_pack, build_pack};
pub use exceptions::PackError;

// Re-export format-specific types for advanced usage
pub use msx::{BlockKind, RomIndex, SlotAddress};
