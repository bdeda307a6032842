//! BRVM CLI library: data loading and report rendering.
//!
//! The binary in `main.rs` wires these to `brvm_core::analysis`.

pub mod loader;
pub mod render;

pub use loader::{load_dir, load_file, LoadError, LoadReport};
pub use render::{render, OutputFormat};
