// src/output/mod.rs

//! Renders the text sections of an analysis and writes the final document.
//!
//! - [`structure`] turns walker entries into the path listing.
//! - [`contents`] classifies each file and renders its fragment.
//! - [`export`] assembles the downloadable document.
//! - [`writer`] sends it to stdout or a file.

pub mod contents;
pub mod export;
pub mod structure;
pub mod writer;

pub use contents::{classify_file, render_fragment, ContentRenderer};
pub use export::build_export;
pub use structure::structure_line;
