// src/filtering/mod.rs

//! Decides which repository files are decoded and which are skipped.
//!
//! Files are classified by name alone, before any content is requested, so a
//! skipped file never costs a network round trip.

mod deny_list;

pub use deny_list::{is_doc_file, DenyList, BUILTIN_DENIED_SUFFIXES};
