//! # `cr3_metadata_types`
//!
//! Plain data types used by `cr3_metadata` while decoding the tag directories
//! embedded in Canon CR3 files.
//!
//! These live in their own crate so that tag tables can grow without forcing
//! a rebuild of the parser itself.

#![forbid(unsafe_code)]

pub mod exif;
