//! # Providers
//!
//! Providers represent a source of metadata, like a media file format.
//!
//! Each provider has a struct with a `MetadataProvider` implementation. This
//! allows a consistent interface for obtaining metadata from different media
//! sources.

pub mod cr3;

mod shared;
