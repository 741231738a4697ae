//! # `cr3_metadata`
//!
//! A library to read metadata from Canon CR3 raw photos.
//!
//! It finds the file's four metadata directories (IFD 0, Exif, Canon maker
//! notes, and GPS), decodes them into Exif records, and picks out any IPTC
//! and XMP stored inside them. It also finds the embedded preview JPEG.
//!
//! ## Usage
//!
//! ```no_run
//! use cr3_metadata::{MetadataProvider as _, providers::cr3::Cr3};
//!
//! # fn load() -> Vec<u8> { Vec::new() }
//! let file: Vec<u8> = load();
//!
//! let cr3 = Cr3::new(&file).expect("should be a CR3 file");
//! if let Some(exif) = cr3.exif() {
//!     if let Some(model) = exif.read().get_by_name("Exif.Image.Model") {
//!         println!("shot on: {}", model.data);
//!     }
//! }
//! println!("{}x{}", cr3.pixel_width(), cr3.pixel_height());
//! ```
//!
//! The library only reads. Writing metadata back into CR3 files isn't
//! supported.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

use std::sync::Arc;

use parking_lot::RwLock;

pub use crate::{exif::ExifRecords, iptc::IptcRecords, xmp::XmpRecords};

pub mod exif;
pub mod iptc;
pub mod providers;
pub mod xmp;

/// A media file with support for various metadata formats.
///
/// Each file format is a "provider" - it'll yield its metadata through parsing.
pub trait MetadataProvider: Clone + core::fmt::Debug + Sized + Send + Sync {
    /// An error that can occur when calling [`MetadataProvider::new`].
    type ConstructionError: Clone
        + core::fmt::Debug
        + PartialEq
        + PartialOrd
        + core::error::Error
        + Sized
        + Send
        + Sync;

    /// Checks whether `input` looks like this provider's format.
    ///
    /// This only looks at the start of the file. It doesn't parse anything.
    fn magic_number(input: &[u8]) -> bool;

    /// Parses a media file for its metadata.
    fn new(input: &impl AsRef<[u8]>)
    -> Result<Self, <Self as MetadataProvider>::ConstructionError>;

    /// The format's MIME type.
    fn mime_type(&self) -> &'static str;

    /// Returns the file's Exif records.
    ///
    /// This returns `None` if Exif isn't supported, or if the file has no Exif
    /// metadata.
    fn exif(&self) -> Option<Arc<RwLock<ExifRecords>>> {
        None
    }

    /// Returns the file's IPTC records.
    ///
    /// This returns `None` if IPTC isn't supported, or if the file has no IPTC
    /// metadata.
    fn iptc(&self) -> Option<Arc<RwLock<IptcRecords>>> {
        None
    }

    /// Returns the file's XMP records.
    ///
    /// This returns `None` if XMP isn't supported, or if the file has no XMP
    /// metadata.
    fn xmp(&self) -> Option<Arc<RwLock<XmpRecords>>> {
        None
    }
}

/// Internal utility methods.
pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
