//! CR3 is Canon's raw image format, used since the EOS M50.
//!
//! It's built on ISO-BMFF, like MP4 and HEIF. However, its metadata isn't in
//! one Exif blob. Instead, four boxes (`CMT1` through `CMT4`) each hold a
//! TIFF-style directory, usually inside a Canon `uuid` box in `moov`:
//!
//! - `CMT1`: IFD 0
//! - `CMT2`: the Exif IFD
//! - `CMT3`: Canon's maker notes
//! - `CMT4`: GPS
//!
//! A preview JPEG sits in another `uuid` box. See [`find_thumbnail`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    MetadataProvider,
    exif::{Endianness, ExifRecords, Thumbnail},
    iptc::IptcRecords,
    xmp::XmpRecords,
};
use cr3_metadata_types::exif::tags::ExifIfdTag;

pub use self::{
    chain::{CMT_PREFIX, ROLES, build_chain, role_code},
    decode::{Cr3Metadata, decode},
    error::Cr3Error,
    header::{CR3_SIGNATURE, Cr3Header, looks_like_cr3},
    thumbnail::{PRVW_UUID, ThumbnailRange, find_thumbnail},
};

mod chain;
mod decode;
mod error;
mod header;
mod thumbnail;

/// A Canon CR3 file's metadata.
#[derive(Clone, Debug)]
pub struct Cr3 {
    byte_order: Endianness,
    exif: Arc<RwLock<ExifRecords>>,
    iptc: Arc<RwLock<IptcRecords>>,
    xmp: Arc<RwLock<XmpRecords>>,
}

impl Cr3 {
    /// The MIME type used for CR3 files.
    pub const MIME_TYPE: &'static str = "image/x-canon-cr3";

    /// The byte order of the file's directories.
    pub fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    /// The embedded preview image, if there is one.
    pub fn thumbnail(&self) -> Option<Thumbnail> {
        self.exif.read().thumbnail().cloned()
    }

    /// The image's width, from `Exif.Photo.PixelXDimension`.
    ///
    /// This is zero when the file doesn't say.
    pub fn pixel_width(&self) -> u32 {
        self.dimension(ExifIfdTag::PixelXDimension)
    }

    /// The image's height, from `Exif.Photo.PixelYDimension`.
    ///
    /// This is zero when the file doesn't say.
    pub fn pixel_height(&self) -> u32 {
        self.dimension(ExifIfdTag::PixelYDimension)
    }

    fn dimension(&self, tag: ExifIfdTag) -> u32 {
        self.exif
            .read()
            .get(tag)
            .and_then(|record| record.data.as_u32())
            .unwrap_or(0)
    }
}

impl MetadataProvider for Cr3 {
    type ConstructionError = Cr3Error;

    fn magic_number(input: &[u8]) -> bool {
        looks_like_cr3(input)
    }

    fn new(input: &impl AsRef<[u8]>) -> Result<Self, Self::ConstructionError> {
        let input: &[u8] = input.as_ref();

        if input.is_empty() {
            return Err(Cr3Error::EmptyInput);
        }

        if !looks_like_cr3(input) {
            log::warn!("The given file isn't a CR3.");
            return Err(Cr3Error::NotCr3);
        }

        let Cr3Metadata {
            byte_order,
            exif,
            iptc,
            xmp,
        } = decode(input)?;

        let Some(byte_order) = byte_order else {
            log::error!("CR3 file had no metadata directories. It might be an unsupported variant.");
            return Err(Cr3Error::NoMetadataDirectories);
        };

        Ok(Self {
            byte_order,
            exif: Arc::new(RwLock::new(exif)),
            iptc: Arc::new(RwLock::new(iptc)),
            xmp: Arc::new(RwLock::new(xmp)),
        })
    }

    fn mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }

    fn exif(&self) -> Option<Arc<RwLock<ExifRecords>>> {
        let exif = self.exif.read();
        if exif.is_empty() && exif.thumbnail().is_none() {
            log::trace!("No Exif is present in this file. Returning early.");
            return None;
        }
        Some(Arc::clone(&self.exif))
    }

    fn iptc(&self) -> Option<Arc<RwLock<IptcRecords>>> {
        if self.iptc.read().is_empty() {
            log::trace!("No IPTC is present in this file. Returning early.");
            return None;
        }
        Some(Arc::clone(&self.iptc))
    }

    fn xmp(&self) -> Option<Arc<RwLock<XmpRecords>>> {
        if self.xmp.read().is_empty() {
            log::trace!("No XMP is present in this file. Returning early.");
            return None;
        }
        Some(Arc::clone(&self.xmp))
    }
}
