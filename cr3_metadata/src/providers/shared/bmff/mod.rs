//! This module contains helpers for members of the ISO base media file
//! format (ISOBMFF), or just "BMFF."
//!
//! CR3 is one of those members. Its metadata lives in boxes nested inside
//! `moov` and vendor `uuid` boxes.

pub use box_header::BoxHeader;
pub use search::{BoxTarget, find_box};

mod box_header;
mod search;

/// The `moov` box, which holds the movie (and, for CR3, metadata) boxes.
pub const MOOV: [u8; 4] = *b"moov";

/// The `uuid` box type. Its real type follows as a 16-byte extension ID.
pub const UUID: [u8; 4] = *b"uuid";

/// A BMFF box's type.
#[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum BoxType {
    /// Uses a short ID. No UUID.
    Id([u8; 4]),

    /// The short ID was b'uuid', so the box's actual type is defined by this
    /// UUID.
    Uuid([u8; 16]),
}

impl BoxType {
    /// Whether the scanner is allowed to look inside boxes of this type.
    pub fn is_container(&self) -> bool {
        match self {
            BoxType::Id(id) => *id == MOOV,
            BoxType::Uuid(_) => true,
        }
    }
}

/// The size of a box.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum BoxSize {
    /// The box is small. u32::MAX is its maximum length.
    Small(u32),

    /// We got a big box of 64-bit size!
    Large(u64),

    /// This is the last box in the file, so it continues until the very end of
    /// the file.
    Eof,
}
