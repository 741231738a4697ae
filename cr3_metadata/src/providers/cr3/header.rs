use crate::exif::{DirectoryHeader, Endianness};

/// CR3 files start with an `ftyp` box whose major brand is `crx `.
///
/// These are the bytes from the box type through the brand.
pub const CR3_SIGNATURE: [u8; 8] = *b"ftypcrx ";

/// The shortest input we'll check for a signature.
pub const MIN_SIGNATURE_LEN: usize = 16;

/// The TIFF magic number. CR3 directories reuse TIFF's layout.
pub const TIFF_MAGIC: u16 = 42;

/// Where the first IFD sits in a `CMT` box's payload, after its TIFF header.
const DIRECTORY_START: usize = 8;

/// Checks whether `input` starts like a CR3 file.
///
/// Only the first 16 bytes are looked at.
pub fn looks_like_cr3(input: &[u8]) -> bool {
    input.len() >= MIN_SIGNATURE_LEN && input.get(4..12) == Some(CR3_SIGNATURE.as_slice())
}

/// Describes one of the TIFF-style directories inside a CR3 file.
///
/// CR3 doesn't give its directories real headers, so this stands in for
/// one: the byte order is always little-endian, and the first IFD always
/// starts 8 bytes into the directory.
///
/// One header is usually reused for every directory in a file, moving it
/// along with [`Cr3Header::reposition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cr3Header {
    file_offset: usize,
}

impl Cr3Header {
    /// Makes a header for the directory starting at `file_offset`.
    pub const fn new(file_offset: usize) -> Self {
        Self { file_offset }
    }

    /// Moves this header to describe the directory at `file_offset`.
    pub fn reposition(&mut self, file_offset: usize) {
        log::trace!("Header moved from `{}` to `{file_offset}`.", self.file_offset);
        self.file_offset = file_offset;
    }

    /// The TIFF magic number, which CR3 directories always use.
    pub const fn magic(&self) -> u16 {
        TIFF_MAGIC
    }

    /// Where the directory's TIFF header starts in the file.
    pub const fn file_offset(&self) -> usize {
        self.file_offset
    }

    /// Reads a CR3 "header", which is just its signature.
    ///
    /// Returns whether the signature was there.
    pub fn read(&self, input: &[u8]) -> bool {
        looks_like_cr3(input)
    }

    /// Writing CR3 metadata isn't supported, so this is always empty.
    pub fn write(&self) -> Vec<u8> {
        Vec::new()
    }
}

impl DirectoryHeader for Cr3Header {
    fn byte_order(&self) -> Endianness {
        Endianness::Little
    }

    fn base_offset(&self) -> usize {
        self.file_offset
    }

    fn directory_offset(&self) -> usize {
        self.file_offset.saturating_add(DIRECTORY_START)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cr3Header, looks_like_cr3};
    use crate::exif::{DirectoryHeader as _, Endianness};

    #[test]
    fn signature() {
        let mut file = 24_u32.to_be_bytes().to_vec();
        file.extend_from_slice(b"ftypcrx ");
        file.extend_from_slice([0_u8; 4].as_slice());
        assert!(looks_like_cr3(&file));

        // only the brand differs
        let mut mp4 = file.clone();
        mp4[8..12].copy_from_slice(b"isom");
        assert!(!looks_like_cr3(&mp4));

        // right bytes, but too short
        assert!(!looks_like_cr3(&file[..15]));
        assert!(!looks_like_cr3(&[]));
    }

    #[test]
    fn pseudo_header() {
        let mut header = Cr3Header::new(100);
        assert_eq!(header.magic(), 42);
        assert_eq!(header.byte_order(), Endianness::Little);
        assert_eq!(header.base_offset(), 100);
        assert_eq!(header.directory_offset(), 108);

        header.reposition(4000);
        assert_eq!(header.file_offset(), 4000);
        assert_eq!(header.directory_offset(), 4008);

        assert!(header.write().is_empty());
    }
}
