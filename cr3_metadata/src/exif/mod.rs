//! Exif is a media metadata format primarily used by cameras.
//!
//! Unlike XMP, it's a structured binary format, so, while it's not as
//! "extensible," Exif does allow for proprietary extensions that are just
//! blobs of bytes.
//!
//! However, it's somewhat self-describing! Each field on an IFD
//! (Image File Directory) contains a tag ID, primitive data type, and count
//! saying how many primitives are stored. That means we can easily provide
//! proprietary extensions - all without knowing how they're structured.
//!
//! CR3 files don't carry one Exif blob. Instead, they store several TIFF-style
//! directories, each in its own box. Each is built into a [`Directory`], and
//! the directories are linked together into a chain that [`decode_chain`]
//! turns into records.

pub use cr3_metadata_types::exif::{Endianness, Field, FieldData, FieldTag, primitives::*};
pub use decoder::{DecodedRecords, decode_chain};
pub use records::{ExifKey, ExifRecord, ExifRecords, Thumbnail};

use winnow::{Stateful, binary::Endianness as WinnowEndianness};

use self::{
    error::{ExifFatalError, ExifFatalResult},
    ifd::{Ifd, parse_ifd_at},
};
use cr3_metadata_types::exif::ifd::IfdGroup;

mod decoder;
pub mod error;
pub mod ifd;
mod records;
mod value;

/// How many levels of sub-IFD pointers we'll follow.
///
/// Real files use two at most (IFD 0 -> Exif -> Interop).
pub const MAX_IFD_DEPTH: u8 = 4;

/// Describes where a directory lives inside a larger buffer.
///
/// Container formats that don't carry a real TIFF header implement this to
/// tell the directory builder how to read their directories.
pub trait DirectoryHeader {
    /// The byte order of everything in the directory.
    fn byte_order(&self) -> Endianness;

    /// Where the directory's data starts. All offsets inside the directory
    /// are relative to this.
    fn base_offset(&self) -> usize;

    /// Where the first IFD starts, as an absolute offset in the buffer.
    fn directory_offset(&self) -> usize;
}

/// One decoded directory, plus the rest of the chain after it.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub struct Directory {
    /// The group this directory was built as.
    pub role: IfdGroup,

    /// The byte order the directory was stored in.
    pub byte_order: Endianness,

    /// The directory's first IFD, then any IFDs it linked to (like IFD 1
    /// after IFD 0).
    pub ifds: Vec<Ifd>,

    /// The next directory in the chain.
    pub next: Option<Box<Directory>>,
}

impl Directory {
    /// Builds the directory described by `header` from `input`.
    ///
    /// The first IFD must parse. Anything it links to is best-effort.
    pub fn build(
        input: &[u8],
        role: IfdGroup,
        header: &impl DirectoryHeader,
    ) -> ExifFatalResult<Self> {
        let base = header.base_offset();
        let directory = header.directory_offset();

        let blob: &[u8] = input.get(base..).ok_or_else(|| {
            log::error!("Directory base is past the input! base: `{base}`");
            ExifFatalError::BaseOffsetOutOfBounds { offset: base }
        })?;
        let first_ifd: usize = directory.checked_sub(base).ok_or_else(|| {
            log::error!("Directory starts before its base! base: `{base}`, dir: `{directory}`");
            ExifFatalError::DirectoryBeforeBase { base, directory }
        })?;

        let byte_order = header.byte_order();
        let endianness = match byte_order {
            Endianness::Little => WinnowEndianness::Little,
            Endianness::Big => WinnowEndianness::Big,
        };

        let stream = &mut Stream {
            input: blob,
            state: State {
                current_ifd: role,
                endianness,
                blob,
                recursion_ct: 0,
                visited: Vec::new(),
            },
        };

        let (first, mut maybe_next_ifd_ptr) = parse_ifd_at(stream, first_ifd, role)
            .inspect_err(|e| log::error!("The first {role:?} IFD failed to parse! err: {e}"))?;
        log::trace!("Completed first IFD! ptr: {maybe_next_ifd_ptr:?}");

        let mut ifds: Vec<Ifd> = vec![first];
        let mut group = role;

        // only IFD 0 links to another IFD (IFD 1). for the rest, a next
        // pointer means nothing to us
        while let (Some(ptr), Some(next_group)) = (maybe_next_ifd_ptr, group.next_in_chain()) {
            log::trace!("At next IFD! index: `{ptr}`");
            match parse_ifd_at(stream, ptr as usize, next_group) {
                Ok((ifd, next_ptr)) => {
                    ifds.push(ifd);
                    maybe_next_ifd_ptr = next_ptr;
                    group = next_group;
                }
                Err(e) => {
                    log::warn!("Linked {next_group:?} IFD failed to parse. Skipping it. err: {e}");
                    break;
                }
            }
        }

        Ok(Self {
            role,
            byte_order,
            ifds,
            next: None,
        })
    }

    /// Walks the chain, starting with this directory.
    pub fn iter(&self) -> DirectoryIter<'_> {
        DirectoryIter { next: Some(self) }
    }

    /// How many directories are in the chain, including this one.
    pub fn chain_len(&self) -> usize {
        self.iter().count()
    }
}

/// Iterates over a chain of directories. See [`Directory::iter`].
#[derive(Clone, Debug)]
pub struct DirectoryIter<'a> {
    next: Option<&'a Directory>,
}

impl<'a> Iterator for DirectoryIter<'a> {
    type Item = &'a Directory;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next.as_deref();
        Some(current)
    }
}

/*
*
*
*
  NOTE:

  all parsers from here on out generally require knowing the endianness. so,
  it's stored inside a custom state struct + a stream wrapper.

  this allows us to easily pass our state between pieces of the parser, all
  without globals or other nasty stuff
*
*
*
*
*/

#[derive(Clone, Debug)]
struct State<'a> {
    /// The group of the IFD being parsed. Tags resolve against it.
    current_ifd: IfdGroup,
    endianness: WinnowEndianness,

    /// The directory's data. Offsets are relative to its start.
    blob: &'a [u8],

    /// How many sub-IFD pointers deep we are.
    recursion_ct: u8,

    /// Offsets of every IFD parsed so far.
    visited: Vec<usize>,
}

/// A stream of the blob wrapped with our endianness.
type Stream<'s> = Stateful<&'s [u8], State<'s>>;

/// A pointer in the blob specifying the next IFD, if any.
type NextIfdPointer = Option<u32>;

#[cfg(test)]
mod tests {
    use cr3_metadata_types::exif::{
        Endianness, FieldData, FieldTag,
        ifd::IfdGroup,
        primitives::Primitive,
        tags::{Ifd0Tag, KnownTag},
    };

    use super::{Directory, DirectoryHeader, error::ExifFatalError};
    use crate::util::logger;

    struct TestHeader {
        base: usize,
        dir: usize,
    }

    impl DirectoryHeader for TestHeader {
        fn byte_order(&self) -> Endianness {
            Endianness::Little
        }

        fn base_offset(&self) -> usize {
            self.base
        }

        fn directory_offset(&self) -> usize {
            self.dir
        }
    }

    /// helper: an IFD with one inline `Short` and the given next pointer.
    fn one_short_ifd(tag: u16, value: u16, next: u32) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(1_u16.to_le_bytes().as_slice());
        v.extend_from_slice(tag.to_le_bytes().as_slice());
        v.extend_from_slice(3_u16.to_le_bytes().as_slice());
        v.extend_from_slice(1_u32.to_le_bytes().as_slice());
        v.extend_from_slice(value.to_le_bytes().as_slice());
        v.extend_from_slice([0_u8; 2].as_slice());
        v.extend_from_slice(next.to_le_bytes().as_slice());
        v
    }

    #[test]
    fn builds_relative_to_base() {
        logger();

        // junk, then a TIFF header, then IFD 0 at relative offset 8
        let mut input = vec![0xAB_u8; 5];
        input.extend_from_slice(b"II\x2a\x00\x08\x00\x00\x00");
        input.extend(one_short_ifd(256, 1920, 0));

        let dir = Directory::build(&input, IfdGroup::_0, &TestHeader { base: 5, dir: 13 })
            .expect("directory should build");

        assert_eq!(dir.role, IfdGroup::_0);
        assert_eq!(dir.ifds.len(), 1);
        assert_eq!(
            dir.ifds[0].fields[0],
            Ok(cr3_metadata_types::exif::Field {
                tag: FieldTag::Known(KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth)),
                data: FieldData::Primitive(Primitive::Short(1920)),
            })
        );
        assert_eq!(dir.chain_len(), 1);
    }

    #[test]
    fn ifd0_links_to_ifd1_once() {
        logger();

        let mut input = b"II\x2a\x00\x08\x00\x00\x00".to_vec();
        let ifd1_at = 8 + 18;
        input.extend(one_short_ifd(256, 6000, ifd1_at));

        // IFD 1 claims another IFD follows. it shouldn't be read
        input.extend(one_short_ifd(259, 6, 8));

        let dir = Directory::build(&input, IfdGroup::_0, &TestHeader { base: 0, dir: 8 })
            .expect("directory should build");
        assert_eq!(dir.ifds.len(), 2);
        assert_eq!(dir.ifds[1].group, IfdGroup::_1);
    }

    #[test]
    fn other_roles_ignore_next_pointers() {
        logger();

        let mut input = b"II\x2a\x00\x08\x00\x00\x00".to_vec();
        input.extend(one_short_ifd(0x0010, 1, 26));
        input.extend(one_short_ifd(0x0010, 2, 0));

        let dir = Directory::build(&input, IfdGroup::Canon, &TestHeader { base: 0, dir: 8 })
            .expect("directory should build");
        assert_eq!(dir.ifds.len(), 1);
    }

    #[test]
    fn bad_headers_fail() {
        logger();

        let input = [0_u8; 16];
        assert_eq!(
            Directory::build(&input, IfdGroup::_0, &TestHeader { base: 17, dir: 25 }),
            Err(ExifFatalError::BaseOffsetOutOfBounds { offset: 17 })
        );
        assert_eq!(
            Directory::build(&input, IfdGroup::_0, &TestHeader { base: 8, dir: 4 }),
            Err(ExifFatalError::DirectoryBeforeBase {
                base: 8,
                directory: 4
            })
        );
        assert_eq!(
            Directory::build(&input, IfdGroup::_0, &TestHeader { base: 0, dir: 8 }),
            Err(ExifFatalError::IfdHadZeroFields)
        );
    }

    #[test]
    fn iterates_in_link_order() {
        let leaf = |role| Directory {
            role,
            byte_order: Endianness::Little,
            ifds: Vec::new(),
            next: None,
        };

        let mut head = leaf(IfdGroup::_0);
        let mut exif = leaf(IfdGroup::Exif);
        exif.next = Some(Box::new(leaf(IfdGroup::Gps)));
        head.next = Some(Box::new(exif));

        let roles: Vec<IfdGroup> = head.iter().map(|d| d.role).collect();
        assert_eq!(roles, [IfdGroup::_0, IfdGroup::Exif, IfdGroup::Gps]);
        assert_eq!(head.chain_len(), 3);
    }
}
