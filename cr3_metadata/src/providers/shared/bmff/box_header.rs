use winnow::{
    ModalResult, Parser as _,
    binary::{be_u32, be_u64},
    error::ContextError,
    token::take,
};

use crate::providers::shared::{
    bmff::{BoxSize, BoxType, UUID},
    desc,
};

/// A box's header says:
///
/// - what "type" it is (might be UUID)
/// - how large it is
/// - and, optionally, a UUID
#[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct BoxHeader {
    /// How long the header is.
    pub header_len: u8,

    /// How large the box is. This includes the header's size.
    pub box_size: BoxSize,

    /// The box's type.
    pub box_type: BoxType,
}

impl BoxHeader {
    /// Finds the next header in the file and parses it out.
    ///
    /// This function assumes the byte slice starts at a header. This means you
    /// should pass it a byte slice with the previous header's offset applied, or
    /// the file is starting from the beginning.
    ///
    /// Note that the input is mutated - skip `size - taken_bytes`.
    pub fn new(input: &mut &[u8]) -> ModalResult<BoxHeader, ContextError> {
        parse_header(input)
    }

    /// The box's total length, header included.
    ///
    /// Returns `None` for a box that claims to run until the end of the file,
    /// since we can't know its length from the header alone.
    pub fn total_len(&self) -> Option<u64> {
        match self.box_size {
            BoxSize::Small(n) => Some(n as u64),
            BoxSize::Large(n) => Some(n),
            BoxSize::Eof => None,
        }
    }

    /// Finds payload's length (which is everything after the header).
    ///
    /// This is optional since with an EOF case, we don't know how much is
    /// left. A declared length shorter than the header is also rejected.
    pub fn payload_len(&self) -> Option<u64> {
        self.total_len()?.checked_sub(self.header_len as u64)
    }

    /// The extension ID on a `uuid` box.
    pub fn uuid(&self) -> Option<&[u8; 16]> {
        match self.box_type {
            BoxType::Uuid(ref uuid) => Some(uuid),
            BoxType::Id(_) => None,
        }
    }
}

fn parse_header(input: &mut &[u8]) -> ModalResult<BoxHeader, ContextError> {
    // we're going to track the length of our box as we parse.
    //
    // the amount of bytes we took is given in the `BoxHeader`
    let start_len = input.len();

    let raw_size: u32 = be_u32.context(desc("box size")).parse_next(input)?;
    let raw_type: [u8; 4] = {
        let bytes: &[u8] = take(4_usize).context(desc("box type")).parse_next(input)?;
        let mut ty = [0_u8; 4];
        ty.copy_from_slice(bytes);
        ty
    };

    // parse the size into something more usable
    let size: BoxSize = match raw_size {
        // special case: we have a largesize to parse.
        //
        // it's a `u64` that comes right after the type
        1_u32 => BoxSize::Large(
            be_u64
                .context(desc("box size (large)"))
                .parse_next(input)
                .inspect_err(|e| log::error!("Failed to find large box size! err: {e}"))?,
        ),

        // special case: when it's zero, read to EOF (this is the end!)
        0_u32 => BoxSize::Eof,

        // for anything else, it's just a small box, so we use the raw size
        _ => BoxSize::Small(raw_size),
    };

    // now, we'll check if we've got a UUID on our hands
    let ty: BoxType = if raw_type == UUID {
        let bytes: &[u8] = take(16_usize)
            .context(desc("box UUID"))
            .parse_next(input)?;
        let mut uuid = [0_u8; 16];
        uuid.copy_from_slice(bytes);
        BoxType::Uuid(uuid)
    } else {
        BoxType::Id(raw_type)
    };

    Ok(BoxHeader {
        header_len: (start_len.saturating_sub(input.len())) as u8,
        box_size: size,
        box_type: ty,
    })
}

#[cfg(test)]
mod tests {
    use super::BoxHeader;
    use crate::providers::shared::bmff::{BoxSize, BoxType};

    #[test]
    fn small_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(16_u32.to_be_bytes().as_slice());
        bytes.extend_from_slice(b"CMT1");
        bytes.extend_from_slice([0_u8; 8].as_slice());

        let input = &mut bytes.as_slice();
        let header = BoxHeader::new(input).expect("header should parse");

        assert_eq!(header.header_len, 8);
        assert_eq!(header.box_size, BoxSize::Small(16));
        assert_eq!(header.box_type, BoxType::Id(*b"CMT1"));
        assert_eq!(header.payload_len(), Some(8));
        assert_eq!(input.len(), 8, "only the header is eaten");
    }

    #[test]
    fn large_uuid_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(1_u32.to_be_bytes().as_slice());
        bytes.extend_from_slice(b"uuid");
        bytes.extend_from_slice(40_u64.to_be_bytes().as_slice());
        bytes.extend_from_slice([7_u8; 16].as_slice());

        let header = BoxHeader::new(&mut bytes.as_slice()).expect("header should parse");

        assert_eq!(header.header_len, 32);
        assert_eq!(header.box_size, BoxSize::Large(40));
        assert_eq!(header.uuid(), Some(&[7_u8; 16]));
        assert_eq!(header.payload_len(), Some(8));
    }

    #[test]
    fn length_shorter_than_header_has_no_payload() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(4_u32.to_be_bytes().as_slice());
        bytes.extend_from_slice(b"free");

        let header = BoxHeader::new(&mut bytes.as_slice()).expect("header should parse");
        assert_eq!(header.payload_len(), None);
    }

    #[test]
    fn truncated_header_fails() {
        assert!(BoxHeader::new(&mut [0_u8, 0, 0, 24, b'f'].as_slice()).is_err());

        // a uuid box must carry all 16 bytes of its ID
        let mut bytes = Vec::new();
        bytes.extend_from_slice(32_u32.to_be_bytes().as_slice());
        bytes.extend_from_slice(b"uuid");
        bytes.extend_from_slice([0_u8; 10].as_slice());
        assert!(BoxHeader::new(&mut bytes.as_slice()).is_err());
    }
}
