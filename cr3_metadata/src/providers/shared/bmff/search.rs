use crate::providers::shared::bmff::{BoxHeader, BoxType};

/// How many levels of boxes the search looks at, counting the top level.
///
/// A box nested inside `MAX_BOX_DEPTH - 1` containers can still be found.
/// Anything deeper can't.
///
/// BMFF itself has no limit, so a corrupted (or malicious) file could
/// otherwise claim enough nesting to exhaust the stack.
pub const MAX_BOX_DEPTH: u8 = 32;

/// What [`find_box`] is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxTarget {
    /// A box with this four-character type, like `CMT1`.
    Type([u8; 4]),

    /// A `uuid` box with this extension ID.
    Uuid([u8; 16]),
}

impl BoxTarget {
    fn matches(&self, header: &BoxHeader) -> bool {
        match self {
            BoxTarget::Type(ty) => header.box_type == BoxType::Id(*ty),
            BoxTarget::Uuid(uuid) => header.uuid() == Some(uuid),
        }
    }
}

/// Searches the boxes in `input` for one matching `target`, depth-first.
///
/// Siblings are visited in order, and `moov`/`uuid` boxes are searched
/// before the siblings that follow them.
///
/// On a match, this returns the offset of the box's payload (the byte after
/// its header) in `input`.
///
/// Malformed boxes end the search of the slice they're found in:
///
/// - a box claiming zero length, or a length shorter than its header
/// - a box whose end lies beyond the slice holding it
/// - a header that's cut short
///
/// Nothing past `input` is ever read.
pub fn find_box(input: &[u8], target: BoxTarget) -> Option<usize> {
    find_box_at_depth(input, target, 0)
}

fn find_box_at_depth(input: &[u8], target: BoxTarget, depth: u8) -> Option<usize> {
    if depth >= MAX_BOX_DEPTH {
        log::warn!("Box nesting went past `{MAX_BOX_DEPTH}` levels. Giving up on this branch.");
        return None;
    }

    let mut cursor: usize = 0;
    while cursor < input.len() {
        let rest = &mut &input[cursor..];
        let header = BoxHeader::new(rest)
            .inspect_err(|e| log::warn!("Box header at `{cursor}` was cut short. err: {e}"))
            .ok()?;

        let payload_start: usize = cursor.checked_add(header.header_len as usize)?;

        // a zero-length box would never move the cursor, and a box can't be
        // shorter than its own header
        let Some(payload_len) = header.payload_len() else {
            log::warn!(
                "Box at `{cursor}` has a bad length! Can't keep scanning. header: {header:?}"
            );
            return None;
        };
        let box_len: u64 = payload_len + header.header_len as u64;

        // the box must end inside the slice that holds it
        let Some(box_end) = usize::try_from(box_len)
            .ok()
            .and_then(|len| cursor.checked_add(len))
            .filter(|end| *end <= input.len())
        else {
            log::warn!(
                "Box at `{cursor}` claims `{box_len}` bytes, but only `{}` remain.",
                input.len() - cursor
            );
            return None;
        };

        log::trace!(
            "Found box at `{cursor}`! type: `{:?}`, len: `{box_len}`",
            header.box_type
        );

        if target.matches(&header) {
            return match payload_start < input.len() {
                true => Some(payload_start),
                false => {
                    log::warn!("Matching box at `{cursor}` has no room for a payload.");
                    None
                }
            };
        }

        if header.box_type.is_container() {
            let payload = &input[payload_start..box_end];
            if let Some(found) = find_box_at_depth(payload, target, depth + 1) {
                return payload_start.checked_add(found);
            }
        }

        cursor = box_end;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{BoxTarget, MAX_BOX_DEPTH, find_box};
    use crate::util::logger;

    /// helper: makes a box with a plain type.
    fn make_box(ty: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice((8 + payload.len() as u32).to_be_bytes().as_slice());
        v.extend_from_slice(ty.as_slice());
        v.extend_from_slice(payload);
        v
    }

    /// helper: makes a `uuid` box.
    fn make_uuid_box(uuid: &[u8; 16], payload: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice((24 + payload.len() as u32).to_be_bytes().as_slice());
        v.extend_from_slice(b"uuid");
        v.extend_from_slice(uuid.as_slice());
        v.extend_from_slice(payload);
        v
    }

    #[test]
    fn finds_top_level_box() {
        logger();

        let mut file = make_box(b"ftyp", b"crx \0\0\0\x01");
        file.extend(make_box(b"CMT1", [1_u8; 4].as_slice()));

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), Some(16 + 8));
        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT2")), None);
    }

    #[test]
    fn descends_into_containers() {
        logger();

        let cmt = make_box(b"CMT3", [3_u8; 4].as_slice());
        let canon_uuid = make_uuid_box(&[0x85; 16], &cmt);
        let moov = make_box(b"moov", &canon_uuid);

        let mut file = make_box(b"ftyp", b"crx ");
        file.extend(moov);

        // ftyp (12) + moov header (8) + uuid header (24) + CMT3 header (8)
        let expected = 12 + 8 + 24 + 8;
        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT3")), Some(expected));
        assert_eq!(file[expected], 3);

        // the uuid box itself is findable, too
        assert_eq!(
            find_box(&file, BoxTarget::Uuid([0x85; 16])),
            Some(12 + 8 + 24)
        );
    }

    #[test]
    fn miss_inside_container_continues_with_siblings() {
        logger();

        let mut file = make_box(b"moov", &make_box(b"trak", [0_u8; 4].as_slice()));
        let after = file.len();
        file.extend(make_box(b"CMT4", [4_u8; 2].as_slice()));

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT4")), Some(after + 8));
    }

    #[test]
    fn non_containers_are_not_searched() {
        logger();

        let file = make_box(b"trak", &make_box(b"CMT1", [0_u8; 4].as_slice()));
        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), None);
    }

    #[test]
    fn large_size_box() {
        logger();

        let mut file = Vec::new();
        file.extend_from_slice(1_u32.to_be_bytes().as_slice());
        file.extend_from_slice(b"CMT1");
        file.extend_from_slice(20_u64.to_be_bytes().as_slice());
        file.extend_from_slice([9_u8; 4].as_slice());

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), Some(16));
    }

    #[test]
    fn large_size_is_used_to_skip() {
        logger();

        let mut file = Vec::new();
        file.extend_from_slice(1_u32.to_be_bytes().as_slice());
        file.extend_from_slice(b"free");
        file.extend_from_slice(24_u64.to_be_bytes().as_slice());
        file.extend_from_slice([0_u8; 8].as_slice());
        file.extend(make_box(b"CMT2", [2_u8; 4].as_slice()));

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT2")), Some(24 + 8));
    }

    #[test]
    fn zero_length_box_stops_the_search() {
        logger();

        let mut file = Vec::new();
        file.extend_from_slice(0_u32.to_be_bytes().as_slice());
        file.extend_from_slice(b"free");
        file.extend(make_box(b"CMT1", [0_u8; 4].as_slice()));

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), None);
    }

    #[test]
    fn length_smaller_than_header_stops_the_search() {
        logger();

        let mut file = Vec::new();
        file.extend_from_slice(4_u32.to_be_bytes().as_slice());
        file.extend_from_slice(b"free");
        file.extend(make_box(b"CMT1", [0_u8; 4].as_slice()));

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), None);
    }

    #[test]
    fn box_past_the_end_is_not_found() {
        logger();

        // claims 100 bytes, but there are only 12
        let mut file = Vec::new();
        file.extend_from_slice(100_u32.to_be_bytes().as_slice());
        file.extend_from_slice(b"CMT1");
        file.extend_from_slice([0_u8; 4].as_slice());
        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), None);

        // same, but the target hides inside an overlong container
        let mut inner = make_box(b"CMT2", [0_u8; 4].as_slice());
        let mut moov = Vec::new();
        moov.extend_from_slice(500_u32.to_be_bytes().as_slice());
        moov.extend_from_slice(b"moov");
        moov.append(&mut inner);
        assert_eq!(find_box(&moov, BoxTarget::Type(*b"CMT2")), None);
    }

    #[test]
    fn child_cannot_escape_its_parent() {
        logger();

        // the child claims more than the parent's payload holds, even though
        // the whole file is long enough
        let mut child = Vec::new();
        child.extend_from_slice(64_u32.to_be_bytes().as_slice());
        child.extend_from_slice(b"CMT1");
        child.extend_from_slice([0_u8; 4].as_slice());

        let mut file = make_box(b"moov", &child);
        file.extend_from_slice([0_u8; 64].as_slice());

        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), None);
    }

    #[test]
    fn matching_box_without_payload_is_not_found() {
        logger();

        let file = make_box(b"CMT1", &[]);
        assert_eq!(find_box(&file, BoxTarget::Type(*b"CMT1")), None);
    }

    #[test]
    fn deep_nesting_fails_closed() {
        logger();

        let nest = |containers: usize| {
            let mut nested = make_box(b"CMT1", [0_u8; 4].as_slice());
            for _ in 0..containers {
                nested = make_box(b"moov", &nested);
            }
            nested
        };
        let limit = MAX_BOX_DEPTH as usize;

        // the deepest level we look at
        assert_eq!(
            find_box(&nest(limit - 1), BoxTarget::Type(*b"CMT1")),
            Some(limit * 8)
        );

        // one more is too far
        assert_eq!(find_box(&nest(limit), BoxTarget::Type(*b"CMT1")), None);
        assert_eq!(find_box(&nest(limit + 4), BoxTarget::Type(*b"CMT1")), None);

        // ...and shallow nesting is fine
        assert_eq!(find_box(&nest(4), BoxTarget::Type(*b"CMT1")), Some(5 * 8));
    }

    #[test]
    fn empty_and_tiny_inputs() {
        logger();

        assert_eq!(find_box(&[], BoxTarget::Type(*b"CMT1")), None);
        assert_eq!(find_box(&[0, 0, 0], BoxTarget::Uuid([0; 16])), None);
    }
}
