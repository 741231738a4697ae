use winnow::{Parser as _, binary::be_u32, error::EmptyError};

use crate::providers::shared::bmff::{BoxTarget, find_box};

/// The extension ID of the `uuid` box holding CR3's preview image.
pub const PRVW_UUID: [u8; 16] = [
    0xea, 0xf4, 0x2b, 0x5e, 0x1c, 0x98, 0x4b, 0x88, 0xb9, 0xfb, 0xb7, 0xdc, 0x40, 0x6e, 0x4d, 0x16,
];

/// Where the preview's length sits, from the start of the box's payload.
const LEN_AT: usize = 28;

/// Where the preview's JPEG data starts, from the start of the box's payload.
const DATA_AT: usize = 32;

/// Where the preview image lives in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThumbnailRange {
    /// Where the JPEG data starts in the file.
    pub offset: usize,

    /// How many bytes the JPEG takes up.
    pub len: usize,
}

impl ThumbnailRange {
    /// Grabs the preview's bytes out of the file.
    pub fn slice<'a>(&self, input: &'a [u8]) -> Option<&'a [u8]> {
        input.get(self.offset..self.offset.checked_add(self.len)?)
    }
}

/// Finds the embedded preview image.
///
/// Returns `None` when there's no preview box, or when the preview's stated
/// length runs past the end of the input.
pub fn find_thumbnail(input: &[u8]) -> Option<ThumbnailRange> {
    let payload: usize = find_box(input, BoxTarget::Uuid(PRVW_UUID))?;
    log::trace!("Found preview box! payload at: `{payload}`");

    let len_at = payload.checked_add(LEN_AT)?;
    let offset = payload.checked_add(DATA_AT)?;

    let len: u32 = be_u32
        .parse_next(&mut input.get(len_at..)?)
        .map_err(|_: EmptyError| log::warn!("Preview box is too short for its length."))
        .ok()?;
    let len = len as usize;

    match offset.checked_add(len) {
        Some(end) if end <= input.len() => Some(ThumbnailRange { offset, len }),
        _ => {
            log::warn!(
                "Preview says it's `{len}` bytes at `{offset}`, but the file is only `{}` bytes.",
                input.len()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PRVW_UUID, ThumbnailRange, find_thumbnail};
    use crate::util::logger;

    /// helper: a preview `uuid` box holding `jpeg`, which claims `stated_len`.
    fn preview_box(jpeg: &[u8], stated_len: u32) -> Vec<u8> {
        let mut payload = vec![0_u8; 28];
        payload.extend_from_slice(stated_len.to_be_bytes().as_slice());
        payload.extend_from_slice(jpeg);

        let mut v = (24 + payload.len() as u32).to_be_bytes().to_vec();
        v.extend_from_slice(b"uuid");
        v.extend_from_slice(PRVW_UUID.as_slice());
        v.extend(payload);
        v
    }

    #[test]
    fn finds_the_preview() {
        logger();

        let jpeg = [0xFF, 0xD8, 0xFF, 0xD9];
        let mut file = vec![0_u8, 0, 0, 8, b'f', b'r', b'e', b'e'];
        file.extend(preview_box(&jpeg, 4));

        let range = find_thumbnail(&file).expect("preview should be found");
        assert_eq!(range, ThumbnailRange { offset: 8 + 24 + 32, len: 4 });
        assert_eq!(range.slice(&file), Some(jpeg.as_slice()));
    }

    #[test]
    fn length_past_the_end_is_none() {
        logger();

        // the box itself is fine, but the length inside it isn't
        let file = preview_box(&[0xFF, 0xD8], 3);
        assert_eq!(find_thumbnail(&file), None);

        let file = preview_box(&[0xFF, 0xD8], u32::MAX);
        assert_eq!(find_thumbnail(&file), None);
    }

    #[test]
    fn no_preview_box() {
        logger();

        let mut file = 24_u32.to_be_bytes().to_vec();
        file.extend_from_slice(b"uuid");
        file.extend_from_slice([0x11; 16].as_slice());
        assert_eq!(find_thumbnail(&file), None);
    }
}
