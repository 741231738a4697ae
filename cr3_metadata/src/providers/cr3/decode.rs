use super::{Cr3Error, chain::build_chain, thumbnail::find_thumbnail};
use crate::{
    exif::{DecodedRecords, Endianness, ExifRecords, Thumbnail, decode_chain},
    iptc::IptcRecords,
    xmp::XmpRecords,
};

/// Everything read from a CR3 file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cr3Metadata {
    /// The byte order of the file's directories.
    ///
    /// This is `None` when no directories were found.
    pub byte_order: Option<Endianness>,

    /// Exif records, plus the preview image when there is one.
    pub exif: ExifRecords,
    pub iptc: IptcRecords,
    pub xmp: XmpRecords,
}

/// Reads the metadata out of a CR3 file.
///
/// This doesn't check the file's signature. Use
/// [`looks_like_cr3`](super::looks_like_cr3) first, or construct a
/// [`Cr3`](super::Cr3), which does both.
///
/// When the file has no metadata directories we can read, this returns the
/// default (empty) [`Cr3Metadata`].
pub fn decode(input: &[u8]) -> Result<Cr3Metadata, Cr3Error> {
    if input.is_empty() {
        log::error!("Can't decode an empty CR3 file!");
        return Err(Cr3Error::EmptyInput);
    }

    let Some(head) = build_chain(input) else {
        log::warn!("No metadata directories in this CR3 file.");
        return Ok(Cr3Metadata::default());
    };

    let byte_order = head.byte_order;
    let DecodedRecords {
        mut exif,
        iptc,
        xmp,
    } = decode_chain(&head);

    match find_thumbnail(input).and_then(|range| Some((range, range.slice(input)?))) {
        Some((range, data)) => {
            log::debug!("Found `{}` byte preview at `{}`.", range.len, range.offset);
            exif.set_thumbnail(Thumbnail {
                offset: range.offset,
                data: data.to_vec(),
            });
        }
        None => log::trace!("No preview image in this file."),
    }

    Ok(Cr3Metadata {
        byte_order: Some(byte_order),
        exif,
        iptc,
        xmp,
    })
}

#[cfg(test)]
mod tests {
    use super::{Cr3Metadata, decode};
    use crate::{providers::cr3::Cr3Error, util::logger};

    #[test]
    fn empty_input_is_misuse() {
        logger();
        assert_eq!(decode(&[]), Err(Cr3Error::EmptyInput));
    }

    #[test]
    fn short_input_is_empty_metadata() {
        logger();

        for len in 1..16 {
            let input = vec![0xAA_u8; len];
            assert_eq!(decode(&input), Ok(Cr3Metadata::default()));
        }
    }
}
