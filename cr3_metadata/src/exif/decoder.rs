use cr3_metadata_types::exif::{
    Endianness, FieldData, FieldTag,
    primitives::Primitive,
    tags::{Ifd0Tag, KnownTag},
};

use super::{Directory, ExifKey, ExifRecord, ExifRecords, ifd::Ifd};
use crate::{iptc::IptcRecords, xmp::XmpRecords};

/// Everything decoded from a directory chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedRecords {
    pub exif: ExifRecords,
    pub iptc: IptcRecords,
    pub xmp: XmpRecords,
}

/// Decodes every directory in the chain, starting at `head`.
///
/// Directories are visited in chain order. Inside each, IFDs are visited
/// depth-first, so a sub-IFD's records come right after its parent's.
///
/// Embedded XMP packets and IPTC blocks are decoded into their own record
/// sets instead of being kept as Exif records.
pub fn decode_chain(head: &Directory) -> DecodedRecords {
    let mut out = DecodedRecords::default();

    for directory in head.iter() {
        log::trace!("Decoding {:?} directory...", directory.role);
        for ifd in &directory.ifds {
            decode_ifd(ifd, directory.byte_order, &mut out);
        }
    }

    log::debug!(
        "Decoded chain! exif: `{}`, iptc: `{}`, xmp: `{}`",
        out.exif.len(),
        out.iptc.len(),
        out.xmp.len()
    );
    out
}

fn decode_ifd(ifd: &Ifd, byte_order: Endianness, out: &mut DecodedRecords) {
    for field in &ifd.fields {
        let field = match field {
            Ok(field) => field,
            Err(e) => {
                log::debug!("Skipping broken field in {:?} IFD. err: {e}", ifd.group);
                continue;
            }
        };

        match field.tag {
            FieldTag::Known(KnownTag::Ifd0Tag(Ifd0Tag::XMLPacket)) => {
                let Some(raw) = field.data.as_bytes() else {
                    log::warn!("XMP packet wasn't stored as bytes. Skipping it.");
                    continue;
                };
                match XmpRecords::parse(&raw) {
                    Ok(xmp) => out.xmp.merge(xmp),
                    Err(e) => log::warn!("Failed to decode XMP packet. err: {e}"),
                }
            }

            FieldTag::Known(KnownTag::Ifd0Tag(Ifd0Tag::IPTCNAA)) => {
                let Some(raw) = embedded_bytes(&field.data, byte_order) else {
                    log::warn!("IPTC block wasn't stored as bytes. Skipping it.");
                    continue;
                };
                match IptcRecords::parse(&raw) {
                    Ok(iptc) => out.iptc.merge(iptc),
                    Err(e) => log::warn!("Failed to decode IPTC block. err: {e}"),
                }
            }

            tag => out.exif.push(ExifRecord {
                key: ExifKey {
                    group: ifd.group,
                    tag,
                },
                data: field.data.clone(),
            }),
        }
    }

    for sub_ifd in &ifd.sub_ifds {
        decode_ifd(sub_ifd, byte_order, out);
    }
}

/// Gets the bytes of an embedded block.
///
/// Writers often store IPTC as a list of `Long`s, so those are turned back
/// into the bytes they came from.
fn embedded_bytes(data: &FieldData, byte_order: Endianness) -> Option<Vec<u8>> {
    if let Some(bytes) = data.as_bytes() {
        return Some(bytes);
    }

    let FieldData::List { list, .. } = data else {
        return match data {
            FieldData::Primitive(Primitive::Long(l)) => Some(to_bytes(*l, byte_order).to_vec()),
            _ => None,
        };
    };

    list.iter()
        .map(|p| match p {
            Primitive::Long(l) => Some(to_bytes(*l, byte_order)),
            _ => None,
        })
        .collect::<Option<Vec<[u8; 4]>>>()
        .map(|words| words.concat())
}

fn to_bytes(word: u32, byte_order: Endianness) -> [u8; 4] {
    match byte_order {
        Endianness::Little => word.to_le_bytes(),
        Endianness::Big => word.to_be_bytes(),
    }
}
