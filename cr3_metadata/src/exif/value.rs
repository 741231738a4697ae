use winnow::{
    Parser,
    binary::{Endianness as WinnowEndianness, f32, f64, i8, i16, i32, u8, u16, u32},
    combinator::repeat,
    error::EmptyError,
};

use super::{
    Stream,
    error::{ExifFieldError, ExifFieldResult},
};
use cr3_metadata_types::exif::{Field, FieldData, FieldTag, primitives::*, tags::KnownTag};

/// Parses out one value from an IFD.
pub fn parse_value(input: &mut Stream) -> ExifFieldResult {
    let endianness = input.state.endianness;

    // grab tag (2 bytes)
    let tag: FieldTag = {
        let raw_tag: u16 = u16(endianness)
            .parse_next(&mut input.input)
            .map_err(|_: EmptyError| ExifFieldError::FieldNoTag)?;

        KnownTag::try_from((input.state.current_ifd, raw_tag))
            .map(FieldTag::Known)
            .unwrap_or(FieldTag::Unknown(raw_tag))
    };

    // type (2 bytes)
    let ty: PrimitiveTy = {
        let raw_ty: u16 = u16(endianness)
            .parse_next(&mut input.input)
            .map_err(|_: EmptyError| ExifFieldError::FieldNoTy)?;

        PrimitiveTy::try_from(raw_ty).map_err(|_| {
            log::warn!("Encountered unknown field type: `{raw_ty}`");
            ExifFieldError::FieldUnknownType { got: raw_ty }
        })?
    };

    // count (4 bytes)
    let count: u32 = u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoCount)?;

    // grab the value or offset (4 bytes. we'll handle deciding in a sec)
    let value_or_offset: u32 = u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoOffsetOrValue)?;

    log::trace!(
        "(field info...
    tag: {tag},
    ty: {ty:?},
    count: {count},
    value or offset: {value_or_offset}
)"
    );

    // warn if the real type isn't an expected type
    if let FieldTag::Known(known_tag) = tag {
        if !known_tag.types().contains(&ty) {
            log::debug!(
                "Field `{known_tag:?}` had a type mismatch! \
                Continuing parsing with its stated type anyway... \
                got: `{ty:?}`, \
                expected: {:?}",
                known_tag.types()
            );
        }
    }

    // check how large the stored data is.
    //
    // this is a `u64` since a hostile count could overflow a `u32`
    let total_size: u64 = ty.size_bytes() as u64 * count as u64;
    log::trace!("total size for field: `{total_size}`");

    let value: [u8; 4] = match endianness {
        WinnowEndianness::Big => value_or_offset.to_be_bytes(),
        _ => value_or_offset.to_le_bytes(),
    };

    // if the value is an offset, apply the offset and use the shifted blob as
    // the buffer. (offsets are relative to the beginning of the blob)
    //
    // if it's not, just use our value and leave :)
    let data: &[u8] = if total_size > 4_u64 {
        log::trace!("Using reference to blob for value's absolute offset.");
        let blob = input.state.blob;

        let Some(data) = blob.get(value_or_offset as usize..) else {
            log::warn!(
                "Field said its data is stored outside the blob! \
                Can't continue parsing this field. \
                offset: `{value_or_offset}`, blob len: `{}`",
                blob.len()
            );
            return Err(ExifFieldError::OffsetTooFar {
                offset: value_or_offset,
            });
        };

        // fail early rather than allocate for data that isn't there
        if (data.len() as u64) < total_size {
            log::warn!(
                "Field data runs past the end of the blob. \
                needs: `{total_size}`, has: `{}`",
                data.len()
            );
            return Err(ExifFieldError::OuttaData { ty });
        }

        data
    } else {
        log::trace!("No value offset detected.");
        value.as_slice()
    };

    let mut data: &[u8] = data;
    let parsed: Result<FieldData, EmptyError> = match count {
        0_u32 => {
            log::trace!("There are no stored primitives in this field. Returning early!");
            Ok(FieldData::None(ty))
        }
        1_u32 => primitive(ty, endianness)
            .map(FieldData::Primitive)
            .parse_next(&mut data),
        n => repeat(n as usize, primitive(ty, endianness))
            .map(|list: Vec<Primitive>| FieldData::List { list, ty })
            .parse_next(&mut data),
    };

    let field_data = parsed.map_err(|_| {
        log::warn!("Ran out of data reading `{count}` primitive(s) for {tag}.");
        ExifFieldError::OuttaData { ty }
    })?;

    Ok(Field {
        tag,
        data: field_data,
    })
}

/// Reads one primitive of the given type.
fn primitive<'i>(
    ty: PrimitiveTy,
    endianness: WinnowEndianness,
) -> impl Parser<&'i [u8], Primitive, EmptyError> {
    move |input: &mut &'i [u8]| -> Result<Primitive, EmptyError> {
        match ty {
            PrimitiveTy::Byte => u8.map(Primitive::Byte).parse_next(input),
            PrimitiveTy::Ascii => u8.map(Primitive::Ascii).parse_next(input),
            PrimitiveTy::Undefined => u8.map(Primitive::Undefined).parse_next(input),
            PrimitiveTy::Utf8 => u8.map(Primitive::Utf8).parse_next(input),
            PrimitiveTy::Short => u16(endianness).map(Primitive::Short).parse_next(input),
            PrimitiveTy::Long => u32(endianness).map(Primitive::Long).parse_next(input),
            PrimitiveTy::SByte => i8.map(Primitive::SByte).parse_next(input),
            PrimitiveTy::SShort => i16(endianness).map(Primitive::SShort).parse_next(input),
            PrimitiveTy::SLong => i32(endianness).map(Primitive::SLong).parse_next(input),
            PrimitiveTy::Float => f32(endianness)
                .map(|v| Primitive::Float(Float(v)))
                .parse_next(input),
            PrimitiveTy::Double => f64(endianness)
                .map(|v| Primitive::Double(Double(v)))
                .parse_next(input),
            PrimitiveTy::Rational => (u32(endianness), u32(endianness))
                .map(|(numerator, denominator)| {
                    Primitive::Rational(Rational {
                        numerator,
                        denominator,
                    })
                })
                .parse_next(input),
            PrimitiveTy::SRational => (i32(endianness), i32(endianness))
                .map(|(numerator, denominator)| {
                    Primitive::SRational(SRational {
                        numerator,
                        denominator,
                    })
                })
                .parse_next(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use cr3_metadata_types::exif::{
        Field, FieldData, FieldTag,
        ifd::IfdGroup,
        primitives::{Double, Float, Primitive, PrimitiveTy, Rational},
        tags::{CanonTag, KnownTag},
    };
    use winnow::binary::Endianness as WinnowEndianness;

    use crate::{
        exif::{State, Stream, error::ExifFieldError, value::parse_value},
        util::logger,
    };

    /// helper: a little-endian stream over `bytes`, for the given group.
    fn stream(bytes: &[u8], group: IfdGroup) -> Stream<'_> {
        Stream {
            input: bytes,
            state: State {
                current_ifd: group,
                endianness: WinnowEndianness::Little,
                blob: bytes,
                recursion_ct: 0,
                visited: Vec::new(),
            },
        }
    }

    /// Unknown types should be rejected.
    #[test]
    fn unknown_type() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(0_u16.to_le_bytes().as_slice()); // field tag id
        backing_bytes.extend_from_slice(0_u16.to_le_bytes().as_slice()); // field type
        backing_bytes.extend_from_slice(1_u32.to_le_bytes().as_slice()); // field count
        backing_bytes.extend_from_slice(0_u32.to_le_bytes().as_slice()); // data

        assert_eq!(
            parse_value(&mut stream(&backing_bytes, IfdGroup::_0)),
            Err(ExifFieldError::FieldUnknownType { got: 0_u16 })
        );
    }

    /// We should accept a long, unknown field.
    #[test]
    fn long_field() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(666_u16.to_le_bytes().as_slice()); // field tag id
        backing_bytes.extend_from_slice(1_u16.to_le_bytes().as_slice()); // field type
        backing_bytes.extend_from_slice(300_u32.to_le_bytes().as_slice()); // field count
        backing_bytes.extend_from_slice(
            (backing_bytes.len() as u32 + 20_u32)
                .to_le_bytes()
                .as_slice(),
        ); // "the data is in 20 more bytes, including me"
        backing_bytes.extend_from_slice([0_u8; 16].as_slice()); // 16 bytes of padding
        backing_bytes.extend_from_slice([61_u8; 300].as_slice()); // field data

        assert_eq!(
            parse_value(&mut stream(&backing_bytes, IfdGroup::_0)),
            Ok(Field {
                tag: FieldTag::Unknown(666),
                data: FieldData::List {
                    list: [Primitive::Byte(61); 300].into(),
                    ty: PrimitiveTy::Byte,
                },
            })
        );
    }

    /// Tags resolve against the group of the IFD being parsed.
    #[test]
    fn canon_tag_resolves_in_canon_group() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(0x0010_u16.to_le_bytes().as_slice()); // ModelID
        backing_bytes.extend_from_slice(4_u16.to_le_bytes().as_slice()); // Long
        backing_bytes.extend_from_slice(1_u32.to_le_bytes().as_slice());
        backing_bytes.extend_from_slice(0x8000_0453_u32.to_le_bytes().as_slice());

        assert_eq!(
            parse_value(&mut stream(&backing_bytes, IfdGroup::Canon)),
            Ok(Field {
                tag: FieldTag::Known(KnownTag::CanonTag(CanonTag::ModelID)),
                data: FieldData::Primitive(Primitive::Long(0x8000_0453)),
            })
        );
    }

    /// helper: one entry's 12 bytes, little-endian.
    fn entry(tag: u16, ty: u16, count: u32, value_or_offset: [u8; 4]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(tag.to_le_bytes().as_slice());
        v.extend_from_slice(ty.to_le_bytes().as_slice());
        v.extend_from_slice(count.to_le_bytes().as_slice());
        v.extend_from_slice(value_or_offset.as_slice());
        v
    }

    #[test]
    fn sbyte() {
        logger();

        let bytes = entry(0x0001, 6, 2, [(-5_i8) as u8, 7, 0, 0]);
        assert_eq!(
            parse_value(&mut stream(&bytes, IfdGroup::Canon)).map(|f| f.data),
            Ok(FieldData::List {
                list: vec![Primitive::SByte(-5), Primitive::SByte(7)],
                ty: PrimitiveTy::SByte,
            })
        );
    }

    #[test]
    fn sshort() {
        logger();

        let [a, b] = (-300_i16).to_le_bytes();
        let bytes = entry(0x0001, 8, 1, [a, b, 0, 0]);
        assert_eq!(
            parse_value(&mut stream(&bytes, IfdGroup::Canon)).map(|f| f.data),
            Ok(FieldData::Primitive(Primitive::SShort(-300)))
        );
    }

    #[test]
    fn float() {
        logger();

        let bytes = entry(0x0001, 11, 1, 1.5_f32.to_le_bytes());
        assert_eq!(
            parse_value(&mut stream(&bytes, IfdGroup::Canon)).map(|f| f.data),
            Ok(FieldData::Primitive(Primitive::Float(Float(1.5))))
        );
    }

    /// Doubles never fit inline, so they're always read from an offset.
    #[test]
    fn double() {
        logger();

        let mut bytes = entry(0x0001, 12, 1, 12_u32.to_le_bytes());
        bytes.extend_from_slice((-0.25_f64).to_le_bytes().as_slice());
        assert_eq!(
            parse_value(&mut stream(&bytes, IfdGroup::Canon)).map(|f| f.data),
            Ok(FieldData::Primitive(Primitive::Double(Double(-0.25))))
        );

        // and one that's cut short
        let short = entry(0x0001, 12, 1, 8_u32.to_le_bytes());
        assert_eq!(
            parse_value(&mut stream(&short, IfdGroup::Canon)),
            Err(ExifFieldError::OuttaData {
                ty: PrimitiveTy::Double
            })
        );
    }

    #[test]
    fn rational_from_offset() {
        logger();

        let mut backing_bytes = Vec::new();
        backing_bytes.extend_from_slice(33437_u16.to_le_bytes().as_slice()); // FNumber
        backing_bytes.extend_from_slice(5_u16.to_le_bytes().as_slice()); // Rational
        backing_bytes.extend_from_slice(1_u32.to_le_bytes().as_slice());
        backing_bytes.extend_from_slice(12_u32.to_le_bytes().as_slice());
        backing_bytes.extend_from_slice(28_u32.to_le_bytes().as_slice());
        backing_bytes.extend_from_slice(10_u32.to_le_bytes().as_slice());

        let field = parse_value(&mut stream(&backing_bytes, IfdGroup::Exif)).unwrap();
        assert_eq!(
            field.data,
            FieldData::Primitive(Primitive::Rational(Rational {
                numerator: 28,
                denominator: 10
            }))
        );
    }

    /// Offsets past the blob, and counts the blob can't hold, are field
    /// errors instead of panics or giant allocations.
    #[test]
    fn hostile_offsets_and_counts() {
        logger();

        let mut far = Vec::new();
        far.extend_from_slice(666_u16.to_le_bytes().as_slice());
        far.extend_from_slice(1_u16.to_le_bytes().as_slice());
        far.extend_from_slice(8_u32.to_le_bytes().as_slice());
        far.extend_from_slice(5000_u32.to_le_bytes().as_slice());
        assert_eq!(
            parse_value(&mut stream(&far, IfdGroup::_0)),
            Err(ExifFieldError::OffsetTooFar { offset: 5000 })
        );

        let mut huge = Vec::new();
        huge.extend_from_slice(666_u16.to_le_bytes().as_slice());
        huge.extend_from_slice(5_u16.to_le_bytes().as_slice());
        huge.extend_from_slice(u32::MAX.to_le_bytes().as_slice());
        huge.extend_from_slice(0_u32.to_le_bytes().as_slice());
        assert_eq!(
            parse_value(&mut stream(&huge, IfdGroup::_0)),
            Err(ExifFieldError::OuttaData {
                ty: PrimitiveTy::Rational
            })
        );
    }
}
