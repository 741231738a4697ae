use winnow::{
    Parser,
    binary::{u16, u32},
    error::EmptyError,
};

use super::{
    MAX_IFD_DEPTH, NextIfdPointer, Stream,
    error::{ExifFatalError, ExifFieldError},
    value::parse_value,
};
use cr3_metadata_types::exif::{Field, FieldTag, ifd::IfdGroup};

/// How many bytes each IFD entry takes: tag, type, count, and value/offset.
const ENTRY_LEN: usize = 12;

/// An image file directory found within Exif metadata.
///
/// These contain a number of fields - at least one - and directions to the
/// next IFD.
#[derive(Clone, Debug, Hash, PartialEq, PartialOrd)]
pub struct Ifd {
    /// Which group of tags this IFD holds.
    pub group: IfdGroup,

    /// A list of fields on this IFD.
    pub fields: Vec<Result<Field, ExifFieldError>>,

    /// IFDs that this one pointed to, like the Exif IFD under IFD 0.
    pub sub_ifds: Vec<Ifd>,
}

/// Parses the IFD at `offset` in the blob, then follows any sub-IFD pointers
/// on it.
///
/// A sub-IFD that fails to parse is skipped. Its parent is kept.
pub(super) fn parse_ifd_at(
    input: &mut Stream,
    offset: usize,
    group: IfdGroup,
) -> Result<(Ifd, NextIfdPointer), ExifFatalError> {
    if input.state.visited.contains(&offset) {
        log::warn!("Already parsed an IFD at `{offset}`. Refusing to loop.");
        return Err(ExifFatalError::IfdLoop { offset });
    }

    if input.state.recursion_ct > MAX_IFD_DEPTH {
        log::warn!("IFD nesting went past `{MAX_IFD_DEPTH}` levels.");
        return Err(ExifFatalError::IfdTooDeep);
    }

    input.input = input
        .state
        .blob
        .get(offset..)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| {
            log::warn!(
                "IFD offset is past the end of the blob. offset: `{offset}`, blob len: `{}`",
                input.state.blob.len()
            );
            ExifFatalError::IfdOutOfBounds { offset }
        })?;
    input.state.current_ifd = group;
    input.state.visited.push(offset);

    let (mut ifd, next) = parse_ifd(input)?;

    // collect the pointers first. parsing a sub-IFD moves the stream
    let pointers: Vec<(IfdGroup, u32)> = ifd
        .fields
        .iter()
        .flatten()
        .filter_map(|field| {
            let FieldTag::Known(known) = field.tag else {
                return None;
            };
            Some((known.pointed_group()?, field.data.as_u32()?))
        })
        .collect();

    for (sub_group, pointer) in pointers {
        log::trace!("Following pointer to {sub_group:?} IFD at `{pointer}`...");

        input.state.recursion_ct += 1;
        let sub = parse_ifd_at(input, pointer as usize, sub_group);
        input.state.recursion_ct -= 1;

        match sub {
            Ok((sub_ifd, _)) => ifd.sub_ifds.push(sub_ifd),
            Err(e) => log::warn!("Skipping {sub_group:?} IFD at `{pointer}`. err: {e}"),
        }
    }

    Ok((ifd, next))
}

/// Parses out an entire IFD from the current position in the stream.
pub(super) fn parse_ifd(input: &mut Stream) -> Result<(Ifd, NextIfdPointer), ExifFatalError> {
    let endianness = input.state.endianness;

    let entry_count: u16 = u16(endianness).parse_next(input).map_err(|_: EmptyError| {
        log::error!("Couldn't find count on IFD - ran out of data!");
        ExifFatalError::IfdNoEntryCount
    })?;

    if entry_count == 0 {
        log::error!("IFD reported itself as having zero fields! This is fatal to parsing.");
        return Err(ExifFatalError::IfdHadZeroFields);
    }

    log::trace!("Parsing `{entry_count}` fields...");
    let mut fields = Vec::with_capacity((entry_count as usize).min(input.input.len() / ENTRY_LEN));
    for _ in 0..entry_count {
        // a broken field can stop partway through its entry, so always step
        // over exactly one entry
        let entry_start: &[u8] = input.input;
        fields.push(parse_value(input));
        input.input = entry_start.get(ENTRY_LEN..).unwrap_or_default();
    }
    log::trace!("Completed field parsing!");

    let next_ifd_location = {
        let raw_location: u32 = u32(endianness).parse_next(input).map_err(|_: EmptyError| {
            log::error!("IFD didn't contain a pointer to the next IFD!");
            ExifFatalError::IfdNoPointer
        })?;

        if raw_location == 0_u32 {
            log::trace!("There won't be a next IFD.");
            None
        } else {
            log::trace!("Another IFD was detected! index: `{raw_location}`");
            Some(raw_location)
        }
    };

    Ok((
        Ifd {
            group: input.state.current_ifd,
            fields,
            sub_ifds: Vec::new(),
        },
        next_ifd_location,
    ))
}
