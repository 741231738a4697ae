//! IPTC is an older metadata format, mostly used by news agencies.
//!
//! In TIFF-style directories, it's stored as a block of IIM "datasets". Each
//! dataset is one value, marked like this:
//!
//! - `0x1C` (the tag marker)
//! - the record number (1 for the envelope, 2 for the application record)
//! - the dataset number
//! - a big-endian `u16` length, then the data.
//!
//! When the length's high bit is set, the rest of it says how many bytes
//! the real length takes, and that length follows.

use rustc_hash::FxHashMap;
use winnow::{
    Parser as _,
    binary::{be_u16, u8},
    error::EmptyError,
    token::take,
};

pub use self::error::IptcError;

pub mod error;

/// Marks the start of each dataset.
const TAG_MARKER: u8 = 0x1C;

/// Parsed IPTC records, keyed like `Iptc.Application2.Keywords`.
///
/// Some datasets can repeat (keywords, for example), so each key holds every
/// value found for it, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IptcRecords {
    records: FxHashMap<String, Vec<String>>,
}

impl IptcRecords {
    /// Parses a block of IIM datasets.
    ///
    /// Bytes between datasets (usually padding) are skipped.
    pub fn parse(raw: &[u8]) -> Result<Self, IptcError> {
        let mut records: FxHashMap<String, Vec<String>> = FxHashMap::default();
        let input = &mut &raw[..];

        // each dataset needs at least a marker, two numbers, and a length
        while input.len() >= 5 {
            if input[0] != TAG_MARKER {
                *input = &input[1..];
                continue;
            }

            let (record, dataset, data) = parse_dataset(input)?;
            let key = key_name(record, dataset);
            let value = value_text(record, dataset, data);
            log::trace!("Found IPTC dataset `{key}` = `{value}`");

            records.entry(key).or_default().push(value);
        }

        Ok(Self { records })
    }

    /// All values for a key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.records.get(key).map(Vec::as_slice)
    }

    /// The first value for a key.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.records.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds another set of records to this one.
    ///
    /// Keys we already have keep their values.
    pub fn merge(&mut self, other: IptcRecords) {
        for (key, values) in other.records {
            self.records.entry(key).or_insert(values);
        }
    }
}

/// Parses one dataset, starting at its marker.
fn parse_dataset<'i>(input: &mut &'i [u8]) -> Result<(u8, u8, &'i [u8]), IptcError> {
    let header: Result<(u8, u8, u8, u16), EmptyError> = (u8, u8, u8, be_u16).parse_next(input);
    let Ok((_marker, record, dataset, raw_len)) = header else {
        return Err(IptcError::DatasetTruncated {
            record: 0,
            dataset: 0,
        });
    };
    let truncated = |_: EmptyError| {
        log::warn!("IPTC dataset `{record}:{dataset}` ran out of data!");
        IptcError::DatasetTruncated { record, dataset }
    };

    let len: usize = if raw_len & 0x8000 != 0 {
        let size_len = raw_len & 0x7FFF;
        if size_len > 4 {
            log::error!("IPTC extended length is too long. size len: `{size_len}`");
            return Err(IptcError::ExtendedLengthTooLong {
                record,
                dataset,
                size_len,
            });
        }

        let size_bytes: &[u8] = take(size_len as usize)
            .parse_next(input)
            .map_err(truncated)?;
        size_bytes
            .iter()
            .fold(0_usize, |acc, b| (acc << 8) | *b as usize)
    } else {
        raw_len as usize
    };

    let data: &[u8] = take(len).parse_next(input).map_err(truncated)?;
    Ok((record, dataset, data))
}

/// Makes a record key like `Iptc.Envelope.CharacterSet`.
fn key_name(record: u8, dataset: u8) -> String {
    let record_name: String = match record {
        1 => "Envelope".into(),
        2 => "Application2".into(),
        other => format!("Record{other}"),
    };

    match dataset_name(record, dataset) {
        Some(name) => format!("Iptc.{record_name}.{name}"),
        None => format!("Iptc.{record_name}.0x{dataset:04x}"),
    }
}

fn dataset_name(record: u8, dataset: u8) -> Option<&'static str> {
    Some(match (record, dataset) {
        (1, 0) => "ModelVersion",
        (1, 5) => "Destination",
        (1, 20) => "FileFormat",
        (1, 22) => "FileVersion",
        (1, 30) => "ServiceId",
        (1, 40) => "EnvelopeNumber",
        (1, 50) => "ProductId",
        (1, 60) => "EnvelopePriority",
        (1, 70) => "DateSent",
        (1, 80) => "TimeSent",
        (1, 90) => "CharacterSet",
        (1, 100) => "UNO",

        (2, 0) => "RecordVersion",
        (2, 5) => "ObjectName",
        (2, 10) => "Urgency",
        (2, 15) => "Category",
        (2, 20) => "SuppCategory",
        (2, 25) => "Keywords",
        (2, 40) => "SpecialInstructions",
        (2, 55) => "DateCreated",
        (2, 60) => "TimeCreated",
        (2, 62) => "DigitizationDate",
        (2, 63) => "DigitizationTime",
        (2, 65) => "Program",
        (2, 70) => "ProgramVersion",
        (2, 80) => "Byline",
        (2, 85) => "BylineTitle",
        (2, 90) => "City",
        (2, 92) => "SubLocation",
        (2, 95) => "ProvinceState",
        (2, 100) => "CountryCode",
        (2, 101) => "CountryName",
        (2, 103) => "TransmissionReference",
        (2, 105) => "Headline",
        (2, 110) => "Credit",
        (2, 115) => "Source",
        (2, 116) => "Copyright",
        (2, 118) => "Contact",
        (2, 120) => "Caption",
        (2, 122) => "Writer",

        _ => return None,
    })
}

/// Turns a dataset's data into text.
///
/// A few datasets hold binary numbers. Everything else is text.
fn value_text(record: u8, dataset: u8, data: &[u8]) -> String {
    match (record, dataset, data) {
        (1, 0 | 20 | 22, [hi, lo]) | (2, 0, [hi, lo]) => u16::from_be_bytes([*hi, *lo]).to_string(),
        _ => String::from_utf8_lossy(data).into_owned(),
    }
}
