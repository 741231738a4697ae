/// An error that occurred while parsing IPTC.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IptcError {
    /// A dataset's extended length said its size takes more than four bytes.
    ExtendedLengthTooLong { record: u8, dataset: u8, size_len: u16 },

    /// A dataset claimed more data than the block holds.
    DatasetTruncated { record: u8, dataset: u8 },
}

impl core::fmt::Display for IptcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IptcError::ExtendedLengthTooLong {
                record,
                dataset,
                size_len,
            } => write!(
                f,
                "IPTC dataset `{record}:{dataset}` has a `{size_len}`-byte length, \
                but four is the most we support."
            ),

            IptcError::DatasetTruncated { record, dataset } => write!(
                f,
                "IPTC dataset `{record}:{dataset}` runs past the end of the block."
            ),
        }
    }
}

impl core::error::Error for IptcError {}
