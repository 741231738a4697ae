/// An error from reading a CR3 file.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum Cr3Error {
    /// There were no bytes to read.
    EmptyInput,

    /// The file doesn't carry the CR3 signature.
    NotCr3,

    /// The file looks like a CR3, but none of its metadata directories could
    /// be found or built.
    ///
    /// This usually means it's a CR3 variant we don't support.
    NoMetadataDirectories,
}

impl core::fmt::Display for Cr3Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Cr3Error::EmptyInput => f.write_str("The given input was empty."),
            Cr3Error::NotCr3 => f.write_str("The given file doesn't have a CR3 signature."),
            Cr3Error::NoMetadataDirectories => {
                f.write_str("The CR3 file has no metadata directories we could read.")
            }
        }
    }
}

impl core::error::Error for Cr3Error {}
