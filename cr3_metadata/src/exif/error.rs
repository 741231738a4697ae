use cr3_metadata_types::exif::{Field, primitives::PrimitiveTy};

/// This type describes the result of building a directory.
///
/// In summary, if it's the `Err` variant, the directory couldn't be built at
/// all, and it won't join the chain.
///
/// `Ok` means that parsing largely succeeded, but each field in the list is
/// still wrapped in a `Result`. For more info, see [`ExifFieldResult`].
pub type ExifFatalResult<T> = Result<T, ExifFatalError>;

/// Parsing a field may fail due to standard-derived invariants, an incorrect
/// save by another metadata parser/modifier, or other problems.
///
/// In that case, we'll report that inside the list.
pub type ExifFieldResult = Result<Field, ExifFieldError>;

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExifFatalError {
    /// The header placed the directory's base past the end of the input.
    BaseOffsetOutOfBounds { offset: usize },

    /// The header placed the first IFD before the directory's base.
    DirectoryBeforeBase { base: usize, directory: usize },

    /// An IFD's offset points outside the directory.
    IfdOutOfBounds { offset: usize },

    /// The IFD didn't say how many entries it has.
    IfdNoEntryCount,

    /// The IFD was completely blank.
    IfdHadZeroFields,

    /// The IFD didn't give a pointer to the next entry.
    IfdNoPointer,

    /// An IFD pointer led back to an IFD we've already parsed.
    IfdLoop { offset: usize },

    /// Sub-IFD pointers nested deeper than we're willing to follow.
    IfdTooDeep,
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExifFieldError {
    //
    // field stuff
    /// The field did not provide a tag.
    FieldNoTag,

    /// The field didn't provide a primitive type.
    FieldNoTy,

    /// Encountered an unknown type while parsing n field.
    FieldUnknownType { got: u16 },

    /// The field didn't specify how many primitives it contains.
    FieldNoCount,

    /// The field didn't provide an offset or value.
    FieldNoOffsetOrValue,

    //
    // value parsing stuff
    /// Couldn't parse to offset. It was likely too far (malformed).
    OffsetTooFar { offset: u32 },

    /// Couldn't parse primitive - no more data.
    OuttaData { ty: PrimitiveTy },
}

impl core::fmt::Display for ExifFatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseOffsetOutOfBounds { offset } => {
                write!(f, "Directory base offset is past the input. offset: `{offset}`")
            }
            Self::DirectoryBeforeBase { base, directory } => write!(
                f,
                "Directory starts before its base. base: `{base}`, directory: `{directory}`"
            ),
            Self::IfdOutOfBounds { offset } => {
                write!(f, "IFD offset is outside the directory. offset: `{offset}`")
            }
            Self::IfdNoEntryCount => f.write_str("The IFD didn't say how many entries it has."),
            Self::IfdHadZeroFields => {
                f.write_str("The IFD told us it had zero fields, which is invalid.")
            }
            Self::IfdNoPointer => f.write_str("The IFD didn't give a pointer to the next entry."),
            Self::IfdLoop { offset } => {
                write!(f, "IFD pointers formed a loop at offset `{offset}`.")
            }
            Self::IfdTooDeep => f.write_str("Sub-IFD pointers nested too deeply."),
        }
    }
}

impl core::fmt::Display for ExifFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExifFieldError::FieldNoTag => f.write_str("The field did not provide a tag."),
            ExifFieldError::FieldNoTy => f.write_str("The field didn't provide a primitive type."),
            ExifFieldError::FieldNoCount => {
                f.write_str("The field didn't specify how many primitives it contains.")
            }
            ExifFieldError::FieldNoOffsetOrValue => {
                f.write_str("The field didn't provide an offset or value.")
            }
            ExifFieldError::FieldUnknownType { got } => write!(
                f,
                "Encountered an unknown type while parsing n field! got: {got}"
            ),

            ExifFieldError::OuttaData { ty } => write!(
                f,
                "Couldn't parse primitive - no more data in blob. ty: `{ty:?}`"
            ),
            ExifFieldError::OffsetTooFar { offset } => write!(
                f,
                "Couldn't skip to offset - no more data in blob. offset: `{offset}`"
            ),
        }
    }
}

impl core::error::Error for ExifFatalError {}
impl core::error::Error for ExifFieldError {}
