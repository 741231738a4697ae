use crate::exif::{
    primitives::{Primitive, PrimitiveTy},
    tags::KnownTag,
};

pub mod ifd;
pub mod primitives;
pub mod tags;

/// One entry of an image file directory.
///
/// These provide both a field and its value(s).
#[repr(C)]
#[derive(Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Field {
    /// A number to identify the field we're talking about.
    pub tag: FieldTag,

    /// Data stored with this tag.
    ///
    /// The data also specifies the type of primitive used, and how many we're
    /// storing.
    pub data: FieldData,
}

impl Field {
    /// How many primitives are present in the field.
    pub fn count(&self) -> u32 {
        match self.data {
            FieldData::None(_) => 0_u32,
            FieldData::Primitive(_) => 1_u32,
            FieldData::List { ref list, .. } => list.len() as u32,
        }
    }

    /// Describes which primitive is stored inside.
    pub fn ty(&self) -> PrimitiveTy {
        match self.data {
            FieldData::None(primitive_ty) => primitive_ty,
            FieldData::Primitive(primitive) => primitive.ty(),
            FieldData::List { ty, .. } => ty,
        }
    }
}

/// Data associated with a field.
#[repr(C)]
#[derive(Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum FieldData {
    /// There's no primitive stored here.
    None(PrimitiveTy),

    /// Stores one primitive.
    Primitive(Primitive),

    /// Stores a number of primitives.
    List {
        /// The actual list of primitives.
        list: Vec<Primitive>,

        /// The type of primitive we're storing.
        ty: PrimitiveTy,
    },
}

impl FieldData {
    /// Returns the raw bytes of byte-sized data (`Byte`, `Ascii`,
    /// `Undefined`, `Utf8`).
    ///
    /// Other kinds of data return `None`.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            FieldData::None(_) => Some(Vec::new()),
            FieldData::Primitive(p) => p.as_byte().map(|b| vec![b]),
            FieldData::List { list, .. } => list.iter().map(Primitive::as_byte).collect(),
        }
    }

    /// Reads text data, stopping at the first NUL.
    pub fn as_text(&self) -> Option<String> {
        let bytes = self.as_bytes()?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Reads the first primitive as an unsigned integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldData::None(_) => None,
            FieldData::Primitive(p) => p.as_u32(),
            FieldData::List { list, .. } => list.first().and_then(Primitive::as_u32),
        }
    }
}

impl core::fmt::Display for FieldData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldData::None(_) => Ok(()),
            FieldData::Primitive(p) => write!(f, "{p}"),
            FieldData::List {
                ty: PrimitiveTy::Ascii | PrimitiveTy::Utf8,
                ..
            } => f.write_str(&self.as_text().unwrap_or_default()),
            FieldData::List { list, .. } => {
                for (i, p) in list.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
        }
    }
}

/// The byte order of a directory's data.
///
/// In TIFF, it's either `II` (Intel, for little-endian) or `MM` (Motorola,
/// for big-endian). CR3 directories are always little-endian.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}

/// A tag might be known by the parser, but others may not be.
#[repr(C)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum FieldTag {
    Known(KnownTag),
    Unknown(u16),
}

impl FieldTag {
    /// Returns the raw tag ID.
    pub const fn tag_id(&self) -> u16 {
        match self {
            FieldTag::Known(k) => k.tag_id(),
            FieldTag::Unknown(raw) => *raw,
        }
    }
}

impl core::fmt::Display for FieldTag {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            FieldTag::Known(known_tag) => {
                write!(
                    f,
                    "known tag with name: `{}` and tag ID: `{}`",
                    known_tag.key_name(),
                    known_tag.tag_id()
                )
            }
            FieldTag::Unknown(raw_tag) => write!(f, "unknown tag with tag ID: `{raw_tag}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FieldData,
        primitives::{Primitive, PrimitiveTy},
    };

    #[test]
    fn text_stops_at_nul() {
        let data = FieldData::List {
            list: b"Canon\0\0\0".iter().map(|b| Primitive::Ascii(*b)).collect(),
            ty: PrimitiveTy::Ascii,
        };

        assert_eq!(data.as_text().as_deref(), Some("Canon"));
        assert_eq!(data.to_string(), "Canon");
    }

    #[test]
    fn numbers_are_not_bytes() {
        let data = FieldData::List {
            list: vec![Primitive::Short(1), Primitive::Short(2)],
            ty: PrimitiveTy::Short,
        };

        assert_eq!(data.as_bytes(), None);
        assert_eq!(data.as_u32(), Some(1));
        assert_eq!(data.to_string(), "1 2");
    }
}
