/// An enumeration of the possible values of a primitive.
///
/// Used in each IFD entry.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    Utf8 = 129,
}

impl PrimitiveTy {
    /// Grabs the primitive type's size in bytes.
    ///
    /// ```
    /// use cr3_metadata_types::exif::primitives::PrimitiveTy;
    ///
    /// let slong: PrimitiveTy = PrimitiveTy::SLong;
    /// assert_eq!(slong.size_bytes(), 4_u8);
    /// ```
    pub const fn size_bytes(&self) -> u8 {
        match self {
            PrimitiveTy::Byte
            | PrimitiveTy::Ascii
            | PrimitiveTy::Utf8
            | PrimitiveTy::Undefined
            | PrimitiveTy::SByte => 1_u8,
            PrimitiveTy::Short | PrimitiveTy::SShort => 2_u8,
            PrimitiveTy::Long | PrimitiveTy::SLong | PrimitiveTy::Float => 4_u8,
            PrimitiveTy::Rational | PrimitiveTy::SRational | PrimitiveTy::Double => 8_u8,
        }
    }
}

impl TryFrom<u16> for PrimitiveTy {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            6 => Ok(Self::SByte),
            7 => Ok(Self::Undefined),
            8 => Ok(Self::SShort),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),
            129 => Ok(Self::Utf8),

            _ => Err(()),
        }
    }
}

/// How many primitives a known tag is expected to hold.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveCount {
    /// There are `n` primitives.
    Known(u32),

    /// Any number of primitives.
    Any,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Primitive {
    Byte(Byte),
    Ascii(Ascii),
    Short(Short),
    Long(Long),
    Rational(Rational),
    SByte(SByte),
    Undefined(Undefined),
    SShort(SShort),
    SLong(SLong),
    SRational(SRational),
    Float(Float),
    Double(Double),
    Utf8(Utf8),
}

impl Primitive {
    /// Grabs the type describing this primitive.
    pub fn ty(&self) -> PrimitiveTy {
        match self {
            Primitive::Byte(_) => PrimitiveTy::Byte,
            Primitive::Ascii(_) => PrimitiveTy::Ascii,
            Primitive::Short(_) => PrimitiveTy::Short,
            Primitive::Long(_) => PrimitiveTy::Long,
            Primitive::Rational(_) => PrimitiveTy::Rational,
            Primitive::SByte(_) => PrimitiveTy::SByte,
            Primitive::Undefined(_) => PrimitiveTy::Undefined,
            Primitive::SShort(_) => PrimitiveTy::SShort,
            Primitive::SLong(_) => PrimitiveTy::SLong,
            Primitive::SRational(_) => PrimitiveTy::SRational,
            Primitive::Float(_) => PrimitiveTy::Float,
            Primitive::Double(_) => PrimitiveTy::Double,
            Primitive::Utf8(_) => PrimitiveTy::Utf8,
        }
    }

    /// Returns the primitive as a single byte, if it's one of the byte-sized
    /// kinds.
    pub fn as_byte(&self) -> Option<u8> {
        match *self {
            Primitive::Byte(b)
            | Primitive::Ascii(b)
            | Primitive::Undefined(b)
            | Primitive::Utf8(b) => Some(b),
            _ => None,
        }
    }

    /// Widens an unsigned integer primitive into a `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Primitive::Byte(b) => Some(b as u32),
            Primitive::Short(s) => Some(s as u32),
            Primitive::Long(l) => Some(l),
            _ => None,
        }
    }
}

impl core::fmt::Display for Primitive {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Primitive::Byte(v) | Primitive::Undefined(v) => write!(f, "{v}"),
            Primitive::Ascii(v) | Primitive::Utf8(v) => write!(f, "{}", *v as char),
            Primitive::Short(v) => write!(f, "{v}"),
            Primitive::Long(v) => write!(f, "{v}"),
            Primitive::SByte(v) => write!(f, "{v}"),
            Primitive::SShort(v) => write!(f, "{v}"),
            Primitive::SLong(v) => write!(f, "{v}"),
            Primitive::Float(v) => write!(f, "{}", v.0),
            Primitive::Double(v) => write!(f, "{}", v.0),
            Primitive::Rational(r) => write!(f, "{}/{}", r.numerator, r.denominator),
            Primitive::SRational(r) => write!(f, "{}/{}", r.numerator, r.denominator),
        }
    }
}

/// A `u8` to represent a byte.
pub type Byte = u8;

/// A single ASCII code.
pub type Ascii = u8;

/// A `u16`.
pub type Short = u16;

/// A `u32`.
pub type Long = u32;

/// A fraction that can't be negative.
///
/// Both the numerator (top number) and denominator (bottom number) are always
/// positive numbers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// A signed byte.
pub type SByte = i8;

/// A signed short.
pub type SShort = i16;

/// A byte with no defined meaning.
///
/// Vendor blobs, like Canon's camera settings, are usually stored this way.
pub type Undefined = u8;

/// A signed long - just a `i32`.
pub type SLong = i32;

/// A signed fraction.
///
/// Both the numerator (top number) and denominator (bottom number) can be
/// negative.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

/// A single byte representing a part or whole UTF-8 codepoint.
pub type Utf8 = u8;

/// Implements equality, ordering and hashing for a float wrapper by comparing
/// bit patterns, so fields holding floats can still be `Eq` and `Hash`.
macro_rules! float_by_bits {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.to_bits() == other.0.to_bits()
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl core::hash::Hash for $name {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                self.0.to_bits().hash(state);
            }
        }
    };
}

/// A single-precision IEEE 754 float.
///
/// Two `Float`s are equal only when their bits are, so `NaN == NaN` here,
/// while `0.0` and `-0.0` differ.
#[repr(transparent)]
#[derive(Clone, Copy, Debug)]
pub struct Float(pub f32);
float_by_bits!(Float);

/// A double-precision IEEE 754 float. Compared like [`Float`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug)]
pub struct Double(pub f64);
float_by_bits!(Double);
