//! Definitions for tags in an IFD group.
//!
//! # `tags`
//!
//! Contains the tags this library knows about, per [`IfdGroup`].
//!
//! Tags the tables don't list are still decoded. They just show up as
//! [`FieldTag::Unknown`][`crate::exif::FieldTag::Unknown`] with their raw ID.
//!
//! ## For contributors
//!
//! To add a tag, find the `make_key_list_for_group!` call for its group and
//! add a listing. The identifier doubles as the tag's key name, so
//! `ImageWidth` in IFD 0 becomes `Exif.Image.ImageWidth`:
//!
//! ```no_compile
//! make_key_list_for_group!(enum NotRealTag => IfdGroup::NotReal,
//!     YourNewKey = 1000 => {
//!         name: "Your New Key",
//!         types: &[Pt::Ascii],
//!         count: Pc::Any,
//!     },
//! );
//! ```
//!
//! New groups also need a variant on [`KnownTag`], with its methods forwarded.

use crate::exif::{
    ifd::IfdGroup,
    primitives::{PrimitiveCount, PrimitiveTy},
};

/// Creates a "key list" for an IFD group.
///
/// These may include duplicate tag IDs from other groups.
macro_rules! make_key_list_for_group {
    (enum $enum_name:ident => $ifd_group:expr,
        $( $key_ident:ident = $key_tag:expr => {
            name: $tag_name:expr,
            types: $types:expr,
            count: $count:expr,
        },
    )+) => {
        #[doc = "A list of all keys present in the matching `IfdGroup` variant."]
        #[repr(u16)]
        #[non_exhaustive]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $key_ident = $key_tag,
            )+
        }

        impl $enum_name {
            /// Returns the number of primitives this key's value may store.
            pub const fn count(&self) -> PrimitiveCount {
                match self {
                    $( Self::$key_ident => $count, )+
                }
            }

            /// Returns the `IfdGroup` that this enum represents.
            pub const fn ifd_group() -> IfdGroup {
                $ifd_group
            }

            /// Returns this key's tag ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs a key's human-readable tag name.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => $tag_name, )+
                }
            }

            /// Grabs the name used for this key in a record key.
            pub const fn key_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => stringify!($key_ident), )+
                }
            }

            /// Returns the type(s) this key's value may have.
            pub const fn types(&self) -> &'static [PrimitiveTy] {
                match self {
                    $( Self::$key_ident => $types, )+
                }
            }
        }

        impl core::convert::TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $key_tag => Ok($enum_name::$key_ident), )+
                    _ => Err(()),
                }
            }
        }
    }
}

use {PrimitiveCount as Pc, PrimitiveTy as Pt};

/// A set of all known tags and their IFD groups.
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum KnownTag {
    Ifd0Tag(Ifd0Tag),
    ExifIfdTag(ExifIfdTag),
    GpsIfdTag(GpsIfdTag),
    InteropIfdTag(InteropIfdTag),
    CanonTag(CanonTag),
}

impl KnownTag {
    /// Returns the number of primitives this tag's value may store.
    ///
    /// ```
    /// use cr3_metadata_types::exif::{
    ///     tags::{KnownTag, Ifd0Tag},
    ///     primitives::PrimitiveCount
    /// };
    ///
    /// let image_width: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth);
    /// assert_eq!(image_width.count(), PrimitiveCount::Known(1));
    /// ```
    pub const fn count(&self) -> PrimitiveCount {
        match self {
            KnownTag::Ifd0Tag(k) => k.count(),
            KnownTag::ExifIfdTag(k) => k.count(),
            KnownTag::GpsIfdTag(k) => k.count(),
            KnownTag::InteropIfdTag(k) => k.count(),
            KnownTag::CanonTag(k) => k.count(),
        }
    }

    /// Returns the `IfdGroup` whose tables define this tag.
    ///
    /// Note that IFD 1 reuses the IFD 0 tables, so its tags report
    /// `IfdGroup::_0` here.
    pub const fn ifd_group(self) -> IfdGroup {
        match self {
            KnownTag::Ifd0Tag(_) => Ifd0Tag::ifd_group(),
            KnownTag::ExifIfdTag(_) => ExifIfdTag::ifd_group(),
            KnownTag::GpsIfdTag(_) => GpsIfdTag::ifd_group(),
            KnownTag::InteropIfdTag(_) => InteropIfdTag::ifd_group(),
            KnownTag::CanonTag(_) => CanonTag::ifd_group(),
        }
    }

    /// Returns this tag's tag ID.
    ///
    /// ```
    /// use cr3_metadata_types::exif::tags::{KnownTag, Ifd0Tag};
    ///
    /// let image_width: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth);
    /// assert_eq!(image_width.tag_id(), 256_u16);
    /// ```
    pub const fn tag_id(&self) -> u16 {
        match self {
            KnownTag::Ifd0Tag(k) => *k as u16,
            KnownTag::ExifIfdTag(k) => *k as u16,
            KnownTag::GpsIfdTag(k) => *k as u16,
            KnownTag::InteropIfdTag(k) => *k as u16,
            KnownTag::CanonTag(k) => *k as u16,
        }
    }

    /// Grabs a tag's human-readable name.
    pub const fn tag_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.tag_name(),
            KnownTag::ExifIfdTag(k) => k.tag_name(),
            KnownTag::GpsIfdTag(k) => k.tag_name(),
            KnownTag::InteropIfdTag(k) => k.tag_name(),
            KnownTag::CanonTag(k) => k.tag_name(),
        }
    }

    /// Grabs the name this tag uses inside record keys.
    ///
    /// ```
    /// use cr3_metadata_types::exif::tags::{KnownTag, ExifIfdTag};
    ///
    /// let tag: KnownTag = KnownTag::ExifIfdTag(ExifIfdTag::PixelXDimension);
    /// assert_eq!(tag.key_name(), "PixelXDimension");
    /// ```
    pub const fn key_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.key_name(),
            KnownTag::ExifIfdTag(k) => k.key_name(),
            KnownTag::GpsIfdTag(k) => k.key_name(),
            KnownTag::InteropIfdTag(k) => k.key_name(),
            KnownTag::CanonTag(k) => k.key_name(),
        }
    }

    /// Returns the type(s) this tag's value may have.
    pub const fn types(&self) -> &'static [PrimitiveTy] {
        match self {
            KnownTag::Ifd0Tag(k) => k.types(),
            KnownTag::ExifIfdTag(k) => k.types(),
            KnownTag::GpsIfdTag(k) => k.types(),
            KnownTag::InteropIfdTag(k) => k.types(),
            KnownTag::CanonTag(k) => k.types(),
        }
    }

    /// If this tag points at another IFD, returns that IFD's group.
    ///
    /// ```
    /// use cr3_metadata_types::exif::{ifd::IfdGroup, tags::{KnownTag, Ifd0Tag}};
    ///
    /// let tag: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::GpsInfoIfdPointer);
    /// assert_eq!(tag.pointed_group(), Some(IfdGroup::Gps));
    /// ```
    pub const fn pointed_group(&self) -> Option<IfdGroup> {
        match self {
            KnownTag::Ifd0Tag(Ifd0Tag::ExifIfdPointer) => Some(IfdGroup::Exif),
            KnownTag::Ifd0Tag(Ifd0Tag::GpsInfoIfdPointer) => Some(IfdGroup::Gps),
            KnownTag::ExifIfdTag(ExifIfdTag::InteroperabilityIfdPointer) => {
                Some(IfdGroup::Interop)
            }
            _ => None,
        }
    }
}

impl TryFrom<(IfdGroup, u16)> for KnownTag {
    type Error = ();

    fn try_from(value: (IfdGroup, u16)) -> Result<Self, Self::Error> {
        let (ifd_group, tag_id): (IfdGroup, u16) = value;

        match ifd_group {
            IfdGroup::_0 | IfdGroup::_1 => Ifd0Tag::try_from(tag_id).map(KnownTag::Ifd0Tag),
            IfdGroup::Exif => ExifIfdTag::try_from(tag_id).map(KnownTag::ExifIfdTag),
            IfdGroup::Gps => GpsIfdTag::try_from(tag_id).map(KnownTag::GpsIfdTag),
            IfdGroup::Interop => InteropIfdTag::try_from(tag_id).map(KnownTag::InteropIfdTag),
            IfdGroup::Canon => CanonTag::try_from(tag_id).map(KnownTag::CanonTag),
        }
    }
}

/*
 *
 *
 *  IFD 0 (`CMT1`)
 *
 *
 */
make_key_list_for_group!(enum Ifd0Tag => IfdGroup::_0,
    ImageWidth = 256 => {
        name: "Image width",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    ImageLength = 257 => {
        name: "Image height",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    BitsPerSample = 258 => {
        name: "Number of bits per component",
        types: &[Pt::Short],
        count: Pc::Known(3),
    },
    Compression = 259 => {
        name: "Compression scheme",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ImageDescription = 270 => {
        name: "Image title",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    Make = 271 => {
        name: "Image input equipment manufacturer",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    Model = 272 => {
        name: "Image input equipment model",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    StripOffsets = 273 => {
        name: "Image data location",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Any,
    },
    Orientation = 274 => {
        name: "Orientation of image",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    StripByteCounts = 279 => {
        name: "Bytes per compressed strip",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Any,
    },
    XResolution = 282 => {
        name: "Image resolution in width direction",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    YResolution = 283 => {
        name: "Image resolution in height direction",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ResolutionUnit = 296 => {
        name: "Unit of X and Y resolution",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Software = 305 => {
        name: "Software used",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    DateTime = 306 => {
        name: "File change date and time",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    Artist = 315 => {
        name: "Person who created the image",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    JPEGInterchangeFormat = 513 => {
        name: "Offset to JPEG SOI",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    JPEGInterchangeFormatLength = 514 => {
        name: "Bytes of JPEG data",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    XMLPacket = 700 => {
        name: "XMP packet",
        types: &[Pt::Byte, Pt::Undefined],
        count: Pc::Any,
    },
    Copyright = 33432 => {
        name: "Copyright holder",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    IPTCNAA = 33723 => {
        name: "IPTC-NAA record",
        types: &[Pt::Long, Pt::Undefined, Pt::Byte],
        count: Pc::Any,
    },

    // if you add a pointer tag here, also map it in
    // `KnownTag::pointed_group`, or the decoder won't follow it!
    ExifIfdPointer = 34665 => {
        name: "Exif IFD Pointer",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    GpsInfoIfdPointer = 34853 => {
        name: "GPSInfo IFD Pointer",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
);

/*
 *
 *
 *  Exif IFD (`CMT2`)
 *
 *
 */
make_key_list_for_group!(enum ExifIfdTag => IfdGroup::Exif,
    ExposureTime = 33434 => {
        name: "Exposure time",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FNumber = 33437 => {
        name: "F number",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ExposureProgram = 34850 => {
        name: "Exposure program",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PhotographicSensitivity = 34855 => {
        name: "Photographic sensitivity",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    SensitivityType = 34864 => {
        name: "Sensitivity type",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    RecommendedExposureIndex = 34866 => {
        name: "Recommended exposure index",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    ExifVersion = 36864 => {
        name: "Exif version",
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    DateTimeOriginal = 36867 => {
        name: "Date and time of original data generation",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    DateTimeDigitized = 36868 => {
        name: "Date and time of digital data generation",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    OffsetTime = 36880 => {
        name: "Offset data of DateTime",
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    OffsetTimeOriginal = 36881 => {
        name: "Offset data of DateTimeOriginal",
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    ShutterSpeedValue = 37377 => {
        name: "Shutter speed",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    ApertureValue = 37378 => {
        name: "Aperture",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ExposureBiasValue = 37380 => {
        name: "Exposure bias",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    MeteringMode = 37383 => {
        name: "Metering mode",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Flash = 37385 => {
        name: "Flash",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FocalLength = 37386 => {
        name: "Lens focal length",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    MakerNote = 37500 => {
        name: "Manufacturer notes",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    UserComment = 37510 => {
        name: "User comments",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    SubSecTimeOriginal = 37521 => {
        name: "DateTimeOriginal subseconds",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    ColorSpace = 40961 => {
        name: "Color space information",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PixelXDimension = 40962 => {
        name: "Valid image width",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    PixelYDimension = 40963 => {
        name: "Valid image height",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    InteroperabilityIfdPointer = 40965 => {
        name: "Interoperability IFD Pointer",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    ExposureMode = 41986 => {
        name: "Exposure mode",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    WhiteBalance = 41987 => {
        name: "White balance",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SceneCaptureType = 41990 => {
        name: "Scene capture type",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    CameraOwnerName = 42032 => {
        name: "Camera owner name",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    BodySerialNumber = 42033 => {
        name: "Body serial number",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensSpecification = 42034 => {
        name: "Lens specification",
        types: &[Pt::Rational],
        count: Pc::Known(4),
    },
    LensModel = 42036 => {
        name: "Lens model",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    LensSerialNumber = 42037 => {
        name: "Lens serial number",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
);

/*
 *
 *
 *  GPS IFD (`CMT4`)
 *
 *
 */
make_key_list_for_group!(enum GpsIfdTag => IfdGroup::Gps,
    GPSVersionID = 0 => {
        name: "GPS tag version",
        types: &[Pt::Byte],
        count: Pc::Known(4),
    },
    GPSLatitudeRef = 1 => {
        name: "North or South Latitude",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLatitude = 2 => {
        name: "Latitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSLongitudeRef = 3 => {
        name: "East or West Longitude",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLongitude = 4 => {
        name: "Longitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSAltitudeRef = 5 => {
        name: "Altitude reference",
        types: &[Pt::Byte],
        count: Pc::Known(1),
    },
    GPSAltitude = 6 => {
        name: "Altitude",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSTimeStamp = 7 => {
        name: "GPS time (atomic clock)",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSSatellites = 8 => {
        name: "GPS satellites used for measurement",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSStatus = 9 => {
        name: "GPS receiver status",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSMeasureMode = 10 => {
        name: "GPS measurement mode",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSMapDatum = 18 => {
        name: "Geodetic survey data used",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSDateStamp = 29 => {
        name: "GPS date",
        types: &[Pt::Ascii],
        count: Pc::Known(11),
    },
);

/*
 *
 *
 *  Interoperability IFD
 *
 *
 */
make_key_list_for_group!(enum InteropIfdTag => IfdGroup::Interop,
    InteroperabilityIndex = 1 => {
        name: "Interoperability Identification",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
);

/*
 *
 *
 *  Canon maker notes (`CMT3`)
 *
 *
 */
make_key_list_for_group!(enum CanonTag => IfdGroup::Canon,
    CameraSettings = 0x0001 => {
        name: "Camera settings",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    FocalLength = 0x0002 => {
        name: "Focal length",
        types: &[Pt::Short],
        count: Pc::Known(4),
    },
    ShotInfo = 0x0004 => {
        name: "Shot information",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    ImageType = 0x0006 => {
        name: "Image type",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    FirmwareVersion = 0x0007 => {
        name: "Firmware version",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    OwnerName = 0x0009 => {
        name: "Owner name",
        types: &[Pt::Ascii],
        count: Pc::Known(32),
    },
    SerialNumber = 0x000c => {
        name: "Camera serial number",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    CameraInfo = 0x000d => {
        name: "Camera info",
        types: &[Pt::Undefined, Pt::Long],
        count: Pc::Any,
    },
    ModelID = 0x0010 => {
        name: "Model ID",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    AFInfo2 = 0x0026 => {
        name: "AF info",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    LensModel = 0x0095 => {
        name: "Lens model",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    InternalSerialNumber = 0x0096 => {
        name: "Internal serial number",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    ColorData = 0x4001 => {
        name: "Color data",
        types: &[Pt::Short],
        count: Pc::Any,
    },
);
