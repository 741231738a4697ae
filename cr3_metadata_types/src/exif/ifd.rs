//! Contains stuff related to IFDs.
//!
//! For more info, see the [`IfdGroup`] enumeration.

/// An IFD group says which set of tags an image file directory holds.
///
/// In a CR3 file, each `CMT` box carries one directory, and each of those
/// directories belongs to a fixed group:
///
/// - `CMT1`: IFD 0
/// - `CMT2`: the Exif IFD
/// - `CMT3`: Canon's maker notes
/// - `CMT4`: the GPS IFD
///
/// The remaining groups are only reachable through pointers inside those
/// directories.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdGroup {
    /// Refers to "IFD 0".
    ///
    /// This one stems from TIFF and carries the basic image description:
    /// make, model, dates, and so on.
    #[doc(alias = "IFD0")]
    #[doc(alias = "TIFF")]
    _0,

    /// Refers to "IFD 1", the directory after IFD 0.
    ///
    /// Usually describes a thumbnail.
    #[doc(alias = "IFD1")]
    _1,

    /// The "Exif" IFD provides camera-based metadata.
    ///
    /// For example, it's home to important values like exposure information.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// The GPS IFD contains location metadata.
    #[doc(alias = "GPSIFD")]
    Gps,

    /// The interoperability IFD specifies info about what software was used to
    /// write the Exif metadata.
    #[doc(alias = "InteropIFD")]
    Interop,

    /// Canon's proprietary maker notes.
    #[doc(alias = "MakerNote")]
    Canon,
}

impl IfdGroup {
    /// The group's name inside a record key, like the `Photo` in
    /// `Exif.Photo.FNumber`.
    ///
    /// ```
    /// use cr3_metadata_types::exif::ifd::IfdGroup;
    ///
    /// assert_eq!(IfdGroup::Exif.key_name(), "Photo");
    /// ```
    pub const fn key_name(&self) -> &'static str {
        match self {
            Self::_0 => "Image",
            Self::_1 => "Thumbnail",
            Self::Exif => "Photo",
            Self::Gps => "GPSInfo",
            Self::Interop => "Iop",
            Self::Canon => "Canon",
        }
    }

    /// The group of the IFD that a "next IFD" pointer leads to, if this group
    /// is allowed to have one.
    ///
    /// Only IFD 0 links onward (to IFD 1). Every other directory ends where it
    /// ends.
    pub const fn next_in_chain(&self) -> Option<IfdGroup> {
        match self {
            Self::_0 => Some(Self::_1),
            _ => None,
        }
    }
}
