//! Flat, keyed records made from a decoded directory chain.

use cr3_metadata_types::exif::{
    FieldData, FieldTag,
    ifd::IfdGroup,
    tags::{ExifIfdTag, Ifd0Tag, KnownTag},
};

/// Names one Exif record, like `Exif.Photo.FNumber`.
///
/// The group matters: tag IDs are only unique within a group.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct ExifKey {
    pub group: IfdGroup,
    pub tag: FieldTag,
}

impl ExifKey {
    /// Makes a key for the given tag ID in `group`, resolving it to a known
    /// tag when we have one.
    pub fn new(group: IfdGroup, tag_id: u16) -> Self {
        let tag = KnownTag::try_from((group, tag_id))
            .map(FieldTag::Known)
            .unwrap_or(FieldTag::Unknown(tag_id));
        Self { group, tag }
    }
}

impl From<KnownTag> for ExifKey {
    fn from(known: KnownTag) -> Self {
        Self {
            group: known.ifd_group(),
            tag: FieldTag::Known(known),
        }
    }
}

impl From<Ifd0Tag> for ExifKey {
    fn from(tag: Ifd0Tag) -> Self {
        KnownTag::Ifd0Tag(tag).into()
    }
}

impl From<ExifIfdTag> for ExifKey {
    fn from(tag: ExifIfdTag) -> Self {
        KnownTag::ExifIfdTag(tag).into()
    }
}

impl core::fmt::Display for ExifKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Exif.{}.", self.group.key_name())?;
        match self.tag {
            FieldTag::Known(known) => f.write_str(known.key_name()),
            FieldTag::Unknown(raw) => write!(f, "0x{raw:04x}"),
        }
    }
}

/// One decoded Exif value.
#[derive(Clone, Debug, Hash, PartialEq, PartialOrd)]
pub struct ExifRecord {
    pub key: ExifKey,
    pub data: FieldData,
}

/// The embedded preview image.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Thumbnail {
    /// Where the image data starts in the file.
    pub offset: usize,

    /// The image data itself.
    pub data: Vec<u8>,
}

impl Thumbnail {
    /// CR3 previews are always JPEG.
    pub const MIME_TYPE: &'static str = "image/jpeg";

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// All the Exif records found in a file, in the order they were decoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExifRecords {
    records: Vec<ExifRecord>,
    thumbnail: Option<Thumbnail>,
}

impl ExifRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExifRecord) {
        self.records.push(record);
    }

    /// Finds the first record with the given key.
    ///
    /// When a key shows up more than once, the earliest directory in the
    /// chain wins.
    pub fn get(&self, key: impl Into<ExifKey>) -> Option<&ExifRecord> {
        let key: ExifKey = key.into();
        self.records.iter().find(|r| r.key == key)
    }

    /// Like [`ExifRecords::get`], but using the key's text form, like
    /// `Exif.Image.Model`.
    pub fn get_by_name(&self, name: &str) -> Option<&ExifRecord> {
        self.records.iter().find(|r| r.key.to_string() == name)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ExifRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records. The thumbnail isn't counted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Thumbnail) {
        self.thumbnail = Some(thumbnail);
    }
}

impl<'a> IntoIterator for &'a ExifRecords {
    type Item = &'a ExifRecord;
    type IntoIter = core::slice::Iter<'a, ExifRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use cr3_metadata_types::exif::{
        FieldData,
        ifd::IfdGroup,
        primitives::Primitive,
        tags::{ExifIfdTag, Ifd0Tag},
    };

    use super::{ExifKey, ExifRecord, ExifRecords};

    #[test]
    fn key_names() {
        assert_eq!(
            ExifKey::from(ExifIfdTag::FNumber).to_string(),
            "Exif.Photo.FNumber"
        );
        assert_eq!(ExifKey::new(IfdGroup::Canon, 0x0010).to_string(), "Exif.Canon.ModelID");
        assert_eq!(ExifKey::new(IfdGroup::Gps, 0x1234).to_string(), "Exif.GPSInfo.0x1234");
        assert_eq!(ExifKey::new(IfdGroup::_1, 259).to_string(), "Exif.Thumbnail.Compression");
    }

    #[test]
    fn first_record_wins() {
        let record = |value| ExifRecord {
            key: Ifd0Tag::Model.into(),
            data: FieldData::Primitive(Primitive::Short(value)),
        };

        let mut records = ExifRecords::new();
        records.push(record(1));
        records.push(record(2));

        assert_eq!(records.len(), 2);
        assert_eq!(records.get(Ifd0Tag::Model), Some(&record(1)));
        assert_eq!(records.get_by_name("Exif.Image.Model"), Some(&record(1)));
        assert_eq!(records.get(Ifd0Tag::Make), None);
        assert!(records.thumbnail().is_none());
    }
}
