//! Implements a small XMP reader.
//!
//! XMP (Extensible Metadata Platform) is RDF serialized as XML. Camera files
//! carry it as a packet inside one of their directories.
//!
//! This reader flattens the packet into simple records, like
//! `Xmp.xmp.Rating` -> `3`:
//!
//! - simple properties (as attributes or elements) keep their text
//! - `rdf:Alt` keeps its first item (usually the default language)
//! - `rdf:Seq` and `rdf:Bag` join their items with `", "`
//! - struct fields become `Xmp.<prefix>.<name>/<field prefix>:<field name>`

use rustc_hash::FxHashMap;
use xmltree::Element;

pub use self::error::XmpError;

pub mod error;

/// This represents the `rdf:` prefix in various collection/container types in
/// XMP through the "RDF/XML" specification.
///
/// We use it to compare namespaces and check which elements we've got.
const RDF_NAMESPACE: &str = r"http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Like the above, this is a namespace sometimes used in a few XMP elements.
///
/// We'll check for it in places like `x:xmpmeta`.
const X_NAMESPACE: &str = r"adobe:ns:meta/";

/// Parsed XMP records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmpRecords {
    records: FxHashMap<String, String>,
}

impl XmpRecords {
    /// Parses an XMP packet.
    ///
    /// Trailing padding (NULs and whitespace) is ignored.
    pub fn parse(raw: &[u8]) -> Result<Self, XmpError> {
        let text: &str = core::str::from_utf8(raw).map_err(|e| {
            log::warn!("XMP packet isn't UTF-8. err: {e}");
            XmpError::NotUtf8
        })?;
        let text = text.trim_end_matches(['\0', ' ', '\t', '\r', '\n']);

        let document: Element = Element::parse(text.as_bytes())?;
        let descriptions = find_descriptions(&document)?;

        let mut records: FxHashMap<String, String> = FxHashMap::default();
        for description in descriptions {
            read_description(description, &mut records);
        }

        log::debug!("Found `{}` XMP records.", records.len());
        Ok(Self { records })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v.as_str()))
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
    pub fn merge(&mut self, other: XmpRecords) {
        for (key, value) in other.records {
            self.records.entry(key).or_insert(value);
        }
    }
}

/// Finds the `rdf:Description` elements in the document.
fn find_descriptions(document: &Element) -> Result<Vec<&Element>, XmpError> {
    // the first one is optional: `x:xmpmeta`
    let parent = match document.namespace.as_deref() {
        Some(X_NAMESPACE) if document.name == "xmpmeta" => Some(document),
        _ => document
            .get_child("xmpmeta")
            .filter(|c| c.namespace.as_deref() == Some(X_NAMESPACE)),
    }
    .inspect(|_| log::trace!("Found an `x:xmpmeta` element."))
    .unwrap_or(document);

    // note: sometimes, the document's "root" is the `rdf:RDF` element, so
    // we've gotta check first
    let rdf = if parent.name == "RDF" {
        Some(parent)
    } else {
        parent.get_child("RDF")
    }
    .filter(|rdf| is_rdf(rdf, "RDF"))
    .ok_or_else(|| {
        log::error!("Couldn't find an `rdf:RDF` element in the document.");
        XmpError::NoRdfElement
    })?;

    let descriptions: Vec<&Element> = rdf
        .children
        .iter()
        .flat_map(|child| child.as_element())
        .filter(|child| is_rdf(child, "Description"))
        .collect();

    if descriptions.is_empty() {
        log::warn!("No `rdf:Description` elements found in the `rdf:RDF` element.");
        return Err(XmpError::NoDescriptionElements);
    }

    Ok(descriptions)
}

/// Whether `element` is `rdf:<name>`.
fn is_rdf(element: &Element, name: &str) -> bool {
    element.name == name && element.namespace.as_deref() == Some(RDF_NAMESPACE)
}

/// Records the properties on one `rdf:Description`.
fn read_description(description: &Element, out: &mut FxHashMap<String, String>) {
    read_attributes(description, "", out);

    for property in description.children.iter().flat_map(|c| c.as_element()) {
        read_property(property, out);
    }
}

/// Records an element's attributes as simple properties.
///
/// `rdf:` attributes (like `rdf:about`) are markers, not data, so they're
/// skipped.
fn read_attributes(element: &Element, key_prefix: &str, out: &mut FxHashMap<String, String>) {
    for (name, value) in &element.attributes {
        if name.namespace.as_deref() == Some(RDF_NAMESPACE) {
            continue;
        }

        let Some(prefix) = name.prefix.as_deref() else {
            log::debug!("Skipping attribute `{}`, as it has no prefix.", name.local_name);
            continue;
        };

        let key = match key_prefix {
            "" => format!("Xmp.{prefix}.{}", name.local_name),
            parent => format!("{parent}/{prefix}:{}", name.local_name),
        };
        out.entry(key).or_insert_with(|| value.clone());
    }
}

/// Records one property element.
fn read_property(property: &Element, out: &mut FxHashMap<String, String>) {
    let Some(prefix) = property.prefix.as_deref() else {
        log::warn!(
            "Element `{}` has no prefix. Cannot record it.",
            property.name
        );
        return;
    };
    let key = format!("Xmp.{prefix}.{}", property.name);
    log::trace!("Reading XMP property `{key}`...");

    let children: Vec<&Element> = property
        .children
        .iter()
        .flat_map(|c| c.as_element())
        .collect();

    // arrays
    if let Some(array) = children
        .iter()
        .find(|c| is_rdf(c, "Alt") || is_rdf(c, "Seq") || is_rdf(c, "Bag"))
    {
        let items: Vec<String> = array
            .children
            .iter()
            .flat_map(|c| c.as_element())
            .filter(|li| is_rdf(li, "li"))
            .filter_map(|li| li.get_text())
            .map(|text| text.trim().to_string())
            .collect();

        let value = match array.name.as_str() {
            "Alt" => items.into_iter().next().unwrap_or_default(),
            _ => items.join(", "),
        };
        out.entry(key).or_insert(value);
        return;
    }

    // structs, either inside an `rdf:Description` or marked with
    // `rdf:parseType="Resource"`
    if !children.is_empty() {
        let fields_parent: &Element = children
            .iter()
            .find(|c| is_rdf(c, "Description"))
            .copied()
            .unwrap_or(property);

        read_attributes(fields_parent, &key, out);
        for field in fields_parent.children.iter().flat_map(|c| c.as_element()) {
            let (Some(field_prefix), Some(text)) = (field.prefix.as_deref(), field.get_text())
            else {
                continue;
            };
            out.entry(format!("{key}/{field_prefix}:{}", field.name))
                .or_insert_with(|| text.trim().to_string());
        }
        return;
    }

    // simple values. a resource is stored as an attribute instead of text
    let value: Option<String> = property
        .get_text()
        .map(|text| text.trim().to_string())
        .or_else(|| {
            property
                .attributes
                .iter()
                .find(|(name, _)| {
                    name.local_name == "resource"
                        && name.namespace.as_deref() == Some(RDF_NAMESPACE)
                })
                .map(|(_, value)| value.clone())
        });

    match value {
        Some(value) => {
            out.entry(key).or_insert(value);
        }
        None => read_attributes(property, &key, out),
    }
}

#[cfg(test)]
mod tests {
    use super::{XmpError, XmpRecords};
    use crate::util::logger;

    const PACKET: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:xmp="http://ns.adobe.com/xap/1.0/"
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:Iptc4xmpCore="http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"
        xmp:Rating="4">
      <xmp:CreatorTool>EOS R5</xmp:CreatorTool>
      <dc:title>
        <rdf:Alt>
          <rdf:li xml:lang="x-default">Harbor</rdf:li>
          <rdf:li xml:lang="fr">Port</rdf:li>
        </rdf:Alt>
      </dc:title>
      <dc:subject>
        <rdf:Bag>
          <rdf:li>boats</rdf:li>
          <rdf:li>sea</rdf:li>
        </rdf:Bag>
      </dc:subject>
      <Iptc4xmpCore:CreatorContactInfo rdf:parseType="Resource">
        <Iptc4xmpCore:CiAdrCity>Oslo</Iptc4xmpCore:CiAdrCity>
      </Iptc4xmpCore:CreatorContactInfo>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

    #[test]
    fn flattens_properties() {
        logger();

        let mut raw = PACKET.as_bytes().to_vec();
        raw.extend_from_slice([0_u8; 8].as_slice()); // padding

        let xmp = XmpRecords::parse(&raw).expect("XMP should parse");
        assert_eq!(xmp.get("Xmp.xmp.Rating"), Some("4"));
        assert_eq!(xmp.get("Xmp.xmp.CreatorTool"), Some("EOS R5"));
        assert_eq!(xmp.get("Xmp.dc.title"), Some("Harbor"));
        assert_eq!(xmp.get("Xmp.dc.subject"), Some("boats, sea"));
        assert_eq!(
            xmp.get("Xmp.Iptc4xmpCore.CreatorContactInfo/Iptc4xmpCore:CiAdrCity"),
            Some("Oslo")
        );
        assert_eq!(xmp.len(), 5, "`rdf:about` isn't a property");
    }

    #[test]
    fn rdf_root_is_fine() {
        logger();

        let xmp = XmpRecords::parse(
            br#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description xmlns:tiff="http://ns.adobe.com/tiff/1.0/" tiff:Make="Canon"/></rdf:RDF>"#,
        )
        .expect("XMP should parse");
        assert_eq!(xmp.get("Xmp.tiff.Make"), Some("Canon"));
    }

    #[test]
    fn errors() {
        logger();

        assert!(matches!(
            XmpRecords::parse(&[0xFF, 0xFE, 0x00]),
            Err(XmpError::NotUtf8)
        ));
        assert!(matches!(
            XmpRecords::parse(b"<unclosed>"),
            Err(XmpError::XmlParseError(_))
        ));
        assert!(matches!(
            XmpRecords::parse(b"<root/>"),
            Err(XmpError::NoRdfElement)
        ));
        assert!(matches!(
            XmpRecords::parse(br#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#),
            Err(XmpError::NoDescriptionElements)
        ));
    }
}
