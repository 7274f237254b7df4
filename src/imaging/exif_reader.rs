//! EXIF decoding on top of `kamadak-exif`.
//!
//! Reads the TIFF-structured EXIF block from JPEG (APP1), TIFF and CR2
//! containers and flattens the primary-image fields into a
//! tag name → [`ExifValue`] map that serializes straight to JSON.
//! Fields of the thumbnail IFD (IFD1) are dropped.
//!
//! Value mapping:
//!
//! | EXIF type | JSON |
//! |---|---|
//! | ASCII | string |
//! | BYTE, SHORT, LONG | number |
//! | SBYTE, SSHORT, SLONG | number |
//! | RATIONAL, SRATIONAL | `"num/denom"` string |
//! | FLOAT, DOUBLE | number |
//! | UNDEFINED, unknown | display string |
//!
//! Multi-valued fields become arrays.

use exif::{Exif, Field, In, Reader, Tag, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, Seek};
use std::ops::Range;

/// One EXIF field value, shaped for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExifValue {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    List(Vec<ExifValue>),
}

/// Tag name → value, sorted by tag name.
pub type ExifTags = BTreeMap<String, ExifValue>;

/// Decode the EXIF block of an image container.
pub fn read_exif<R: BufRead + Seek>(reader: &mut R) -> Result<Exif, exif::Error> {
    Reader::new().read_from_container(reader)
}

/// Flatten the primary-image fields of `exif` into a tag map.
pub fn tag_map(exif: &Exif) -> ExifTags {
    let mut tags = ExifTags::new();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        tags.entry(field.tag.to_string())
            .or_insert_with(|| field_value(field));
    }
    tags
}

fn field_value(field: &Field) -> ExifValue {
    match &field.value {
        Value::Ascii(parts) => collapse(
            parts
                .iter()
                .map(|p| ExifValue::Text(ascii_text(p)))
                .collect(),
        ),
        Value::Byte(v) => collapse(v.iter().map(|&n| ExifValue::Unsigned(n.into())).collect()),
        Value::Short(v) => collapse(v.iter().map(|&n| ExifValue::Unsigned(n.into())).collect()),
        Value::Long(v) => collapse(v.iter().map(|&n| ExifValue::Unsigned(n.into())).collect()),
        Value::SByte(v) => collapse(v.iter().map(|&n| ExifValue::Signed(n.into())).collect()),
        Value::SShort(v) => collapse(v.iter().map(|&n| ExifValue::Signed(n.into())).collect()),
        Value::SLong(v) => collapse(v.iter().map(|&n| ExifValue::Signed(n.into())).collect()),
        Value::Rational(v) => collapse(
            v.iter()
                .map(|r| ExifValue::Text(format!("{}/{}", r.num, r.denom)))
                .collect(),
        ),
        Value::SRational(v) => collapse(
            v.iter()
                .map(|r| ExifValue::Text(format!("{}/{}", r.num, r.denom)))
                .collect(),
        ),
        Value::Float(v) => collapse(v.iter().map(|&n| ExifValue::Float(n.into())).collect()),
        Value::Double(v) => collapse(v.iter().map(|&n| ExifValue::Float(n)).collect()),
        _ => ExifValue::Text(field.display_value().to_string()),
    }
}

fn ascii_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Single values stay scalar; everything else becomes an array.
fn collapse(mut values: Vec<ExifValue>) -> ExifValue {
    if values.len() == 1 {
        values.remove(0)
    } else {
        ExifValue::List(values)
    }
}

/// Byte range of the image strip referenced by IFD0 of a TIFF-structured file.
///
/// In a Canon CR2 this strip is the full-size JPEG rendition of the raw data.
/// Returns `None` when the tags are missing or point outside `data`.
pub fn primary_strip_range(data: &[u8]) -> Option<Range<usize>> {
    let exif = Reader::new().read_raw(data.to_vec()).ok()?;
    let offset = first_uint(&exif, Tag::StripOffsets)? as usize;
    let length = first_uint(&exif, Tag::StripByteCounts)? as usize;
    let end = offset.checked_add(length)?;
    (length > 0 && end <= data.len()).then_some(offset..end)
}

fn first_uint(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}
