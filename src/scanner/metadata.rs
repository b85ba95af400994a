//! Capture time and GPS position from EXIF.

use chrono::{DateTime, Local, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMetadata {
    pub taken_at: Option<NaiveDateTime>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
}

/// Read capture metadata from the file's EXIF block.
///
/// Never fails: a missing file, a file without EXIF, or malformed tags all
/// yield empty fields. The timestamp comes from `DateTimeOriginal`, falling
/// back to `DateTime`.
pub fn extract_capture_metadata(path: &Path) -> CaptureMetadata {
    let mut metadata = CaptureMetadata::default();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Cannot open image for EXIF");
            return metadata;
        }
    };

    let mut reader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No readable EXIF");
            return metadata;
        }
    };

    // Empty tags are skipped. The first non-empty one wins even when it fails
    // to parse, so a garbage DateTimeOriginal is not papered over by DateTime.
    metadata.taken_at = [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .iter()
        .filter_map(|tag| exif.get_field(*tag, exif::In::PRIMARY))
        .filter_map(|field| ascii_value(&field.value).filter(|s| !s.is_empty()))
        .next()
        .and_then(|s| parse_exif_datetime(&s));

    if let (Some(lat_field), Some(lat_ref), Some(lon_field), Some(lon_ref)) = (
        exif.get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY),
        exif.get_field(exif::Tag::GPSLatitudeRef, exif::In::PRIMARY),
        exif.get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY),
        exif.get_field(exif::Tag::GPSLongitudeRef, exif::In::PRIMARY),
    ) {
        if let (Some(lat), Some(lon)) = (dms_value(&lat_field.value), dms_value(&lon_field.value)) {
            let lat_ref = ascii_value(&lat_ref.value).unwrap_or_default();
            let lon_ref = ascii_value(&lon_ref.value).unwrap_or_default();

            metadata.gps_latitude = Some(if lat_ref.eq_ignore_ascii_case("S") { -lat } else { lat });
            metadata.gps_longitude = Some(if lon_ref.eq_ignore_ascii_case("W") { -lon } else { lon });
        }
    }

    metadata
}

/// The first string of an ASCII value, trimmed of padding.
fn ascii_value(value: &exif::Value) -> Option<String> {
    match value {
        exif::Value::Ascii(strings) => strings.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        }),
        _ => None,
    }
}

pub fn parse_exif_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), EXIF_DATETIME_FORMAT).ok()
}

fn rational_to_f64(r: &exif::Rational) -> Option<f64> {
    if r.denom == 0 {
        None
    } else {
        Some(r.num as f64 / r.denom as f64)
    }
}

fn dms_value(value: &exif::Value) -> Option<f64> {
    match value {
        exif::Value::Rational(parts) if parts.len() >= 3 => Some(dms_to_decimal(
            rational_to_f64(&parts[0])?,
            rational_to_f64(&parts[1])?,
            rational_to_f64(&parts[2])?,
        )),
        _ => None,
    }
}

pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Modification time of the file in local time, the last-resort capture time.
pub fn file_modified_time(path: &Path) -> Option<NaiveDateTime> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.naive_local())
}
