use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 撮影日時（`YYYY-MM-DD HH:MM:SS`）
pub fn extract_date(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut bufreader)?;

    for tag in [exif::Tag::DateTimeOriginal, exif::Tag::DateTime] {
        if let Some(field) = exif.get_field(tag, exif::In::PRIMARY) {
            return Ok(field.display_value().to_string());
        }
    }

    Err("No date found in EXIF".into())
}
