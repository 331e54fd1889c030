//! Reading and writing exchange files picked by the user.

use crate::error::Result;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use log::info;
use std::fs;
use std::path::Path;

/// Writes `content` to `path`, replacing an existing file.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Reads a whole UTF-8 file. A leading byte-order mark is dropped.
pub fn read_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

fn audio_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Encodes an audio file as a self-contained `data:` URL, the stored form of card audio.
pub fn audio_data_url(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        audio_mime(path),
        BASE64.encode(bytes)
    ))
}
