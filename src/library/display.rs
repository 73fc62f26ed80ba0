use std::path::Path;
use std::time::Duration;

use crate::config::TrackDisplayField;

use super::model::file_stem;

/// Marker shown when a track's length is not known.
pub const UNKNOWN_DURATION: &str = "--:--";

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, path) in the
/// configured order and falls back to the file stem when no parts were produced.
pub fn display_from_fields(
    path: &Path,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    fn clean(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }

    let mut parts: Vec<String> = Vec::new();
    for f in fields {
        let part = match f {
            TrackDisplayField::Title => clean(title).map(str::to_string),
            TrackDisplayField::Artist => clean(artist).map(str::to_string),
            TrackDisplayField::Album => clean(album).map(str::to_string),
            TrackDisplayField::Filename => path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            TrackDisplayField::Path => Some(path.display().to_string()),
        };
        parts.extend(part);
    }

    if parts.is_empty() {
        file_stem(path)
    } else {
        parts.join(sep)
    }
}

/// `MM:SS`, minutes unbounded; `--:--` when unknown.
pub fn duration_label(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => {
            let secs = d.as_secs();
            format!("{:02}:{:02}", secs / 60, secs % 60)
        }
        None => UNKNOWN_DURATION.to_string(),
    }
}

/// Inverse of [`duration_label`]. Anything that is not `MM:SS` is unknown.
pub fn parse_duration_label(label: &str) -> Option<Duration> {
    let (mins, secs) = label.trim().split_once(':')?;
    let mins: u64 = mins.parse().ok()?;
    let secs: u64 = secs.parse().ok()?;
    if secs >= 60 {
        return None;
    }
    Some(Duration::from_secs(mins * 60 + secs))
}
