use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel stored in a file's comment tag for tracks confirmed absent from
/// the remote service. A missing comment tag means the track was never
/// searched.
pub const UNAVAILABLE_URI: &str = "spotify:track:unavailable";

/// Remote identifier state of a local track.
///
/// `Unresolved` and `Unavailable` are distinct states: the first means no
/// search has produced an answer yet, the second that a search (or the user)
/// confirmed the track does not exist remotely. They serialize to JSON
/// `null` and `false` respectively so backup files round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Uri {
    #[default]
    Unresolved,
    Unavailable,
    Resolved(String),
}

impl Uri {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Uri::Resolved(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Uri::Unresolved)
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Uri::Unavailable)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Uri::Resolved(uri) => Some(uri),
            _ => None,
        }
    }

    /// Value to store in the file's comment tag, if any.
    pub fn tag_value(&self) -> Option<String> {
        match self {
            Uri::Unresolved => None,
            Uri::Unavailable => Some(UNAVAILABLE_URI.to_string()),
            Uri::Resolved(uri) => Some(uri.clone()),
        }
    }

    /// Interprets a comment tag value read from a file.
    pub fn from_tag_value(value: Option<&str>) -> Self {
        match value {
            None => Uri::Unresolved,
            Some(v) if v == UNAVAILABLE_URI => Uri::Unavailable,
            Some(v) if v.trim().is_empty() => Uri::Unresolved,
            Some(v) => Uri::Resolved(v.to_string()),
        }
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Uri::Unresolved => serializer.serialize_none(),
            Uri::Unavailable => serializer.serialize_bool(false),
            Uri::Resolved(uri) => serializer.serialize_str(uri),
        }
    }
}

struct UriVisitor;

impl<'de> Visitor<'de> for UriVisitor {
    type Value = Uri;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, false, or a URI string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Uri, E> {
        Ok(Uri::Unresolved)
    }

    fn visit_none<E: de::Error>(self) -> Result<Uri, E> {
        Ok(Uri::Unresolved)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Uri, D::Error> {
        deserializer.deserialize_any(UriVisitor)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Uri, E> {
        if value {
            Err(de::Error::invalid_value(
                de::Unexpected::Bool(true),
                &"null, false, or a URI string",
            ))
        } else {
            Ok(Uri::Unavailable)
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Uri, E> {
        Ok(Uri::Resolved(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Uri, D::Error> {
        deserializer.deserialize_any(UriVisitor)
    }
}

/// Metadata snapshot of one audio file in the local library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTrack {
    pub path: PathBuf,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub album_artist: String,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub disc_number: Option<u32>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Track length in seconds.
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub compilation: bool,
    #[serde(default)]
    pub uri: Uri,
}

impl LocalTrack {
    pub fn new(path: PathBuf) -> Self {
        LocalTrack {
            path,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            album_artist: String::new(),
            track_number: None,
            disc_number: None,
            year: None,
            genres: Vec::new(),
            length: 0.0,
            bpm: None,
            key: None,
            compilation: false,
            uri: Uri::Unresolved,
        }
    }
}
