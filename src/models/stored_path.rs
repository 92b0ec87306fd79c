//! Lossless serde representation for paths and file names.
//!
//! UTF-8 values are stored as plain strings. Anything else keeps its native
//! encoding: raw bytes on Unix (`{"unix_bytes": [...]}`) and UTF-16 code units
//! on Windows (`{"windows_wide": [...]}`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ffi::{OsStr, OsString};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredText {
    Text(String),
    #[cfg(unix)]
    Bytes { unix_bytes: Vec<u8> },
    #[cfg(windows)]
    Wide { windows_wide: Vec<u16> },
}

impl From<&OsStr> for StoredText {
    fn from(value: &OsStr) -> Self {
        if let Some(text) = value.to_str() {
            return StoredText::Text(text.to_string());
        }

        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            StoredText::Bytes {
                unix_bytes: value.as_bytes().to_vec(),
            }
        }
        #[cfg(windows)]
        {
            use std::os::windows::ffi::OsStrExt;
            StoredText::Wide {
                windows_wide: value.encode_wide().collect(),
            }
        }
        #[cfg(not(any(unix, windows)))]
        {
            StoredText::Text(value.to_string_lossy().into_owned())
        }
    }
}

impl From<StoredText> for OsString {
    fn from(value: StoredText) -> Self {
        match value {
            StoredText::Text(text) => OsString::from(text),
            #[cfg(unix)]
            StoredText::Bytes { unix_bytes } => {
                use std::os::unix::ffi::OsStringExt;
                OsString::from_vec(unix_bytes)
            }
            #[cfg(windows)]
            StoredText::Wide { windows_wide } => {
                use std::os::windows::ffi::OsStringExt;
                OsString::from_wide(&windows_wide)
            }
        }
    }
}

/// # Errors
/// Propagates the serializer's error.
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<OsStr>,
    S: Serializer,
{
    StoredText::from(value.as_ref()).serialize(serializer)
}

/// # Errors
/// Fails when the value is neither a string nor a native-encoding object.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: From<OsString>,
    D: Deserializer<'de>,
{
    let stored = StoredText::deserialize(deserializer)?;
    Ok(T::from(OsString::from(stored)))
}
