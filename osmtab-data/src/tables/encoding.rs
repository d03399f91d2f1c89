//! Output character encodings for table files.
use std::borrow::Cow;

use encoding_rs::Encoding;
use thiserror::Error;

/// Label of the code page used when none is configured.
pub const DEFAULT_ENCODING_LABEL: &str = "windows-1251";

/// Errors raised when resolving an output encoding label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputEncodingError {
    /// The label does not name any known encoding.
    #[error("unknown output encoding {label:?}")]
    Unknown {
        /// Label as supplied by the caller.
        label: String,
    },
    /// The encoding can be decoded but not produced (for example UTF-16).
    #[error("encoding {label:?} cannot be used for output")]
    Unsupported {
        /// Label as supplied by the caller.
        label: String,
    },
}

/// Character encoding applied to every field written to a table.
///
/// # Examples
/// ```
/// use osmtab_data::tables::OutputEncoding;
///
/// let encoding = OutputEncoding::default();
/// assert_eq!(encoding.name(), "windows-1251");
/// assert_eq!(encoding.encode("Да").as_deref(), Ok(&[0xC4, 0xE0][..]));
/// assert_eq!(encoding.encode("東"), Err('東'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEncoding {
    encoding: &'static Encoding,
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1251,
        }
    }
}

impl OutputEncoding {
    /// Resolve a WHATWG encoding label such as `windows-1251` or `cp1251`.
    pub fn for_label(label: &str) -> Result<Self, OutputEncodingError> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            OutputEncodingError::Unknown {
                label: label.to_owned(),
            }
        })?;
        if encoding.output_encoding() != encoding {
            return Err(OutputEncodingError::Unsupported {
                label: label.to_owned(),
            });
        }
        Ok(Self { encoding })
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.encoding.name()
    }

    /// Encode `text`, returning the first unrepresentable character on
    /// failure.
    pub fn encode(self, text: &str) -> Result<Cow<'_, [u8]>, char> {
        let (bytes, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable {
            return Err(self.first_unmappable(text).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        Ok(bytes)
    }

    fn first_unmappable(self, text: &str) -> Option<char> {
        let mut buffer = [0_u8; 4];
        text.chars().find(|character| {
            let (_, _, had_unmappable) = self.encoding.encode(character.encode_utf8(&mut buffer));
            had_unmappable
        })
    }
}
