//! Content sniffing for previews

/// Bytes examined for type detection and returned as preview text
pub const PREVIEW_BYTES: usize = 10_000;

/// Characters examined when sniffing a delimiter
const SNIFF_CHARS: usize = 1_000;

const MAGIC: [(&[u8], &str); 5] = [
    (&[0x1f, 0x8b], "gzip"),
    (b"BZh", "bz2"),
    (&[0xfd, b'7', b'z', b'X', b'Z', 0x00], "xz"),
    (b"PK\x03\x04", "zip"),
    (b"PAR1", "parquet"),
];

/// Detected type of an object head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub file_type: String,
    pub delimiter: Option<char>,
}

/// Returns the binary format named by the magic bytes, if any
pub fn magic_type(data: &[u8]) -> Option<&'static str> {
    MAGIC
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|(_, name)| *name)
}

/// Picks `\t` or `,` when the first line splits on it
pub fn sniff_delimiter(text: &str) -> Option<char> {
    let sample: String = text.chars().take(SNIFF_CHARS).collect();
    let first_line = sample.lines().next()?;
    ['\t', ','].into_iter().find(|c| first_line.contains(*c))
}

/// Detects the type of an object from its first bytes
pub fn detect(data: &[u8]) -> Detection {
    if let Some(name) = magic_type(data) {
        return Detection {
            file_type: name.to_string(),
            delimiter: None,
        };
    }
    if data.is_empty() {
        return Detection {
            file_type: "application/x-empty".to_string(),
            delimiter: None,
        };
    }
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        // Head cut mid-character
        Err(err) if err.error_len().is_none() => {
            std::str::from_utf8(&data[..err.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => {
            return Detection {
                file_type: "application/octet-stream".to_string(),
                delimiter: None,
            }
        }
    };

    match sniff_delimiter(text) {
        Some('\t') => Detection {
            file_type: "tsv".to_string(),
            delimiter: Some('\t'),
        },
        Some(delimiter) => Detection {
            file_type: format!("csv (delimiter: '{delimiter}')"),
            delimiter: Some(delimiter),
        },
        None => Detection {
            file_type: "text/plain".to_string(),
            delimiter: None,
        },
    }
}

/// Preview text for an object head; empty for binary formats
pub fn preview_text(data: &[u8]) -> String {
    if magic_type(data).is_some() {
        return String::new();
    }
    let head = &data[..data.len().min(PREVIEW_BYTES)];
    String::from_utf8_lossy(head).into_owned()
}
