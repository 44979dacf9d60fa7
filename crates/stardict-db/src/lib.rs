//! Load StarDict dictionaries (`.ifo`, `.idx`, `.dict` / `.dict.dz`).
//!
//! The `.idx` file is a packed sequence of `{word}\0{offset: u32 BE}{size:
//! u32 BE}` records; each `(offset, size)` pair addresses a definition blob in
//! the `.dict` file. The data file may be gzip/dictzip-compressed, chosen by
//! its extension (`.dz` or `.gz`). Plain data files can be memory-mapped or
//! read into an owned buffer at runtime via [`LoadMode`].
//!
//! Parsing is lenient where the format allows it: a headword that is not valid
//! UTF-8 drops its record, and a record truncated at end of file ends the index.
//! Definitions are decoded lossily; the leading type byte of each blob is
//! discarded.
//!
//! # Example
//! ```no_run
//! use stardict_db::{Definition, DictPaths, LoadMode, StarDict};
//!
//! # fn main() -> anyhow::Result<()> {
//! let paths = DictPaths::new("vocabulary_sources/ArmRus_1.28", "ArmRus_1.28");
//! let dict = StarDict::load_with_mode(&paths, LoadMode::Mmap)?;
//! println!("{:?} headwords declared", dict.metadata().word_count());
//! for (entry, definition) in dict.iter_definitions() {
//!     if let Definition::Text(text) = definition {
//!         println!("{}: {}", entry.word, text);
//!     }
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p stardict-db --example stats -- <dir> <stem>`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use tracing::debug;
use vocab_types::IndexEntry;

const OFFSET_LEN: usize = 4;
const SIZE_LEN: usize = 4;

/// Strategy for loading uncompressed dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Locations of the three files making up one dictionary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictPaths {
    pub ifo: PathBuf,
    pub idx: PathBuf,
    pub dict: PathBuf,
}

impl DictPaths {
    /// `<dir>/<stem>.ifo`, `<dir>/<stem>.idx`, `<dir>/<stem>.dict.dz`.
    pub fn new(dir: impl AsRef<Path>, stem: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            ifo: dir.join(format!("{stem}.ifo")),
            idx: dir.join(format!("{stem}.idx")),
            dict: dir.join(format!("{stem}.dict.dz")),
        }
    }

    /// Paths that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.ifo, &self.idx, &self.dict]
            .into_iter()
            .map(PathBuf::as_path)
            .filter(|p| !p.exists())
            .collect()
    }
}

/// `key=value` header from the `.ifo` file.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    fields: HashMap<String, String>,
}

impl Metadata {
    pub fn parse(text: &str) -> Self {
        let fields = text
            .lines()
            .filter_map(|line| line.trim().split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        Self { fields }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Declared headword count (`wordcount=`).
    pub fn word_count(&self) -> Option<u64> {
        self.get("wordcount").and_then(|v| v.parse().ok())
    }

    pub fn book_name(&self) -> Option<&str> {
        self.get("bookname")
    }
}

/// Outcome of scanning an `.idx` buffer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexScan {
    pub entries: Vec<IndexEntry>,
    /// Records dropped because the headword was not UTF-8.
    pub invalid_words: usize,
    /// Whether the buffer ended inside a record.
    pub truncated: bool,
}

/// Parse packed index records until the end of `bytes`.
pub fn parse_index(bytes: &[u8]) -> IndexScan {
    let mut scan = IndexScan::default();
    let mut pos = 0usize;
    while pos < bytes.len() {
        let Some(nul) = bytes[pos..].iter().position(|b| *b == 0) else {
            scan.truncated = true;
            break;
        };
        let word_bytes = &bytes[pos..pos + nul];
        let fields_start = pos + nul + 1;
        let fields_end = fields_start + OFFSET_LEN + SIZE_LEN;
        if fields_end > bytes.len() {
            scan.truncated = true;
            break;
        }
        pos = fields_end;

        let Ok(word) = std::str::from_utf8(word_bytes) else {
            scan.invalid_words += 1;
            continue;
        };
        let offset = read_u32_be(&bytes[fields_start..fields_start + OFFSET_LEN]);
        let size = read_u32_be(&bytes[fields_start + OFFSET_LEN..fields_end]);
        scan.entries.push(IndexEntry {
            word: word.to_string(),
            offset,
            size,
        });
    }
    scan
}

fn read_u32_be(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}

/// Decoded definition blob for one index entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Definition<'a> {
    /// Lossily decoded text after the type byte, trimmed.
    Text(Cow<'a, str>),
    /// Blob of zero or one byte, or whitespace only after decoding.
    Empty,
    /// `(offset, size)` points past the end of the data file.
    OutOfRange,
}

/// Decode the blob addressed by `entry` inside `data`.
pub fn decode_definition<'a>(data: &'a [u8], entry: &IndexEntry) -> Definition<'a> {
    let start = entry.offset as usize;
    let Some(end) = start.checked_add(entry.size as usize) else {
        return Definition::OutOfRange;
    };
    let Some(blob) = data.get(start..end) else {
        return Definition::OutOfRange;
    };
    if blob.len() <= 1 {
        return Definition::Empty;
    }
    let text = match String::from_utf8_lossy(&blob[1..]) {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
    };
    if text.is_empty() {
        Definition::Empty
    } else {
        Definition::Text(text)
    }
}

/// In-memory view of a StarDict dictionary.
pub struct StarDict {
    metadata: Metadata,
    index: IndexScan,
    data: Buffer,
}

impl StarDict {
    /// Load a dictionary, memory-mapping uncompressed files.
    pub fn load(paths: &DictPaths) -> Result<Self> {
        Self::load_with_mode(paths, LoadMode::Mmap)
    }

    /// Load a dictionary choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(paths: &DictPaths, mode: LoadMode) -> Result<Self> {
        if let Some(path) = paths.missing().first() {
            anyhow::bail!("missing required StarDict file: {}", path.display());
        }

        let metadata = Metadata::load(&paths.ifo)?;
        let idx = load_file(&paths.idx, mode)?;
        let index = parse_index(idx.as_slice());
        debug!(
            "{}: {} index records, {} invalid headwords, truncated: {}",
            paths.idx.display(),
            index.entries.len(),
            index.invalid_words,
            index.truncated
        );
        let data = load_data(&paths.dict, mode)?;

        Ok(Self {
            metadata,
            index,
            data,
        })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Index records in file order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.index.entries
    }

    /// Records dropped while parsing the index because the headword was not UTF-8.
    pub fn invalid_words(&self) -> usize {
        self.index.invalid_words
    }

    /// Size of the (decompressed) data file in bytes.
    pub fn data_len(&self) -> usize {
        self.data.as_slice().len()
    }

    pub fn definition(&self, entry: &IndexEntry) -> Definition<'_> {
        decode_definition(self.data.as_slice(), entry)
    }

    /// Iterate over every index entry with its decoded definition.
    pub fn iter_definitions(&self) -> impl Iterator<Item = (&IndexEntry, Definition<'_>)> + '_ {
        self.index
            .entries
            .iter()
            .map(|entry| (entry, self.definition(entry)))
    }
}

fn is_compressed(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("dz" | "gz")
    )
}

fn load_data(path: &Path, mode: LoadMode) -> Result<Buffer> {
    if !is_compressed(path) {
        return load_file(path, mode);
    }
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut buf = Vec::new();
    MultiGzDecoder::new(file)
        .read_to_end(&mut buf)
        .with_context(|| format!("decompress {}", path.display()))?;
    Ok(Buffer::Owned(buf))
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &[u8], offset: u32, size: u32) -> Vec<u8> {
        let mut out = word.to_vec();
        out.push(0);
        out.extend_from_slice(&offset.to_be_bytes());
        out.extend_from_slice(&size.to_be_bytes());
        out
    }

    #[test]
    fn parses_single_record() {
        let scan = parse_index(b"abc\x00\x00\x00\x00\x05\x00\x00\x00\x03");
        assert_eq!(
            scan.entries,
            vec![IndexEntry {
                word: "abc".into(),
                offset: 5,
                size: 3
            }]
        );
        assert!(!scan.truncated);
    }

    #[test]
    fn drops_truncated_tail() {
        let mut bytes = record("տուն".as_bytes(), 0, 10);
        bytes.extend_from_slice(b"half\x00\x00\x00");
        let scan = parse_index(&bytes);
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].word, "տուն");
        assert!(scan.truncated);
    }

    #[test]
    fn unterminated_word_ends_index() {
        let mut bytes = record(b"a", 1, 2);
        bytes.extend_from_slice(b"dangling");
        let scan = parse_index(&bytes);
        assert_eq!(scan.entries.len(), 1);
        assert!(scan.truncated);
    }

    #[test]
    fn skips_invalid_utf8_and_stays_aligned() {
        let mut bytes = record(b"\xff\xfe", 0, 4);
        bytes.extend(record(b"ok", 4, 6));
        let scan = parse_index(&bytes);
        assert_eq!(scan.invalid_words, 1);
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].offset, 4);
        assert_eq!(scan.entries[0].size, 6);
    }

    #[test]
    fn discards_type_byte() {
        let data = b"xmhello  ";
        let entry = IndexEntry {
            word: "w".into(),
            offset: 1,
            size: 8,
        };
        assert_eq!(
            decode_definition(data, &entry),
            Definition::Text(Cow::Borrowed("hello"))
        );
    }

    #[test]
    fn classifies_empty_and_out_of_range_blobs() {
        let data = b"m ";
        let empty = IndexEntry {
            word: "e".into(),
            offset: 0,
            size: 1,
        };
        let blank = IndexEntry {
            word: "b".into(),
            offset: 0,
            size: 2,
        };
        let past_end = IndexEntry {
            word: "p".into(),
            offset: 1,
            size: 5,
        };
        assert_eq!(decode_definition(data, &empty), Definition::Empty);
        assert_eq!(decode_definition(data, &blank), Definition::Empty);
        assert_eq!(decode_definition(data, &past_end), Definition::OutOfRange);
    }

    #[test]
    fn replaces_malformed_utf8() {
        let data = b"m\xffok";
        let entry = IndexEntry {
            word: "w".into(),
            offset: 0,
            size: 4,
        };
        let Definition::Text(text) = decode_definition(data, &entry) else {
            panic!("expected text");
        };
        assert_eq!(text, "\u{FFFD}ok");
    }

    #[test]
    fn parses_metadata() {
        let meta = Metadata::parse("StarDict's dict ifo file\nversion=2.4.2\nwordcount=42\nbookname = ArmRus\n");
        assert_eq!(meta.word_count(), Some(42));
        assert_eq!(meta.book_name(), Some("ArmRus"));
        assert_eq!(meta.get("version"), Some("2.4.2"));
    }
}
