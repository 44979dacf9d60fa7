//! Page sources: where positioned spans come from.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::debug;
use vocab_types::{Page, Span};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(
        "`{program}` not found: PDF parsing requires poppler's pdftotext \
         (install it with `apt install poppler-utils` or `brew install poppler`)"
    )]
    MissingTool { program: String },
    #[error("`{program}` failed ({status}): {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("malformed layout output: {0}")]
    Malformed(String),
    #[error("failed to run layout tool: {0}")]
    Io(#[from] io::Error),
}

/// Anything that can produce the positioned spans of a document.
pub trait SpanSource {
    fn pages(&self) -> Result<Vec<Page>, DocumentError>;

    /// False when the underlying document is absent and should be skipped.
    fn is_available(&self) -> bool {
        true
    }
}

impl SpanSource for Vec<Page> {
    fn pages(&self) -> Result<Vec<Page>, DocumentError> {
        Ok(self.clone())
    }
}

/// Reads a PDF through poppler's `pdftotext -bbox-layout`.
///
/// Each layout block becomes one [`Span`]: its box is the block box and its
/// text is the block's lines joined by `\n` (words within a line joined by a
/// space).
#[derive(Clone, Debug)]
pub struct PdfToText {
    program: PathBuf,
    pdf: PathBuf,
}

impl PdfToText {
    pub fn new(pdf: impl AsRef<Path>) -> Self {
        Self {
            program: PathBuf::from("pdftotext"),
            pdf: pdf.as_ref().to_path_buf(),
        }
    }

    /// Use a specific executable instead of `pdftotext` from `PATH`.
    pub fn with_program(mut self, program: impl AsRef<Path>) -> Self {
        self.program = program.as_ref().to_path_buf();
        self
    }
}

impl SpanSource for PdfToText {
    fn is_available(&self) -> bool {
        self.pdf.exists()
    }

    fn pages(&self) -> Result<Vec<Page>, DocumentError> {
        let program = self.program.display().to_string();
        debug!("running {program} -bbox-layout on {}", self.pdf.display());
        let output = Command::new(&self.program)
            .args(["-bbox-layout", "-enc", "UTF-8"])
            .arg(&self.pdf)
            .arg("-")
            .output()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => DocumentError::MissingTool {
                    program: program.clone(),
                },
                _ => DocumentError::Io(err),
            })?;
        if !output.status.success() {
            return Err(DocumentError::ToolFailed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_bbox_layout(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Default)]
struct BlockBuilder {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    lines: Vec<String>,
}

impl BlockBuilder {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, DocumentError> {
        let mut block = BlockBuilder::default();
        let mut seen = 0u8;
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DocumentError::Malformed(e.to_string()))?;
            let slot = match attr.key.as_ref() {
                b"xMin" => &mut block.x0,
                b"yMin" => &mut block.y0,
                b"xMax" => &mut block.x1,
                b"yMax" => &mut block.y1,
                _ => continue,
            };
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| DocumentError::Malformed(e.to_string()))?;
            *slot = raw
                .parse()
                .map_err(|_| DocumentError::Malformed(format!("bad coordinate {raw:?}")))?;
            seen += 1;
        }
        if seen < 4 {
            return Err(DocumentError::Malformed(
                "block without full bounding box".into(),
            ));
        }
        Ok(block)
    }

    fn into_span(self) -> Span {
        Span::new(self.x0, self.y0, self.x1, self.y1, self.lines.join("\n"))
    }
}

/// Parse the XHTML written by `pdftotext -bbox-layout` into pages of block spans.
pub fn parse_bbox_layout(xhtml: &str) -> Result<Vec<Page>, DocumentError> {
    let mut reader = Reader::from_str(xhtml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Page> = Vec::new();
    let mut block: Option<BlockBuilder> = None;
    let mut line: Option<Vec<String>> = None;
    let mut word: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Malformed(e.to_string()))?;
        match event {
            Event::Start(start) => match start.name().as_ref() {
                b"page" => pages.push(Page {
                    number: pages.len() + 1,
                    spans: Vec::new(),
                }),
                b"block" => block = Some(BlockBuilder::from_start(&start)?),
                b"line" => line = Some(Vec::new()),
                b"word" => word = Some(String::new()),
                _ => {}
            },
            Event::Text(text) => {
                if let Some(buf) = word.as_mut() {
                    let decoded = text
                        .unescape()
                        .map_err(|e| DocumentError::Malformed(e.to_string()))?;
                    buf.push_str(&decoded);
                }
            }
            Event::End(end) => match end.name().as_ref() {
                b"word" => {
                    if let (Some(text), Some(words)) = (word.take(), line.as_mut())
                        && !text.is_empty()
                    {
                        words.push(text);
                    }
                }
                b"line" => {
                    if let (Some(words), Some(b)) = (line.take(), block.as_mut())
                        && !words.is_empty()
                    {
                        b.lines.push(words.join(" "));
                    }
                }
                b"block" => {
                    if let (Some(b), Some(page)) = (block.take(), pages.last_mut())
                        && !b.lines.is_empty()
                    {
                        page.spans.push(b.into_span());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if block.is_some() || line.is_some() {
        return Err(DocumentError::Malformed("unterminated block".into()));
    }
    let spans: usize = pages.iter().map(|p| p.spans.len()).sum();
    debug!("parsed {} pages, {spans} spans", pages.len());
    Ok(pages)
}
