use crate::{DocValue, statics};
use anyhow::Context;
use indexmap::IndexMap;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

/// A loaded JSON document: the top-level attribute mapping plus everything
/// needed to write it back faithfully. Original bytes are retained so an
/// unmodified document saves back byte-for-byte.
#[derive(Debug, Clone)]
pub struct LoadedDoc {
    pub source_path: Option<PathBuf>,
    pub line_ending: LineEnding,
    pub original_bytes: Vec<u8>,
    pub fields: IndexMap<String, DocValue>,
    pub dirty: bool,
}

impl LoadedDoc {
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        let line_ending = detect_line_ending(&bytes);

        let text = std::str::from_utf8(&bytes).context("file is not valid UTF-8")?;
        let root = DocValue::parse_json(text).context("parsing JSON")?;

        let type_name = root.type_name();
        let Some(fields) = root.into_object() else {
            anyhow::bail!("top-level JSON value is {type_name}, expected an object");
        };

        tracing::info!(path = %path.display(), fields = fields.len(), "loaded document");

        Ok(Self {
            source_path: Some(path.to_path_buf()),
            line_ending,
            original_bytes: bytes,
            fields,
            dirty: false,
        })
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Bytes to write on save: the original bytes while unmodified (the
    /// byte-for-byte roundtrip guarantee), a fresh serialization once dirty.
    pub fn save_bytes(&self) -> Vec<u8> {
        if !self.dirty {
            return self.original_bytes.clone();
        }
        self.generate_bytes()
    }

    /// Serialize the current mapping regardless of `dirty` state, with the
    /// line-ending style detected at load time.
    pub fn generate_bytes(&self) -> Vec<u8> {
        let newline = match self.line_ending {
            LineEnding::Lf => statics::NL_LF,
            LineEnding::CrLf => statics::NL_CRLF,
        };
        let root = DocValue::Object(self.fields.clone());
        root.to_pretty_with_newline(newline).into_bytes()
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let bytes = self.save_bytes();
        write_atomic(path, &bytes)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved document");

        self.source_path = Some(path.to_path_buf());
        self.original_bytes = bytes;
        self.dirty = false;
        Ok(())
    }
}

/// Write to a temp file in the destination directory, then persist over the
/// target, so a crash mid-write never leaves a truncated document behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    // The temp file must share the destination's filesystem for the rename.
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file for {path:?}"))?;

    tmp.write_all(bytes)
        .with_context(|| format!("writing {path:?}"))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {path:?}"))?;
    Ok(())
}

fn detect_line_ending(text_bytes: &[u8]) -> LineEnding {
    // Detect by counting actual newline terminators.
    // Using "any CRLF anywhere" can mis-detect if the file contains occasional CRLF
    // sequences for reasons other than line endings (or has a few mixed lines).
    let mut lf_count = 0usize;
    let mut crlf_count = 0usize;

    for (i, b) in text_bytes.iter().enumerate() {
        if *b != b'\n' {
            continue;
        }
        if i > 0 && text_bytes[i - 1] == b'\r' {
            crlf_count += 1;
        } else {
            lf_count += 1;
        }
    }

    if crlf_count > lf_count {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}
