//! Parse diagnostics.
//!
//! Wavefront files in the wild are full of small format violations that every reader is expected
//! to shrug off: a stray directive, a face with a dangling reference, an `-o`/`-s`/`-bm` with the
//! wrong argument count. [`Diagnostic`] exists to give those situations a structured shape for
//! logging, not to be returned: [`crate::import`] never produces a `Result`, it logs a
//! [`Diagnostic`] through the `log` crate and moves on.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// 1-based, inclusive line range a [`Diagnostic`] refers to, for multi-line directives joined by
/// a trailing backslash.
pub type LineRange = Range<u32>;

pub(crate) fn fmt_line_range(lines: &LineRange) -> String {
    if lines.end.saturating_sub(lines.start) <= 1 {
        format!("line {}", lines.start)
    } else {
        format!("lines {}-{}", lines.start, lines.end - 1)
    }
}

struct LineRangeDisplay<'a>(&'a LineRange);

impl fmt::Display for LineRangeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_line_range(self.0))
    }
}

#[rustfmt::skip]
#[derive(Error, Debug)]
pub enum Diagnostic {
    #[error("could not open '{path}': {source}")]
    FileOpenError { path: String, #[source] source: std::io::Error },

    #[error("'{directive}' on {} has invalid number(s)", LineRangeDisplay(lines))]
    NumberParseError { lines: LineRange, directive: &'static str },

    #[error("'{directive}' on {} has {n} of required {min} values", LineRangeDisplay(lines))]
    TooFewValues { lines: LineRange, directive: &'static str, n: usize, min: usize },

    #[error("'f' directive on {} has invalid vertex index", LineRangeDisplay(lines))]
    FaceIndexParseError { lines: LineRange },

    #[error("'f' directive on {} has {n} corners, but minimum is 3", LineRangeDisplay(lines))]
    FaceTooFewCorners { lines: LineRange, n: usize },

    #[error("'f' directive on {} references '{list}' index {idx}, out of range for length {len}", LineRangeDisplay(lines))]
    FaceIndexOutOfRange { lines: LineRange, list: &'static str, idx: i64, len: usize },

    #[error("'l' directive on {} has fewer than 2 indices", LineRangeDisplay(lines))]
    EdgeTooFewIndices { lines: LineRange },

    #[error("unknown directive '{directive}' on {}, skipping", LineRangeDisplay(lines))]
    UnknownDirective { lines: LineRange, directive: String },

    #[error("'{option}' on {} expected {expected} argument(s)", LineRangeDisplay(lines))]
    TextureMapOptionArity { lines: LineRange, option: &'static str, expected: usize },

    #[error("material '{name}' on {} is missing a preceding 'newmtl'", LineRangeDisplay(lines))]
    MaterialPropertyWithoutNewmtl { lines: LineRange, name: &'static str },

    #[error("could not resolve mtllib path '{path}' relative to '{base}'")]
    MtlLibNotFound { path: String, base: String },

    #[error("duplicate material found for '{name}', using the last")]
    DuplicateMaterial { name: String },
}

impl Diagnostic {
    pub(crate) fn too_few(lines: LineRange, directive: &'static str, n: usize, min: usize) -> Self {
        Self::TooFewValues { lines, directive, n, min }
    }

    pub(crate) fn face_index_range(lines: LineRange, list: &'static str, idx: i64, len: usize) -> Self {
        Self::FaceIndexOutOfRange { lines, list, idx, len }
    }

    pub(crate) fn unknown(lines: LineRange, directive: &str) -> Self {
        Self::UnknownDirective { lines, directive: directive.to_owned() }
    }
}

/// Logs `diag` at the severity its variant warrants. Parse-local issues that simply drop a line
/// are `warn!`; anything that could silently corrupt the whole import is `error!`.
pub(crate) fn report(diag: &Diagnostic) {
    match diag {
        Diagnostic::FileOpenError { .. } | Diagnostic::MtlLibNotFound { .. } => log::error!("{diag}"),
        _ => log::warn!("{diag}"),
    }
}
