//! Error types for the extraction and compositing pipeline.
//!
//! Per-object failures (anchor resolution, image decode, text rendering) are
//! recoverable: callers log them and degrade the affected object without
//! aborting sibling processing. Only workbook-structure and I/O failures
//! terminate a run.

use thiserror::Error;

/// Errors raised while extracting drawing objects and rendering composites.
#[derive(Error, Debug)]
pub enum SheetVizError {
    /// Malformed or unsupported anchor. Recovered locally by substituting a
    /// degenerate zero-size box for the affected object.
    #[error("Anchor resolution error: {0}")]
    AnchorResolution(String),

    /// Drawing XML missing, malformed, or structurally unexpected. Recovered
    /// by yielding an empty shape set for the affected sheet.
    #[error("Drawing parse error: {0}")]
    DrawingParse(String),

    /// Embedded bytes not decodable as an image. The object is excluded from
    /// overlap and composite analysis; its raw bytes are still saved.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// A flattened composite could not be encoded.
    #[error("Image encode error: {0}")]
    ImageEncode(String),

    /// No usable font could be loaded for text rendering.
    #[error("Font resolution error: {0}")]
    FontResolution(String),

    /// Measurement or draw failure for shape text. Only that text is skipped.
    #[error("Text render error: {0}")]
    TextRender(String),

    /// The workbook cannot be opened or its basic structure is missing.
    /// Not recoverable.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for [`Result<T, SheetVizError>`].
pub type Result<T> = std::result::Result<T, SheetVizError>;
