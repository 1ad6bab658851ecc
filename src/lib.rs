//! Convert plain text and Word `.docx` documents into paginated PDFs.
//!
//! The heart of the crate is [layout]: a greedy line breaker and a paginator
//! that know nothing about fonts or PDFs beyond a width function. Around it sit
//! text [extract]ion, a small PDF [renderer](PdfRenderer), the [Converter]
//! pipeline that joins them, and an HTTP [server] for uploads.

mod units;
pub use units::*;

/// Common page sizes
pub mod pagesize;

mod error;
pub use error::*;

/// Line breaking and pagination
pub mod layout;

mod metrics;
pub use metrics::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

pub(crate) mod refs;

mod page;

mod document;
pub use document::*;

pub mod extract;
pub use extract::{ExtractError, SourceKind};

mod convert;
pub use convert::*;

pub mod config;

pub mod server;

/// Re-export PDF-writer functionality
pub use pdf_writer;
