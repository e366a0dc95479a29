//! Resolver list loading.
//!
//! The list is CSV: one resolver per line, display name first, address
//! second. Fields are trimmed, may be double-quoted (`""` escapes a quote)
//! and extra trailing fields are ignored. Every record must have the same
//! number of fields as the first one.
//!
//! ```text
//! Google, 8.8.8.8
//! Cloudflare, 1.1.1.1
//! "Quad9, primary", 9.9.9.9
//! ```
//!
//! One bad record fails the whole list.

use crate::base::checkerror::CheckError;
use crate::base::context::IoResultExt;
use crate::dns::ResolverEndpoint;
use std::{
    fmt,
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
};

/// Alias for the `Future` type returned by an [`EndpointSource`].
pub type Loading<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ResolverEndpoint>, CheckError>> + Send + 'a>>;

/// Provider of the resolver list for one request.
pub trait EndpointSource: Send + Sync {
    fn endpoints(&self) -> Loading<'_>;
}

impl<S: EndpointSource + ?Sized> EndpointSource for Arc<S> {
    fn endpoints(&self) -> Loading<'_> {
        (**self).endpoints()
    }
}

/// Resolver list read from a CSV file on every call, so edits apply to the
/// next request without a restart.
#[derive(Clone, Debug)]
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EndpointSource for CsvFile {
    fn endpoints(&self) -> Loading<'_> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path)
                .await
                .config_context(&self.path)?;

            let endpoints = parse_endpoint_list(&text).map_err(|e| {
                CheckError::config_load(self.path.display().to_string(), e.to_string())
            })?;

            tracing::debug!(path = %self.path.display(), count = endpoints.len(), "loaded resolver list");
            Ok(endpoints)
        })
    }
}

/// A fixed resolver list.
#[derive(Clone, Debug, Default)]
pub struct StaticEndpoints {
    endpoints: Arc<[ResolverEndpoint]>,
}

impl StaticEndpoints {
    pub fn new(endpoints: Vec<ResolverEndpoint>) -> Self {
        Self {
            endpoints: endpoints.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl EndpointSource for StaticEndpoints {
    fn endpoints(&self) -> Loading<'_> {
        let endpoints = self.endpoints.to_vec();
        Box::pin(std::future::ready(Ok(endpoints)))
    }
}

/// Why a resolver list could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    TooFewFields(usize),
    FieldCountMismatch { expected: usize, found: usize },
    BareQuote,
    UnterminatedQuote,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse dns list: line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::TooFewFields(found) => {
                write!(f, "expected at least 2 fields, found {found}")
            }
            ParseErrorKind::FieldCountMismatch { expected, found } => {
                write!(f, "wrong number of fields: expected {expected}, found {found}")
            }
            ParseErrorKind::BareQuote => f.write_str("bare \" in non-quoted field"),
            ParseErrorKind::UnterminatedQuote => f.write_str("unterminated quoted field"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a CSV resolver list.
pub fn parse_endpoint_list(text: &str) -> Result<Vec<ResolverEndpoint>, ParseError> {
    let mut endpoints = Vec::new();
    let mut expected_fields = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.is_empty() {
            continue;
        }

        let fields = split_record(raw).map_err(|kind| ParseError { line, kind })?;

        match expected_fields {
            None => expected_fields = Some(fields.len()),
            Some(expected) if expected != fields.len() => {
                return Err(ParseError {
                    line,
                    kind: ParseErrorKind::FieldCountMismatch {
                        expected,
                        found: fields.len(),
                    },
                });
            }
            Some(_) => {}
        }

        let [name, address, ..] = fields.as_slice() else {
            return Err(ParseError {
                line,
                kind: ParseErrorKind::TooFewFields(fields.len()),
            });
        };
        endpoints.push(ResolverEndpoint::new(name.trim(), address.trim()));
    }

    Ok(endpoints)
}

fn split_record(record: &str) -> Result<Vec<String>, ParseErrorKind> {
    let mut fields = Vec::new();
    let mut rest = record;

    loop {
        let (field, remainder) = if rest.starts_with('"') {
            quoted_field(&rest[1..])?
        } else {
            match rest.find(',') {
                Some(pos) => (rest[..pos].to_string(), Some(&rest[pos + 1..])),
                None => (rest.to_string(), None),
            }
        };

        if field.contains('"') && !rest.starts_with('"') {
            return Err(ParseErrorKind::BareQuote);
        }
        fields.push(field);

        match remainder {
            Some(next) => rest = next,
            None => return Ok(fields),
        }
    }
}

/// Parse the body of a quoted field; `body` starts just after the opening
/// quote. Returns the unescaped field and what follows its separator.
fn quoted_field(body: &str) -> Result<(String, Option<&str>), ParseErrorKind> {
    let mut field = String::new();
    let mut chars = body.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '"' {
            field.push(c);
            continue;
        }
        if let Some((_, '"')) = chars.peek() {
            field.push('"');
            chars.next();
            continue;
        }

        let after = &body[pos + 1..];
        let after_trimmed = after.trim_start();
        return match after_trimmed.strip_prefix(',') {
            Some(next) => Ok((field, Some(next))),
            None if after_trimmed.is_empty() => Ok((field, None)),
            None => Err(ParseErrorKind::BareQuote),
        };
    }

    Err(ParseErrorKind::UnterminatedQuote)
}
