use crate::{InvalidEncodingError, OutOfBoundsError, ParseIndexError};
use core::fmt;

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 SyntaxError                                  ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯¯                                 ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that a pointer string is malformed or does not fit the schema it
/// was parsed against.
///
/// Raised only by [`Pointer::parse`](crate::Pointer::parse) and
/// [`Pointer::create_child_pointer`](crate::Pointer::create_child_pointer);
/// it never depends on record content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pointer: String,
    offset: usize,
    cause: Cause,
}

impl SyntaxError {
    pub(crate) fn new(pointer: impl Into<String>, offset: usize, cause: Cause) -> Self {
        Self {
            pointer: pointer.into(),
            offset,
            cause,
        }
    }

    /// The full pointer string that failed to parse.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Offset of the partial pointer starting with the token which caused
    /// the error.
    ///
    /// ```text
    /// "/items/first/quantity"
    ///        ↑
    ///        6
    /// ```
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The reason the pointer was rejected.
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The encoded token which caused the error, or the whole pointer if it
    /// lacks a leading slash.
    pub fn token(&self) -> &str {
        if self.cause == Cause::NoLeadingSlash {
            return &self.pointer;
        }
        let rest = self.pointer.get(self.offset + 1..).unwrap_or_default();
        rest.split('/').next().unwrap_or_default()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid json pointer \"{}\": {}", self.pointer, self.cause)
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::InvalidEncoding(source) => Some(source),
            Cause::InvalidIndex(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(feature = "miette")]
impl miette::Diagnostic for SyntaxError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.pointer)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let (offset, len) = match &self.cause {
            Cause::NoLeadingSlash => (0, 0),
            Cause::InvalidEncoding(source) => {
                let at = self.offset + 1 + source.offset;
                (at.saturating_sub(1), 2.min(self.pointer.len() - at + 1))
            }
            _ => (self.offset, self.token().len() + 1),
        };
        Some(Box::new(core::iter::once(miette::LabeledSpan::new(
            Some(self.cause.label().to_owned()),
            offset,
            len,
        ))))
    }
}

/// The reason a [`SyntaxError`] was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// A non-empty pointer did not start with a slash (`'/'`).
    NoLeadingSlash,
    /// A token contained invalid encoding (`~` not followed by `0` or `1`).
    InvalidEncoding(InvalidEncodingError),
    /// A token addressing an array element is neither a non-negative integer
    /// without leading zeros nor `-`.
    InvalidIndex(ParseIndexError),
    /// `-` was used where the caller disallowed it.
    DashNotAllowed,
    /// A token followed `-`, which addresses a position with nothing below it.
    AfterDash,
    /// A property token was applied to a value that has no properties.
    NotAnObject,
    /// No property by this name exists.
    UnknownProperty {
        /// The decoded property name.
        name: String,
    },
    /// A `subtype:property` token named an undeclared subtype.
    UnknownSubtype {
        /// The subtype name.
        subtype: String,
    },
    /// A `subtype:property` token named a property the subtype does not
    /// declare.
    UnknownSubtypeProperty {
        /// The subtype name.
        subtype: String,
        /// The property name.
        name: String,
    },
}

impl Cause {
    #[cfg_attr(not(feature = "miette"), allow(dead_code))]
    fn label(&self) -> &'static str {
        match self {
            Self::NoLeadingSlash => "must start with a slash ('/')",
            Self::InvalidEncoding(_) => "'~' must be followed by '0' or '1'",
            Self::InvalidIndex(_) => "expected an array index or '-'",
            Self::DashNotAllowed => "'-' is not allowed here",
            Self::AfterDash => "nothing may follow '-'",
            Self::NotAnObject => "value has no properties",
            Self::UnknownProperty { .. } => "unknown property",
            Self::UnknownSubtype { .. } => "unknown subtype",
            Self::UnknownSubtypeProperty { .. } => "subtype has no such property",
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLeadingSlash => {
                write!(f, "missing leading slash ('/') for non-empty pointer")
            }
            Self::InvalidEncoding(source) => write!(f, "{source}"),
            Self::InvalidIndex(source) => write!(f, "invalid array index: {source}"),
            Self::DashNotAllowed => write!(f, "array index '-' is not allowed"),
            Self::AfterDash => write!(f, "array index '-' must be the last token"),
            Self::NotAnObject => write!(f, "cannot address a property of a non-object value"),
            Self::UnknownProperty { name } => write!(f, "unknown property \"{name}\""),
            Self::UnknownSubtype { subtype } => write!(f, "unknown subtype \"{subtype}\""),
            Self::UnknownSubtypeProperty { subtype, name } => {
                write!(f, "subtype \"{subtype}\" has no property \"{name}\"")
            }
        }
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  UsageError                                  ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯¯                                 ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that a write operation was called in a way its contract forbids,
/// regardless of the record's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// The whole record cannot be added, replaced or removed.
    Root,
    /// There is no element at `-` to replace or remove.
    Dash {
        /// The pointer ending with `-`.
        pointer: String,
    },
    /// A collection of objects cannot hold `null` elements.
    NullElement {
        /// The element pointer.
        pointer: String,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "the root of a record cannot be added, replaced or removed"),
            Self::Dash { pointer } => {
                write!(f, "\"{pointer}\" addresses no element and cannot be replaced or removed")
            }
            Self::NullElement { pointer } => {
                write!(f, "\"{pointer}\" is an object collection element and cannot be null")
            }
        }
    }
}

impl std::error::Error for UsageError {}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  DataError                                   ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that the addressed location cannot be reached or written given
/// the current content of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// A value required to continue descending is missing or `null`.
    NotFound {
        /// The pointer of the missing value.
        pointer: String,
    },
    /// An array index lies outside of the array.
    OutOfBounds {
        /// The pointer of the array element.
        pointer: String,
        /// The source [`OutOfBoundsError`].
        source: OutOfBoundsError,
    },
    /// The record holds a value of the wrong type (e.g. a string where the
    /// schema declares an object), so the path cannot be followed.
    Unreachable {
        /// The pointer of the value that could not be descended into.
        pointer: String,
    },
}

impl DataError {
    /// The pointer string of the location that failed.
    pub fn pointer(&self) -> &str {
        match self {
            Self::NotFound { pointer }
            | Self::OutOfBounds { pointer, .. }
            | Self::Unreachable { pointer } => pointer,
        }
    }

    /// Returns `true` if this error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this error is `OutOfBounds`.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this error is `Unreachable`.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { pointer } => {
                write!(f, "value at \"{pointer}\" is missing but required to continue")
            }
            Self::OutOfBounds { pointer, source } => write!(f, "\"{pointer}\": {source}"),
            Self::Unreachable { pointer } => {
                write!(f, "value at \"{pointer}\" does not match the schema and cannot be descended into")
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OutOfBounds { source, .. } => Some(source),
            _ => None,
        }
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Error                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Any error raised by this crate's pointer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// See [`SyntaxError`].
    ///
    /// Never returned by record operations, which only fail with usage or
    /// data errors. It lets callers parse and write in one function with
    /// `?`.
    Syntax(SyntaxError),
    /// See [`UsageError`].
    Usage(UsageError),
    /// See [`DataError`].
    Data(DataError),
}

impl Error {
    /// Returns `true` if this is a [`SyntaxError`].
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Returns `true` if this is a [`UsageError`].
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Returns `true` if this is a [`DataError`].
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Self::Syntax(err)
    }
}

impl From<UsageError> for Error {
    fn from(err: UsageError) -> Self {
        Self::Usage(err)
    }
}

impl From<DataError> for Error {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(err) => fmt::Display::fmt(err, f),
            Self::Usage(err) => fmt::Display::fmt(err, f),
            Self::Data(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Usage(err) => Some(err),
            Self::Data(err) => Some(err),
        }
    }
}
