//! Error types for the browsing engine
//!
//! Two families:
//! - [`BrowseError`]: contract violations by the caller (navigation, leaf
//!   expansion). These are developer-facing and should end the session.
//! - [`ReadError`]: a member getter failed. These are recovered locally by
//!   the introspector and shown inline as the failure's kind name.

use thiserror::Error;

/// Navigation and expansion contract violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    /// Children were requested from a handler that reports the object as a leaf
    #[error("cannot expand leaf value of type {type_name}")]
    LeafExpansion { type_name: String },

    /// Ascend target is not an entry of the current path
    #[error("ascend target is not on the navigation path")]
    NotInPath,

    /// Row cannot be descended into (header, null or leaf)
    #[error("row '{label}' is not navigable")]
    NotNavigable { label: String },

    /// Rows were read for a path entry that is no longer current
    #[error("rows are stale: read the children again after navigating")]
    StaleRows,

    /// Row index past the end of the current children
    #[error("row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Breadcrumb index past the end of the path
    #[error("breadcrumb {index} out of range (path depth {len})")]
    BreadcrumbOutOfRange { index: usize, len: usize },
}

/// Failure reported by a property getter or singleton accessor
#[derive(Debug, Error)]
pub enum ReadError {
    /// The value cannot be produced in the object's current state
    #[error("operation not supported in the current state")]
    Unsupported,

    /// The object is in a state that makes the read invalid
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A referenced item does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure, tagged with a kind name for display
    #[error("{message}")]
    Other { kind: &'static str, message: String },

    /// Wrapper added by an intermediate layer; display unwraps to the cause
    #[error("{context}")]
    Invocation {
        context: String,
        #[source]
        source: Box<ReadError>,
    },
}

impl ReadError {
    /// Wrap this error with invocation context
    pub fn invocation(context: impl Into<String>, source: ReadError) -> Self {
        Self::Invocation {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping any invocation wrappers
    pub fn innermost(&self) -> &ReadError {
        let mut current = self;
        while let ReadError::Invocation { source, .. } = current {
            current = source;
        }
        current
    }

    /// Kind name of the innermost cause, shown in place of the value
    pub fn kind_name(&self) -> &'static str {
        match self.innermost() {
            ReadError::Unsupported => "Unsupported",
            ReadError::InvalidState(_) => "InvalidState",
            ReadError::NotFound(_) => "NotFound",
            ReadError::Other { kind, .. } => kind,
            ReadError::Invocation { .. } => "Invocation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_name_unwraps_nested_invocations() {
        let err = ReadError::invocation(
            "getter threw",
            ReadError::invocation("inner call", ReadError::InvalidState("closed".into())),
        );
        assert_eq!(err.kind_name(), "InvalidState");
        assert!(matches!(err.innermost(), ReadError::InvalidState(_)));
    }

    #[test]
    fn other_errors_report_their_tag() {
        let err = ReadError::Other {
            kind: "DeviceLost",
            message: "audio device went away".into(),
        };
        assert_eq!(err.kind_name(), "DeviceLost");
        assert_eq!(err.to_string(), "audio device went away");
    }

    #[test]
    fn browse_error_messages() {
        let err = BrowseError::RowOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "row 4 out of range (2 rows)");
    }
}
