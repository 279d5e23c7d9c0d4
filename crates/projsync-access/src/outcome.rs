//! Closed outcome enumerations returned by the client layer.
//!
//! Status codes that drive a reconciliation decision are translated here and
//! never inspected by callers.

/// Result of reading a single resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Self::Found(value) => Lookup::Found(value),
            Self::NotFound => Lookup::NotFound,
        }
    }
}

/// Result of a create (POST) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// 2xx.
    Created,
    /// 409: the resource already exists and must be updated instead.
    Conflict,
    /// 400: the system refused to create it, as it does for reserved roles.
    Rejected { detail: String },
}

/// Result of a delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// 404: nothing to delete.
    AlreadyAbsent,
}
