/// Pagination chain state definitions
use std::fmt;

/// State of one category's pagination chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    /// Another list page will be requested
    Paginating,

    /// No further list pages for this category
    Done(ChainEnd),
}

/// Why a pagination chain stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainEnd {
    /// The API reported no pages beyond the current one
    LastPage,

    /// The configured item limit was reached
    PageLimit,

    /// The list body could not be decoded into an object
    Decode,

    /// The list body reported failure
    Business,

    /// The request itself failed (HTTP status, network, timeout)
    Transport,
}

impl ChainState {
    /// Returns true if no further list page will be requested
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl ChainEnd {
    /// Returns true if the chain ended because something went wrong
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Decode | Self::Business | Self::Transport)
    }

    /// Returns all end reasons in reporting order
    pub fn all() -> [Self; 5] {
        [
            Self::LastPage,
            Self::PageLimit,
            Self::Decode,
            Self::Business,
            Self::Transport,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastPage => "last_page",
            Self::PageLimit => "page_limit",
            Self::Decode => "decode",
            Self::Business => "business",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paginating => write!(f, "paginating"),
            Self::Done(end) => write!(f, "done ({})", end),
        }
    }
}

impl fmt::Display for ChainEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&crate::ResponseError> for ChainEnd {
    fn from(err: &crate::ResponseError) -> Self {
        match err {
            crate::ResponseError::Decode(_) => Self::Decode,
            crate::ResponseError::Business(_) => Self::Business,
        }
    }
}
