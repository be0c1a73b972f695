//--------------------------------------------------------------------
// error.rs
//--------------------------------------------------------------------
// Provides the error type returned by every fallible operation of
// the sweep, from the predicates up to the diagram computation
//--------------------------------------------------------------------

use crate::derive_more::Display;
use crate::geometry::Vec2;

/// Everything that can go wrong while computing a diagram.
///
/// `CollinearPoints` is an expected condition the sweep guards against,
/// `InvalidArgument` and `EmptyQueue`/`StaleHandle` signal misuse of an
/// operation, and `SanityCheckFailed` means an invariant of the sweep broke
/// and the whole computation must be abandoned.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum VoronoiError {
    #[display(fmt = "invalid argument: {}", _0)]
    InvalidArgument(String),

    #[display(fmt = "collinear points {}, {}, {} were given to an operation which requires non-collinear input", _0, _1, _2)]
    CollinearPoints(Vec2, Vec2, Vec2),

    #[display(fmt = "sanity check failed: {}", _0)]
    SanityCheckFailed(String),

    #[display(fmt = "cannot {} an empty priority queue", _0)]
    EmptyQueue(&'static str),

    #[display(fmt = "the queue handle no longer refers to a queued item")]
    StaleHandle
}

impl std::error::Error for VoronoiError {}

impl VoronoiError {
    /// Whether the error means the sweep itself is broken (as opposed to bad usage)
    pub fn is_fatal(&self) -> bool {
        match self {
            VoronoiError::SanityCheckFailed(_) => true,
            _ => false
        }
    }
}

pub type Result<T> = std::result::Result<T, VoronoiError>;

pub(crate) fn sanity_check(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition { Ok(()) } else { Err(VoronoiError::SanityCheckFailed(message())) }
}
