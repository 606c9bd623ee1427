//! Evaluation outcomes: the three-valued verdict and the ready/pending
//! result union.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of evaluating a condition against current values.
///
/// Three-valued on purpose. `Undetermined` is not an error: it is the
/// verdict for "these values cannot be judged right now", as with an empty
/// form field, a value of the wrong runtime type, or unordered operands.
/// Combinators decide what to do with it, optionally substituting it via
/// their `treat_undetermined_as` configuration.
///
/// # Examples
///
/// ```rust
/// use parallax_conditions::Verdict;
///
/// assert!(Verdict::Match.is_match());
/// assert_eq!(
///     Verdict::Undetermined.substitute_undetermined(Some(Verdict::Match)),
///     Verdict::Match
/// );
/// assert_eq!(
///     Verdict::NoMatch.substitute_undetermined(Some(Verdict::Match)),
///     Verdict::NoMatch
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The rule's premise holds for the evaluated values.
    Match,
    /// The rule's premise is violated.
    NoMatch,
    /// The condition could not judge the values it was given.
    Undetermined,
}

impl Verdict {
    /// Name for logs and messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Match => "Match",
            Self::NoMatch => "NoMatch",
            Self::Undetermined => "Undetermined",
        }
    }

    /// Whether this verdict is [`Match`](Self::Match).
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    /// Replaces `Undetermined` with `replacement` when one is configured;
    /// `Match` and `NoMatch` pass through untouched.
    #[must_use]
    pub const fn substitute_undetermined(self, replacement: Option<Self>) -> Self {
        match (self, replacement) {
            (Self::Undetermined, Some(verdict)) => verdict,
            (verdict, _) => verdict,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// EVALUATION RESULT
// ============================================================================

/// What a condition hands back: a verdict now, or one deferred operation.
///
/// The synchronous path is the default and dominant one. A condition that
/// must call out (a remote uniqueness check, say) returns
/// [`Pending`](Self::Pending) instead; callers pattern-match and either use
/// the verdict immediately or await the deferred one. There is never more
/// than one outstanding operation per evaluation.
#[derive(Debug)]
pub enum Evaluation {
    /// The verdict is available immediately.
    Ready(Verdict),
    /// The verdict needs asynchronous work to complete.
    Pending(PendingVerdict),
}

impl Evaluation {
    /// Whether the verdict is available without awaiting.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The immediate verdict, if there is one.
    #[must_use]
    pub const fn as_ready(&self) -> Option<Verdict> {
        match self {
            Self::Ready(verdict) => Some(*verdict),
            Self::Pending(_) => None,
        }
    }

    /// Resolves to the verdict, awaiting deferred work when present.
    pub async fn resolve(self) -> Verdict {
        match self {
            Self::Ready(verdict) => verdict,
            Self::Pending(pending) => pending.await,
        }
    }
}

impl From<Verdict> for Evaluation {
    fn from(verdict: Verdict) -> Self {
        Self::Ready(verdict)
    }
}

// ============================================================================
// PENDING VERDICT
// ============================================================================

/// A verdict still being computed.
///
/// Wraps the deferred work as a boxed future so that conditions returning
/// one stay object-safe. Await it (it implements [`Future`]) to obtain the
/// [`Verdict`]. The core applies no timeout and no cancellation; hosts that
/// need either wrap the await themselves.
pub struct PendingVerdict {
    future: BoxFuture<'static, Verdict>,
}

impl PendingVerdict {
    /// Wraps asynchronous work that will produce the verdict.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Verdict> + Send + 'static,
    {
        Self {
            future: Box::pin(future),
        }
    }
}

impl fmt::Debug for PendingVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingVerdict").finish_non_exhaustive()
    }
}

impl Future for PendingVerdict {
    type Output = Verdict;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().future.as_mut().poll(cx)
    }
}

// ============================================================================
// TESTS
// ============================================================================
