//! Tagged result of one enrichment branch

use crate::ports::LookupError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Enrichment branches run for every order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Offer,
    Product,
    Images,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Offer => "offer",
            Branch::Product => "product",
            Branch::Images => "images",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a branch produced no value
#[derive(Debug, Error)]
pub enum BranchFailure {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Did not complete within {0:?}")]
    TimedOut(Duration),

    /// Task panicked or was cancelled before reporting
    #[error("Branch task aborted: {0}")]
    Aborted(String),
}

/// Outcome of a single branch, consumed once by the merge policy
#[derive(Debug)]
pub enum EnrichmentOutcome<T> {
    Success(T),
    Failure(BranchFailure),
    /// Upstream explicitly had nothing for the key
    Empty,
}

impl<T> EnrichmentOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, EnrichmentOutcome::Success(_))
    }

    /// The value, if any; failure and absence collapse to `None`
    pub fn into_value(self) -> Option<T> {
        match self {
            EnrichmentOutcome::Success(value) => Some(value),
            EnrichmentOutcome::Failure(_) | EnrichmentOutcome::Empty => None,
        }
    }
}

impl<T> From<Result<Option<T>, LookupError>> for EnrichmentOutcome<T> {
    fn from(result: Result<Option<T>, LookupError>) -> Self {
        match result {
            Ok(Some(value)) => EnrichmentOutcome::Success(value),
            Ok(None) => EnrichmentOutcome::Empty,
            Err(e) => EnrichmentOutcome::Failure(BranchFailure::Lookup(e)),
        }
    }
}
