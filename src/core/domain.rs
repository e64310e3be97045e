//! Data domains.
//!
//! A domain describes the legal or observed value range of a property, as
//! reported by the data source feeding it. Either side may be missing, which
//! means "unconstrained on that side".

use serde::{Deserialize, Serialize};

/// Largest magnitude a range bound may take. Used as the open sentinel.
pub const LARGE_VALUE: f64 = 1.0e38;

/// Range reported by a data-source domain.
///
/// # Examples
///
/// ```
/// use rangebind::core::DomainRange;
///
/// let domain = DomainRange::new(0.0, 10.0);
/// assert_eq!(domain.resolved(), (0.0, 10.0));
///
/// let open = DomainRange::unbounded();
/// assert!(!open.is_declared());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainRange {
    /// Lower bound, if the domain declares one.
    pub low: Option<f64>,
    /// Upper bound, if the domain declares one.
    pub high: Option<f64>,
}

impl DomainRange {
    /// Creates a domain with both bounds present.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    /// Creates a domain that declares no range at all.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            low: None,
            high: None,
        }
    }

    /// Builds a domain from the `(low, high, exists_low, exists_high)` form.
    #[must_use]
    pub const fn from_parts(low: f64, high: f64, exists_low: bool, exists_high: bool) -> Self {
        Self {
            low: if exists_low { Some(low) } else { None },
            high: if exists_high { Some(high) } else { None },
        }
    }

    /// Returns `true` if at least one side is declared.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.low.is_some() || self.high.is_some()
    }

    /// Resolves missing sides to the open sentinels.
    #[must_use]
    pub fn resolved(&self) -> (f64, f64) {
        (
            self.low.unwrap_or(-LARGE_VALUE),
            self.high.unwrap_or(LARGE_VALUE),
        )
    }
}

/// Something that can report a live data range.
pub trait RangeDomain {
    /// Queries the current range.
    fn query_range(&self) -> DomainRange;
}

impl RangeDomain for DomainRange {
    fn query_range(&self) -> DomainRange {
        *self
    }
}
