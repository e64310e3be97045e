//! Autoscale engine.
//!
//! Turns a live [`DomainRange`] into slider bounds and a resolution coarse
//! enough to give roughly two significant steps of precision across the
//! span, then resets the control's endpoints to the new bounds.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{DomainRange, LARGE_VALUE, RangeControl, RangeDomain};
use crate::error::{RangeError, Result};

/// Decades subtracted from the span's magnitude to get the step size.
const PLACE_OFFSET: f64 = 1.5;

/// Pure result of quantizing a domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Quantization {
    /// The domain declares no range at all.
    Unconstrained,
    /// Both bounds coincide.
    Degenerate {
        /// The single value.
        value: f64,
    },
    /// Bounds snapped outward to multiples of `resolution`.
    Quantized {
        /// Snapped lower bound.
        low: f64,
        /// Snapped upper bound.
        high: f64,
        /// Step size.
        resolution: f64,
    },
}

/// What [`autoscale`] did to the control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutoscaleOutcome {
    /// No declared range; the control was left alone.
    Unconstrained,
    /// Quantized bounds equal the stored ones; nothing changed.
    Unchanged,
    /// Degenerate range applied; both endpoints set to `value`.
    Degenerate {
        /// The single value.
        value: f64,
    },
    /// New bounds and resolution applied; endpoints span the bounds.
    Rescaled {
        /// New lower bound.
        low: f64,
        /// New upper bound.
        high: f64,
        /// New resolution.
        resolution: f64,
    },
}

impl AutoscaleOutcome {
    /// Returns `true` if the control was mutated.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Degenerate { .. } | Self::Rescaled { .. })
    }
}

/// Computes bounds and resolution for a domain.
///
/// Sides are clamped to `±LARGE_VALUE` so the span stays finite.
///
/// # Errors
///
/// Returns [`RangeError::InvalidRange`] if the lower bound exceeds the upper
/// bound or either is not finite.
///
/// # Examples
///
/// ```
/// use rangebind::autoscale::{Quantization, quantize};
/// use rangebind::core::DomainRange;
///
/// let q = quantize(&DomainRange::new(3.2, 97.6)).unwrap();
/// assert_eq!(q, Quantization::Quantized { low: 3.0, high: 98.0, resolution: 1.0 });
/// ```
pub fn quantize(domain: &DomainRange) -> Result<Quantization> {
    if !domain.is_declared() {
        return Ok(Quantization::Unconstrained);
    }

    let (low, high) = domain.resolved();
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(RangeError::InvalidRange { low, high }.into());
    }

    let (low, high) = (
        low.clamp(-LARGE_VALUE, LARGE_VALUE),
        high.clamp(-LARGE_VALUE, LARGE_VALUE),
    );
    if low == high {
        return Ok(Quantization::Degenerate { value: low });
    }

    let place = ((high - low).log10() - PLACE_OFFSET).floor();
    #[allow(clippy::cast_possible_truncation)]
    let resolution = 10f64.powi(place as i32);

    Ok(Quantization::Quantized {
        low: (low / resolution).floor() * resolution,
        high: (high / resolution).ceil() * resolution,
        resolution,
    })
}

/// Re-derives a control's bounds from a domain.
///
/// The control is only touched when the quantized bounds differ from the
/// stored ones, which keeps repeated refreshes of an unchanged data range
/// from resetting the user's endpoints.
///
/// # Errors
///
/// Returns [`RangeError::InvalidRange`]; the control is unchanged then.
pub fn autoscale(control: &mut RangeControl, domain: &dyn RangeDomain) -> Result<AutoscaleOutcome> {
    let range = domain.query_range();
    let quantization = quantize(&range).inspect_err(|e| {
        warn!(error = %e, widget = control.trace_name(), "invalid data range");
    })?;

    let outcome = match quantization {
        Quantization::Unconstrained => AutoscaleOutcome::Unconstrained,
        Quantization::Degenerate { value } => {
            control.set_range(value, value);
            control.set_min_value(value);
            control.set_max_value(value);
            AutoscaleOutcome::Degenerate { value }
        }
        Quantization::Quantized {
            low,
            high,
            resolution,
        } => {
            if control.range() == (low, high) {
                AutoscaleOutcome::Unchanged
            } else {
                control.set_resolution(resolution)?;
                control.set_range(low, high);
                control.set_min_value(low);
                control.set_max_value(high);
                AutoscaleOutcome::Rescaled {
                    low,
                    high,
                    resolution,
                }
            }
        }
    };

    debug!(widget = control.trace_name(), ?outcome, "autoscale");
    Ok(outcome)
}
