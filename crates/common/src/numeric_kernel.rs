use crate::error::ArithmeticOverflow;
use crate::types::Distance;

/// Distance held by the engine while it relaxes arcs.
///
/// Finite values are `i128`, so a distance falling around a negative cycle
/// stays representable until the detection pass has classified the graph.
/// Ordering matches [`Distance`]: every finite value sits below `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WideDistance {
    Finite(i128),
    Unreachable,
}

impl From<Distance> for WideDistance {
    fn from(distance: Distance) -> Self {
        match distance {
            Distance::Finite(d) => WideDistance::Finite(i128::from(d)),
            Distance::Unreachable => WideDistance::Unreachable,
        }
    }
}

impl TryFrom<WideDistance> for Distance {
    type Error = ArithmeticOverflow;

    /// Fails when a finite value does not fit back into an `i64`.
    fn try_from(wide: WideDistance) -> Result<Self, Self::Error> {
        match wide {
            WideDistance::Finite(d) => i64::try_from(d)
                .map(Distance::Finite)
                .map_err(|_| ArithmeticOverflow),
            WideDistance::Unreachable => Ok(Distance::Unreachable),
        }
    }
}

/// Result of testing one arc `(u, v, w)` against the current distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    /// `distance[u] + w` is strictly shorter than `distance[v]`.
    Improves(i128),
    /// `distance[v]` is already at least as short, or `u` is unreachable.
    Holds,
}

/// Tests whether an arc of weight `weight` from a vertex at `from` improves
/// a vertex currently at `to`.
///
/// Unreachable tails never relax anything. Finite tails use checked `i128`
/// addition, so an `Unreachable` head can only be replaced by a real sum and
/// no sum can ever collide with the unreachable state.
///
/// # Errors
/// Returns `ArithmeticOverflow` if `from + weight` leaves the `i128` range.
pub fn relax(
    from: WideDistance,
    weight: i64,
    to: WideDistance,
) -> Result<Relaxation, ArithmeticOverflow> {
    let WideDistance::Finite(base) = from else {
        return Ok(Relaxation::Holds);
    };

    let candidate = base
        .checked_add(i128::from(weight))
        .ok_or(ArithmeticOverflow)?;

    if WideDistance::Finite(candidate) < to {
        Ok(Relaxation::Improves(candidate))
    } else {
        Ok(Relaxation::Holds)
    }
}
