use crate::router::INF;

/// Adds two link costs, saturating just below [`INF`] so that a legitimate
/// sum can never be mistaken for an unreachable route.
///
/// # Examples
///
/// ```
/// use nexthop::router::INF;
/// use nexthop::util::sum_cost;
///
/// assert_eq!(sum_cost(3, 4), 7);
/// assert_eq!(sum_cost(INF, 2), INF);
/// assert_eq!(sum_cost(INF - 1, 5), INF - 1);
/// ```
pub fn sum_cost(a: u64, b: u64) -> u64 {
    if a == INF || b == INF {
        INF
    } else {
        a.checked_add(b).map_or(INF - 1, |sum| sum.min(INF - 1))
    }
}
