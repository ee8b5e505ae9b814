use std::collections::HashMap;

use educe::Educe;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::framework::RoutingSystem;

/// A selected distance-vector route. Replaced only on strict cost
/// improvement (ties keep the incumbent), except for direct-neighbour
/// entries which are authoritative from the link table.
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct DvRoute<T: RoutingSystem + ?Sized> {
    /// the adjacent router traffic for this destination is handed to;
    /// None only for the self entry, which is pinned at cost 0
    pub next_hop: Option<T::NodeAddress>,
    /// cumulative cost via that next hop
    pub cost: u64,
}

/// One origin's accepted link-state record: the adjacency that origin
/// declared, at the given sequence number. A record is only ever superseded
/// by a strictly higher sequence number from the same origin and is never
/// evicted, so an origin that permanently disconnects leaves a stale record
/// behind indefinitely.
#[serde_as]
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct LsRecord<T: RoutingSystem + ?Sized> {
    #[serde_as(as = "Vec<(_, _)>")]
    pub links: HashMap<T::NodeAddress, u64>,
    pub seq: u64,
}
