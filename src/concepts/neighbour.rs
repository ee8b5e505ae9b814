use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::framework::RoutingSystem;

/// One directly attached link. The link table, keyed by port, is the ground
/// truth for local topology: entries are created on link-up and destroyed on
/// link-down, and both engines read direct costs from here.
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct Neighbour<T: RoutingSystem + ?Sized> {
    /// the local port this neighbour is attached on, the pair (port, addr) is 1:1
    pub port: T::Port,
    /// the routing network address of the neighbour
    pub addr: T::NodeAddress,
    /// directed cost of the link towards this neighbour, lower is better
    pub cost: u64,
}
