use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::concepts::packet::{OutboundPacket, Packet};

/// Nominates the concrete types the hosting framework uses to identify
/// routers and local ports.
pub trait RoutingSystem {
    /// Address of a router on the routing network, MUST be unique across the topology
    type NodeAddress: Ord + PartialOrd + RootData + RootKey + Debug;
    /// Local handle naming one directly attached link, unique within a single router
    type Port: Ord + PartialOrd + RootData + RootKey + Debug;
}

pub trait RootData: Clone + Serialize + DeserializeOwned + Sized {}
pub trait RootKey: Eq + PartialEq + Hash {}
impl<T: Eq + PartialEq + Hash> RootKey for T {}
impl<T: Clone + Serialize + DeserializeOwned + Sized> RootData for T {}

/// The event interface shared by both routing engines.
///
/// The hosting framework delivers events to a router instance strictly
/// serially; every handler runs to completion, fully mutating state and
/// rebuilding the forwarding table before returning. An engine is selected
/// once at construction, there is no switching between them at runtime.
pub trait Router<T: RoutingSystem + ?Sized> {
    /// The address this router was constructed with.
    fn address(&self) -> &T::NodeAddress;

    /// A packet arrived on `port`. Traceroute probes are forwarded along the
    /// forwarding table (or dropped silently on a lookup miss); anything else
    /// is decoded defensively as a protocol advertisement, and a payload that
    /// fails to parse drops that single message without surfacing an error.
    fn handle_packet(&mut self, port: &T::Port, packet: Packet<T>);

    /// A new link to `addr` with directed cost `cost` came up on `port`.
    fn handle_new_link(&mut self, port: T::Port, addr: T::NodeAddress, cost: u64);

    /// The link on `port` went down.
    fn handle_remove_link(&mut self, port: &T::Port);

    /// The simulated clock reached `now`. Once the heartbeat interval has
    /// elapsed the engine re-advertises unconditionally, even if nothing
    /// changed; this soft-state refresh is the only recovery mechanism for
    /// advertisements lost in transit.
    fn handle_time(&mut self, now: u64);

    /// Forwarding lookup: the local port traffic for `dest` leaves on.
    fn next_port(&self, dest: &T::NodeAddress) -> Option<&T::Port>;

    /// Packets queued for the hosting framework to deliver, fire and forget.
    fn outbound(&mut self) -> &mut Vec<OutboundPacket<T>>;
}
