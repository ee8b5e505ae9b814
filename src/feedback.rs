use educe::Educe;
use thiserror::Error;

use crate::framework::RoutingSystem;

/// Reasons an incoming packet or record is discarded. Although this is an
/// error enum, none of these are fatal: every one degrades to waiting for
/// the next periodic or legitimate update, so the event handlers log them
/// and move on. No failure mode terminates the router.
#[derive(Error)]
#[derive(Educe)]
#[educe(Debug)]
pub enum PacketDrop<T: RoutingSystem + ?Sized> {
    /// The payload failed to parse or lacks a required field.
    #[error("malformed routing payload")]
    MalformedMessage {
        #[source]
        cause: serde_json::Error,
    },
    /// An advertisement arrived from an address that is not currently a live
    /// neighbour, usually a stale message from a just-removed link.
    #[error("advertisement from unknown neighbour")]
    UnknownNeighbour { addr: T::NodeAddress },
    /// A traceroute probe named a destination with no forwarding entry.
    /// No unreachable notification is generated.
    #[error("no forwarding entry for destination")]
    UnreachableDestination { dest: T::NodeAddress },
    /// A link-state record did not carry a strictly newer sequence number.
    /// Dropping it without recomputation or re-flood is what keeps redundant
    /// floods from circulating forever.
    #[error("stale or duplicate link-state record")]
    StaleRecord { origin: T::NodeAddress, seq: u64 },
}
