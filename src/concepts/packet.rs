use std::collections::HashMap;

use educe::Educe;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::framework::RoutingSystem;

/// Transport envelope. Delivery is owned by the hosting framework; the
/// engines only look at the traceroute flag and the destination address and
/// treat `payload` as opaque text.
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct Packet<T: RoutingSystem + ?Sized> {
    pub src: T::NodeAddress,
    /// None for routing broadcasts, which are consumed by the adjacent router
    pub dst: Option<T::NodeAddress>,
    pub kind: PacketKind,
    /// opaque protocol payload, only inspected when `kind` is `Routing`
    pub payload: String,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum PacketKind {
    /// a probe forwarded hop by hop along the forwarding tables
    Traceroute,
    /// carries an engine advertisement
    Routing,
}

impl<T: RoutingSystem + ?Sized> Packet<T> {
    /// Wraps an encoded advertisement for broadcast to directly attached neighbours.
    pub fn routing(src: T::NodeAddress, payload: String) -> Self {
        Packet {
            src,
            dst: None,
            kind: PacketKind::Routing,
            payload,
        }
    }

    pub fn traceroute(src: T::NodeAddress, dst: T::NodeAddress) -> Self {
        Packet {
            src,
            dst: Some(dst),
            kind: PacketKind::Traceroute,
            payload: String::new(),
        }
    }

    pub fn is_traceroute(&self) -> bool {
        self.kind == PacketKind::Traceroute
    }
}

/// A packet queued on a local port for the hosting framework to deliver.
/// Fire and forget: delivery is unreliable and unordered, which is why the
/// periodic heartbeat refresh exists.
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct OutboundPacket<T: RoutingSystem + ?Sized> {
    /// send via this local port
    pub port: T::Port,
    pub packet: Packet<T>,
}

/// Distance-vector advertisement: the sender's full table of destination to
/// cumulative cost. Next hops are never disclosed.
#[serde_as]
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct DistanceVectorMessage<T: RoutingSystem + ?Sized> {
    pub addr: T::NodeAddress,
    #[serde_as(as = "Vec<(_, _)>")]
    pub dv: HashMap<T::NodeAddress, u64>,
}

/// Link-state advertisement: the origin's direct adjacency only, stamped with
/// the origin's sequence number and flooded unmodified.
#[serde_as]
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug)]
#[serde(bound = "")]
pub struct LinkStateMessage<T: RoutingSystem + ?Sized> {
    pub addr: T::NodeAddress,
    pub seq: u64,
    #[serde_as(as = "Vec<(_, _)>")]
    pub links: HashMap<T::NodeAddress, u64>,
}
