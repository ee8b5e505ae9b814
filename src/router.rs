use std::collections::HashMap;

use educe::Educe;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::concepts::neighbour::Neighbour;
use crate::concepts::packet::{OutboundPacket, Packet};
use crate::feedback::PacketDrop;
use crate::framework::RoutingSystem;

/// Infinite cost, for unreachable vertices. [`crate::util::sum_cost`]
/// saturates below this value.
pub const INF: u64 = u64::MAX;

/// Bookkeeping shared by both engines: the link table, the derived
/// forwarding table, the outbound queue and the heartbeat clock. Each engine
/// embeds one `RouterCore` and funnels every mutation through its event
/// handlers; nothing here is shared between router instances.
#[serde_as]
#[derive(Educe, Serialize, Deserialize)]
#[educe(Debug)]
#[serde(bound = "")]
pub struct RouterCore<T: RoutingSystem + ?Sized> {
    pub address: T::NodeAddress,
    /// ground truth for local topology, keyed by local port
    #[serde_as(as = "Vec<(_, _)>")]
    pub links: HashMap<T::Port, Neighbour<T>>,
    /// destination to outgoing port; purely derived, rebuilt wholesale after
    /// every accepted state change and never patched incrementally
    #[serde_as(as = "Vec<(_, _)>")]
    pub forwarding: HashMap<T::NodeAddress, T::Port>,
    /// packets waiting for the hosting framework, fire and forget
    pub outbound_packets: Vec<OutboundPacket<T>>,
    /// simulated time units between unconditional re-advertisements
    pub heartbeat_interval: u64,
    /// when the last heartbeat-driven advertisement went out; event-driven
    /// broadcasts do not reset this clock
    pub last_advert: u64,
}

impl<T: RoutingSystem> RouterCore<T> {
    pub fn new(address: T::NodeAddress, heartbeat_interval: u64) -> Self {
        RouterCore {
            address,
            links: HashMap::new(),
            forwarding: HashMap::new(),
            outbound_packets: Vec::new(),
            heartbeat_interval,
            last_advert: 0,
        }
    }

    /// Directed cost towards `addr`, if it is currently a live neighbour.
    pub fn cost_to(&self, addr: &T::NodeAddress) -> Option<u64> {
        self.links.values().find(|n| n.addr == *addr).map(|n| n.cost)
    }

    /// The local port attached to the neighbour `addr`.
    pub fn port_to(&self, addr: &T::NodeAddress) -> Option<&T::Port> {
        self.links.values().find(|n| n.addr == *addr).map(|n| &n.port)
    }

    /// Queues `packet` on every attached port, or on all but `except` when
    /// propagating a flood back out.
    pub fn flood(&mut self, packet: &Packet<T>, except: Option<&T::Port>) {
        for port in self.links.keys() {
            if Some(port) == except {
                continue;
            }
            self.outbound_packets.push(OutboundPacket {
                port: port.clone(),
                packet: packet.clone(),
            });
        }
    }

    /// Forwards a traceroute probe along the forwarding table, envelope
    /// intact. A lookup miss discards the probe.
    pub fn forward_probe(&mut self, packet: Packet<T>) -> Result<(), PacketDrop<T>> {
        let Some(dest) = packet.dst.clone() else {
            // a probe without a destination has nowhere to go
            return Ok(());
        };
        let Some(port) = self.forwarding.get(&dest) else {
            return Err(PacketDrop::UnreachableDestination { dest });
        };
        self.outbound_packets.push(OutboundPacket {
            port: port.clone(),
            packet,
        });
        Ok(())
    }

    /// True once the heartbeat interval has elapsed since the last periodic
    /// advertisement; re-arms the clock when it fires.
    pub fn heartbeat_due(&mut self, now: u64) -> bool {
        if now.saturating_sub(self.last_advert) >= self.heartbeat_interval {
            self.last_advert = now;
            true
        } else {
            false
        }
    }
}
