use std::collections::HashMap;

use educe::Educe;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::serde_as;

use crate::concepts::neighbour::Neighbour;
use crate::concepts::packet::{DistanceVectorMessage, OutboundPacket, Packet};
use crate::concepts::route::DvRoute;
use crate::feedback::PacketDrop;
use crate::framework::{Router, RoutingSystem};
use crate::router::RouterCore;
use crate::util::sum_cost;

/// Distance-vector engine: distributed Bellman-Ford by iterative relaxation
/// of neighbour-advertised vectors.
///
/// Convergence after churn is eventual, not loop-free by construction: the
/// engine withdraws routes through a dead next hop but applies no
/// poison-reverse or split-horizon beyond that local withdrawal, so
/// transient loops and count-to-infinity under topology churn are preserved
/// properties of the protocol.
#[serde_as]
#[derive(Educe, Serialize, Deserialize)]
#[educe(Debug)]
#[serde(bound = "")]
pub struct DvRouter<T: RoutingSystem + ?Sized> {
    pub core: RouterCore<T>,
    /// destination to (next hop, cumulative cost)
    #[serde_as(as = "Vec<(_, _)>")]
    pub table: HashMap<T::NodeAddress, DvRoute<T>>,
}

impl<T: RoutingSystem> DvRouter<T> {
    pub fn new(address: T::NodeAddress, heartbeat_interval: u64) -> Self {
        let mut table = HashMap::new();
        table.insert(
            address.clone(),
            DvRoute {
                next_hop: None,
                cost: 0,
            },
        );
        DvRouter {
            core: RouterCore::new(address, heartbeat_interval),
            table,
        }
    }

    fn process_routing(&mut self, packet: &Packet<T>) -> Result<(), PacketDrop<T>> {
        let msg: DistanceVectorMessage<T> = serde_json::from_str(&packet.payload)
            .map_err(|cause| PacketDrop::MalformedMessage { cause })?;
        self.receive_vector(msg.addr, msg.dv)
    }

    /// Relaxes our table against a neighbour's advertised vector. An entry is
    /// accepted only when the destination is new or the candidate cost is a
    /// strict improvement, so redelivering an unchanged vector is a no-op:
    /// no rebuild, no broadcast.
    fn receive_vector(
        &mut self,
        addr: T::NodeAddress,
        dv: HashMap<T::NodeAddress, u64>,
    ) -> Result<(), PacketDrop<T>> {
        // a vector from an address we have no live link to is stale
        let Some(link_cost) = self.core.cost_to(&addr) else {
            return Err(PacketDrop::UnknownNeighbour { addr });
        };
        let mut changed = false;
        for (dest, advertised) in dv {
            if dest == addr {
                // would produce a route pointing back at its own source
                continue;
            }
            let candidate = sum_cost(link_cost, advertised);
            let accept = match self.table.get(&dest) {
                // ties keep the incumbent
                Some(route) => candidate < route.cost,
                None => true,
            };
            if accept {
                self.table.insert(
                    dest,
                    DvRoute {
                        next_hop: Some(addr.clone()),
                        cost: candidate,
                    },
                );
                changed = true;
            }
        }
        if changed {
            self.rebuild_forwarding();
            self.broadcast_vector();
        }
        Ok(())
    }

    /// Rebuilds destination to port from scratch. The self entry never maps
    /// to a port, and a destination whose next hop is no longer attached
    /// gets no entry.
    fn rebuild_forwarding(&mut self) {
        let mut forwarding = HashMap::new();
        for (dest, route) in &self.table {
            if *dest == self.core.address {
                continue;
            }
            let Some(next_hop) = &route.next_hop else {
                continue;
            };
            if let Some(port) = self.core.port_to(next_hop) {
                forwarding.insert(dest.clone(), port.clone());
            }
        }
        self.core.forwarding = forwarding;
    }

    /// Advertises our full vector on every attached port. Only cumulative
    /// costs are disclosed, never next hops.
    fn broadcast_vector(&mut self) {
        if self.core.links.is_empty() {
            return;
        }
        let msg = DistanceVectorMessage::<T> {
            addr: self.core.address.clone(),
            dv: self
                .table
                .iter()
                .map(|(dest, route)| (dest.clone(), route.cost))
                .collect(),
        };
        match serde_json::to_string(&msg) {
            Ok(payload) => {
                let packet = Packet::routing(self.core.address.clone(), payload);
                self.core.flood(&packet, None);
            }
            Err(e) => debug!("skipping advertisement, vector failed to encode: {e}"),
        }
    }
}

impl<T: RoutingSystem> Router<T> for DvRouter<T> {
    fn address(&self) -> &T::NodeAddress {
        &self.core.address
    }

    fn handle_packet(&mut self, _port: &T::Port, packet: Packet<T>) {
        let result = if packet.is_traceroute() {
            self.core.forward_probe(packet)
        } else {
            self.process_routing(&packet)
        };
        if let Err(dropped) = result {
            trace!("{} dropped a packet: {dropped}", json!(self.core.address));
        }
    }

    fn handle_new_link(&mut self, port: T::Port, addr: T::NodeAddress, cost: u64) {
        self.core.links.insert(
            port.clone(),
            Neighbour {
                port,
                addr: addr.clone(),
                cost,
            },
        );
        // the link table is authoritative for 1-hop destinations
        self.table.insert(
            addr.clone(),
            DvRoute {
                next_hop: Some(addr),
                cost,
            },
        );
        self.rebuild_forwarding();
        self.broadcast_vector();
    }

    fn handle_remove_link(&mut self, port: &T::Port) {
        let Some(gone) = self.core.links.remove(port) else {
            return;
        };
        // purge every destination routed through the dead neighbour, not just
        // the 1-hop entry, so nothing keeps forwarding into the dead link
        // while the network reconverges
        self.table
            .retain(|_, route| route.next_hop.as_ref() != Some(&gone.addr));
        self.rebuild_forwarding();
        self.broadcast_vector();
    }

    fn handle_time(&mut self, now: u64) {
        if self.core.heartbeat_due(now) {
            self.broadcast_vector();
        }
    }

    fn next_port(&self, dest: &T::NodeAddress) -> Option<&T::Port> {
        self.core.forwarding.get(dest)
    }

    fn outbound(&mut self) -> &mut Vec<OutboundPacket<T>> {
        &mut self.core.outbound_packets
    }
}
