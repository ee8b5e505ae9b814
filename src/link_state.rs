use std::collections::{HashMap, HashSet};

use educe::Educe;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::serde_as;

use crate::concepts::neighbour::Neighbour;
use crate::concepts::packet::{LinkStateMessage, OutboundPacket, Packet};
use crate::concepts::route::LsRecord;
use crate::feedback::PacketDrop;
use crate::framework::{Router, RoutingSystem};
use crate::router::{RouterCore, INF};
use crate::util::sum_cost;

/// Link-state engine: every router floods its direct adjacency to the whole
/// network and runs single-source Dijkstra over the accumulated database.
///
/// The database only ever grows. Records are superseded by a strictly higher
/// sequence number from the same origin and are never evicted, so an origin
/// that permanently disconnects leaves a stale record behind; Dijkstra
/// simply finds no path into it once no live record points its way.
#[serde_as]
#[derive(Educe, Serialize, Deserialize)]
#[educe(Debug)]
#[serde(bound = "")]
pub struct LsRouter<T: RoutingSystem + ?Sized> {
    pub core: RouterCore<T>,
    /// origin address to that origin's most recent accepted record
    #[serde_as(as = "Vec<(_, _)>")]
    pub database: HashMap<T::NodeAddress, LsRecord<T>>,
}

impl<T: RoutingSystem> LsRouter<T> {
    pub fn new(address: T::NodeAddress, heartbeat_interval: u64) -> Self {
        let mut database = HashMap::new();
        database.insert(
            address.clone(),
            LsRecord {
                links: HashMap::new(),
                seq: 0,
            },
        );
        LsRouter {
            core: RouterCore::new(address, heartbeat_interval),
            database,
        }
    }

    /// The authoritative record for our own adjacency. Created in `new` and
    /// never removed, but `entry` keeps this panic-free regardless.
    fn self_record_mut(&mut self) -> &mut LsRecord<T> {
        self.database
            .entry(self.core.address.clone())
            .or_insert_with(|| LsRecord {
                links: HashMap::new(),
                seq: 0,
            })
    }

    fn process_routing(&mut self, port: &T::Port, packet: &Packet<T>) -> Result<(), PacketDrop<T>> {
        let msg: LinkStateMessage<T> = serde_json::from_str(&packet.payload)
            .map_err(|cause| PacketDrop::MalformedMessage { cause })?;
        self.receive_record(port, packet, msg)
    }

    /// Accepts a flooded record iff the origin is unseen or the sequence
    /// number is strictly newer than the stored one. Anything else is
    /// dropped with no recomputation and no re-flood, which bounds redundant
    /// flood traffic in cyclic topologies and keeps duplicate floods from
    /// circulating forever.
    fn receive_record(
        &mut self,
        port: &T::Port,
        packet: &Packet<T>,
        msg: LinkStateMessage<T>,
    ) -> Result<(), PacketDrop<T>> {
        if let Some(stored) = self.database.get(&msg.addr) {
            if msg.seq <= stored.seq {
                return Err(PacketDrop::StaleRecord {
                    origin: msg.addr,
                    seq: msg.seq,
                });
            }
        }
        self.database.insert(
            msg.addr,
            LsRecord {
                links: msg.links,
                seq: msg.seq,
            },
        );
        self.compute_shortest_paths();
        // propagate the packet unmodified, skipping the port it arrived on
        self.core.flood(packet, Some(port));
        Ok(())
    }

    /// Floods our own record on every attached port.
    fn broadcast_self_record(&mut self) {
        if self.core.links.is_empty() {
            return;
        }
        let Some(record) = self.database.get(&self.core.address) else {
            return;
        };
        let msg = LinkStateMessage::<T> {
            addr: self.core.address.clone(),
            seq: record.seq,
            links: record.links.clone(),
        };
        match serde_json::to_string(&msg) {
            Ok(payload) => {
                let packet = Packet::routing(self.core.address.clone(), payload);
                self.core.flood(&packet, None);
            }
            Err(e) => debug!("skipping advertisement, record failed to encode: {e}"),
        }
    }

    /// Single-source Dijkstra from our own address over every vertex any
    /// accepted record mentions, followed by a wholesale forwarding rebuild.
    ///
    /// Edge weights are directed exactly as each origin declared them; the
    /// two endpoints of a link may disagree and no reconciliation is
    /// attempted. The first hop for each destination comes from walking the
    /// predecessor chain back to the vertex adjacent to us; a destination
    /// whose chain never reaches us gets no forwarding entry.
    fn compute_shortest_paths(&mut self) {
        // vertex set: every origin plus every neighbour any origin mentions
        let mut dist: HashMap<&T::NodeAddress, u64> = HashMap::new();
        for (origin, record) in &self.database {
            dist.entry(origin).or_insert(INF);
            for neighbour in record.links.keys() {
                dist.entry(neighbour).or_insert(INF);
            }
        }
        dist.insert(&self.core.address, 0);

        let mut prev: HashMap<&T::NodeAddress, &T::NodeAddress> = HashMap::new();
        let mut visited: HashSet<&T::NodeAddress> = HashSet::new();

        loop {
            // pick the unvisited vertex with the smallest finite tentative distance
            let mut current: Option<(&T::NodeAddress, u64)> = None;
            for (&vertex, &d) in &dist {
                if d == INF || visited.contains(vertex) {
                    continue;
                }
                if current.map_or(true, |(_, best)| d < best) {
                    current = Some((vertex, d));
                }
            }
            let Some((vertex, d)) = current else {
                break;
            };
            visited.insert(vertex);

            // vertices known only as somebody's neighbour have no record,
            // and therefore no outgoing edges
            let Some(record) = self.database.get(vertex) else {
                continue;
            };
            for (neighbour, &cost) in &record.links {
                let candidate = sum_cost(d, cost);
                if let Some(entry) = dist.get_mut(neighbour) {
                    if candidate < *entry {
                        *entry = candidate;
                        prev.insert(neighbour, vertex);
                    }
                }
            }
        }

        let mut forwarding: HashMap<T::NodeAddress, T::Port> = HashMap::new();
        for &dest in dist.keys() {
            if *dest == self.core.address {
                continue;
            }
            // walk the predecessor chain back to the vertex adjacent to us
            let mut hop = dest;
            let next_hop = loop {
                match prev.get(hop) {
                    Some(&p) if *p == self.core.address => break Some(hop),
                    Some(&p) => hop = p,
                    // unreachable, or the chain broke before reaching us
                    None => break None,
                }
            };
            if let Some(next_hop) = next_hop {
                if let Some(port) = self.core.port_to(next_hop) {
                    forwarding.insert(dest.clone(), port.clone());
                }
            }
        }
        self.core.forwarding = forwarding;
    }
}

impl<T: RoutingSystem> Router<T> for LsRouter<T> {
    fn address(&self) -> &T::NodeAddress {
        &self.core.address
    }

    fn handle_packet(&mut self, port: &T::Port, packet: Packet<T>) {
        let result = if packet.is_traceroute() {
            self.core.forward_probe(packet)
        } else {
            self.process_routing(port, &packet)
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
        let record = self.self_record_mut();
        record.links.insert(addr, cost);
        record.seq += 1;
        self.compute_shortest_paths();
        self.broadcast_self_record();
    }

    fn handle_remove_link(&mut self, port: &T::Port) {
        let Some(gone) = self.core.links.remove(port) else {
            return;
        };
        let record = self.self_record_mut();
        record.links.remove(&gone.addr);
        record.seq += 1;
        self.compute_shortest_paths();
        self.broadcast_self_record();
    }

    fn handle_time(&mut self, now: u64) {
        if self.core.heartbeat_due(now) {
            self.broadcast_self_record();
        }
    }

    fn next_port(&self, dest: &T::NodeAddress) -> Option<&T::Port> {
        self.core.forwarding.get(dest)
    }

    fn outbound(&mut self) -> &mut Vec<OutboundPacket<T>> {
        &mut self.core.outbound_packets
    }
}
