use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use nexthop::concepts::packet::Packet;
use nexthop::framework::{Router, RoutingSystem};

/// Heartbeat interval used by every router in the virtual network.
pub const HEARTBEAT: u64 = 100;

pub struct VirtualSystem;

impl RoutingSystem for VirtualSystem {
    type NodeAddress = String;
    type Port = u32;
}

/// An in-memory network of routers. Links are bidirectional and the port
/// number on both endpoints is the link id; packets queued by a router sit
/// in flight until the next `tick` delivers them.
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "R: Serialize", deserialize = "R: DeserializeOwned"))]
pub struct VirtualNetwork<R: Router<VirtualSystem>> {
    pub routers: Vec<R>,
    /// link id -> (a, b, cost)
    pub links: BTreeMap<u32, (String, String, u64)>,
    /// (receiving node, arrival port, packet)
    pub in_flight: Vec<(String, u32, Packet<VirtualSystem>)>,
}

impl<R: Router<VirtualSystem>> VirtualNetwork<R> {
    pub fn create(
        nodes: &[&str],
        links: &[(u32, &str, &str, u64)],
        make: impl Fn(String) -> R,
    ) -> VirtualNetwork<R> {
        let mut net = VirtualNetwork {
            routers: nodes.iter().map(|n| make(n.to_string())).collect(),
            links: BTreeMap::new(),
            in_flight: Vec::new(),
        };
        for (id, a, b, cost) in links {
            net.add_link(*id, a, b, *cost);
        }
        net
    }

    pub fn get_node(&mut self, node: &str) -> &mut R {
        self.routers
            .iter_mut()
            .find(|r| r.address().as_str() == node)
            .unwrap_or_else(|| panic!("No node {node} found"))
    }

    pub fn add_link(&mut self, id: u32, a: &str, b: &str, cost: u64) {
        self.links.insert(id, (a.to_string(), b.to_string(), cost));
        self.get_node(a).handle_new_link(id, b.to_string(), cost);
        self.get_node(b).handle_new_link(id, a.to_string(), cost);
        self.flush_packets();
    }

    pub fn remove_link(&mut self, id: u32) {
        if let Some((a, b, _)) = self.links.remove(&id) {
            self.get_node(&a).handle_remove_link(&id);
            self.get_node(&b).handle_remove_link(&id);
            self.flush_packets();
        }
    }

    /// Moves queued outbound packets onto the wire. Packets sent on a port
    /// with no live link simply vanish; delivery is unreliable anyway.
    pub fn flush_packets(&mut self) {
        let mut sent = Vec::new();
        for router in &mut self.routers {
            let from = router.address().clone();
            for out in router.outbound().drain(..) {
                sent.push((from.clone(), out));
            }
        }
        for (from, out) in sent {
            if let Some((a, b, _)) = self.links.get(&out.port) {
                let to = if *a == from {
                    b.clone()
                } else if *b == from {
                    a.clone()
                } else {
                    continue;
                };
                self.in_flight.push((to, out.port, out.packet));
            }
        }
    }

    /// Delivers every in-flight packet, then collects whatever the routers
    /// queued in response.
    pub fn tick(&mut self) {
        let deliveries = std::mem::take(&mut self.in_flight);
        for (node, port, packet) in deliveries {
            if let Some(router) = self
                .routers
                .iter_mut()
                .find(|r| r.address().as_str() == node)
            {
                router.handle_packet(&port, packet);
            }
        }
        self.flush_packets();
    }

    pub fn tick_n(&mut self, times: u32) {
        for _ in 0..times {
            self.tick();
        }
    }

    /// Advances every router's clock to `now` and puts whatever they
    /// advertise in flight, without delivering anything.
    pub fn advance_time(&mut self, now: u64) {
        for router in &mut self.routers {
            router.handle_time(now);
        }
        self.flush_packets();
    }

    /// Drops everything currently on the wire.
    pub fn clear_in_flight(&mut self) {
        self.in_flight.clear();
    }

    pub fn get_next_hop(&self, cur: &str, dest: &str) -> Option<String> {
        let router = self
            .routers
            .iter()
            .find(|r| r.address().as_str() == cur)
            .unwrap_or_else(|| panic!("No node {cur} found"));
        let port = router.next_port(&dest.to_string())?;
        let (a, b, _) = self.links.get(port)?;
        Some(if a == cur { b.clone() } else { a.clone() })
    }

    /// The node sequence a traceroute probe from `src` to `dst` would take,
    /// or None while the tables have no complete path.
    pub fn trace(&self, src: &str, dst: &str) -> Option<Vec<String>> {
        let mut path = vec![src.to_string()];
        let mut cur = src.to_string();
        for _ in 0..self.routers.len() {
            if cur == dst {
                return Some(path);
            }
            let next = self.get_next_hop(&cur, dst)?;
            path.push(next.clone());
            cur = next;
        }
        None
    }
}

impl<R: Router<VirtualSystem> + Serialize + DeserializeOwned> VirtualNetwork<R> {
    pub fn freeze(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn restore(state: &str) -> VirtualNetwork<R> {
        serde_json::from_str(state).unwrap()
    }
}
