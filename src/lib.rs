//! nexthop is an I/O free pair of interchangeable routing engines for
//! simulated packet networks: a distance-vector engine
//! ([`distance_vector::DvRouter`]) and a link-state engine
//! ([`link_state::LsRouter`]).
//!
//! The engines never perform I/O on their own. The hosting framework feeds
//! them events (packet arrivals, link changes, clock ticks) through the
//! [`framework::Router`] trait and drains the queued [outbound
//! packets](concepts::packet::OutboundPacket) after each event.

pub mod concepts;
pub mod distance_vector;
pub mod feedback;
pub mod framework;
pub mod link_state;
pub mod router;
pub mod util;
