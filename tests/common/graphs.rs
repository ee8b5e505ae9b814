use nexthop::framework::Router;

use crate::common::virtual_network::{VirtualNetwork, VirtualSystem};

/// a - b - c - d chain, every link cost 1.
pub fn vnet_line<R: Router<VirtualSystem>>(make: impl Fn(String) -> R) -> VirtualNetwork<R> {
    VirtualNetwork::create(
        &["a", "b", "c", "d"],
        &[(0, "a", "b", 1), (1, "b", "c", 1), (2, "c", "d", 1)],
        make,
    )
}

/// a - b - c - d chain of cost-1 links plus a direct a - d link of cost 5;
/// the chain is cheaper than the shortcut.
pub fn vnet_square_shortcut<R: Router<VirtualSystem>>(
    make: impl Fn(String) -> R,
) -> VirtualNetwork<R> {
    VirtualNetwork::create(
        &["a", "b", "c", "d"],
        &[
            (0, "a", "b", 1),
            (1, "b", "c", 1),
            (2, "c", "d", 1),
            (3, "a", "d", 5),
        ],
        make,
    )
}

/// Five nodes with asymmetric path costs; best 1 -> 5 is 1-2-4-5 at cost 8.
pub fn vnet_weighted<R: Router<VirtualSystem>>(make: impl Fn(String) -> R) -> VirtualNetwork<R> {
    VirtualNetwork::create(
        &["1", "2", "3", "4", "5"],
        &[
            (0, "1", "2", 2),
            (1, "1", "3", 1),
            (2, "2", "3", 4),
            (3, "2", "4", 5),
            (4, "3", "4", 100),
            (5, "3", "5", 8),
            (6, "4", "5", 1),
        ],
        make,
    )
}
