//! Placement of parts, bundling of wire sets into tracks, and track ordering.
//!
//! The main part sits on the left, sockets are stacked on the right, and every wire set of
//! the main part runs to the first socket offering the same connection type. The wires of one
//! such connection travel together as a bundle in a vertical track of the routing region.
//! Bundles whose vertical spans overlap share a drawing group; within a group the track order
//! is chosen to minimize bundles crossing each other.

mod assembly;
mod bundle;
mod group;
mod part;

pub use assembly::Assembly;
pub use bundle::{BundledConnection, PlacedConnection, RoutedWire, WireSetRef};
pub use group::{DrawingGroup, TrackArrangement, group_connections};
pub use part::{Part, PartId};
