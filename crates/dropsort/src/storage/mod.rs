pub mod placement;

pub use placement::{PlacementRequest, PlacementResolver, MAX_COLLISION_ATTEMPTS};
