//! Pure route-access decisions over the session identity
//!
//! Nothing here performs I/O: capability resolution, route admission and
//! the home-route table are plain functions so they can gate any
//! navigation surface.

mod gate;
mod types;

pub use gate::{capabilities_of, decide, home_route_for, is_admitted};
pub use types::{Capability, Route, RouteDecision, RouteRequirement};
