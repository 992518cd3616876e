//! Dependency paths to the root and the routes joining them.

pub mod path;
pub mod route;

pub use path::{PathHop, PathIndex};
pub use route::{join_routes, Route, CONNECTED_THRESHOLD, DISCONNECTED_DISTANCE};
