pub mod coordinate;
pub mod model;
pub mod pom;
pub mod reactor;

pub use reactor::{Reactor, default_local_repository};
