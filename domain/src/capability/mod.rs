//! Gateway capability descriptor.
//!
//! The gateway advertises which read surfaces exist and which
//! providers/models it can route to. The descriptor is fetched once per
//! session and never mutated.

pub mod entities;
pub mod selection;
pub mod surface;
