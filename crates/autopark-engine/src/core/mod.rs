pub use self::{geometry::*, shape::*};

pub(crate) mod geometry;
pub(crate) mod shape;
