pub mod geometry;
pub mod identifiers;
pub mod point_cloud;
