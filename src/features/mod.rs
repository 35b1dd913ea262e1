//! Feature Module - fixed-order model input

pub mod layout;
pub mod vector;

pub use layout::LayoutInfo;
pub use vector::FeatureVector;
