//! Language front-ends shared by the extractors.

pub mod javascript;
