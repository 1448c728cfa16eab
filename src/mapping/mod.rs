//! Conversion of axis readings into pointer displacement.

pub mod response;
