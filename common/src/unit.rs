//! Marker types.

/// Marker type describing a start of something (a booking, an event).
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an expiration of something.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
