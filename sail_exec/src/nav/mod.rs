//! # Navigation module
//!
//! Navigation turns the filtered GPS fixes into a position in the race frame, which is the frame
//! used by the path planner.
//!
//! The transform is done in three steps:
//! 1. Geodetic (latitude, longitude, altitude) to Earth-Centered-Earth-Fixed (ECEF),
//! 2. ECEF to a local North-East-Down (NED) frame anchored at a reference origin,
//! 3. NED to the race frame, a planar frame whose X axis points along the mean wind direction
//!    and whose origin is a mark of the race course (usually the top mark).
//!
//! The NED origin and race frame parameters are held in a `ReferenceFrame`, which must be set up
//! in the order origin, mean wind angle, race origin.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod geo;
pub mod ref_frame;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use geo::*;
pub use ref_frame::ReferenceFrame;
