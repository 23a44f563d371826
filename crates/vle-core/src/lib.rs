//! vle-core: shared foundation for the vapor-liquid equilibrium workspace.
//!
//! Contains:
//! - units (uom SI types, constructors and the gas constant)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
