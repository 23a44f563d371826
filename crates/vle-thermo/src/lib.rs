//! vle-thermo: single-substance thermodynamics for the equilibrium solver.
//!
//! Provides:
//! - Vapor-pressure curves (two-point exponential fit, or a flat curve for inert gases)
//! - Chamber conditions (the temperature and volume shared by every substance in a chamber)
//! - Substances: gas/liquid mole split, ideal-gas partial pressure, phase-equilibrium test
//!   and the fixed-step phase adjustment
//!
//! # Example
//!
//! ```
//! use vle_thermo::{Conditions, Substance, VaporPressureCurve};
//!
//! let curve = VaporPressureCurve::fit((293.0, 59_980.0), (313.0, 119_960.0)).unwrap();
//! let ether = Substance::new("diethyl ether", 1.0, curve, 5.0).unwrap();
//! let cond = Conditions::from_ideal_gas(1.0, 373.0, 106_592.0).unwrap();
//!
//! assert!((ether.partial_pressure(&cond) - 106_592.0).abs() < 1e-3);
//! ```

pub mod conditions;
pub mod error;
pub mod substance;
pub mod vapor_pressure;

pub use conditions::{Conditions, ideal_gas_pressure, ideal_gas_volume};
pub use error::{ThermoError, ThermoResult};
pub use substance::{PhaseTrend, Substance};
pub use vapor_pressure::{CalibrationPoint, VaporPressureCurve};
