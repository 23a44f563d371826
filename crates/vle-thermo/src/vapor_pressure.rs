//! Saturation vapor-pressure curves.
//!
//! A fitted curve is the two-parameter exponential
//!
//! ```text
//! p_sat(T) = C · exp(−L / (R·T))
//! ```
//!
//! with `C` and `L` solved in closed form so that the curve passes exactly
//! through two measured `(T, p)` points. Inert gases use a flat curve that is
//! high enough never to be reached.

use serde::{Deserialize, Serialize};
use vle_core::constants::{INERT_SATURATION_PA, R_GAS};
use vle_core::ensure_positive;

use crate::error::{ThermoError, ThermoResult};

/// One measured saturation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub temperature_k: f64,
    pub pressure_pa: f64,
}

impl From<(f64, f64)> for CalibrationPoint {
    fn from((temperature_k, pressure_pa): (f64, f64)) -> Self {
        Self {
            temperature_k,
            pressure_pa,
        }
    }
}

impl From<[f64; 2]> for CalibrationPoint {
    fn from([temperature_k, pressure_pa]: [f64; 2]) -> Self {
        Self {
            temperature_k,
            pressure_pa,
        }
    }
}

/// Saturation vapor pressure as a function of temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VaporPressureCurve {
    /// `C · exp(−L / (R·T))`; `C` in Pa, `L` in J/kmol.
    Fitted { c_pa: f64, l_j_per_kmol: f64 },
    /// Same saturation pressure at every temperature.
    Constant { pressure_pa: f64 },
}

impl VaporPressureCurve {
    /// Fit the exponential model through two calibration points.
    pub fn fit(
        a: impl Into<CalibrationPoint>,
        b: impl Into<CalibrationPoint>,
    ) -> ThermoResult<Self> {
        let a = a.into();
        let b = b.into();
        let t1 = ensure_positive(a.temperature_k, "calibration temperature")?;
        let p1 = ensure_positive(a.pressure_pa, "calibration pressure")?;
        let t2 = ensure_positive(b.temperature_k, "calibration temperature")?;
        let p2 = ensure_positive(b.pressure_pa, "calibration pressure")?;

        if t1 == t2 {
            return Err(ThermoError::InvalidCalibration {
                what: "calibration points share a temperature",
            });
        }

        let l = R_GAS * (p2 / p1).ln() / (1.0 / t1 - 1.0 / t2);
        let c = (p1.ln() + l / (R_GAS * t1)).exp();

        if !c.is_finite() || !l.is_finite() {
            return Err(ThermoError::InvalidCalibration {
                what: "fitted constants overflow",
            });
        }

        Ok(VaporPressureCurve::Fitted {
            c_pa: c,
            l_j_per_kmol: l,
        })
    }

    /// Flat curve at `pressure_pa`.
    pub fn constant(pressure_pa: f64) -> ThermoResult<Self> {
        let pressure_pa = ensure_positive(pressure_pa, "saturation pressure")?;
        Ok(VaporPressureCurve::Constant { pressure_pa })
    }

    /// Flat curve for a gas that never condenses in the modelled range.
    pub fn inert() -> Self {
        VaporPressureCurve::Constant {
            pressure_pa: INERT_SATURATION_PA,
        }
    }

    /// Saturation pressure (Pa) at `temperature_k`.
    pub fn pressure(&self, temperature_k: f64) -> f64 {
        match *self {
            VaporPressureCurve::Fitted { c_pa, l_j_per_kmol } => {
                c_pa * (-l_j_per_kmol / (R_GAS * temperature_k)).exp()
            }
            VaporPressureCurve::Constant { pressure_pa } => pressure_pa,
        }
    }

    /// `n` evenly spaced `(T, p_sat)` pairs over `[t_min, t_max]`.
    pub fn sample(&self, t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
        match n {
            0 => Vec::new(),
            1 => vec![(t_min, self.pressure(t_min))],
            _ => {
                let step = (t_max - t_min) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        let t = t_min + step * i as f64;
                        (t, self.pressure(t))
                    })
                    .collect()
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fit_reproduces_calibration(
            t1 in 200.0_f64..350.0,
            dt in 5.0_f64..80.0,
            p1 in 1e3_f64..1e5,
            ratio in 1.1_f64..10.0,
        ) {
            let t2 = t1 + dt;
            let p2 = p1 * ratio;
            let curve = VaporPressureCurve::fit((t1, p1), (t2, p2)).unwrap();
            prop_assert!((curve.pressure(t1) - p1).abs() / p1 < 1e-8);
            prop_assert!((curve.pressure(t2) - p2).abs() / p2 < 1e-8);
        }
    }
}
