//! Nested relaxation toward pressure balance and vapor-liquid equilibrium.

use rayon::prelude::*;
use tracing::{debug, info, warn};
use vle_core::constants::R_GAS;
use vle_core::{Tolerances, ensure_finite, ensure_positive, mean, nearly_equal};

use crate::chamber::{Chamber, TemperatureResponse};
use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};
use crate::snapshot::SystemSnapshot;

/// Outcome of one [`EquilibriumSolver::adjust_pressure`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceReport {
    /// Volume exchanges applied
    pub iterations: usize,
    /// All chambers inside the pressure band on return
    pub balanced: bool,
    /// Stopped because no exchange could be applied
    pub stalled: bool,
}

/// Outcome of one [`EquilibriumSolver::step_temperature`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub temperature_k: f64,
    /// Main-loop iterations used
    pub iterations: usize,
    /// Every chamber reached phase equilibrium within the budget
    pub converged: bool,
    pub pressure_balanced: bool,
}

/// Owns the chambers of one vessel and relaxes them after each temperature step.
#[derive(Debug, Clone)]
pub struct EquilibriumSolver {
    chambers: Vec<Chamber>,
    config: SolverConfig,
    initial_temperature_k: f64,
}

impl EquilibriumSolver {
    pub fn new(
        chambers: Vec<Chamber>,
        initial_temperature_k: f64,
        config: SolverConfig,
    ) -> SolverResult<Self> {
        config.validate()?;
        let initial_temperature_k = ensure_positive(initial_temperature_k, "initial_temperature_k")?;

        if chambers.is_empty() {
            return Err(SolverError::ProblemSetup {
                what: "at least one chamber is required".to_string(),
            });
        }
        for chamber in &chambers {
            if !nearly_equal(
                chamber.temperature(),
                initial_temperature_k,
                Tolerances::default(),
            ) {
                return Err(SolverError::ProblemSetup {
                    what: format!(
                        "chamber '{}' starts at {} K, expected {} K",
                        chamber.name,
                        chamber.temperature(),
                        initial_temperature_k
                    ),
                });
            }
        }

        let substance_count: usize = chambers.iter().map(|c| c.substances().len()).sum();
        info!(
            max_p_diff_in_rooms = config.max_p_diff_in_rooms,
            delta_n_in_adjust = config.delta_n_in_adjust,
            max_iter = config.max_iter,
            parallel_phase_adjust = config.parallel_phase_adjust,
            "solver configured"
        );
        info!(
            chambers = chambers.len(),
            substances = substance_count,
            initial_temperature_k,
            "solver ready"
        );

        Ok(Self {
            chambers,
            config,
            initial_temperature_k,
        })
    }

    pub fn chambers(&self) -> &[Chamber] {
        &self.chambers
    }

    pub fn chamber(&self, name: &str) -> Option<&Chamber> {
        self.chambers.iter().find(|c| c.name == name)
    }

    pub fn into_chambers(self) -> Vec<Chamber> {
        self.chambers
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn initial_temperature_k(&self) -> f64 {
        self.initial_temperature_k
    }

    /// Current temperature (all chambers move in lockstep).
    pub fn temperature_k(&self) -> f64 {
        self.chambers[0].temperature()
    }

    pub fn mean_pressure(&self) -> f64 {
        mean(self.chambers.iter().map(Chamber::pressure)).unwrap_or(0.0)
    }

    /// Every chamber within `max_p_diff_in_rooms / 2` of the mean pressure.
    pub fn is_pressure_balanced(&self) -> bool {
        let p_avg = self.mean_pressure();
        let band = self.config.pressure_band();
        self.chambers.iter().all(|c| {
            let diff = c.pressure() - p_avg;
            debug!(chamber = %c.name, diff, "pressure deviation from mean");
            diff.abs() < band
        })
    }

    pub fn is_at_equilibrium(&self) -> bool {
        self.chambers.iter().all(Chamber::is_at_equilibrium)
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot::capture(&self.chambers)
    }

    /// Apply `delta_k` to every chamber, then relax until every substance is
    /// in phase equilibrium or the iteration budget runs out.
    pub fn step_temperature(&mut self, delta_k: f64) -> SolverResult<StepReport> {
        let delta_k = ensure_finite(delta_k, "temperature delta")?;

        let responses: Vec<TemperatureResponse> = self
            .chambers
            .iter_mut()
            .map(|c| c.apply_temperature_delta(delta_k))
            .collect();
        debug!(?responses, "temperature applied");

        let max_iter = self.config.max_iter;
        let mut phases_settled = responses.iter().all(|r| r.at_equilibrium);
        let mut converged = false;
        let mut iterations = 0;

        while iterations < max_iter {
            iterations += 1;

            if !phases_settled {
                debug!(
                    iteration = iterations,
                    mean_pressure_pa = self.mean_pressure(),
                    "not in vapor-liquid equilibrium"
                );
                self.drive_phases();
            }

            if !self.is_pressure_balanced() {
                self.adjust_pressure();
            }

            phases_settled = self.is_at_equilibrium();
            if phases_settled {
                converged = true;
                break;
            }
        }

        let temperature_k = self.temperature_k();
        if !converged {
            warn!(
                temperature_k,
                max_iter, "equilibrium loop reached the iteration limit before converging"
            );
        }
        info!(temperature_k, iterations, converged, "temperature step");

        Ok(StepReport {
            temperature_k,
            iterations,
            converged,
            pressure_balanced: self.is_pressure_balanced(),
        })
    }

    /// Trade volume between chambers until their pressures are balanced, a
    /// chamber refuses its share, or the iteration budget runs out.
    ///
    /// The exchange magnitude is anchored on chamber 0:
    ///
    /// ```text
    /// ΔV = ½ · n_gas(0) · R · T(0) · |1/p_avg − 1/p(0)|
    /// ```
    ///
    /// and each chamber takes the fraction `|p − p_avg| / Σ|p_c − p_avg|` of it,
    /// expanding above the mean and contracting below.
    pub fn adjust_pressure(&mut self) -> BalanceReport {
        let max_iter = self.config.max_iter;

        for iteration in 0..max_iter {
            if self.is_pressure_balanced() {
                return BalanceReport {
                    iterations: iteration,
                    balanced: true,
                    stalled: false,
                };
            }

            let Some(deltas) = self.volume_exchange() else {
                warn!(
                    iteration,
                    "pressure balance stalled: volume exchange is undefined"
                );
                return BalanceReport {
                    iterations: iteration,
                    balanced: false,
                    stalled: true,
                };
            };

            // Stops at the first chamber that rejects its delta.
            let changed = self
                .chambers
                .iter_mut()
                .zip(&deltas)
                .all(|(c, &dv)| c.apply_volume_delta(dv));

            if !changed {
                debug!(iteration, ?deltas, "volume change rejected");
                return BalanceReport {
                    iterations: iteration + 1,
                    balanced: self.is_pressure_balanced(),
                    stalled: true,
                };
            }
        }

        let balanced = self.is_pressure_balanced();
        if !balanced {
            warn!(
                max_iter,
                mean_pressure_pa = self.mean_pressure(),
                "pressure balance reached the iteration limit before converging"
            );
        }
        BalanceReport {
            iterations: max_iter,
            balanced,
            stalled: false,
        }
    }

    /// Per-chamber volume deltas for one balancing pass, or `None` when the
    /// step size is not a finite number or nothing deviates from the mean.
    fn volume_exchange(&self) -> Option<Vec<f64>> {
        let p_avg = self.mean_pressure();
        let reference = &self.chambers[0];
        let delta_v = 0.5
            * reference.total_gas_moles()
            * R_GAS
            * reference.temperature()
            * (1.0 / p_avg - 1.0 / reference.pressure()).abs();

        let deviations: Vec<f64> = self
            .chambers
            .iter()
            .map(|c| c.pressure() - p_avg)
            .collect();
        let total_deviation: f64 = deviations.iter().map(|d| d.abs()).sum();

        if !delta_v.is_finite() || !(total_deviation > 0.0) {
            return None;
        }

        Some(
            deviations
                .iter()
                .map(|&d| {
                    let sign = if d > 0.0 { 1.0 } else { -1.0 };
                    sign * delta_v * d.abs() / total_deviation
                })
                .collect(),
        )
    }

    fn drive_phases(&mut self) {
        let delta_n = self.config.delta_n_in_adjust;
        if self.config.parallel_phase_adjust {
            self.chambers
                .par_iter_mut()
                .for_each(|c| c.drive_toward_equilibrium(delta_n));
        } else {
            for chamber in &mut self.chambers {
                chamber.drive_toward_equilibrium(delta_n);
            }
        }
    }
}
