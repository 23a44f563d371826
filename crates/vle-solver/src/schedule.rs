//! Temperature ramp: repeated fixed-size steps toward a target temperature.

use serde::{Deserialize, Serialize};
use vle_core::ensure_positive;

use crate::equilibrium::{EquilibriumSolver, StepReport};
use crate::error::{SolverError, SolverResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSchedule {
    pub target_temperature_k: f64,
    /// Steps per kelvin; each step moves `1 / steps_per_kelvin` K
    pub steps_per_kelvin: u32,
}

impl TemperatureSchedule {
    pub fn new(target_temperature_k: f64, steps_per_kelvin: u32) -> SolverResult<Self> {
        let target_temperature_k = ensure_positive(target_temperature_k, "target_temperature_k")?;
        if steps_per_kelvin == 0 {
            return Err(SolverError::InvalidArg {
                what: "steps_per_kelvin must be positive",
            });
        }
        Ok(Self {
            target_temperature_k,
            steps_per_kelvin,
        })
    }

    pub fn step_count(&self, from_k: f64) -> usize {
        ((self.target_temperature_k - from_k).abs() * self.steps_per_kelvin as f64).round() as usize
    }

    /// Signed step toward the target.
    pub fn step_delta(&self, from_k: f64) -> f64 {
        let magnitude = 1.0 / self.steps_per_kelvin as f64;
        if self.target_temperature_k < from_k {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Handed to the observer after every step.
#[derive(Debug)]
pub struct ScheduleEvent<'a> {
    /// 1-based step index
    pub step: usize,
    pub total_steps: usize,
    pub report: StepReport,
    pub solver: &'a EquilibriumSolver,
}

impl ScheduleEvent<'_> {
    pub fn fraction_complete(&self) -> f64 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.step as f64 / self.total_steps as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleSummary {
    pub steps: usize,
    pub non_converged_steps: usize,
    pub unbalanced_steps: usize,
    pub final_temperature_k: f64,
}

/// Step `solver` from its current temperature to the schedule's target.
pub fn run_schedule(
    solver: &mut EquilibriumSolver,
    schedule: &TemperatureSchedule,
    mut observer: Option<&mut dyn FnMut(&ScheduleEvent<'_>)>,
) -> SolverResult<ScheduleSummary> {
    let start_k = solver.temperature_k();
    let total_steps = schedule.step_count(start_k);
    let delta_k = schedule.step_delta(start_k);

    let mut non_converged_steps = 0;
    let mut unbalanced_steps = 0;

    for step in 1..=total_steps {
        // The last step lands on the target instead of the accumulated sum.
        let delta_k = if step == total_steps {
            schedule.target_temperature_k - solver.temperature_k()
        } else {
            delta_k
        };
        let report = solver.step_temperature(delta_k)?;
        if !report.converged {
            non_converged_steps += 1;
        }
        if !report.pressure_balanced {
            unbalanced_steps += 1;
        }

        if let Some(cb) = observer.as_mut() {
            cb(&ScheduleEvent {
                step,
                total_steps,
                report,
                solver: &*solver,
            });
        }
    }

    Ok(ScheduleSummary {
        steps: total_steps,
        non_converged_steps,
        unbalanced_steps,
        final_temperature_k: solver.temperature_k(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooling_schedule() {
        let schedule = TemperatureSchedule::new(273.0, 1).unwrap();
        assert_eq!(schedule.step_count(373.0), 100);
        assert_eq!(schedule.step_delta(373.0), -1.0);
    }

    #[test]
    fn warming_with_finer_resolution() {
        let schedule = TemperatureSchedule::new(310.0, 4).unwrap();
        assert_eq!(schedule.step_count(300.0), 40);
        assert_eq!(schedule.step_delta(300.0), 0.25);
    }

    #[test]
    fn fractional_steps_end_on_target() {
        use crate::{Chamber, SolverConfig};
        use vle_thermo::{Conditions, Substance, VaporPressureCurve};

        let gas = Substance::new("nitrogen", 1.0, VaporPressureCurve::inert(), 0.0).unwrap();
        let chamber = Chamber::new("a", Conditions::new(300.0, 25.0).unwrap(), vec![gas]).unwrap();
        let mut solver = EquilibriumSolver::new(vec![chamber], 300.0, SolverConfig::default()).unwrap();

        let schedule = TemperatureSchedule::new(290.0, 3).unwrap();
        let summary = run_schedule(&mut solver, &schedule, None).unwrap();

        assert_eq!(summary.steps, 30);
        assert_eq!(summary.final_temperature_k, 290.0);
        assert_eq!(solver.temperature_k(), 290.0);
    }

    #[test]
    fn invalid_schedule() {
        assert!(TemperatureSchedule::new(273.0, 0).is_err());
        assert!(TemperatureSchedule::new(-1.0, 1).is_err());
    }
}
