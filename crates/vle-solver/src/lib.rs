//! Equilibrium solver for multi-chamber vapor-liquid systems.
//!
//! After every temperature step the solver alternates two bounded
//! relaxations until the state is consistent again:
//! - phase adjustment: each substance moves a fixed mole increment between
//!   gas and liquid toward its saturation pressure
//! - pressure balance: chambers trade volume until their total pressures sit
//!   within a band around the mean
//!
//! Non-convergence is reported (warning + flags in the step report), never
//! raised as an error; the best state found is kept.

pub mod chamber;
pub mod config;
pub mod equilibrium;
pub mod error;
pub mod schedule;
pub mod snapshot;

pub use chamber::{Chamber, TemperatureResponse};
pub use config::SolverConfig;
pub use equilibrium::{BalanceReport, EquilibriumSolver, StepReport};
pub use error::{SolverError, SolverResult};
pub use schedule::{ScheduleEvent, ScheduleSummary, TemperatureSchedule, run_schedule};
pub use snapshot::{ChamberSnapshot, SubstanceSnapshot, SystemSnapshot};

/// Version string recorded with persisted runs.
pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");
