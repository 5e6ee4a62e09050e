//! # Command scheduler
//!
//! This module implements the cooperative command scheduler which arbitrates
//! exclusive ownership of the robot's subsystems. It is made up of:
//!
//! - [`Subsystem`] - owner of one actuator/sensor cluster, with a periodic hook
//!   run once per cycle regardless of which command owns it.
//! - [`Command`] - a unit of schedulable behaviour with a declared set of
//!   required subsystems and an interruption policy.
//! - [`SequentialGroup`] - a command built from an ordered list of child
//!   commands.
//! - [`Scheduler`] - holds every registered command, the set of running
//!   commands and the subsystem -> owner mapping, and advances them all by one
//!   cycle in [`Scheduler::tick`].
//!
//! Command hooks receive the robot context `C` (the subsystem container) by
//! mutable reference instead of reaching into global state, so the scheduler is
//! generic over it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod basic;
mod command;
mod group;
mod scheduler;
mod subsystem;

#[cfg(test)]
pub(crate) mod testing;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use basic::{FunctionalCommand, InstantCommand, WaitCommand, WaitUntilCommand};
pub use command::{Command, CommandId, CommandState, InterruptBehavior};
pub use group::SequentialGroup;
pub use scheduler::Scheduler;
pub use subsystem::{requirements, Requirements, Subsystem, SubsystemId, SubsystemSet};
