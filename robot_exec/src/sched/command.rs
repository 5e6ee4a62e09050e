//! Command trait and lifecycle types

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::Serialize;

use super::Requirements;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Handle of a command registered with a [`super::Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CommandId(pub(crate) usize);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Decides which of two commands loses when both require the same subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterruptBehavior {
    /// The command may be interrupted by an incoming command, and as an
    /// incoming command it interrupts the current owners.
    CancelSelf,

    /// The command is never interrupted by an incoming command, and as an
    /// incoming command it is rejected if any requirement is already owned.
    CancelIncoming,
}

/// Lifecycle state of a registered command.
///
/// ```text
/// Idle --schedule--> Scheduled --granted--> Running --finished/interrupted--> Ended
///   ^                    |                                                      |
///   +-----rejected-------+                       <-----------schedule-----------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandState {
    Idle,
    Scheduled,
    Running,
    Ended,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A unit of schedulable behaviour.
///
/// All hooks receive the robot context `C`. The scheduler guarantees the call
/// order `initialize`, then zero or more (`execute`, `is_finished`) pairs, then
/// exactly one `end`.
pub trait Command<C> {
    /// Name used in logs and telemetry.
    fn name(&self) -> &str;

    /// Subsystems this command needs exclusive ownership of while running.
    ///
    /// Must not change after construction.
    fn requirements(&self) -> &Requirements;

    /// How this command resolves requirement conflicts.
    fn interrupt_behavior(&self) -> InterruptBehavior {
        InterruptBehavior::CancelSelf
    }

    /// Called once when the command starts running.
    fn initialize(&mut self, _ctx: &mut C) {}

    /// Called once per cycle while the command is running.
    fn execute(&mut self, _ctx: &mut C) {}

    /// Queried after each `execute`, the command ends when this returns true.
    fn is_finished(&self, _ctx: &C) -> bool {
        false
    }

    /// Called once when the command stops running, `interrupted` is false if it
    /// finished normally.
    fn end(&mut self, _ctx: &mut C, _interrupted: bool) {}

    /// Box the command for registration or composition.
    fn boxed(self) -> Box<dyn Command<C>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for InterruptBehavior {
    fn default() -> Self {
        InterruptBehavior::CancelSelf
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
