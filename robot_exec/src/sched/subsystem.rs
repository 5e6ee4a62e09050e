//! Subsystem definitions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Unique handle of a subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SubsystemId(pub &'static str);

/// The set of subsystems a command requires.
pub type Requirements = BTreeSet<SubsystemId>;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A subsystem owns one actuator/sensor cluster for the lifetime of the process.
pub trait Subsystem {
    /// The subsystem's handle.
    fn id(&self) -> SubsystemId;

    /// Called once per cycle, after all command logic, whether or not a command
    /// currently owns the subsystem.
    fn periodic(&mut self) {}
}

/// A container of subsystems which the scheduler can visit each cycle.
///
/// Implemented by the robot context passed to every command hook.
pub trait SubsystemSet {
    /// Call `f` exactly once on every subsystem in the set.
    fn for_each_subsystem(&mut self, f: &mut dyn FnMut(&mut dyn Subsystem));
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build a requirement set from a list of subsystem handles.
pub fn requirements(ids: &[SubsystemId]) -> Requirements {
    ids.iter().copied().collect()
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
