//! Named autonomous routine

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use crate::{
    sched::{Command, InterruptBehavior, Requirements, SequentialGroup, SubsystemId},
    systems::Systems,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A sequence of commands forming an autonomous routine, with a map of named
/// events.
///
/// The event map holds commands to be triggered at named points of a path.
/// Nothing triggers them yet, the sequence runs exactly as listed.
pub struct AutoRoutineCommand {
    group: SequentialGroup<Systems>,
    event_map: BTreeMap<String, Box<dyn Command<Systems>>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoRoutineCommand {
    pub fn new(name: &str, commands: Vec<Box<dyn Command<Systems>>>) -> Self {
        Self {
            group: SequentialGroup::new(name, commands),
            event_map: BTreeMap::new(),
        }
    }

    /// Require subsystems on top of those the commands require.
    pub fn with_requirements(mut self, extra: &[SubsystemId]) -> Self {
        self.group = self.group.with_requirements(extra);
        self
    }

    /// Attach a command to a named event.
    pub fn with_event(mut self, name: &str, command: Box<dyn Command<Systems>>) -> Self {
        self.event_map.insert(name.to_string(), command);
        self
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.event_map.keys().map(|k| k.as_str())
    }

    /// Index of the step currently running.
    pub fn current_step(&self) -> usize {
        self.group.current_index()
    }

    pub fn num_steps(&self) -> usize {
        self.group.len()
    }
}

impl Command<Systems> for AutoRoutineCommand {
    fn name(&self) -> &str {
        self.group.name()
    }

    fn requirements(&self) -> &Requirements {
        self.group.requirements()
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.group.interrupt_behavior()
    }

    fn initialize(&mut self, ctx: &mut Systems) {
        self.group.initialize(ctx)
    }

    fn execute(&mut self, ctx: &mut Systems) {
        self.group.execute(ctx)
    }

    fn is_finished(&self, ctx: &Systems) -> bool {
        self.group.is_finished(ctx)
    }

    fn end(&mut self, ctx: &mut Systems, interrupted: bool) {
        self.group.end(ctx, interrupted)
    }
}
