//! Sequential command composition

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use super::{Command, InterruptBehavior, Requirements, SubsystemId};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Runs a list of child commands one after another.
///
/// The group is scheduled as a single command: it requires the union of its
/// children's requirements for its whole duration, and only the active child
/// receives hooks. Children are owned exclusively by the group and must not be
/// registered with the scheduler themselves.
pub struct SequentialGroup<C> {
    name: String,
    children: Vec<Box<dyn Command<C>>>,

    /// Index of the active child, equal to `children.len()` once all children
    /// have finished.
    current: usize,

    requirements: Requirements,
    behavior: InterruptBehavior,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<C> SequentialGroup<C> {
    /// Build a group from its children.
    ///
    /// The group is interruptible if any child is, an empty group is always
    /// interruptible.
    pub fn new(name: &str, children: Vec<Box<dyn Command<C>>>) -> Self {
        let requirements = children
            .iter()
            .flat_map(|c| c.requirements().iter().copied())
            .collect();

        let behavior = if children.is_empty()
            || children
                .iter()
                .any(|c| c.interrupt_behavior() == InterruptBehavior::CancelSelf)
        {
            InterruptBehavior::CancelSelf
        } else {
            InterruptBehavior::CancelIncoming
        };

        Self {
            name: name.to_string(),
            children,
            current: 0,
            requirements,
            behavior,
        }
    }

    /// Add requirements on top of the children's.
    pub fn with_requirements(mut self, extra: &[SubsystemId]) -> Self {
        self.requirements.extend(extra.iter().copied());
        self
    }

    /// Override the derived interrupt behaviour.
    pub fn with_interrupt_behavior(mut self, behavior: InterruptBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Index of the active child.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> Command<C> for SequentialGroup<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }

    fn initialize(&mut self, ctx: &mut C) {
        self.current = 0;

        if let Some(first) = self.children.first_mut() {
            trace!("{}: starting {}", self.name, first.name());
            first.initialize(ctx);
        }
    }

    fn execute(&mut self, ctx: &mut C) {
        let child = match self.children.get_mut(self.current) {
            Some(c) => c,
            None => return,
        };

        child.execute(ctx);

        if child.is_finished(ctx) {
            child.end(ctx, false);
            self.current += 1;

            if let Some(next) = self.children.get_mut(self.current) {
                trace!("{}: starting {}", self.name, next.name());
                next.initialize(ctx);
            }
        }
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        self.current >= self.children.len()
    }

    fn end(&mut self, ctx: &mut C, interrupted: bool) {
        // Finished children have already been ended
        if interrupted {
            if let Some(child) = self.children.get_mut(self.current) {
                child.end(ctx, true);
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
