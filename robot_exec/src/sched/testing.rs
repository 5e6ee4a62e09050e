//! Test fixtures for the scheduler and command compositions

use std::collections::BTreeSet;

use super::{requirements, Command, InterruptBehavior, Requirements, Subsystem, SubsystemId, SubsystemSet};

pub(crate) const ARM: SubsystemId = SubsystemId("arm");
pub(crate) const GRABBER: SubsystemId = SubsystemId("grabber");
pub(crate) const DRIVE: SubsystemId = SubsystemId("drive");

pub(crate) struct TestSubsystem {
    pub id: SubsystemId,
    pub periodic_count: u32,
}

impl Subsystem for TestSubsystem {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn periodic(&mut self) {
        self.periodic_count += 1;
    }
}

/// Context which records every hook invocation in `log`.
pub(crate) struct TestCtx {
    pub subsystems: Vec<TestSubsystem>,
    pub log: Vec<String>,

    /// Names of the recorders whose `is_finished` returns true.
    pub finished: BTreeSet<&'static str>,
}

impl TestCtx {
    pub fn new() -> Self {
        Self {
            subsystems: [ARM, GRABBER, DRIVE]
                .iter()
                .map(|id| TestSubsystem {
                    id: *id,
                    periodic_count: 0,
                })
                .collect(),
            log: Vec::new(),
            finished: BTreeSet::new(),
        }
    }

    /// Log entries excluding the periodic hooks.
    pub fn command_events(&self) -> Vec<&str> {
        self.log
            .iter()
            .map(String::as_str)
            .filter(|e| !e.starts_with("periodic:"))
            .collect()
    }

    pub fn count(&self, event: &str) -> usize {
        self.log.iter().filter(|e| e.as_str() == event).count()
    }
}

impl SubsystemSet for TestCtx {
    fn for_each_subsystem(&mut self, f: &mut dyn FnMut(&mut dyn Subsystem)) {
        for s in self.subsystems.iter_mut() {
            f(s);
            self.log.push(format!("periodic:{}", s.id));
        }
    }
}

/// Command which logs `<name>:<hook>` for each of its hooks.
pub(crate) struct Recorder {
    name: &'static str,
    reqs: Requirements,
    behavior: InterruptBehavior,
}

impl Recorder {
    pub fn new(name: &'static str, reqs: &[SubsystemId]) -> Self {
        Self {
            name,
            reqs: requirements(reqs),
            behavior: InterruptBehavior::CancelSelf,
        }
    }

    pub fn with_interrupt_behavior(mut self, behavior: InterruptBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

impl Command<TestCtx> for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }

    fn initialize(&mut self, ctx: &mut TestCtx) {
        ctx.log.push(format!("{}:init", self.name));
    }

    fn execute(&mut self, ctx: &mut TestCtx) {
        ctx.log.push(format!("{}:exec", self.name));
    }

    fn is_finished(&self, ctx: &TestCtx) -> bool {
        ctx.finished.contains(self.name)
    }

    fn end(&mut self, ctx: &mut TestCtx, interrupted: bool) {
        ctx.log.push(format!("{}:end({})", self.name, interrupted));
    }
}
