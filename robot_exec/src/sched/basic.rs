//! Basic commands built from closures or timers

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use util::time::secs_to_cycles;

use super::{requirements, Command, InterruptBehavior, Requirements, SubsystemId};
use crate::CYCLE_PERIOD_S;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Runs an action once in `initialize` and finishes on the same tick.
pub struct InstantCommand<C> {
    name: String,
    action: Box<dyn FnMut(&mut C)>,
    reqs: Requirements,
    behavior: InterruptBehavior,
}

/// A command assembled from one closure per hook.
pub struct FunctionalCommand<C> {
    name: String,
    on_init: Box<dyn FnMut(&mut C)>,
    on_execute: Box<dyn FnMut(&mut C)>,
    on_end: Box<dyn FnMut(&mut C, bool)>,
    is_finished: Box<dyn Fn(&C) -> bool>,
    reqs: Requirements,
    behavior: InterruptBehavior,
}

/// Finishes after a fixed number of cycles.
///
/// Time is counted in scheduler ticks rather than wall clock so a wait behaves
/// identically in simulation and on the robot.
pub struct WaitCommand {
    name: String,
    cycles: u64,
    elapsed: u64,
    reqs: Requirements,
}

/// Finishes once a condition on the context holds.
pub struct WaitUntilCommand<C> {
    name: String,
    condition: Box<dyn Fn(&C) -> bool>,
    reqs: Requirements,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<C> InstantCommand<C> {
    pub fn new<F>(name: &str, action: F) -> Self
    where
        F: FnMut(&mut C) + 'static,
    {
        Self {
            name: name.to_string(),
            action: Box::new(action),
            reqs: Requirements::new(),
            behavior: InterruptBehavior::CancelSelf,
        }
    }

    pub fn with_requirements(mut self, reqs: &[SubsystemId]) -> Self {
        self.reqs = requirements(reqs);
        self
    }

    pub fn with_interrupt_behavior(mut self, behavior: InterruptBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

impl<C> Command<C> for InstantCommand<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }

    fn initialize(&mut self, ctx: &mut C) {
        (self.action)(ctx)
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        true
    }
}

impl<C: 'static> FunctionalCommand<C> {
    /// Create a command with no-op hooks which never finishes.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            on_init: Box::new(|_: &mut C| ()),
            on_execute: Box::new(|_: &mut C| ()),
            on_end: Box::new(|_: &mut C, _: bool| ()),
            is_finished: Box::new(|_: &C| false),
            reqs: Requirements::new(),
            behavior: InterruptBehavior::CancelSelf,
        }
    }

    pub fn on_init<F: FnMut(&mut C) + 'static>(mut self, f: F) -> Self {
        self.on_init = Box::new(f);
        self
    }

    pub fn on_execute<F: FnMut(&mut C) + 'static>(mut self, f: F) -> Self {
        self.on_execute = Box::new(f);
        self
    }

    pub fn on_end<F: FnMut(&mut C, bool) + 'static>(mut self, f: F) -> Self {
        self.on_end = Box::new(f);
        self
    }

    pub fn until<F: Fn(&C) -> bool + 'static>(mut self, f: F) -> Self {
        self.is_finished = Box::new(f);
        self
    }

    pub fn with_requirements(mut self, reqs: &[SubsystemId]) -> Self {
        self.reqs = requirements(reqs);
        self
    }

    pub fn with_interrupt_behavior(mut self, behavior: InterruptBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

impl<C> Command<C> for FunctionalCommand<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }

    fn initialize(&mut self, ctx: &mut C) {
        (self.on_init)(ctx)
    }

    fn execute(&mut self, ctx: &mut C) {
        (self.on_execute)(ctx)
    }

    fn is_finished(&self, ctx: &C) -> bool {
        (self.is_finished)(ctx)
    }

    fn end(&mut self, ctx: &mut C, interrupted: bool) {
        (self.on_end)(ctx, interrupted)
    }
}

impl WaitCommand {
    /// Wait for `duration_s` seconds, rounded up to a whole number of cycles.
    pub fn new(duration_s: f64) -> Self {
        Self::with_cycles(secs_to_cycles(duration_s, CYCLE_PERIOD_S))
    }

    pub fn with_cycles(cycles: u64) -> Self {
        Self {
            name: format!("Wait({})", cycles),
            cycles,
            elapsed: 0,
            reqs: Requirements::new(),
        }
    }

    /// Hold the given subsystems while waiting.
    pub fn with_requirements(mut self, reqs: &[SubsystemId]) -> Self {
        self.reqs = requirements(reqs);
        self
    }
}

impl<C> Command<C> for WaitCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn initialize(&mut self, _ctx: &mut C) {
        self.elapsed = 0;
    }

    fn execute(&mut self, _ctx: &mut C) {
        self.elapsed += 1;
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        self.elapsed >= self.cycles
    }
}

impl<C> WaitUntilCommand<C> {
    pub fn new<F>(name: &str, condition: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Self {
            name: name.to_string(),
            condition: Box::new(condition),
            reqs: Requirements::new(),
        }
    }

    pub fn with_requirements(mut self, reqs: &[SubsystemId]) -> Self {
        self.reqs = requirements(reqs);
        self
    }
}

impl<C> Command<C> for WaitUntilCommand<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn is_finished(&self, ctx: &C) -> bool {
        (self.condition)(ctx)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sched::testing::*;
    use crate::sched::{CommandState, Scheduler, SequentialGroup};

    #[test]
    fn test_instant_command() {
        let mut sched = Scheduler::new();
        let mut ctx = TestCtx::new();
        let c = sched.register_and_schedule(
            InstantCommand::new("hello", |ctx: &mut TestCtx| ctx.log.push("hello".into()))
                .with_requirements(&[ARM])
                .boxed(),
        );

        sched.tick(&mut ctx);

        assert_eq!(sched.state(c), Some(CommandState::Ended));
        assert_eq!(ctx.count("hello"), 1);
        assert_eq!(sched.owner(ARM), None);
    }

    #[test]
    fn test_wait_command() {
        let mut sched = Scheduler::<TestCtx>::new();
        let mut ctx = TestCtx::new();

        // 0.1 s at 50 Hz is five cycles
        let w = sched.register_and_schedule(WaitCommand::new(0.1).boxed());

        for _ in 0..4 {
            sched.tick(&mut ctx);
            assert!(sched.is_running(w));
        }
        sched.tick(&mut ctx);
        assert_eq!(sched.state(w), Some(CommandState::Ended));

        // Restarting resets the count
        sched.schedule(w);
        sched.tick(&mut ctx);
        assert!(sched.is_running(w));
    }

    #[test]
    fn test_wait_until_command() {
        let mut sched = Scheduler::new();
        let mut ctx = TestCtx::new();
        let w = sched.register_and_schedule(
            WaitUntilCommand::new("until_done", |ctx: &TestCtx| ctx.finished.contains("x")).boxed(),
        );

        sched.tick(&mut ctx);
        sched.tick(&mut ctx);
        assert!(sched.is_running(w));

        ctx.finished.insert("x");
        sched.tick(&mut ctx);
        assert_eq!(sched.state(w), Some(CommandState::Ended));
    }

    #[test]
    fn test_functional_command_hooks() {
        let mut sched = Scheduler::new();
        let mut ctx = TestCtx::new();
        let f = sched.register_and_schedule(
            FunctionalCommand::new("func")
                .on_init(|ctx: &mut TestCtx| ctx.log.push("init".into()))
                .on_execute(|ctx: &mut TestCtx| ctx.log.push("exec".into()))
                .on_end(|ctx: &mut TestCtx, i| ctx.log.push(format!("end({})", i)))
                .until(|ctx: &TestCtx| ctx.count("exec") >= 2)
                .with_requirements(&[GRABBER])
                .boxed(),
        );

        sched.tick(&mut ctx);
        sched.tick(&mut ctx);

        assert_eq!(sched.state(f), Some(CommandState::Ended));
        assert_eq!(ctx.command_events(), vec!["init", "exec", "exec", "end(false)"]);
    }

    #[test]
    fn test_instant_commands_in_sequence() {
        let mut sched = Scheduler::new();
        let mut ctx = TestCtx::new();
        let g = sched.register_and_schedule(
            SequentialGroup::new(
                "instants",
                vec![
                    InstantCommand::new("one", |ctx: &mut TestCtx| ctx.log.push("1".into()))
                        .boxed(),
                    InstantCommand::new("two", |ctx: &mut TestCtx| ctx.log.push("2".into()))
                        .boxed(),
                ],
            )
            .boxed(),
        );

        // The second child starts as soon as the first finishes
        sched.tick(&mut ctx);
        assert_eq!(ctx.command_events(), vec!["1", "2"]);
        assert!(sched.is_running(g));
        sched.tick(&mut ctx);
        assert_eq!(sched.state(g), Some(CommandState::Ended));
    }
}
