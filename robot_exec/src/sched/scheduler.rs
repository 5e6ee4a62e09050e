//! Scheduler implementation

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, BTreeSet};

use eqpt_if::TelemetrySink;
use log::{debug, info, trace, warn};

use super::{Command, CommandId, CommandState, InterruptBehavior, SubsystemId, SubsystemSet};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A registered command and its lifecycle state.
struct Entry<C> {
    command: Box<dyn Command<C>>,
    state: CommandState,
}

/// The command scheduler.
///
/// There is one scheduler per robot process. Every command is registered with
/// it once and from then on addressed by its [`CommandId`], which lets a
/// command be rescheduled after it has ended.
///
/// Schedule and cancel requests are queued and applied inside [`Scheduler::tick`]
/// so the set of running commands never changes while it is being iterated.
pub struct Scheduler<C> {
    /// All registered commands, indexed by their id. Deregistered slots are
    /// left empty so ids are never reused.
    entries: Vec<Option<Entry<C>>>,

    /// Running commands in the order they started.
    running: Vec<CommandId>,

    /// The command currently holding each owned subsystem. Unowned subsystems
    /// are absent.
    requirement_owners: BTreeMap<SubsystemId, CommandId>,

    /// Schedule requests in submission order.
    pending_schedule: Vec<CommandId>,

    /// Cancel requests in submission order.
    pending_cancel: Vec<CommandId>,

    /// Number of completed ticks.
    num_ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            running: Vec::new(),
            requirement_owners: BTreeMap::new(),
            pending_schedule: Vec::new(),
            pending_cancel: Vec::new(),
            num_ticks: 0,
        }
    }

    /// Hand a command over to the scheduler. The command starts out Idle.
    pub fn register(&mut self, command: Box<dyn Command<C>>) -> CommandId {
        let id = CommandId(self.entries.len());

        trace!("Registered {} as {}", command.name(), id);

        self.entries.push(Some(Entry {
            command,
            state: CommandState::Idle,
        }));

        id
    }

    /// Register a command and request that it be scheduled on the next tick.
    pub fn register_and_schedule(&mut self, command: Box<dyn Command<C>>) -> CommandId {
        let id = self.register(command);
        self.schedule(id);
        id
    }

    /// Remove a command from the scheduler, returning it.
    ///
    /// Only Idle or Ended commands can be deregistered, `None` is returned
    /// otherwise.
    pub fn deregister(&mut self, id: CommandId) -> Option<Box<dyn Command<C>>> {
        match self.state(id) {
            Some(CommandState::Idle) | Some(CommandState::Ended) => self
                .entries
                .get_mut(id.0)
                .and_then(Option::take)
                .map(|e| e.command),
            Some(s) => {
                warn!("Cannot deregister {} while it is {:?}", id, s);
                None
            }
            None => None,
        }
    }

    /// Request that a command be scheduled.
    ///
    /// The request is resolved at the start of the next tick. Requests for
    /// commands which are already Scheduled or Running are ignored.
    pub fn schedule(&mut self, id: CommandId) {
        let entry = match self.entries.get_mut(id.0).and_then(Option::as_mut) {
            Some(e) => e,
            None => {
                warn!("Cannot schedule unknown command {}", id);
                return;
            }
        };

        match entry.state {
            CommandState::Idle | CommandState::Ended => {
                trace!("{} ({}) scheduled", entry.command.name(), id);
                entry.state = CommandState::Scheduled;
                self.pending_schedule.push(id);
            }
            s => trace!(
                "{} ({}) is already {:?}, schedule request ignored",
                entry.command.name(),
                id,
                s
            ),
        }
    }

    /// Request that a command be cancelled.
    ///
    /// A Scheduled command goes straight back to Idle. A Running command is
    /// skipped by the next execute pass and ended with `interrupted = true` at
    /// the end of that tick.
    pub fn cancel(&mut self, id: CommandId) {
        let entry = match self.entries.get_mut(id.0).and_then(Option::as_mut) {
            Some(e) => e,
            None => return,
        };

        match entry.state {
            CommandState::Scheduled => {
                debug!("{} ({}) cancelled before starting", entry.command.name(), id);
                entry.state = CommandState::Idle;
                self.pending_schedule.retain(|p| *p != id);
            }
            CommandState::Running => {
                if !self.pending_cancel.contains(&id) {
                    self.pending_cancel.push(id);
                }
            }
            CommandState::Idle | CommandState::Ended => (),
        }
    }

    /// Immediately end every running command with `interrupted = true` and drop
    /// all pending requests.
    pub fn cancel_all(&mut self, ctx: &mut C) {
        info!("Cancelling all commands ({} running)", self.running.len());

        for id in std::mem::take(&mut self.pending_schedule) {
            if let Some(e) = self.entries.get_mut(id.0).and_then(Option::as_mut) {
                if e.state == CommandState::Scheduled {
                    e.state = CommandState::Idle;
                }
            }
        }
        self.pending_cancel.clear();

        for id in self.running.clone() {
            self.end_command(id, ctx, true);
        }
    }

    /// Advance the whole system by one cycle.
    ///
    /// 1. Resolve pending schedule requests in submission order.
    /// 2. Execute every running command once and end those that finished.
    /// 3. Run every subsystem's periodic hook once.
    /// 4. Apply pending cancellations.
    pub fn tick(&mut self, ctx: &mut C)
    where
        C: SubsystemSet,
    {
        self.apply_pending_schedules(ctx);
        self.run_commands(ctx);
        ctx.for_each_subsystem(&mut |s| s.periodic());
        self.apply_pending_cancels(ctx);

        self.num_ticks += 1;

        debug_assert!(self.ownership_consistent());
    }

    /// Lifecycle state of a command, or `None` if the id is unknown.
    pub fn state(&self, id: CommandId) -> Option<CommandState> {
        self.entry(id).map(|e| e.state)
    }

    /// True if the command is Running.
    pub fn is_running(&self, id: CommandId) -> bool {
        self.state(id) == Some(CommandState::Running)
    }

    /// Name of a registered command.
    pub fn name(&self, id: CommandId) -> Option<&str> {
        self.entry(id).map(|e| e.command.name())
    }

    /// The command currently owning the given subsystem.
    pub fn owner(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.requirement_owners.get(&subsystem).copied()
    }

    /// The full subsystem -> owner mapping.
    pub fn requirement_owners(&self) -> &BTreeMap<SubsystemId, CommandId> {
        &self.requirement_owners
    }

    /// Running commands in the order they started.
    pub fn running(&self) -> &[CommandId] {
        &self.running
    }

    /// Number of completed ticks.
    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    /// Publish the scheduler's state to telemetry.
    pub fn report(&self, tm: &mut dyn TelemetrySink) {
        let names: Vec<&str> = self
            .running
            .iter()
            .filter_map(|id| self.name(*id))
            .collect();

        tm.put_string("Scheduler/Running", &names.join(", "));
        tm.put_number("Scheduler/Ticks", self.num_ticks as f64);

        for (subsystem, owner) in self.requirement_owners.iter() {
            tm.put_string(
                &format!("Scheduler/Owner/{}", subsystem),
                self.name(*owner).unwrap_or("?"),
            );
        }
    }

    /// Check that every running command owns exactly its declared requirements
    /// and that only running commands own anything.
    pub(crate) fn ownership_consistent(&self) -> bool {
        let owners_running = self
            .requirement_owners
            .values()
            .all(|o| self.running.contains(o));

        let running_own_all = self.running.iter().all(|id| match self.entry(*id) {
            Some(e) => {
                e.state == CommandState::Running
                    && e
                        .command
                        .requirements()
                        .iter()
                        .all(|r| self.requirement_owners.get(r) == Some(id))
            }
            None => false,
        });

        owners_running && running_own_all
    }

    // ---- PRIVATE ----

    fn entry(&self, id: CommandId) -> Option<&Entry<C>> {
        self.entries.get(id.0).and_then(Option::as_ref)
    }

    /// Step 1 of the tick.
    ///
    /// Scheduling is all-or-nothing: either every conflicting owner can be
    /// displaced and the command is granted all of its requirements, or the
    /// command is rejected and nothing changes. A command granted earlier in
    /// the same pass is never displaced by a later request.
    fn apply_pending_schedules(&mut self, ctx: &mut C) {
        let pending = std::mem::take(&mut self.pending_schedule);
        let mut granted: BTreeSet<CommandId> = BTreeSet::new();

        for id in pending {
            let (reqs, behavior) = match self.entry(id) {
                Some(e) if e.state == CommandState::Scheduled => (
                    e.command.requirements().clone(),
                    e.command.interrupt_behavior(),
                ),
                _ => continue,
            };

            let owners: BTreeSet<CommandId> = reqs
                .iter()
                .filter_map(|r| self.requirement_owners.get(r).copied())
                .collect();

            if !owners.is_empty() && !self.can_displace(behavior, &owners, &granted) {
                debug!(
                    "{} ({}) rejected, requirements held by {}",
                    self.name(id).unwrap_or("?"),
                    id,
                    self.names_of(&owners)
                );
                if let Some(e) = self.entries.get_mut(id.0).and_then(Option::as_mut) {
                    e.state = CommandState::Idle;
                }
                continue;
            }

            for owner in owners {
                debug!(
                    "{} ({}) interrupted by {} ({})",
                    self.name(owner).unwrap_or("?"),
                    owner,
                    self.name(id).unwrap_or("?"),
                    id
                );
                self.end_command(owner, ctx, true);
            }

            for r in reqs.iter() {
                self.requirement_owners.insert(*r, id);
            }
            self.running.push(id);
            granted.insert(id);

            if let Some(e) = self.entries.get_mut(id.0).and_then(Option::as_mut) {
                debug!("{} ({}) started", e.command.name(), id);
                e.state = CommandState::Running;
                e.command.initialize(ctx);
            }
        }
    }

    /// Step 2 of the tick.
    fn run_commands(&mut self, ctx: &mut C) {
        for id in self.running.clone() {
            // Cancelled commands don't get another execute
            if self.pending_cancel.contains(&id) {
                continue;
            }

            let finished = match self.entries.get_mut(id.0).and_then(Option::as_mut) {
                Some(e) if e.state == CommandState::Running => {
                    e.command.execute(ctx);
                    e.command.is_finished(ctx)
                }
                _ => continue,
            };

            if finished {
                self.end_command(id, ctx, false);
            }
        }
    }

    /// Step 4 of the tick.
    fn apply_pending_cancels(&mut self, ctx: &mut C) {
        for id in std::mem::take(&mut self.pending_cancel) {
            self.end_command(id, ctx, true);
        }
    }

    /// True if an incoming command with the given behaviour may displace all of
    /// `owners`.
    fn can_displace(
        &self,
        incoming: InterruptBehavior,
        owners: &BTreeSet<CommandId>,
        granted_this_pass: &BTreeSet<CommandId>,
    ) -> bool {
        if incoming == InterruptBehavior::CancelIncoming {
            return false;
        }

        owners.iter().all(|o| {
            !granted_this_pass.contains(o)
                && self
                    .entry(*o)
                    .map(|e| e.command.interrupt_behavior() == InterruptBehavior::CancelSelf)
                    .unwrap_or(true)
        })
    }

    /// End a running command, releasing its requirements.
    fn end_command(&mut self, id: CommandId, ctx: &mut C, interrupted: bool) {
        let entry = match self.entries.get_mut(id.0).and_then(Option::as_mut) {
            Some(e) if e.state == CommandState::Running => e,
            _ => return,
        };

        entry.state = CommandState::Ended;
        self.running.retain(|r| *r != id);
        self.requirement_owners.retain(|_, owner| *owner != id);

        if interrupted {
            debug!("{} ({}) ended (interrupted)", entry.command.name(), id);
        } else {
            debug!("{} ({}) finished", entry.command.name(), id);
        }

        entry.command.end(ctx, interrupted);
    }

    fn names_of(&self, ids: &BTreeSet<CommandId>) -> String {
        ids.iter()
            .map(|id| format!("{} ({})", self.name(*id).unwrap_or("?"), id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sched::testing::*;

    fn setup() -> (Scheduler<TestCtx>, TestCtx) {
        (Scheduler::new(), TestCtx::new())
    }

    #[test]
    fn test_schedule_initializes_then_executes() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register(Recorder::new("a", &[ARM]).boxed());

        assert_eq!(sched.state(a), Some(CommandState::Idle));
        sched.schedule(a);
        assert_eq!(sched.state(a), Some(CommandState::Scheduled));

        sched.tick(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Running));
        assert_eq!(sched.owner(ARM), Some(a));
        assert_eq!(ctx.command_events(), vec!["a:init", "a:exec"]);
    }

    #[test]
    fn test_incoming_cancel_incoming_is_rejected() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.tick(&mut ctx);

        let b = sched.register_and_schedule(
            Recorder::new("b", &[ARM])
                .with_interrupt_behavior(InterruptBehavior::CancelIncoming)
                .boxed(),
        );
        sched.tick(&mut ctx);

        assert_eq!(sched.state(b), Some(CommandState::Idle));
        assert_eq!(sched.state(a), Some(CommandState::Running));
        assert_eq!(sched.owner(ARM), Some(a));
        assert_eq!(ctx.count("b:init"), 0);
        assert_eq!(ctx.count("a:end(true)"), 0);
        assert_eq!(ctx.count("a:exec"), 2);
    }

    #[test]
    fn test_incoming_interrupts_interruptible_owner() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.tick(&mut ctx);
        ctx.log.clear();

        let b = sched.register_and_schedule(Recorder::new("b", &[ARM]).boxed());
        sched.tick(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Ended));
        assert_eq!(sched.state(b), Some(CommandState::Running));
        assert_eq!(sched.owner(ARM), Some(b));

        // Owner ends exactly once, before the incoming command starts, and is
        // not executed again in the same tick
        assert_eq!(ctx.command_events(), vec!["a:end(true)", "b:init", "b:exec"]);
    }

    #[test]
    fn test_non_interruptible_owner_keeps_running() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(
            Recorder::new("a", &[ARM])
                .with_interrupt_behavior(InterruptBehavior::CancelIncoming)
                .boxed(),
        );
        sched.tick(&mut ctx);

        let b = sched.register_and_schedule(Recorder::new("b", &[ARM]).boxed());
        sched.tick(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Running));
        assert_eq!(sched.state(b), Some(CommandState::Idle));
    }

    #[test]
    fn test_scheduling_is_all_or_nothing() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(
            Recorder::new("a", &[ARM])
                .with_interrupt_behavior(InterruptBehavior::CancelIncoming)
                .boxed(),
        );
        sched.tick(&mut ctx);

        let b = sched.register_and_schedule(Recorder::new("b", &[ARM, GRABBER]).boxed());
        sched.tick(&mut ctx);

        assert_eq!(sched.state(b), Some(CommandState::Idle));
        assert_eq!(sched.owner(ARM), Some(a));
        assert_eq!(sched.owner(GRABBER), None);
    }

    #[test]
    fn test_first_request_wins_within_a_tick() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        let b = sched.register_and_schedule(Recorder::new("b", &[ARM, DRIVE]).boxed());
        sched.tick(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Running));
        assert_eq!(sched.state(b), Some(CommandState::Idle));
        assert_eq!(ctx.count("a:end(true)"), 0);
        assert_eq!(sched.owner(DRIVE), None);
    }

    #[test]
    fn test_independent_commands_run_together() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        let b = sched.register_and_schedule(Recorder::new("b", &[GRABBER]).boxed());
        let c = sched.register_and_schedule(Recorder::new("c", &[]).boxed());
        sched.tick(&mut ctx);

        assert_eq!(sched.running(), &[a, b, c]);
        assert!(sched.ownership_consistent());
    }

    #[test]
    fn test_finished_command_releases_requirements() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM, GRABBER]).boxed());
        sched.tick(&mut ctx);

        ctx.finished.insert("a");
        sched.tick(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Ended));
        assert!(sched.requirement_owners().is_empty());
        assert!(sched.running().is_empty());
        assert_eq!(ctx.count("a:end(false)"), 1);

        // Ended commands can be rescheduled
        ctx.finished.clear();
        sched.schedule(a);
        sched.tick(&mut ctx);
        assert_eq!(sched.state(a), Some(CommandState::Running));
        assert_eq!(ctx.count("a:init"), 2);
    }

    #[test]
    fn test_periodic_runs_once_after_commands() {
        let (mut sched, mut ctx) = setup();
        sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.tick(&mut ctx);

        assert_eq!(
            ctx.log,
            vec![
                "a:init",
                "a:exec",
                "periodic:arm",
                "periodic:grabber",
                "periodic:drive"
            ]
        );

        // With no commands at all the periodic hooks still run
        let (mut sched, mut ctx) = setup();
        sched.tick(&mut ctx);
        sched.tick(&mut ctx);
        assert!(ctx.subsystems.iter().all(|s| s.periodic_count == 2));
    }

    #[test]
    fn test_cancel_running_skips_execute_and_ends_interrupted() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.tick(&mut ctx);
        ctx.log.clear();

        sched.cancel(a);
        assert_eq!(sched.state(a), Some(CommandState::Running));
        sched.tick(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Ended));
        assert_eq!(sched.owner(ARM), None);
        assert_eq!(ctx.command_events(), vec!["a:end(true)"]);

        // End comes after the periodic hooks
        assert_eq!(ctx.log.last().map(String::as_str), Some("a:end(true)"));
    }

    #[test]
    fn test_cancel_scheduled_returns_to_idle() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.cancel(a);
        assert_eq!(sched.state(a), Some(CommandState::Idle));

        sched.tick(&mut ctx);
        assert_eq!(ctx.count("a:init"), 0);
        assert_eq!(sched.owner(ARM), None);
    }

    #[test]
    fn test_schedule_running_is_ignored() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.tick(&mut ctx);
        sched.schedule(a);
        sched.tick(&mut ctx);

        assert_eq!(ctx.count("a:init"), 1);
        assert_eq!(ctx.count("a:end(true)"), 0);
    }

    #[test]
    fn test_cancel_all() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        let b = sched.register_and_schedule(Recorder::new("b", &[DRIVE]).boxed());
        sched.tick(&mut ctx);
        let c = sched.register_and_schedule(Recorder::new("c", &[GRABBER]).boxed());

        sched.cancel_all(&mut ctx);

        assert_eq!(sched.state(a), Some(CommandState::Ended));
        assert_eq!(sched.state(b), Some(CommandState::Ended));
        assert_eq!(sched.state(c), Some(CommandState::Idle));
        assert_eq!(ctx.count("a:end(true)"), 1);
        assert_eq!(ctx.count("b:end(true)"), 1);
        assert!(sched.requirement_owners().is_empty());

        sched.tick(&mut ctx);
        assert_eq!(ctx.count("c:init"), 0);
    }

    #[test]
    fn test_deregister() {
        let (mut sched, mut ctx) = setup();
        let a = sched.register_and_schedule(Recorder::new("a", &[ARM]).boxed());
        sched.tick(&mut ctx);

        assert!(sched.deregister(a).is_none());

        sched.cancel_all(&mut ctx);
        let cmd = sched.deregister(a);
        assert_eq!(cmd.map(|c| c.name().to_string()), Some("a".to_string()));
        assert_eq!(sched.state(a), None);

        // Ids are not reused
        let b = sched.register(Recorder::new("b", &[ARM]).boxed());
        assert_ne!(a, b);
    }
}
