//! Host loop wiring the world to its systems.

use std::time::Duration;

use zombie_rescue_core::{Command, Difficulty, Event, LayoutError, SessionSnapshot};
use zombie_rescue_system_controls::{Controls, FrameInput};
use zombie_rescue_system_scoring::{ScoreSink, Scoring};
use zombie_rescue_system_zombie_clock::ZombieClock;
use zombie_rescue_world::{self as world, query, World};

/// Simulated duration of one host frame.
pub(crate) const FRAME: Duration = Duration::from_millis(16);
/// Longest stretch of simulated time a single `wait` covers.
pub(crate) const MAX_WAIT: Duration = Duration::from_secs(60);

/// Owns a session and the systems reacting to it.
pub(crate) struct Host {
    world: World,
    start: Command,
    clock: ZombieClock,
    controls: Controls,
    scoring: Scoring,
    sink: Box<dyn ScoreSink>,
}

impl Host {
    /// Starts a session with `start`, which must be a session-starting command.
    pub(crate) fn new(
        start: Command,
        scoring: Scoring,
        sink: Box<dyn ScoreSink>,
    ) -> Result<Self, LayoutError> {
        let mut host = Self {
            world: World::new(),
            start,
            clock: ZombieClock::default(),
            controls: Controls::default(),
            scoring,
            sink,
        };
        let _ = host.restart()?;
        Ok(host)
    }

    /// Replays the session-starting command.
    pub(crate) fn restart(&mut self) -> Result<Vec<Event>, LayoutError> {
        let events = self.dispatch(self.start.clone());
        let rejection = events.iter().find_map(|event| match event {
            Event::LayoutRejected { reason } => Some(*reason),
            _ => None,
        });
        match rejection {
            Some(reason) => Err(reason),
            None => Ok(events),
        }
    }

    /// Restarts on another difficulty; later restarts keep it.
    pub(crate) fn set_difficulty(&mut self, difficulty: Difficulty) -> Vec<Event> {
        self.start = Command::SetDifficulty { difficulty };
        self.dispatch(self.start.clone())
    }

    /// Routes a frame of player input through the controls system.
    pub(crate) fn input(&mut self, input: FrameInput) -> Vec<Event> {
        let mut commands = Vec::new();
        self.controls.handle(
            input,
            query::player_cell(&self.world),
            query::dimensions(&self.world),
            &mut commands,
        );

        let mut events = Vec::new();
        for command in commands {
            events.extend(self.dispatch(command));
        }
        events
    }

    /// Issues a move request straight to the world.
    pub(crate) fn request_move(&mut self, command: Command) -> Vec<Event> {
        self.dispatch(command)
    }

    /// Lets `duration` of simulated time pass in frame-sized slices, up to
    /// [`MAX_WAIT`].
    pub(crate) fn wait(&mut self, duration: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        let mut remaining = duration.min(MAX_WAIT);
        while !remaining.is_zero() && !query::phase(&self.world).is_over() {
            let dt = remaining.min(FRAME);
            remaining -= dt;
            events.extend(self.dispatch(Command::Tick { dt }));
        }
        events
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        query::snapshot(&self.world)
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            self.scoring.handle(&events, self.sink.as_mut());
            self.clock
                .handle(&events, query::phase(&self.world), &mut pending);
            log.extend(events);
        }

        log
    }
}

/// Describes events worth telling the player about.
pub(crate) fn describe(event: &Event) -> Option<String> {
    let message = match event {
        Event::SessionStarted {
            difficulty,
            columns,
            rows,
            ..
        } => format!("new {difficulty} session on a {columns}x{rows} board"),
        Event::LayoutRejected { reason } => format!("session not started: {reason}"),
        Event::GracePeriodEnded => "the zombies are awake".to_owned(),
        Event::PlayerMoveRejected { target, reason } => {
            format!("cannot move toward {target}: {reason}")
        }
        Event::HumanPickedUp { cell, .. } => format!("picked up a survivor at {cell}"),
        Event::HumanRescued { cell, .. } => format!("a survivor escaped at {cell}"),
        Event::PlayerAttacked { remaining, .. } => format!("bitten! health {remaining}"),
        Event::SessionWon {
            score, elapsed, ..
        } => format!(
            "mission accomplished: {score} rescued in {}s",
            elapsed.as_secs()
        ),
        Event::SessionLost { score, .. } => {
            format!("game over: {score} rescued before being overwhelmed")
        }
        _ => return None,
    };
    Some(message)
}
