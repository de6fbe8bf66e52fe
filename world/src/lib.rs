#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Zombie Rescue.
//!
//! A [`World`] is one game session. It owns the grid, every entity, the
//! player's health and the score; hosts mutate it only through [`apply`] and
//! read it through the [`query`] module.

mod grid;
pub mod navigation;
mod placement;
mod registry;

use std::time::Duration;

use zombie_rescue_core::{
    CellCoord, Command, EntityId, Event, Health, LayoutError, MoveRejection, SessionConfig, SessionLayout,
    SessionPhase, GRACE_PERIOD, PLAYER_START, STARTING_HEALTH, WELCOME_BANNER,
};

use crate::{grid::Grid, registry::Registry};

/// Represents one authoritative Zombie Rescue session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SessionConfig,
    grid: Grid,
    registry: Registry,
    health: Health,
    score: u32,
    grace_remaining: Duration,
    elapsed: Duration,
    phase: SessionPhase,
}

impl World {
    /// Creates a session populated from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = SessionConfig::default();
        let (grid, registry) = populate(Grid::standard(), &config);
        Self {
            banner: WELCOME_BANNER,
            config,
            grid,
            registry,
            health: STARTING_HEALTH,
            score: 0,
            grace_remaining: GRACE_PERIOD,
            elapsed: Duration::ZERO,
            phase: SessionPhase::Grace,
        }
    }

    fn configure(&mut self, config: SessionConfig, out_events: &mut Vec<Event>) {
        match random_population(&config) {
            Ok((grid, registry)) => {
                self.config = config;
                self.reset(grid, registry, STARTING_HEALTH, out_events);
            }
            Err(reason) => {
                tracing::warn!(%reason, "session configuration rejected");
                out_events.push(Event::LayoutRejected { reason });
            }
        }
    }

    fn load_layout(&mut self, layout: SessionLayout, out_events: &mut Vec<Event>) {
        match layout_population(&layout) {
            Ok((grid, registry)) => {
                self.config = SessionConfig::new(layout.difficulty)
                    .with_dimensions(layout.columns, layout.rows);
                self.reset(
                    grid,
                    registry,
                    layout.health.unwrap_or(STARTING_HEALTH),
                    out_events,
                );
            }
            Err(reason) => {
                tracing::warn!(%reason, "layout rejected");
                out_events.push(Event::LayoutRejected { reason });
            }
        }
    }

    fn reset(
        &mut self,
        grid: Grid,
        registry: Registry,
        health: Health,
        out_events: &mut Vec<Event>,
    ) {
        self.grid = grid;
        self.registry = registry;
        self.health = health;
        self.score = 0;
        self.grace_remaining = GRACE_PERIOD;
        self.elapsed = Duration::ZERO;
        self.phase = SessionPhase::Grace;

        let (columns, rows) = self.grid.dimensions();
        tracing::info!(
            difficulty = %self.config.difficulty,
            columns,
            rows,
            humans = self.registry.humans().len(),
            zombies = self.registry.zombies().len(),
            "session started"
        );
        out_events.push(Event::SessionStarted {
            difficulty: self.config.difficulty,
            profile: self.config.profile,
            columns,
            rows,
        });
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        match self.phase {
            SessionPhase::Won | SessionPhase::Lost => {}
            SessionPhase::Grace => {
                if dt < self.grace_remaining {
                    self.grace_remaining -= dt;
                    return;
                }

                let overflow = dt - self.grace_remaining;
                self.grace_remaining = Duration::ZERO;
                self.phase = SessionPhase::Active;
                tracing::debug!("grace period ended");
                out_events.push(Event::GracePeriodEnded);

                if !overflow.is_zero() {
                    self.elapsed = self.elapsed.saturating_add(overflow);
                    out_events.push(Event::TimeAdvanced { dt: overflow });
                }
            }
            SessionPhase::Active => {
                self.elapsed = self.elapsed.saturating_add(dt);
                out_events.push(Event::TimeAdvanced { dt });
            }
        }
    }

    fn request_player_move(&mut self, target: CellCoord, out_events: &mut Vec<Event>) {
        let rejection = if self.phase.is_over() {
            Some(MoveRejection::SessionOver)
        } else if !self.grid.in_bounds(target) {
            Some(MoveRejection::OutOfBounds)
        } else if self.is_zombie_at(target) {
            Some(MoveRejection::ZombieOccupied)
        } else {
            None
        };

        if let Some(reason) = rejection {
            out_events.push(Event::PlayerMoveRejected { target, reason });
            return;
        }

        let from = self.registry.player_cell();
        let Some(step) = self.next_step_toward(from, target) else {
            return;
        };

        self.advance_player(from, step, out_events);
        self.advance_followers(out_events);
        self.check_win(out_events);
    }

    fn advance_player(&mut self, from: CellCoord, to: CellCoord, out_events: &mut Vec<Event>) {
        let player = self.registry.player();
        let displaced = self.grid.occupant(to).filter(|id| *id != player);
        debug_assert!(
            displaced.map_or(true, |id| !self.registry.is_zombie(id)),
            "player stepped onto a zombie at {to}"
        );

        self.grid.vacate(from);
        self.grid.vacate(to);
        self.registry.set_cell(player, to);
        self.grid.occupy(player, to);
        tracing::debug!(%from, %to, "player moved");
        out_events.push(Event::PlayerMoved { from, to });

        // A human on the destination swaps into the cell the player left.
        if let Some(human) = displaced {
            if self.registry.pick_up(human) {
                out_events.push(Event::HumanPickedUp { human, cell: to });
            }
            self.settle_follower(human, to, from, out_events);
        }
    }

    fn advance_followers(&mut self, out_events: &mut Vec<Event>) {
        let player_cell = self.registry.player_cell();
        let chain = self.registry.chain().to_vec();

        for human in chain {
            let Some(from) = self.registry.cell(human) else {
                continue;
            };
            let Some(step) = self.next_step_toward(from, player_cell) else {
                continue;
            };

            if !self.grid.is_exit(step) && self.grid.occupant(step).is_some() {
                continue;
            }

            self.grid.vacate(from);
            self.settle_follower(human, from, step, out_events);
        }
    }

    fn settle_follower(
        &mut self,
        human: EntityId,
        from: CellCoord,
        to: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        self.registry.set_cell(human, to);

        if self.grid.is_exit(to) {
            let rescued = self.registry.rescue(human);
            debug_assert!(rescued, "human {human:?} reached the exit outside the chain");
            self.score = self.score.saturating_add(1);
            tracing::info!(human = human.get(), score = self.score, "human rescued");
            out_events.push(Event::HumanRescued { human, cell: to });
        } else {
            self.grid.occupy(human, to);
            out_events.push(Event::FollowerMoved { human, from, to });
        }
    }

    fn tick_zombies(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Active {
            return;
        }

        let player_cell = self.registry.player_cell();
        let damage = self.config.profile.damage_per_hit;
        let zombies = self.registry.zombies().to_vec();

        for zombie in zombies {
            let Some(from) = self.registry.cell(zombie) else {
                continue;
            };
            let Some(step) = self.next_step_toward(from, player_cell) else {
                continue;
            };

            if self.grid.is_exit(step) {
                continue;
            }

            if step == player_cell {
                self.health = self.health.saturating_sub(damage);
                tracing::debug!(zombie = zombie.get(), remaining = %self.health, "player attacked");
                out_events.push(Event::PlayerAttacked {
                    zombie,
                    damage,
                    remaining: self.health,
                });

                if self.health.is_depleted() {
                    self.phase = SessionPhase::Lost;
                    tracing::info!(score = self.score, "session lost");
                    out_events.push(Event::SessionLost {
                        score: self.score,
                        elapsed: self.elapsed,
                    });
                    return;
                }
                continue;
            }

            if self.grid.occupant(step).is_some() {
                continue;
            }

            self.grid.vacate(from);
            self.registry.set_cell(zombie, step);
            self.grid.occupy(zombie, step);
            out_events.push(Event::ZombieMoved {
                zombie,
                from,
                to: step,
            });
        }

        self.check_win(out_events);
    }

    fn check_win(&mut self, out_events: &mut Vec<Event>) {
        if self.phase.is_over() || !self.registry.humans().is_empty() {
            return;
        }
        if !self.grid.is_exit(self.registry.player_cell()) {
            return;
        }

        let followers = self.registry.drain_chain();
        for &human in &followers {
            if let Some(cell) = self.registry.cell(human) {
                if self.grid.occupant(cell) == Some(human) {
                    self.grid.vacate(cell);
                }
            }
        }

        let credited = u32::try_from(followers.len()).unwrap_or(u32::MAX);
        self.score = self.score.saturating_add(credited);
        self.phase = SessionPhase::Won;
        tracing::info!(score = self.score, credited, "session won");
        out_events.push(Event::SessionWon {
            score: self.score,
            credited,
            elapsed: self.elapsed,
        });
    }

    fn next_step_toward(&self, from: CellCoord, to: CellCoord) -> Option<CellCoord> {
        let (columns, rows) = self.grid.dimensions();
        navigation::next_step(columns, rows, from, to, |cell| self.is_zombie_at(cell))
    }

    fn is_zombie_at(&self, cell: CellCoord) -> bool {
        self.grid
            .occupant(cell)
            .is_some_and(|id| self.registry.is_zombie(id))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSession { config } => world.configure(config, out_events),
        Command::SetDifficulty { difficulty } => {
            let config = SessionConfig {
                difficulty,
                profile: difficulty.profile(),
                ..world.config
            };
            world.configure(config, out_events);
        }
        Command::LoadLayout { layout } => world.load_layout(layout, out_events),
        Command::Tick { dt } => world.advance_clock(dt, out_events),
        Command::RequestPlayerMove { target } => world.request_player_move(target, out_events),
        Command::TickZombies => world.tick_zombies(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use zombie_rescue_core::{
        CellCoord, CellKind, Difficulty, DifficultyProfile, EntityId, EntityKind, Health,
        OccupancyView, SessionPhase, SessionSnapshot,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Columns and rows of the session grid.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Reports whether the cell belongs to the exit region.
    #[must_use]
    pub fn is_exit(world: &World, cell: CellCoord) -> bool {
        world.grid.in_bounds(cell) && world.grid.is_exit(cell)
    }

    /// Kind displayed for the cell, or `None` outside the grid.
    ///
    /// Exit cells always report [`CellKind::Exit`], even while the player
    /// stands on them.
    #[must_use]
    pub fn cell_kind(world: &World, cell: CellCoord) -> Option<CellKind> {
        if !world.grid.in_bounds(cell) {
            return None;
        }
        if world.grid.is_exit(cell) {
            return Some(CellKind::Exit);
        }
        Some(
            world
                .grid
                .occupant(cell)
                .and_then(|id| world.registry.kind(id))
                .map_or(CellKind::Empty, EntityKind::cell_kind),
        )
    }

    /// Reports whether a zombie stands on the cell.
    #[must_use]
    pub fn is_zombie_at(world: &World, cell: CellCoord) -> bool {
        world.is_zombie_at(cell)
    }

    /// Reports whether a free human or a follower stands on the cell.
    #[must_use]
    pub fn is_human_at(world: &World, cell: CellCoord) -> bool {
        world
            .grid
            .occupant(cell)
            .and_then(|id| world.registry.kind(id))
            == Some(EntityKind::Human)
    }

    /// Kind of the entity behind a handle.
    #[must_use]
    pub fn entity_kind(world: &World, entity: EntityId) -> Option<EntityKind> {
        world.registry.kind(entity)
    }

    /// Last cell recorded for the entity; rescued humans keep their exit cell.
    #[must_use]
    pub fn entity_cell(world: &World, entity: EntityId) -> Option<CellCoord> {
        world.registry.cell(entity)
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.registry.player_cell()
    }

    /// Handle of the player.
    #[must_use]
    pub fn player_id(world: &World) -> EntityId {
        world.registry.player()
    }

    /// Remaining player health.
    #[must_use]
    pub fn health(world: &World) -> Health {
        world.health
    }

    /// Humans rescued so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Post-grace time spent in the session.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Countdown left before zombies may move.
    #[must_use]
    pub fn grace_remaining(world: &World) -> Duration {
        world.grace_remaining
    }

    /// Lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Reports whether the session ended in a win.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        world.phase == SessionPhase::Won
    }

    /// Reports whether the session ended in a loss.
    #[must_use]
    pub fn is_lost(world: &World) -> bool {
        world.phase == SessionPhase::Lost
    }

    /// Difficulty label of the session.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.config.difficulty
    }

    /// Tuning applied to the session.
    #[must_use]
    pub fn profile(world: &World) -> DifficultyProfile {
        world.config.profile
    }

    /// Free humans in creation order.
    #[must_use]
    pub fn humans(world: &World) -> Vec<EntityId> {
        world.registry.humans().to_vec()
    }

    /// Zombies in creation order, which is also their movement order.
    #[must_use]
    pub fn zombies(world: &World) -> Vec<EntityId> {
        world.registry.zombies().to_vec()
    }

    /// Followers in rescue order.
    #[must_use]
    pub fn chain(world: &World) -> Vec<EntityId> {
        world.registry.chain().to_vec()
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (columns, rows) = world.grid.dimensions();
        OccupancyView::new(world.grid.cells(), columns, rows)
    }

    /// Captures everything a renderer needs to draw the session.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        let (columns, rows) = world.grid.dimensions();
        let cells = world
            .grid
            .coords()
            .map(|cell| cell_kind(world, cell).unwrap_or(CellKind::Empty))
            .collect();
        let followers = world
            .registry
            .chain()
            .iter()
            .filter_map(|id| world.registry.cell(*id))
            .collect();

        SessionSnapshot {
            columns,
            rows,
            cells,
            player: world.registry.player_cell(),
            followers,
            health: world.health,
            score: world.score,
            humans_remaining: world.registry.humans().len(),
            elapsed: world.elapsed,
            grace_remaining: world.grace_remaining,
            phase: world.phase,
            difficulty: world.config.difficulty,
        }
    }
}

fn random_population(config: &SessionConfig) -> Result<(Grid, Registry), LayoutError> {
    let grid = Grid::new(config.columns, config.rows)?;
    if !grid.in_bounds(PLAYER_START) {
        return Err(LayoutError::GridTooSmall {
            columns: config.columns,
            rows: config.rows,
        });
    }
    Ok(populate(grid, config))
}

fn populate(mut grid: Grid, config: &SessionConfig) -> (Grid, Registry) {
    let mut registry = Registry::new(PLAYER_START);
    grid.occupy(registry.player(), PLAYER_START);
    placement::populate(&mut grid, &mut registry, &config.profile, config.seed);
    (grid, registry)
}

fn layout_population(layout: &SessionLayout) -> Result<(Grid, Registry), LayoutError> {
    let mut grid = Grid::new(layout.columns, layout.rows)?;
    if layout.health.is_some_and(Health::is_depleted) {
        return Err(LayoutError::NoHealth);
    }

    let mut registry = Registry::new(layout.player);
    claim(&mut grid, registry.player(), layout.player, true)?;

    for &cell in &layout.humans {
        let id = registry.spawn_human(cell);
        claim(&mut grid, id, cell, false)?;
    }
    for &cell in &layout.followers {
        let id = registry.spawn_follower(cell);
        claim(&mut grid, id, cell, false)?;
    }
    for &cell in &layout.zombies {
        let id = registry.spawn_zombie(cell);
        claim(&mut grid, id, cell, false)?;
    }

    Ok((grid, registry))
}

fn claim(
    grid: &mut Grid,
    entity: EntityId,
    cell: CellCoord,
    allow_exit: bool,
) -> Result<(), LayoutError> {
    if !grid.in_bounds(cell) {
        return Err(LayoutError::OutOfBounds(cell));
    }
    if !allow_exit && grid.is_exit(cell) {
        return Err(LayoutError::InsideExit(cell));
    }
    if grid.occupant(cell).is_some() {
        return Err(LayoutError::Overlap(cell));
    }
    grid.occupy(entity, cell);
    Ok(())
}
