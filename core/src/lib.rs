#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Zombie Rescue engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Zombie Rescue. Lead every survivor to the exit.";

/// Number of tile columns used when no explicit configuration is supplied.
pub const DEFAULT_GRID_COLUMNS: u32 = 30;
/// Number of tile rows used when no explicit configuration is supplied.
pub const DEFAULT_GRID_ROWS: u32 = 20;
/// Largest column or row count a session accepts.
pub const MAX_GRID_DIMENSION: u32 = 256;
/// Seed applied to random placement when no explicit seed is supplied.
pub const DEFAULT_PLACEMENT_SEED: u64 = 0x5eed_2b0d_1e5c_0ffe;

/// Edge length of the square exit region anchored in the top-right corner.
pub const EXIT_SPAN: u32 = 3;
/// Cell the player occupies when a random session starts.
pub const PLAYER_START: CellCoord = CellCoord::new(5, 5);
/// Health granted to the player at the start of every session.
pub const STARTING_HEALTH: Health = Health::from_whole(3);
/// Number of zombies scattered by a random session.
pub const ZOMBIE_COUNT: usize = 5;
/// Zombies are never placed closer than this Manhattan distance to the player start.
pub const ZOMBIE_EXCLUSION_RADIUS: u32 = 5;
/// Random draws attempted before relaxing placement constraints.
pub const PLACEMENT_ATTEMPTS: u32 = 100;
/// Simulated time that must elapse before zombies may move.
pub const GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh session with randomly scattered humans and zombies.
    ConfigureSession {
        /// Grid dimensions, difficulty and placement seed for the session.
        config: SessionConfig,
    },
    /// Restarts the session using the preset profile of another difficulty.
    SetDifficulty {
        /// Difficulty whose preset profile should be applied.
        difficulty: Difficulty,
    },
    /// Starts a fresh session from explicit entity positions.
    LoadLayout {
        /// Positions and health describing the session.
        layout: SessionLayout,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player take one step toward the target cell.
    RequestPlayerMove {
        /// Cell the player wants to reach.
        target: CellCoord,
    },
    /// Requests that every zombie take one step toward the player.
    TickZombies,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new session replaced the previous one.
    SessionStarted {
        /// Difficulty label of the new session.
        difficulty: Difficulty,
        /// Tuning applied to the new session.
        profile: DifficultyProfile,
        /// Number of columns in the new grid.
        columns: u32,
        /// Number of rows in the new grid.
        rows: u32,
    },
    /// Reports that a layout could not be loaded.
    LayoutRejected {
        /// Specific reason the layout was refused.
        reason: LayoutError,
    },
    /// Announces that the grace period expired and zombies may now move.
    GracePeriodEnded,
    /// Indicates that the post-grace session clock advanced.
    TimeAdvanced {
        /// Duration of post-grace time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that a player move request was refused at the boundary.
    PlayerMoveRejected {
        /// Cell provided in the request.
        target: CellCoord,
        /// Specific reason the request failed.
        reason: MoveRejection,
    },
    /// Confirms that the player picked up a free human.
    HumanPickedUp {
        /// Identifier of the human that joined the rescued chain.
        human: EntityId,
        /// Cell where the pickup happened.
        cell: CellCoord,
    },
    /// Confirms that a member of the rescued chain moved.
    FollowerMoved {
        /// Identifier of the follower.
        human: EntityId,
        /// Cell the follower occupied before moving.
        from: CellCoord,
        /// Cell the follower occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a follower reached the exit and left the grid.
    HumanRescued {
        /// Identifier of the rescued human.
        human: EntityId,
        /// Exit cell the human stepped onto.
        cell: CellCoord,
    },
    /// Confirms that a zombie moved between two cells.
    ZombieMoved {
        /// Identifier of the zombie.
        zombie: EntityId,
        /// Cell the zombie occupied before moving.
        from: CellCoord,
        /// Cell the zombie occupies after moving.
        to: CellCoord,
    },
    /// Reports that a zombie struck the player.
    PlayerAttacked {
        /// Identifier of the attacking zombie.
        zombie: EntityId,
        /// Health removed by the attack.
        damage: Health,
        /// Health the player retains after the attack.
        remaining: Health,
    },
    /// Announces that every human was rescued and the player reached the exit.
    SessionWon {
        /// Final score, including followers credited on arrival.
        score: u32,
        /// Followers credited because the player reached the exit with them.
        credited: u32,
        /// Post-grace time spent in the session.
        elapsed: Duration,
    },
    /// Announces that the player ran out of health.
    SessionLost {
        /// Final score.
        score: u32,
        /// Post-grace time spent in the session.
        elapsed: Duration,
    },
}

/// Named difficulty presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    /// Slow zombies, half-point hits and few humans.
    Easy,
    /// Default pacing.
    #[default]
    Medium,
    /// Fast zombies and many humans.
    Hard,
}

impl Difficulty {
    /// Every preset in ascending order of difficulty.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Tuning associated with the preset.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile::new(Duration::from_millis(300), Health::from_halves(1), 5),
            Self::Medium => DifficultyProfile::new(Duration::from_millis(260), Health::from_whole(1), 10),
            Self::Hard => DifficultyProfile::new(Duration::from_millis(200), Health::from_whole(1), 15),
        }
    }

    /// Upper-case label reported alongside scores.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a difficulty label is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`; expected easy, medium or hard")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownDifficulty(value.to_owned()))
    }
}

/// Immutable tuning record selected once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Minimum simulated time between two zombie ticks.
    pub zombie_move_interval: Duration,
    /// Health removed from the player by a single zombie attack.
    pub damage_per_hit: Health,
    /// Number of free humans scattered by a random session.
    pub initial_human_count: u32,
}

impl DifficultyProfile {
    /// Creates a profile from explicit tuning values.
    #[must_use]
    pub const fn new(
        zombie_move_interval: Duration,
        damage_per_hit: Health,
        initial_human_count: u32,
    ) -> Self {
        Self {
            zombie_move_interval,
            damage_per_hit,
            initial_human_count,
        }
    }
}

/// Player health measured in half points.
///
/// Easy difficulty deals half a point per hit, so health is stored as an
/// integer count of halves to keep arithmetic exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// No health left.
    pub const ZERO: Health = Health(0);

    /// Creates a health value from a count of half points.
    #[must_use]
    pub const fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    /// Creates a health value from whole points.
    #[must_use]
    pub const fn from_whole(points: u32) -> Self {
        Self(points.saturating_mul(2))
    }

    /// Number of half points represented by the value.
    #[must_use]
    pub const fn halves(self) -> u32 {
        self.0
    }

    /// Subtracts damage, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: Health) -> Self {
        Self(self.0.saturating_sub(damage.0))
    }

    /// Reports whether the value has reached zero.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

/// Parameters required to start a randomly populated session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of cell columns in the grid.
    pub columns: u32,
    /// Number of cell rows in the grid.
    pub rows: u32,
    /// Difficulty label reported for the session.
    pub difficulty: Difficulty,
    /// Tuning applied to the session.
    pub profile: DifficultyProfile,
    /// Seed driving random placement.
    pub seed: u64,
}

impl SessionConfig {
    /// Creates a default-sized configuration using the preset profile of `difficulty`.
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            difficulty,
            profile: difficulty.profile(),
            seed: DEFAULT_PLACEMENT_SEED,
        }
    }

    /// Replaces the grid dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Replaces the placement seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the tuning while keeping the difficulty label.
    #[must_use]
    pub const fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        self.profile = profile;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

/// Explicit entity placement used to start deterministic sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLayout {
    /// Number of cell columns in the grid.
    pub columns: u32,
    /// Number of cell rows in the grid.
    pub rows: u32,
    /// Difficulty whose preset profile applies to the session.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Starting health; the default starting health applies when absent.
    #[serde(default)]
    pub health: Option<Health>,
    /// Cells occupied by free humans.
    #[serde(default)]
    pub humans: Vec<CellCoord>,
    /// Cells occupied by already rescued followers, in chain order.
    #[serde(default)]
    pub followers: Vec<CellCoord>,
    /// Cells occupied by zombies, in creation order.
    #[serde(default)]
    pub zombies: Vec<CellCoord>,
}

impl SessionLayout {
    /// Creates a layout holding only the player.
    #[must_use]
    pub fn new(columns: u32, rows: u32, player: CellCoord) -> Self {
        Self {
            columns,
            rows,
            difficulty: Difficulty::default(),
            player,
            health: None,
            humans: Vec::new(),
            followers: Vec::new(),
            zombies: Vec::new(),
        }
    }
}

/// Reasons a layout may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum LayoutError {
    /// The grid has no cells or is too small to hold the exit region.
    #[error("grid of {columns}x{rows} cannot hold the exit region")]
    GridTooSmall {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The grid exceeds [`MAX_GRID_DIMENSION`] along some axis.
    #[error("grid of {columns}x{rows} exceeds the {max}x{max} limit", max = MAX_GRID_DIMENSION)]
    GridTooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// An entity lies outside the grid.
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(CellCoord),
    /// Two entities claim the same cell.
    #[error("cell {0} is claimed by more than one entity")]
    Overlap(CellCoord),
    /// A human or zombie was placed inside the exit region.
    #[error("cell {0} lies inside the exit region")]
    InsideExit(CellCoord),
    /// The layout starts the player without health.
    #[error("the player must start with health")]
    NoHealth,
}

/// Reasons a player move request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The session already ended.
    #[error("the session is over")]
    SessionOver,
    /// The target lies outside the grid.
    #[error("the target lies outside the board")]
    OutOfBounds,
    /// A zombie stands on the target.
    #[error("a zombie stands there")]
    ZombieOccupied,
}

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Zombies are held back while the countdown runs.
    #[default]
    Grace,
    /// Zombies hunt the player.
    Active,
    /// Every human was rescued.
    Won,
    /// The player ran out of health.
    Lost,
}

impl SessionPhase {
    /// Reports whether the phase is terminal.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Kind of content reported for a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing occupies the cell.
    Empty,
    /// The player stands on the cell.
    Player,
    /// A free human or a follower stands on the cell.
    Human,
    /// A zombie stands on the cell.
    Zombie,
    /// The cell belongs to the exit region.
    Exit,
}

/// Kind of entity tracked by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player avatar.
    Player,
    /// A human, free or following.
    Human,
    /// A zombie.
    Zombie,
}

impl EntityKind {
    /// Cell kind displayed for a cell holding this entity.
    #[must_use]
    pub const fn cell_kind(self) -> CellKind {
        match self {
            Self::Player => CellKind::Player,
            Self::Human => CellKind::Human,
            Self::Zombie => CellKind::Zombie,
        }
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Fixed enumeration order used for breadth-first expansion.
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::West, Self::East];
}

/// Stable handle assigned to an entity when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Adjacent cell in `direction`, if it lies within a `columns` x `rows` grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (self.column, self.row.checked_sub(1)?),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::West => (self.column.checked_sub(1)?, self.row),
            Direction::East => (self.column.checked_add(1)?, self.row),
        };
        (column < columns && row < rows).then_some(CellCoord::new(column, row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Reports whether `cell` lies in the exit region of a grid `columns` wide.
///
/// The region is derived from coordinates alone: rows `[0, 3)` and columns
/// `[columns - 3, columns)`.
#[must_use]
pub fn is_exit_cell(cell: CellCoord, columns: u32) -> bool {
    cell.row() < EXIT_SPAN && cell.column() >= columns.saturating_sub(EXIT_SPAN) && cell.column() < columns
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<EntityId>],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<EntityId>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the entity occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<EntityId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell is currently free.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.occupant(cell).is_none()
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Option<EntityId>> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Immutable picture of a session handed to renderers and reporters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Cell kinds in row-major order.
    pub cells: Vec<CellKind>,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Cells occupied by followers, in chain order.
    pub followers: Vec<CellCoord>,
    /// Remaining player health.
    pub health: Health,
    /// Humans rescued so far.
    pub score: u32,
    /// Free humans still scattered on the grid.
    pub humans_remaining: usize,
    /// Post-grace time spent in the session.
    pub elapsed: Duration,
    /// Countdown left before zombies may move.
    pub grace_remaining: Duration,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Difficulty label of the session.
    pub difficulty: Difficulty,
}

impl SessionSnapshot {
    /// Kind reported for `cell`, if it lies within the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellKind> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let index = usize::try_from(cell.row()).ok()? * width + usize::try_from(cell.column()).ok()?;
        self.cells.get(index).copied()
    }
}
