//! Arena of every entity created during a session.

use zombie_rescue_core::{CellCoord, EntityId, EntityKind};

#[derive(Clone, Copy, Debug)]
struct Entity {
    kind: EntityKind,
    cell: CellCoord,
}

/// Owns all entities and the membership lists derived from them.
///
/// Handles index into `entities` and are never reused within a session, so a
/// rescued human keeps its handle after it leaves the grid.
#[derive(Clone, Debug)]
pub(crate) struct Registry {
    entities: Vec<Entity>,
    player: EntityId,
    humans: Vec<EntityId>,
    zombies: Vec<EntityId>,
    chain: Vec<EntityId>,
}

impl Registry {
    pub(crate) fn new(player_cell: CellCoord) -> Self {
        Self {
            entities: vec![Entity {
                kind: EntityKind::Player,
                cell: player_cell,
            }],
            player: EntityId::new(0),
            humans: Vec::new(),
            zombies: Vec::new(),
            chain: Vec::new(),
        }
    }

    fn spawn(&mut self, kind: EntityKind, cell: CellCoord) -> EntityId {
        let id = EntityId::new(u32::try_from(self.entities.len()).unwrap_or(u32::MAX));
        self.entities.push(Entity { kind, cell });
        id
    }

    pub(crate) fn spawn_human(&mut self, cell: CellCoord) -> EntityId {
        let id = self.spawn(EntityKind::Human, cell);
        self.humans.push(id);
        id
    }

    pub(crate) fn spawn_follower(&mut self, cell: CellCoord) -> EntityId {
        let id = self.spawn(EntityKind::Human, cell);
        self.chain.push(id);
        id
    }

    pub(crate) fn spawn_zombie(&mut self, cell: CellCoord) -> EntityId {
        let id = self.spawn(EntityKind::Zombie, cell);
        self.zombies.push(id);
        id
    }

    pub(crate) fn player(&self) -> EntityId {
        self.player
    }

    pub(crate) fn player_cell(&self) -> CellCoord {
        self.entities[0].cell
    }

    pub(crate) fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entity(id).map(|entity| entity.kind)
    }

    pub(crate) fn cell(&self, id: EntityId) -> Option<CellCoord> {
        self.entity(id).map(|entity| entity.cell)
    }

    pub(crate) fn set_cell(&mut self, id: EntityId, cell: CellCoord) {
        if let Some(entity) = usize::try_from(id.get())
            .ok()
            .and_then(|index| self.entities.get_mut(index))
        {
            entity.cell = cell;
        }
    }

    pub(crate) fn is_zombie(&self, id: EntityId) -> bool {
        self.kind(id) == Some(EntityKind::Zombie)
    }

    /// Moves a free human to the tail of the rescued chain.
    ///
    /// Returns `false` without side effects when `id` is not a free human.
    pub(crate) fn pick_up(&mut self, id: EntityId) -> bool {
        let Some(position) = self.humans.iter().position(|human| *human == id) else {
            return false;
        };
        let _ = self.humans.remove(position);
        self.chain.push(id);
        true
    }

    /// Removes a follower from the chain after it reached the exit.
    pub(crate) fn rescue(&mut self, id: EntityId) -> bool {
        let Some(position) = self.chain.iter().position(|member| *member == id) else {
            return false;
        };
        let _ = self.chain.remove(position);
        true
    }

    /// Empties the chain, yielding its members in order.
    pub(crate) fn drain_chain(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.chain)
    }

    pub(crate) fn humans(&self) -> &[EntityId] {
        &self.humans
    }

    pub(crate) fn zombies(&self) -> &[EntityId] {
        &self.zombies
    }

    pub(crate) fn chain(&self) -> &[EntityId] {
        &self.chain
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.entities.get(index))
    }
}
