//! Moving hazards (cars) and platforms (logs)
//!
//! The registry exclusively owns every active entity. Entities are kept
//! sorted by id so iteration order is stable.

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Heading, LaneKind};

pub type EntityId = u32;

/// Entity class. Each class advances on its own timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Car,
    Log,
}

impl EntityKind {
    /// Lane type this class spawns on
    pub fn lane(self) -> LaneKind {
        match self {
            EntityKind::Car => LaneKind::Road,
            EntityKind::Log => LaneKind::Water,
        }
    }
}

/// Car sprites. Each sprite is drawn facing one way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarStyle {
    YellowLeft,
    PurpleLeft,
    SemiLeft,
    WhiteRight,
}

impl CarStyle {
    const LEFT: [CarStyle; 3] = [CarStyle::YellowLeft, CarStyle::PurpleLeft, CarStyle::SemiLeft];
    const RIGHT: [CarStyle; 1] = [CarStyle::WhiteRight];

    /// Sprites usable for a car travelling `heading`
    pub fn for_heading(heading: Heading) -> &'static [CarStyle] {
        match heading {
            Heading::Left => &Self::LEFT,
            Heading::Right => &Self::RIGHT,
        }
    }
}

/// Identity of a drawable token on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    Frog,
    Log,
    Car(CarStyle),
}

impl Token {
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Frog => "frog",
            Token::Log => "log",
            Token::Car(CarStyle::YellowLeft) => "yellow-left",
            Token::Car(CarStyle::PurpleLeft) => "purple-left",
            Token::Car(CarStyle::SemiLeft) => "semi-left",
            Token::Car(CarStyle::WhiteRight) => "white-right",
        }
    }
}

/// A car or log occupying one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub token: Token,
    pub cell: Cell,
    pub heading: Heading,
    /// Where it entered the grid
    pub spawn_cell: Cell,
    /// Cells advanced since spawn
    pub steps: u32,
    /// Class period at spawn time (ms per cell)
    pub period_ms: u64,
}

impl MovingEntity {
    /// Cell this entity will occupy after its next step (may be off-grid)
    pub fn next_cell(&self) -> Cell {
        self.cell.offset(self.heading.delta())
    }
}

/// Owner of all active entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: Vec<MovingEntity>,
    next_id: EntityId,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        // Default-constructed registries start at 0; ids start at 1
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an entity, keeping id order
    pub fn insert(&mut self, entity: MovingEntity) {
        let pos = self.entities.partition_point(|e| e.id < entity.id);
        self.entities.insert(pos, entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<MovingEntity> {
        let pos = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(pos))
    }

    pub fn get(&self, id: EntityId) -> Option<&MovingEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut MovingEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovingEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MovingEntity> {
        self.entities.iter_mut()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &MovingEntity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn at(&self, cell: Cell) -> Option<&MovingEntity> {
        self.entities.iter().find(|e| e.cell == cell)
    }

    pub fn kind_at(&self, kind: EntityKind, cell: Cell) -> Option<&MovingEntity> {
        self.of_kind(kind).find(|e| e.cell == cell)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity (ids keep counting up)
    pub fn clear(&mut self) -> Vec<MovingEntity> {
        std::mem::take(&mut self.entities)
    }
}
