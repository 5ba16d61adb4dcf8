use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use std::collections::HashMap;

use crate::engine::state::view_state::BodyId;

/// What a trackable entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedKind {
    Star,
    Planet,
    Moon,
    Belt,
    Mission,
}

/// Live handle and static sizing of one trackable object.
#[derive(Debug, Clone, Copy)]
pub struct TrackedBody {
    pub entity: Entity,
    pub radius: f32,
    pub gravity_mass: f32,
    pub kind: TrackedKind,
}

/// Lookup from body name to its live root entity, built once per scene.
#[derive(Resource, Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<BodyId, TrackedBody>,
    star: Option<BodyId>,
}

impl BodyRegistry {
    pub fn insert(&mut self, id: BodyId, body: TrackedBody) {
        if body.kind == TrackedKind::Star {
            self.star = Some(id.clone());
        }
        self.bodies.insert(id, body);
    }

    pub fn get(&self, id: &BodyId) -> Option<&TrackedBody> {
        self.bodies.get(id)
    }

    pub fn contains(&self, id: &BodyId) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn star(&self) -> Option<&BodyId> {
        self.star.as_ref()
    }

    pub fn is_star(&self, id: &BodyId) -> bool {
        self.star.as_ref() == Some(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BodyId> {
        self.bodies.keys()
    }
}

/// Pickable entity to logical identity, built at construction time so the
/// resolver never walks the live hierarchy.
#[derive(Resource, Debug, Default)]
pub struct PickRegistry {
    identities: HashMap<Entity, BodyId>,
}

impl PickRegistry {
    pub fn register(&mut self, entity: Entity, id: BodyId) {
        self.identities.insert(entity, id);
    }

    pub fn identity(&self, entity: Entity) -> Option<&BodyId> {
        self.identities.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

/// Bounding sphere used for pointer hits, centred on the entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickable {
    pub radius: f32,
}

/// Current-frame world position of `entity`, propagated from its ancestors'
/// local transforms so it reflects this frame's orbit and spin updates.
/// `None` when the hierarchy is broken or the result is non-finite.
pub fn current_world_position(helper: &TransformHelper, entity: Entity) -> Option<Vec3> {
    let position = helper.compute_global_transform(entity).ok()?.translation();
    position.is_finite().then_some(position)
}
