use std::collections::HashMap;

use super::collaborators::{CameraHandle, Observable};

/// Scene object identity. Ids are never reused, so a stale id simply stops
/// resolving once its object is despawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

struct ObjectSlot {
    debug_name: String,
    observable: Option<Box<dyn Observable>>,
}

/// Live scene objects and their observation capability.
#[derive(Default)]
pub struct Observables {
    next_id: u64,
    objects: HashMap<ObjectId, ObjectSlot>,
}

impl Observables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_observable<O>(&mut self, debug_name: impl Into<String>, observable: O) -> ObjectId
    where
        O: Observable + 'static,
    {
        self.spawn_slot(debug_name.into(), Some(Box::new(observable)))
    }

    pub fn spawn_inert(&mut self, debug_name: impl Into<String>) -> ObjectId {
        self.spawn_slot(debug_name.into(), None)
    }

    fn spawn_slot(
        &mut self,
        debug_name: String,
        observable: Option<Box<dyn Observable>>,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.objects.insert(
            id,
            ObjectSlot {
                debug_name,
                observable,
            },
        );
        id
    }

    pub fn despawn(&mut self, id: ObjectId) -> bool {
        self.objects.remove(&id).is_some()
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn supports_observation(&self, id: ObjectId) -> bool {
        self.objects
            .get(&id)
            .is_some_and(|slot| slot.observable.is_some())
    }

    pub fn debug_name(&self, id: ObjectId) -> Option<&str> {
        self.objects.get(&id).map(|slot| slot.debug_name.as_str())
    }

    pub fn find_by_name(&self, debug_name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, slot)| slot.debug_name == debug_name)
            .map(|(id, _)| *id)
            .min()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn view_target(&self, id: ObjectId) -> Option<CameraHandle> {
        self.objects
            .get(&id)
            .and_then(|slot| slot.observable.as_ref())
            .map(|observable| observable.view_target())
    }

    pub(crate) fn observable_mut(&mut self, id: ObjectId) -> Option<&mut dyn Observable> {
        let observable = self.objects.get_mut(&id)?.observable.as_mut()?;
        Some(observable.as_mut())
    }
}

/// Which single object currently holds the view. Only the view coordinator
/// assigns it.
#[derive(Debug, Default)]
pub struct ObservationRegistry {
    current: Option<ObjectId>,
}

impl ObservationRegistry {
    pub fn is_observed(&self, objects: &Observables, candidate: ObjectId) -> bool {
        objects.supports_observation(candidate) && self.current == Some(candidate)
    }

    pub fn current_target(&self, objects: &Observables) -> Option<ObjectId> {
        self.current.filter(|id| objects.is_alive(*id))
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> Option<ObjectId> {
        self.current
    }

    pub(crate) fn track(&mut self, id: ObjectId) {
        self.current = Some(id);
    }

    pub(crate) fn clear(&mut self) {
        self.current = None;
    }
}
