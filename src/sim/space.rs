//! Spatial registry: every collision shape in the world, indexed by tag
//!
//! Shapes live in a generational arena and are referred to by `ShapeId`.
//! Insertion order is kept separately and is the iteration/draw order.
//! Each single-bit tag has a bucket of ids, kept in insertion order, so a
//! filter never has to scan shapes that cannot match.

use super::shape::{Rect, Shape, ShapeId, Tags};

struct Slot {
    generation: u32,
    /// Insertion sequence number of the current occupant
    seq: u64,
    shape: Option<Shape>,
}

/// The registry
pub struct Space {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_seq: u64,
    order: Vec<ShapeId>,
    index: [Vec<ShapeId>; Tags::COUNT],
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl Space {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            next_seq: 0,
            order: Vec::new(),
            index: Default::default(),
        }
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a shape at the end of the order and index its tags
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let tags = shape.tags();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.seq = seq;
                slot.shape = Some(shape);
                ShapeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    seq,
                    shape: Some(shape),
                });
                ShapeId {
                    index,
                    generation: 0,
                }
            }
        };

        self.order.push(id);
        for tag in tags.iter() {
            if let Some(k) = tag.slot() {
                // Newest shape always sorts last
                self.index[k].push(id);
            }
        }
        id
    }

    /// Remove by identity. Stale or unknown ids are a no-op.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let slot = self.slot_mut(id)?;
        let shape = slot.shape.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        self.order.retain(|other| *other != id);
        for tag in shape.tags().iter() {
            if let Some(k) = tag.slot() {
                self.index[k].retain(|other| *other != id);
            }
        }
        Some(shape)
    }

    /// Drop every shape. Outstanding ids become stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.shape.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(i as u32);
        }
        self.order.clear();
        for bucket in &mut self.index {
            bucket.clear();
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.shape.as_ref()
    }

    /// Mutable geometry. Tags stay behind `add_tags`/`remove_tags` so the index cannot drift.
    pub fn rect_mut(&mut self, id: ShapeId) -> Option<&mut Rect> {
        self.slot_mut(id)?.shape.as_mut().map(|s| &mut s.rect)
    }

    pub fn has_tags(&self, id: ShapeId, tags: Tags) -> bool {
        self.get(id).is_some_and(|s| s.has_tags(tags))
    }

    /// Shapes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.order
            .iter()
            .filter_map(move |id| self.get(*id).map(|s| (*id, s)))
    }

    /// Snapshot of the shapes currently carrying all of `tags`, in insertion order.
    ///
    /// `Tags::NONE` matches everything.
    pub fn filter_by_tags(&self, tags: Tags) -> ShapeView {
        let candidates = match tags.iter().next().and_then(Tags::slot) {
            Some(k) => &self.index[k],
            None => &self.order,
        };
        let ids = candidates
            .iter()
            .copied()
            .filter(|id| self.has_tags(*id, tags))
            .collect();
        ShapeView { ids }
    }

    /// Add `tags` to every shape in `view`
    pub fn add_tags(&mut self, view: &ShapeView, tags: Tags) {
        for id in view.iter() {
            self.tag(id, tags);
        }
    }

    /// Remove `tags` from every shape in `view`
    pub fn remove_tags(&mut self, view: &ShapeView, tags: Tags) {
        for id in view.iter() {
            self.untag(id, tags);
        }
    }

    /// Add `tags` to every shape in the space
    pub fn add_tags_all(&mut self, tags: Tags) {
        let all = self.filter_by_tags(Tags::NONE);
        self.add_tags(&all, tags);
    }

    /// Add tags to one shape. Returns false for a stale id.
    pub fn tag(&mut self, id: ShapeId, tags: Tags) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let seq = slot.seq;
        let Space { slots, index, .. } = self;
        let Some(shape) = slots[id.index as usize].shape.as_mut() else {
            return false;
        };

        let added: Vec<Tags> = tags.iter().filter(|t| !shape.has_tags(*t)).collect();
        shape.tags_mut().insert(tags);

        for tag in added {
            if let Some(k) = tag.slot() {
                let bucket = &mut index[k];
                let at = bucket.partition_point(|other| slots[other.index as usize].seq < seq);
                bucket.insert(at, id);
            }
        }
        true
    }

    /// Remove tags from one shape. Returns false for a stale id.
    pub fn untag(&mut self, id: ShapeId, tags: Tags) -> bool {
        let Some(shape) = self.slot_mut(id).and_then(|s| s.shape.as_mut()) else {
            return false;
        };
        let dropped: Vec<Tags> = tags.iter().filter(|t| shape.has_tags(*t)).collect();
        shape.tags_mut().remove(tags);

        for tag in dropped {
            if let Some(k) = tag.slot() {
                self.index[k].retain(|other| *other != id);
            }
        }
        true
    }

    fn slot(&self, id: ShapeId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation && s.shape.is_some())
    }

    fn slot_mut(&mut self, id: ShapeId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
    }

    /// Check that stored tags and the tag index agree
    #[cfg(test)]
    pub(crate) fn index_consistent(&self) -> bool {
        Tags::EACH.iter().enumerate().all(|(k, tag)| {
            let expected: Vec<ShapeId> = self
                .iter()
                .filter(|(_, s)| s.has_tags(*tag))
                .map(|(id, _)| id)
                .collect();
            expected == self.index[k]
        })
    }
}

/// Membership snapshot returned by `Space::filter_by_tags`.
///
/// The ids stay valid handles to live shapes; changing tags later does not
/// change which ids a view holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeView {
    ids: Vec<ShapeId>,
}

impl ShapeView {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Positional access ("the first match" and friends)
    pub fn get(&self, i: usize) -> Option<ShapeId> {
        self.ids.get(i).copied()
    }

    pub fn first(&self) -> Option<ShapeId> {
        self.get(0)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.ids.iter().copied()
    }

    /// Live shapes behind the view, skipping any removed since the snapshot
    pub fn shapes<'a>(&'a self, space: &'a Space) -> impl Iterator<Item = (ShapeId, &'a Shape)> {
        self.iter()
            .filter_map(move |id| space.get(id).map(|s| (id, s)))
    }
}
