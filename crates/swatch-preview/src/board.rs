// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A delivery-side arena of preview slots.

use image::RgbaImage;
use swatch_core::{Color, ComputeError, Deliver, Handle};

/// Identifies a slot in a [`PreviewBoard`].
///
/// Combines an index with a generation count. When a slot is removed its index can be
/// recycled, but the generation is incremented, so a result requested for the old
/// occupant can never land on the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    /// Position in the board's slot list.
    pub index: u32,
    /// Incremented each time the index is recycled.
    pub generation: u32,
}

/// What a preview slot currently shows.
#[derive(Debug, Clone, Default)]
pub struct PreviewSlot {
    /// Caller-chosen name, e.g. the preference key the preview belongs to.
    pub label: String,
    /// Color of the image currently shown.
    pub color: Option<Color>,
    /// The preview bitmap, shared with the loader's cache.
    pub image: Option<Handle<RgbaImage>>,
    /// Last computation error for this slot's current color.
    pub error: Option<String>,
    /// Number of values applied so far.
    pub updates: u32,
}

/// Owns preview slots on the delivery context and applies loaded previews to them.
///
/// The loader only ever sees [`SlotId`]s, so removing a slot here is all it takes to
/// stop it from receiving further previews.
#[derive(Debug, Default)]
pub struct PreviewBoard {
    slots: Vec<(SlotId, Option<PreviewSlot>)>,
    free: Vec<u32>,
}

impl PreviewBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty slot, recycling a removed index when one is available.
    pub fn insert(&mut self, label: impl Into<String>) -> SlotId {
        let slot = PreviewSlot {
            label: label.into(),
            ..Default::default()
        };

        if let Some(index) = self.free.pop() {
            let (id, entry) = &mut self.slots[index as usize];
            id.generation += 1;
            *entry = Some(slot);
            *id
        } else {
            let id = SlotId {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.slots.push((id, Some(slot)));
            id
        }
    }

    /// Removes a slot. Stale ids are ignored.
    pub fn remove(&mut self, id: SlotId) -> Option<PreviewSlot> {
        let (current, entry) = self.slots.get_mut(id.index as usize)?;
        if *current != id {
            return None;
        }
        let removed = entry.take()?;
        self.free.push(id.index);
        Some(removed)
    }

    /// The slot for `id`, if it is still alive.
    pub fn get(&self, id: SlotId) -> Option<&PreviewSlot> {
        self.slots
            .get(id.index as usize)
            .and_then(|(current, entry)| if *current == id { entry.as_ref() } else { None })
    }

    fn get_mut(&mut self, id: SlotId) -> Option<&mut PreviewSlot> {
        self.slots
            .get_mut(id.index as usize)
            .and_then(|(current, entry)| if *current == id { entry.as_mut() } else { None })
    }

    /// The image currently shown by a slot.
    pub fn image(&self, id: SlotId) -> Option<&Handle<RgbaImage>> {
        self.get(id).and_then(|slot| slot.image.as_ref())
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no slot is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over live slots.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &PreviewSlot)> {
        self.slots
            .iter()
            .filter_map(|(id, entry)| entry.as_ref().map(|slot| (*id, slot)))
    }
}

impl Deliver<SlotId, Color, RgbaImage> for PreviewBoard {
    fn deliver(&mut self, consumer: &SlotId, key: &Color, value: &Handle<RgbaImage>) {
        match self.get_mut(*consumer) {
            Some(slot) => {
                slot.color = Some(*key);
                slot.image = Some(value.clone());
                slot.error = None;
                slot.updates += 1;
            }
            None => log::debug!("Preview for {key} arrived after slot {consumer:?} was removed."),
        }
    }

    fn compute_failed(&mut self, consumer: &SlotId, key: &Color, error: &ComputeError) {
        if let Some(slot) = self.get_mut(*consumer) {
            log::warn!("Preview for {key} failed on '{}': {error}", slot.label);
            slot.error = Some(error.to_string());
        }
    }
}
