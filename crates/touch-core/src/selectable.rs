//! Selectable registry and selection lifecycle.
//!
//! Entities are registered into an ordered collection and move between the
//! unselected and selected states through [`SelectableRegistry::select`] and
//! [`SelectableRegistry::deselect`]. Each transition fires the entity's own
//! [`SelectionSignals`] first and then the registry-wide ones.
//!
//! Listeners never get access to the registry while it is firing. A listener
//! that needs to remove an entity pushes it into the [`DespawnQueue`]; the
//! registry drains the queue between individual deselects, and every
//! multi-entity operation re-checks that an entity still exists before
//! touching it.

use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Result, TouchError};
use crate::finger::{Finger, FingerId};
use crate::hub::FingerEvent;
use crate::signal::Signal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectableId(u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectableConfig {
    /// Deselect when the selecting finger goes up and no other selecting finger is held.
    pub deselect_on_up: bool,
    /// Report unselected while any selecting finger is still live.
    pub hide_with_finger: bool,
    /// Finger filters requiring this entity only see its selecting fingers.
    pub isolate_selecting_fingers: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionEvent {
    pub selectable: SelectableId,
    /// `None` for programmatic selection.
    pub finger: Option<FingerId>,
}

#[derive(Debug, Default)]
pub struct SelectionSignals {
    pub select: Signal<SelectionEvent>,
    /// Every frame a selecting finger is refreshed.
    pub select_set: Signal<SelectionEvent>,
    /// A selecting finger went up, or was released by deselection.
    pub select_up: Signal<SelectionEvent>,
    pub deselect: Signal<SelectableId>,
}

impl SelectionSignals {
    fn fire_select(instance: &Self, global: &Self, event: SelectionEvent) {
        instance.select.emit(&event);
        global.select.emit(&event);
    }

    fn fire_select_set(instance: &Self, global: &Self, event: SelectionEvent) {
        instance.select_set.emit(&event);
        global.select_set.emit(&event);
    }

    fn fire_select_up(instance: &Self, global: &Self, event: SelectionEvent) {
        instance.select_up.emit(&event);
        global.select_up.emit(&event);
    }

    fn fire_deselect(instance: &Self, global: &Self, id: SelectableId) {
        instance.deselect.emit(&id);
        global.deselect.emit(&id);
    }
}

/// Cloneable handle listeners use to ask for an entity's removal.
#[derive(Clone, Debug, Default)]
pub struct DespawnQueue(Rc<RefCell<Vec<SelectableId>>>);

impl DespawnQueue {
    pub fn push(&self, id: SelectableId) {
        self.0.borrow_mut().push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn take(&self) -> Vec<SelectableId> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

#[derive(Debug)]
struct Entry {
    id: SelectableId,
    config: SelectableConfig,
    is_selected: bool,
    selecting_fingers: SmallVec<[FingerId; 2]>,
    selected_at: u64,
    signals: Rc<SelectionSignals>,
}

impl Entry {
    fn is_selected(&self) -> bool {
        if self.config.hide_with_finger && self.is_selected && !self.selecting_fingers.is_empty() {
            return false;
        }
        self.is_selected
    }

    fn is_selected_by(&self, finger: FingerId) -> bool {
        self.selecting_fingers.contains(&finger)
    }

    fn any_fingers_set(&self, fingers: &[Finger]) -> bool {
        self.selecting_fingers
            .iter()
            .any(|id| fingers.iter().any(|f| f.id == *id && f.set))
    }
}

#[derive(Debug, Default)]
pub struct SelectableRegistry {
    entries: Vec<Entry>,
    index: FnvHashMap<SelectableId, usize>,
    next_id: u32,
    selection_counter: u64,
    signals: Rc<SelectionSignals>,
    despawn: DespawnQueue,
}

impl SelectableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry-wide notifications, fired after each entity's own.
    pub fn signals(&self) -> &Rc<SelectionSignals> {
        &self.signals
    }

    pub fn signals_of(&self, id: SelectableId) -> Option<Rc<SelectionSignals>> {
        self.entry(id).map(|e| Rc::clone(&e.signals))
    }

    pub fn despawn_queue(&self) -> DespawnQueue {
        self.despawn.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: SelectableId) -> bool {
        self.index.contains_key(&id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = SelectableId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    fn entry(&self, id: SelectableId) -> Option<&Entry> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    fn position(&self, id: SelectableId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(TouchError::UnknownSelectable(id))
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.id, i);
        }
    }

    pub fn register(&mut self, config: SelectableConfig) -> SelectableId {
        let id = SelectableId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.entries.len());
        self.entries.push(Entry {
            id,
            config,
            is_selected: false,
            selecting_fingers: SmallVec::new(),
            selected_at: 0,
            signals: Rc::new(SelectionSignals::default()),
        });
        log::debug!("[select] registered {:?}", id);
        id
    }

    /// Removes the entity, deselecting it first if it is still selected.
    pub fn unregister(&mut self, id: SelectableId) -> Result<()> {
        let position = self.position(id)?;
        let mut entry = self.entries.remove(position);
        self.rebuild_index();
        log::debug!("[select] unregistered {:?}", id);
        if entry.is_selected {
            self.fire_deselect(&mut entry);
        }
        self.flush_despawned();
        Ok(())
    }

    /// Removes every entity queued through the [`DespawnQueue`].
    pub fn flush_despawned(&mut self) {
        loop {
            let queued = self.despawn.take();
            if queued.is_empty() {
                break;
            }
            for id in queued {
                if let Some(position) = self.index.get(&id).copied() {
                    let mut entry = self.entries.remove(position);
                    self.rebuild_index();
                    log::debug!("[select] despawned {:?}", id);
                    if entry.is_selected {
                        self.fire_deselect(&mut entry);
                    }
                }
            }
        }
    }

    pub fn config(&self, id: SelectableId) -> Option<&SelectableConfig> {
        self.entry(id).map(|e| &e.config)
    }

    pub fn config_mut(&mut self, id: SelectableId) -> Option<&mut SelectableConfig> {
        let position = self.index.get(&id).copied()?;
        Some(&mut self.entries[position].config)
    }

    /// Selection state as seen by queries; see [`SelectableConfig::hide_with_finger`].
    pub fn is_selected(&self, id: SelectableId) -> bool {
        self.entry(id).is_some_and(Entry::is_selected)
    }

    pub fn is_selected_raw(&self, id: SelectableId) -> bool {
        self.entry(id).is_some_and(|e| e.is_selected)
    }

    pub fn get_is_selected(&self, id: SelectableId, raw: bool) -> bool {
        if raw {
            self.is_selected_raw(id)
        } else {
            self.is_selected(id)
        }
    }

    pub fn is_selected_by(&self, id: SelectableId, finger: FingerId) -> bool {
        self.entry(id).is_some_and(|e| e.is_selected_by(finger))
    }

    /// Live fingers holding the selection, in the order they selected.
    pub fn selecting_fingers(&self, id: SelectableId) -> &[FingerId] {
        self.entry(id)
            .map(|e| e.selecting_fingers.as_slice())
            .unwrap_or(&[])
    }

    /// Earliest still-live selecting finger.
    pub fn selecting_finger(&self, id: SelectableId) -> Option<FingerId> {
        self.selecting_fingers(id).first().copied()
    }

    /// First entity, in registration order, selected by `finger`.
    pub fn find_selectable(&self, finger: FingerId) -> Option<SelectableId> {
        self.entries
            .iter()
            .find(|e| e.is_selected_by(finger))
            .map(|e| e.id)
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_selected()).count()
    }

    /// Fills `out` with every selected entity in registration order.
    pub fn get_selected(&self, out: &mut Vec<SelectableId>) {
        out.clear();
        out.extend(self.entries.iter().filter(|e| e.is_selected()).map(|e| e.id));
    }

    pub fn select(&mut self, id: SelectableId, finger: Option<FingerId>) -> Result<()> {
        let position = self.position(id)?;
        self.selection_counter += 1;
        let entry = &mut self.entries[position];
        entry.is_selected = true;
        entry.selected_at = self.selection_counter;
        if let Some(finger) = finger {
            if !entry.is_selected_by(finger) {
                entry.selecting_fingers.push(finger);
            }
        }
        let instance = Rc::clone(&entry.signals);
        log::debug!("[select] {:?} selected by {:?}", id, finger);
        SelectionSignals::fire_select(
            &instance,
            &self.signals,
            SelectionEvent {
                selectable: id,
                finger,
            },
        );
        self.flush_despawned();
        Ok(())
    }

    /// No-op when the entity is already unselected.
    pub fn deselect(&mut self, id: SelectableId) -> Result<()> {
        let position = self.position(id)?;
        if self.entries[position].is_selected {
            // Listeners run against a detached copy of the entry.
            let mut detached = self.detach_selection(position);
            self.fire_deselect(&mut detached);
        }
        self.flush_despawned();
        Ok(())
    }

    fn detach_selection(&mut self, position: usize) -> Entry {
        let entry = &mut self.entries[position];
        let detached = Entry {
            id: entry.id,
            config: entry.config,
            is_selected: true,
            selecting_fingers: std::mem::take(&mut entry.selecting_fingers),
            selected_at: entry.selected_at,
            signals: Rc::clone(&entry.signals),
        };
        entry.is_selected = false;
        detached
    }

    fn fire_deselect(&self, entry: &mut Entry) {
        entry.is_selected = false;
        log::debug!("[select] {:?} deselected", entry.id);
        for &finger in entry.selecting_fingers.iter().rev() {
            SelectionSignals::fire_select_up(
                &entry.signals,
                &self.signals,
                SelectionEvent {
                    selectable: entry.id,
                    finger: Some(finger),
                },
            );
        }
        entry.selecting_fingers.clear();
        SelectionSignals::fire_deselect(&entry.signals, &self.signals, entry.id);
    }

    /// Deselects every entity whose raw selection flag is set.
    pub fn deselect_all(&mut self) {
        let selected: Vec<SelectableId> = self
            .entries
            .iter()
            .filter(|e| e.is_selected)
            .map(|e| e.id)
            .collect();
        for id in selected {
            if self.contains(id) {
                _ = self.deselect(id);
            }
        }
    }

    /// Keeps at most `max_count` selected, preferring the most recently selected.
    pub fn cull(&mut self, max_count: usize) {
        let mut selected = Vec::new();
        self.get_selected(&mut selected);
        if selected.len() <= max_count {
            return;
        }
        selected.sort_by_key(|id| {
            std::cmp::Reverse(self.entry(*id).map_or(0, |e| e.selected_at))
        });
        for id in selected.into_iter().skip(max_count) {
            // Deselecting one entity may despawn another.
            if self.contains(id) {
                _ = self.deselect(id);
            }
        }
    }

    /// Makes `selectables` the whole selection.
    ///
    /// Entities outside the set are deselected; members not yet selected are
    /// selected in reverse so the first member ends up most recently selected.
    /// An empty set (or one with no registered members) deselects everything.
    pub fn replace_selection(&mut self, finger: Option<FingerId>, selectables: &[SelectableId]) {
        let outside: Vec<SelectableId> = self
            .entries
            .iter()
            .filter(|e| e.is_selected && !selectables.contains(&e.id))
            .map(|e| e.id)
            .collect();
        for id in outside {
            if self.contains(id) {
                _ = self.deselect(id);
            }
        }

        let mut selectable_count = 0;
        for &id in selectables.iter().rev() {
            if !self.contains(id) {
                continue;
            }
            if !self.is_selected_raw(id) {
                _ = self.select(id, finger);
            }
            selectable_count += 1;
        }

        if selectable_count == 0 {
            self.deselect_all();
        }
    }

    /// Routes a finger source event into the selection lifecycle.
    ///
    /// `fingers` is the finger source's tracked list for the same frame.
    pub fn handle_finger_event(&mut self, event: &FingerEvent, fingers: &[Finger]) {
        match event {
            FingerEvent::Update(finger) => self.handle_finger_set(finger.id),
            FingerEvent::Up(finger) => self.handle_finger_up(finger.id, fingers),
            FingerEvent::Inactive(finger) => self.handle_finger_inactive(finger.id),
            FingerEvent::Down(_) | FingerEvent::Tap(_) | FingerEvent::Swipe(_) => {}
        }
    }

    fn selected_by(&self, finger: FingerId) -> Vec<SelectableId> {
        self.entries
            .iter()
            .filter(|e| e.is_selected_by(finger))
            .map(|e| e.id)
            .collect()
    }

    fn handle_finger_set(&mut self, finger: FingerId) {
        for id in self.selected_by(finger) {
            let Some(entry) = self.entry(id) else {
                continue;
            };
            let instance = Rc::clone(&entry.signals);
            SelectionSignals::fire_select_set(
                &instance,
                &self.signals,
                SelectionEvent {
                    selectable: id,
                    finger: Some(finger),
                },
            );
            self.flush_despawned();
        }
    }

    fn handle_finger_up(&mut self, finger: FingerId, fingers: &[Finger]) {
        for id in self.selected_by(finger) {
            let Some(entry) = self.entry(id) else {
                continue;
            };
            if entry.config.deselect_on_up && entry.is_selected() && !entry.any_fingers_set(fingers)
            {
                // Deselection fires select_up for every selecting finger.
                _ = self.deselect(id);
            } else {
                let instance = Rc::clone(&entry.signals);
                SelectionSignals::fire_select_up(
                    &instance,
                    &self.signals,
                    SelectionEvent {
                        selectable: id,
                        finger: Some(finger),
                    },
                );
                self.flush_despawned();
            }
        }
    }

    fn handle_finger_inactive(&mut self, finger: FingerId) {
        for entry in &mut self.entries {
            entry.selecting_fingers.retain(|id| *id != finger);
        }
    }
}
