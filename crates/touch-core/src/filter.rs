//! Per-component finger selection.
//!
//! A [`FingerFilter`] decides which of the hub's fingers a component reacts
//! to this frame. In [`FilterMode::ManuallyAddedFingers`] it keeps its own
//! list and listens to the hub's `up` signal so fingers that end are pruned
//! without the owner having to remember them.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::finger::{Finger, FingerId, MouseButtons};
use crate::hub::{FingerSignals, TouchHub};
use crate::selectable::{SelectableId, SelectableRegistry};
use crate::signal::ListenerId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    AllFingers,
    ManuallyAddedFingers,
}

#[derive(Debug)]
struct Subscription {
    signals: Weak<FingerSignals>,
    listener: Rc<Cell<Option<ListenerId>>>,
}

impl Subscription {
    fn is_active(&self) -> bool {
        self.listener.get().is_some()
    }

    fn cancel(&self) {
        if let Some(id) = self.listener.take() {
            if let Some(signals) = self.signals.upgrade() {
                signals.up.disconnect(id);
            }
        }
    }
}

#[derive(Debug)]
pub struct FingerFilter {
    pub mode: FilterMode,
    pub ignore_started_over_gui: bool,
    /// Zero accepts any number of fingers.
    pub required_finger_count: usize,
    /// Emulated fingers are dropped unless all of these buttons are held.
    pub required_mouse_buttons: MouseButtons,
    pub required_selectable: Option<SelectableId>,
    manual: Rc<RefCell<Vec<FingerId>>>,
    subscription: Option<Subscription>,
}

impl Default for FingerFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Drop for FingerFilter {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

impl FingerFilter {
    pub fn new(ignore_started_over_gui: bool) -> Self {
        Self {
            mode: FilterMode::AllFingers,
            ignore_started_over_gui,
            required_finger_count: 0,
            required_mouse_buttons: MouseButtons::NONE,
            required_selectable: None,
            manual: Rc::new(RefCell::new(Vec::new())),
            subscription: None,
        }
    }

    pub fn manual() -> Self {
        let mut filter = Self::new(true);
        filter.mode = FilterMode::ManuallyAddedFingers;
        filter
    }

    pub fn with_required_finger_count(mut self, count: usize) -> Self {
        self.required_finger_count = count;
        self
    }

    pub fn with_required_selectable(mut self, selectable: SelectableId) -> Self {
        self.required_selectable = Some(selectable);
        self
    }

    /// Only fills an empty slot.
    pub fn update_required_selectable(&mut self, candidate: Option<SelectableId>) {
        if self.required_selectable.is_none() {
            self.required_selectable = candidate;
        }
    }

    pub fn manual_finger_count(&self) -> usize {
        self.manual.borrow().len()
    }

    pub fn manual_fingers(&self) -> Vec<FingerId> {
        self.manual.borrow().clone()
    }

    /// True while the auto-prune listener is connected to the hub.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    pub fn add_finger(&mut self, finger: FingerId, signals: &Rc<FingerSignals>) {
        if self.mode != FilterMode::ManuallyAddedFingers {
            log::warn!("[filter] add_finger ignored outside manual mode");
            return;
        }
        if self.manual.borrow().contains(&finger) {
            return;
        }
        self.manual.borrow_mut().push(finger);
        if !self.is_subscribed() {
            self.subscribe(signals);
        }
    }

    pub fn remove_finger(&mut self, finger: FingerId) {
        self.manual.borrow_mut().retain(|id| *id != finger);
        if self.manual.borrow().is_empty() {
            self.unsubscribe();
        }
    }

    pub fn remove_all_fingers(&mut self) {
        for finger in self.manual_fingers() {
            self.remove_finger(finger);
        }
    }

    fn subscribe(&mut self, signals: &Rc<FingerSignals>) {
        let manual = Rc::clone(&self.manual);
        let weak = Rc::downgrade(signals);
        let listener: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let prune_weak = weak.clone();
        let prune_listener = Rc::clone(&listener);
        let id = signals.up.connect(move |finger: &Finger| {
            let mut fingers = manual.borrow_mut();
            fingers.retain(|id| *id != finger.id);
            if fingers.is_empty() {
                if let Some(id) = prune_listener.take() {
                    if let Some(signals) = prune_weak.upgrade() {
                        signals.up.disconnect(id);
                    }
                }
            }
        });
        listener.set(Some(id));
        log::debug!("[filter] subscribed to finger up");
        self.subscription = Some(Subscription {
            signals: weak,
            listener,
        });
    }

    fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            log::debug!("[filter] unsubscribed from finger up");
        }
    }

    /// Fingers this component should react to this frame.
    pub fn get_fingers(
        &self,
        hub: &TouchHub,
        registry: &SelectableRegistry,
        ignore_up_fingers: bool,
    ) -> Vec<Finger> {
        let mut fingers = match self.mode {
            FilterMode::AllFingers => {
                let mut fingers = hub.get_fingers(self.ignore_started_over_gui, false, 0);
                if let Some(required) = self.required_selectable {
                    if !registry.is_selected(required) {
                        return Vec::new();
                    }
                    let isolate = registry
                        .config(required)
                        .is_some_and(|c| c.isolate_selecting_fingers);
                    if isolate {
                        fingers = registry
                            .selecting_fingers(required)
                            .iter()
                            .filter_map(|id| hub.finger(*id))
                            .copied()
                            .collect();
                        if self.required_finger_count > 0
                            && fingers.len() != self.required_finger_count
                        {
                            return Vec::new();
                        }
                    }
                }
                if self.required_finger_count > 0 && fingers.len() != self.required_finger_count {
                    return Vec::new();
                }
                fingers
            }
            FilterMode::ManuallyAddedFingers => self
                .manual
                .borrow()
                .iter()
                .filter_map(|id| hub.finger(*id))
                .copied()
                .collect(),
        };

        if ignore_up_fingers {
            fingers.retain(|f| !f.up);
        }

        if !self.required_mouse_buttons.is_empty()
            && !hub.mouse_buttons().contains(self.required_mouse_buttons)
        {
            fingers.retain(|f| !f.is_emulated());
        }

        fingers
    }
}
