//! Frame-stepped finger source.
//!
//! The host feeds raw pointer samples for a frame (`press`, `move_to`,
//! `release`, or `feed_mouse` for an emulated finger) and then calls
//! [`TouchHub::update`] once. The hub advances every tracked finger, returns
//! the frame's [`FingerEvent`]s in firing order and fans the same events out
//! through its shared [`FingerSignals`].

use glam::Vec2;
use std::rc::Rc;

use crate::config::TouchConfig;
use crate::error::{Result, TouchError};
use crate::finger::{Finger, FingerId, MouseButtons};
use crate::signal::Signal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FingerEvent {
    /// A new contact began.
    Down(Finger),
    /// A held contact was refreshed.
    Update(Finger),
    /// A contact ended.
    Up(Finger),
    /// A short contact ended without travelling far.
    Tap(Finger),
    /// A short contact ended after travelling past the swipe threshold.
    Swipe(Finger),
    /// A contact that ended last frame was retired.
    Inactive(Finger),
}

impl FingerEvent {
    pub fn finger(&self) -> &Finger {
        match self {
            FingerEvent::Down(f)
            | FingerEvent::Update(f)
            | FingerEvent::Up(f)
            | FingerEvent::Tap(f)
            | FingerEvent::Swipe(f)
            | FingerEvent::Inactive(f) => f,
        }
    }
}

/// Notification points fired by [`TouchHub::update`].
#[derive(Debug, Default)]
pub struct FingerSignals {
    pub down: Signal<Finger>,
    pub update: Signal<Finger>,
    pub up: Signal<Finger>,
    pub tap: Signal<Finger>,
    pub swipe: Signal<Finger>,
    pub inactive: Signal<Finger>,
}

impl FingerSignals {
    fn emit(&self, event: &FingerEvent) {
        match event {
            FingerEvent::Down(f) => self.down.emit(f),
            FingerEvent::Update(f) => self.update.emit(f),
            FingerEvent::Up(f) => self.up.emit(f),
            FingerEvent::Tap(f) => self.tap.emit(f),
            FingerEvent::Swipe(f) => self.swipe.emit(f),
            FingerEvent::Inactive(f) => self.inactive.emit(f),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Sample {
    Press { position: Vec2, over_gui: bool },
    Move { position: Vec2, over_gui: bool },
    Release,
}

pub struct TouchHub {
    config: TouchConfig,
    fingers: Vec<Finger>,
    pending: Vec<(FingerId, Sample)>,
    mouse_buttons: MouseButtons,
    signals: Rc<FingerSignals>,
}

impl TouchHub {
    pub fn new(config: TouchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fingers: Vec::new(),
            pending: Vec::new(),
            mouse_buttons: MouseButtons::NONE,
            signals: Rc::new(FingerSignals::default()),
        })
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn signals(&self) -> &Rc<FingerSignals> {
        &self.signals
    }

    /// Every tracked finger this frame, including ones that went up.
    pub fn fingers(&self) -> &[Finger] {
        &self.fingers
    }

    pub fn finger(&self, id: FingerId) -> Option<&Finger> {
        self.fingers.iter().find(|f| f.id == id)
    }

    pub fn mouse_buttons(&self) -> MouseButtons {
        self.mouse_buttons
    }

    pub fn set_mouse_buttons(&mut self, buttons: MouseButtons) {
        self.mouse_buttons = buttons;
    }

    pub fn scaling_factor(&self) -> f32 {
        self.config.scaling_factor()
    }

    pub fn screen_factor(&self) -> f32 {
        self.config.screen_factor()
    }

    fn is_live(&self, id: FingerId) -> bool {
        self.fingers.iter().any(|f| f.id == id && !f.up)
    }

    fn pending_state(&self, id: FingerId) -> Option<Sample> {
        self.pending
            .iter()
            .rev()
            .find(|(pid, _)| *pid == id)
            .map(|(_, s)| *s)
    }

    /// True if `id` will be held after the samples queued so far are applied.
    fn will_be_held(&self, id: FingerId) -> bool {
        match self.pending_state(id) {
            Some(Sample::Release) => false,
            Some(_) => true,
            None => self.is_live(id),
        }
    }

    /// A contact released this frame cannot be pressed again until the next one.
    pub fn press(&mut self, id: FingerId, position: Vec2, over_gui: bool) -> Result<()> {
        if self.will_be_held(id) || self.is_live(id) {
            return Err(TouchError::DuplicateFinger(id));
        }
        self.pending.push((id, Sample::Press { position, over_gui }));
        Ok(())
    }

    pub fn move_to(&mut self, id: FingerId, position: Vec2, over_gui: bool) -> Result<()> {
        if !self.will_be_held(id) {
            return Err(TouchError::UnknownFinger(id));
        }
        self.pending.push((id, Sample::Move { position, over_gui }));
        Ok(())
    }

    pub fn release(&mut self, id: FingerId) -> Result<()> {
        if !self.will_be_held(id) {
            return Err(TouchError::UnknownFinger(id));
        }
        self.pending.push((id, Sample::Release));
        Ok(())
    }

    /// Drives the emulated mouse finger from the current pointer state.
    ///
    /// Any held button keeps the finger down; releasing all buttons lifts it.
    pub fn feed_mouse(&mut self, position: Vec2, buttons: MouseButtons, over_gui: bool) {
        self.mouse_buttons = buttons;
        let held = self.will_be_held(FingerId::MOUSE);
        let sample = match (held, buttons.is_empty()) {
            (false, false) if !self.is_live(FingerId::MOUSE) => {
                Sample::Press { position, over_gui }
            }
            (true, false) => Sample::Move { position, over_gui },
            (true, true) => Sample::Release,
            (false, _) => return,
        };
        self.pending.push((FingerId::MOUSE, sample));
    }

    /// Advances one frame of `dt` seconds and fires the resulting events.
    pub fn update(&mut self, dt: f32) -> Vec<FingerEvent> {
        let mut events = Vec::new();

        // Contacts that ended last frame are retired first.
        let mut index = 0;
        while index < self.fingers.len() {
            if self.fingers[index].up {
                let finger = self.fingers.remove(index);
                log::debug!("[touch] finger {:?} inactive", finger.id);
                events.push(FingerEvent::Inactive(finger));
            } else {
                index += 1;
            }
        }

        for finger in &mut self.fingers {
            finger.last_screen_position = finger.screen_position;
            finger.age += dt;
        }

        let mut released: Vec<FingerId> = Vec::new();
        for (id, sample) in std::mem::take(&mut self.pending) {
            match sample {
                Sample::Press { position, over_gui } => {
                    let finger = Finger::new(id, position, over_gui);
                    log::debug!("[touch] finger {:?} down at {:?}", id, position);
                    self.fingers.push(finger);
                    events.push(FingerEvent::Down(finger));
                }
                Sample::Move { position, over_gui } => {
                    if let Some(finger) = self.fingers.iter_mut().find(|f| f.id == id) {
                        finger.screen_position = position;
                        finger.is_over_gui = over_gui;
                    }
                }
                Sample::Release => released.push(id),
            }
        }

        let tap_threshold = self.config.tap_threshold;
        let swipe_threshold = self.config.swipe_threshold;
        let scaling = self.config.scaling_factor();
        for finger in &mut self.fingers {
            if released.contains(&finger.id) {
                finger.set = false;
                finger.up = true;
                events.push(FingerEvent::Up(*finger));
                if finger.age <= tap_threshold {
                    let travelled = finger.swipe_screen_delta().length() * scaling;
                    if travelled < swipe_threshold {
                        events.push(FingerEvent::Tap(*finger));
                    } else {
                        events.push(FingerEvent::Swipe(*finger));
                    }
                }
            } else {
                events.push(FingerEvent::Update(*finger));
            }
        }

        for event in &events {
            self.signals.emit(event);
        }
        events
    }

    /// Snapshot of tracked fingers passing the gui filters.
    ///
    /// Returns an empty list when `required_finger_count` is non-zero and the
    /// number of qualifying fingers differs.
    pub fn get_fingers(
        &self,
        ignore_started_over_gui: bool,
        ignore_is_over_gui: bool,
        required_finger_count: usize,
    ) -> Vec<Finger> {
        let fingers: Vec<Finger> = self
            .fingers
            .iter()
            .filter(|f| !(ignore_started_over_gui && f.started_over_gui))
            .filter(|f| !(ignore_is_over_gui && f.is_over_gui))
            .copied()
            .collect();
        if required_finger_count > 0 && fingers.len() != required_finger_count {
            return Vec::new();
        }
        fingers
    }
}
