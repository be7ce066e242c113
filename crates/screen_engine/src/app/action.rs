use std::fmt;
use std::mem;

use tracing::debug;

use super::fade::ScreenFade;
use super::screen::Screen;

pub enum ScreenAction {
    Push(Box<dyn Screen>),
    Pop,
    Quit,
}

impl fmt::Debug for ScreenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenAction::Push(screen) => f.debug_tuple("Push").field(&screen.name()).finish(),
            ScreenAction::Pop => f.write_str("Pop"),
            ScreenAction::Quit => f.write_str("Quit"),
        }
    }
}

/// Pending stack mutations plus the single active fade that gates them.
///
/// Enqueueing never touches the screen stack; the orchestrator drains the
/// queue between loop phases.
pub struct ActionQueue {
    pending: Vec<ScreenAction>,
    fade: Option<Box<dyn ScreenFade>>,
    transitions_enabled: bool,
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.pending)
            .field("has_fade", &self.fade.is_some())
            .field("transitions_enabled", &self.transitions_enabled)
            .finish()
    }
}

impl ActionQueue {
    pub fn new(transitions_enabled: bool) -> Self {
        Self {
            pending: Vec::new(),
            fade: None,
            transitions_enabled,
        }
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions_enabled = enabled;
        if !enabled {
            self.fade = None;
        }
    }

    pub fn push_screen(&mut self, screen: Box<dyn Screen>, fade: Option<Box<dyn ScreenFade>>) {
        debug!(screen = screen.name(), pending = self.pending.len(), "push_screen_queued");
        self.set_screen_fade(fade);
        self.pending.push(ScreenAction::Push(screen));
    }

    pub fn pop_screen(&mut self, fade: Option<Box<dyn ScreenFade>>) {
        debug!(pending = self.pending.len(), "pop_screen_queued");
        self.set_screen_fade(fade);
        self.pending.push(ScreenAction::Pop);
    }

    pub fn quit(&mut self, fade: Option<Box<dyn ScreenFade>>) {
        debug!(pending = self.pending.len(), "quit_queued");
        self.set_screen_fade(fade);
        self.pending.push(ScreenAction::Quit);
    }

    /// Replaces the active fade when one is supplied and transitions are enabled.
    pub fn set_screen_fade(&mut self, fade: Option<Box<dyn ScreenFade>>) {
        if !self.transitions_enabled {
            return;
        }
        if let Some(fade) = fade {
            self.fade = Some(fade);
        }
    }

    pub fn has_pending_fadeout(&self) -> bool {
        self.fade.as_ref().is_some_and(|fade| !fade.done())
    }

    pub fn fade(&self) -> Option<&dyn ScreenFade> {
        self.fade.as_deref()
    }

    pub fn fade_mut(&mut self) -> Option<&mut (dyn ScreenFade + 'static)> {
        self.fade.as_deref_mut()
    }

    pub(crate) fn discard_fade(&mut self) {
        self.fade = None;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves every pending action out; actions queued afterwards form the next batch.
    pub(crate) fn take_batch(&mut self) -> Vec<ScreenAction> {
        mem::take(&mut self.pending)
    }
}
