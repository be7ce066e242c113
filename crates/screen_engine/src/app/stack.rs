use std::fmt;

use tracing::{debug, info};

use super::action::{ActionQueue, ScreenAction};
use super::backend::ScriptHost;
use super::scheduler::GameClock;
use super::screen::{Screen, ScreenContext, ScreenError};

/// Identity of a pushed screen. Never reused, even if the same object is pushed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u64);

struct ScreenSlot {
    id: ScreenId,
    screen: Box<dyn Screen>,
    set_up: bool,
}

#[derive(Default)]
pub struct ScreenStack {
    slots: Vec<ScreenSlot>,
    next_id: u64,
}

impl fmt::Debug for ScreenStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| (slot.id, slot.screen.name())))
            .finish()
    }
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn top_id(&self) -> Option<ScreenId> {
        self.slots.last().map(|slot| slot.id)
    }

    pub fn top_name(&self) -> Option<&str> {
        self.slots.last().map(|slot| slot.screen.name())
    }

    /// Screen names from bottom to top.
    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.screen.name()).collect()
    }

    pub fn top_mut(&mut self) -> Option<&mut (dyn Screen + 'static)> {
        self.slots.last_mut().map(|slot| slot.screen.as_mut())
    }

    pub(crate) fn push(&mut self, screen: Box<dyn Screen>) -> ScreenId {
        let id = ScreenId(self.next_id);
        self.next_id += 1;
        self.slots.push(ScreenSlot {
            id,
            screen,
            set_up: false,
        });
        id
    }

    pub(crate) fn pop(&mut self) -> Option<Box<dyn Screen>> {
        self.slots.pop().map(|slot| slot.screen)
    }

    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.slots.len();
        self.slots.clear();
        dropped
    }

    fn screen_mut(&mut self, id: ScreenId) -> Option<&mut (dyn Screen + 'static)> {
        self.slots
            .iter_mut()
            .rev()
            .find(|slot| slot.id == id)
            .map(|slot| slot.screen.as_mut())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// An unfinished fade held every pending action back.
    pub deferred: bool,
    pub batches: u32,
    pub switches: u32,
    pub quit: bool,
}

/// Applies queued actions to the stack with screen lifecycle callbacks.
///
/// Nothing happens while the active fade is still running. Otherwise the queue
/// is drained batch by batch until a `setup` stops producing new actions.
pub(crate) fn reconcile(
    stack: &mut ScreenStack,
    actions: &mut ActionQueue,
    clock: &mut GameClock,
    scripts: &mut dyn ScriptHost,
) -> Result<ReconcileReport, ScreenError> {
    let mut report = ReconcileReport::default();
    if actions.has_pending_fadeout() {
        report.deferred = true;
        return Ok(report);
    }
    actions.discard_fade();

    while !actions.is_empty() {
        report.batches += 1;
        // Only the screen on top when the batch starts gets a leave() call.
        let mut current = stack.top_id();
        let batch = actions.take_batch();
        let mut quit = false;

        for action in batch {
            match action {
                ScreenAction::Pop => {
                    assert!(
                        !stack.is_empty(),
                        "pop_screen applied to an empty screen stack"
                    );
                    if current.is_some() && current == stack.top_id() {
                        if let Some(top) = stack.top_mut() {
                            top.leave()?;
                        }
                        current = None;
                    }
                    if let Some(screen) = stack.pop() {
                        debug!(screen = screen.name(), depth = stack.len(), "screen_popped");
                    }
                }
                ScreenAction::Push(screen) => {
                    let name = screen.name().to_owned();
                    stack.push(screen);
                    debug!(screen = %name, depth = stack.len(), "screen_pushed");
                }
                ScreenAction::Quit => {
                    let dropped = stack.clear();
                    info!(dropped, "quit_applied");
                    current = None;
                    quit = true;
                    break;
                }
            }
        }

        if quit {
            report.quit = true;
            continue;
        }

        if current == stack.top_id() {
            continue;
        }
        if let Some(previous) = current {
            if let Some(screen) = stack.screen_mut(previous) {
                screen.leave()?;
            }
        }
        let depth = stack.len();
        if let Some(slot) = stack.slots.last_mut() {
            if !slot.set_up {
                slot.set_up = true;
                let mut ctx = ScreenContext::new(actions, clock);
                slot.screen.setup(&mut ctx)?;
            }
            clock.reset_speed();
            scripts.resume_waiting_on_screen_switch();
            report.switches += 1;
            info!(screen = slot.screen.name(), depth, "screen_switch");
        }
    }

    Ok(report)
}
