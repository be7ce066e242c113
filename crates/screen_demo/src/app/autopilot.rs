use std::collections::VecDeque;

use screen_engine::{EventSource, InputEvent, Key};
use tracing::debug;

/// Scripted event source for headless runs.
///
/// Events are keyed by drain cycle; the manager drains once per simulation
/// step, so cycle `n` is delivered during the `n`-th step.
#[derive(Debug, Clone)]
pub(crate) struct AutopilotEvents {
    script: VecDeque<(u32, InputEvent)>,
    cycle: u32,
}

impl AutopilotEvents {
    pub(crate) fn new(mut script: Vec<(u32, InputEvent)>) -> Self {
        script.sort_by_key(|(cycle, _)| *cycle);
        Self {
            script: script.into(),
            cycle: 0,
        }
    }

    /// Walks the whole demo: start a session, move, pause, go back, quit.
    pub(crate) fn demo_script() -> Self {
        let mut script = Vec::new();
        let mut tap = |cycle: u32, key: Key| {
            script.push((cycle, InputEvent::key_down(key)));
            script.push((cycle + 1, InputEvent::key_up(key)));
        };
        tap(10, Key::Enter);
        tap(130, Key::Char('p'));
        tap(140, Key::Char('p'));
        tap(160, Key::Escape);
        tap(200, Key::Down);
        tap(210, Key::Enter);
        script.push((60, InputEvent::key_down(Key::Right)));
        script.push((120, InputEvent::key_up(Key::Right)));
        // Fallback in case a transition never completes.
        script.push((DEMO_SCRIPT_DEADLINE, InputEvent::CloseRequested));
        Self::new(script)
    }
}

pub(crate) const DEMO_SCRIPT_DEADLINE: u32 = 300;

impl EventSource for AutopilotEvents {
    fn poll_event(&mut self) -> Option<InputEvent> {
        match self.script.front() {
            Some((cycle, _)) if *cycle <= self.cycle => {
                let (_, event) = self.script.pop_front()?;
                debug!(cycle = self.cycle, event = ?event, "autopilot_event");
                Some(event)
            }
            _ => {
                self.cycle = self.cycle.saturating_add(1);
                None
            }
        }
    }
}
