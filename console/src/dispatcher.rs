use crate::view_state::{ViewState, WriteSource};
use log::warn;
use scoreboard_common::{
    limits::MAX_BRIGHTNESS,
    snapshot::{DisplayMode, Team, clamp_score},
};
use tokio::sync::mpsc::UnboundedSender;

/// One mutation to be performed against the device. Produced by the
/// dispatcher, consumed by the outbound sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    SetScore { team: Team, score: u8 },
    ResumeTimer,
    PauseTimer,
    SetTimer { minutes: u16 },
    SetMode { mode: DisplayMode },
    SetText { text: String },
    SetPower { enabled: bool },
    SetBrightness { brightness: u8 },
}

/// Translates user intents into optimistic view-state writes plus queued
/// device mutations. The view state is mutated before the request leaves
/// the process, so the UI reflects intent immediately; a failed request is
/// logged by the sender and never rolled back here. The next successful
/// poll heals any divergence.
pub struct CommandDispatcher {
    outbound: UnboundedSender<CommandRequest>,
}

impl CommandDispatcher {
    pub fn new(outbound: UnboundedSender<CommandRequest>) -> Self {
        Self { outbound }
    }

    /// Applies the delta to the last-rendered score, clamped to the panel's
    /// range. Rapid taps before a poll confirms compound on that base. The
    /// sum is widened so no delta can overflow before the clamp applies.
    pub fn adjust_score(&self, state: &mut ViewState, team: Team, delta: i16) {
        let mut scores = state.scores.get();
        let score = clamp_score(scores.get(team) as i32 + i32::from(delta));
        scores.set(team, score);
        state.set_scores(scores, WriteSource::Optimistic);
        self.queue(CommandRequest::SetScore { team, score });
    }

    pub fn start_timer(&self, state: &mut ViewState) {
        state.set_timer_running(true, WriteSource::Optimistic);
        self.queue(CommandRequest::ResumeTimer);
    }

    pub fn stop_timer(&self, state: &mut ViewState) {
        state.set_timer_running(false, WriteSource::Optimistic);
        self.queue(CommandRequest::PauseTimer);
    }

    pub fn set_timer_minutes(&self, minutes: u16) {
        self.queue(CommandRequest::SetTimer { minutes });
    }

    pub fn set_display_mode(&self, state: &mut ViewState, mode: DisplayMode) {
        state.set_mode(mode, WriteSource::Optimistic);
        self.queue(CommandRequest::SetMode { mode });
    }

    /// Sends the text, and for non-empty text also switches the panel to
    /// text mode so the message actually becomes visible.
    pub fn display_message(&self, state: &mut ViewState, text: &str) {
        self.queue(CommandRequest::SetText {
            text: text.to_string(),
        });
        if !text.is_empty() {
            self.set_display_mode(state, DisplayMode::Text);
        }
    }

    /// Blanks the panel text and resets the local compose state.
    pub fn clear_message(&self, state: &mut ViewState) {
        self.display_message(state, "");
        state.message_entry.clear();
        state.preset_selection = None;
    }

    pub fn toggle_display_power(&self, state: &mut ViewState) {
        let enabled = !state.display_enabled.get();
        state.set_display_enabled(enabled, WriteSource::Optimistic);
        self.queue(CommandRequest::SetPower { enabled });
    }

    pub fn set_brightness(&self, brightness: u8) {
        self.queue(CommandRequest::SetBrightness {
            brightness: brightness.min(MAX_BRIGHTNESS),
        });
    }

    fn queue(&self, request: CommandRequest) {
        if self.outbound.send(request).is_err() {
            warn!("Outbound sender is gone, dropping command");
        }
    }
}
