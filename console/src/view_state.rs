use scoreboard_common::snapshot::{DisplayMode, TeamScores};

/// Which call site last wrote a view-state field. Optimistic writes come
/// from the command dispatcher ahead of device confirmation; authoritative
/// writes come from the reconciler on poll completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSource {
    Optimistic,
    Authoritative,
}

/// A view-state field stamped with the provenance of its last write. The
/// stamp comes from the owning [`ViewState`]'s logical clock, so the order
/// of competing writes is always recorded, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedField<T> {
    value: T,
    source: WriteSource,
    written_at: u64,
}

impl<T: Copy> VersionedField<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            source: WriteSource::Authoritative,
            written_at: 0,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    pub fn source(&self) -> WriteSource {
        self.source
    }

    pub fn written_at(&self) -> u64 {
        self.written_at
    }

    fn write(&mut self, value: T, source: WriteSource, at: u64) {
        self.value = value;
        self.source = source;
        self.written_at = at;
    }
}

/// The client's belief about the mutable subset of device state, plus the
/// local message-compose state. Created once at startup and superseded
/// field by field for the life of the session.
///
/// Every write goes through a setter so it picks up a fresh stamp from the
/// logical clock. Whichever source writes last wins, matching the device's
/// last-write-wins semantics, but the stamp and source make the outcome of
/// a race observable after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    clock: u64,
    pub current_mode: VersionedField<DisplayMode>,
    pub display_enabled: VersionedField<bool>,
    pub timer_running: VersionedField<bool>,
    pub scores: VersionedField<TeamScores>,
    pub message_entry: String,
    pub preset_selection: Option<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            clock: 0,
            current_mode: VersionedField::new(DisplayMode::Timer),
            display_enabled: VersionedField::new(true),
            timer_running: VersionedField::new(false),
            scores: VersionedField::new(TeamScores::default()),
            message_entry: String::new(),
            preset_selection: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    fn stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn set_mode(&mut self, mode: DisplayMode, source: WriteSource) {
        let at = self.stamp();
        self.current_mode.write(mode, source, at);
    }

    pub fn set_display_enabled(&mut self, enabled: bool, source: WriteSource) {
        let at = self.stamp();
        self.display_enabled.write(enabled, source, at);
    }

    pub fn set_timer_running(&mut self, running: bool, source: WriteSource) {
        let at = self.stamp();
        self.timer_running.write(running, source, at);
    }

    pub fn set_scores(&mut self, scores: TeamScores, source: WriteSource) {
        let at = self.stamp();
        self.scores.write(scores, source, at);
    }
}
