use crate::view_state::{ViewState, WriteSource};
use scoreboard_common::snapshot::{DisplayMode, StatusSnapshot, TeamScores};

/// Receives the two-minute-warning alert without knowing how it is played.
/// Called exactly once per transition into the shown state.
pub trait AlertSink {
    fn two_minute_warning(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum WarningState {
    #[default]
    Hidden,
    Shown,
}

/// Battery indicator color, a pure function of the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryColor {
    Normal,
    Warning,
    Critical,
}

impl BatteryColor {
    pub fn for_level(level: u8) -> Self {
        if level < 20 {
            Self::Critical
        } else if level < 50 {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// Everything the rendering layer needs for one frame, derived from the
/// current view state plus the telemetry of the latest snapshot. Recomputed
/// from scratch each cycle, never cached piecemeal.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub scores: TeamScores,
    pub timer_text: String,
    pub timer_running: bool,
    pub current_mode: DisplayMode,
    pub display_enabled: bool,
    pub battery_level: u8,
    pub battery_color: BatteryColor,
    pub panel_voltage: String,
    pub cpu_temp: String,
    pub panel_temp: String,
    pub brightness: u8,
    pub wifi_connected: bool,
    pub connected_clients: u32,
    pub warning_visible: bool,
}

impl Presentation {
    pub fn derive(state: &ViewState, snapshot: &StatusSnapshot, warning_visible: bool) -> Self {
        Self {
            scores: state.scores.get(),
            timer_text: timer_text(snapshot.game_time),
            timer_running: state.timer_running.get(),
            current_mode: state.current_mode.get(),
            display_enabled: state.display_enabled.get(),
            battery_level: snapshot.power.battery_level,
            battery_color: BatteryColor::for_level(snapshot.power.battery_level),
            panel_voltage: format!("{:.1}", snapshot.power.panel_power.voltage),
            cpu_temp: temp_text(snapshot.system.cpu_temp),
            panel_temp: temp_text(snapshot.scoreboard.temperatures.electronics),
            brightness: snapshot.scoreboard.brightness,
            wifi_connected: snapshot.system.wifi_connected,
            connected_clients: snapshot.system.connected_clients.unwrap_or(0),
            warning_visible,
        }
    }

    /// Highlight state for each display-mode button.
    pub fn mode_buttons(&self) -> impl Iterator<Item = (DisplayMode, bool)> + '_ {
        enum_iterator::all::<DisplayMode>().map(|mode| (mode, mode == self.current_mode))
    }
}

pub fn timer_text(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn temp_text(temp: Option<f32>) -> String {
    match temp {
        Some(temp) => format!("{temp:.1}"),
        None => "--".to_string(),
    }
}

/// Merges each authoritative snapshot into the view state and derives the
/// presentation for the frame. Holds the only piece of cross-cycle memory,
/// the shown/hidden state of the two-minute warning.
#[derive(Debug, Default)]
pub struct Reconciler {
    warning: WarningState,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_visible(&self) -> bool {
        self.warning == WarningState::Shown
    }

    pub fn reconcile(
        &mut self,
        state: &mut ViewState,
        snapshot: &StatusSnapshot,
        alerts: &mut dyn AlertSink,
    ) -> Presentation {
        state.set_timer_running(!snapshot.timer_paused, WriteSource::Authoritative);
        state.set_mode(snapshot.display_mode, WriteSource::Authoritative);
        state.set_display_enabled(snapshot.display_enabled, WriteSource::Authoritative);
        state.set_scores(snapshot.scores, WriteSource::Authoritative);

        // The alert fires only on the hidden-to-shown transition; sustained
        // `true` reports must not re-trigger it.
        match (self.warning, snapshot.two_min_warning) {
            (WarningState::Hidden, true) => {
                self.warning = WarningState::Shown;
                alerts.two_minute_warning();
            }
            (WarningState::Shown, false) => self.warning = WarningState::Hidden,
            _ => {}
        }

        Presentation::derive(state, snapshot, self.warning_visible())
    }
}
