use crate::limits::MAX_SCORE;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

/// One authoritative read of the full scoreboard state, as reported by
/// `GET /api/status`. Instances are transient: one is decoded per poll cycle
/// and discarded after reconciliation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub scores: TeamScores,
    pub game_time: u32,
    pub timer_paused: bool,
    pub display_mode: DisplayMode,
    pub display_enabled: bool,
    #[serde(default)]
    pub two_min_warning: bool,
    pub power: PowerStatus,
    pub system: SystemStatus,
    pub scoreboard: PanelStatus,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct TeamScores {
    pub home: u8,
    pub away: u8,
}

impl TeamScores {
    pub fn get(&self, team: Team) -> u8 {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }

    pub fn set(&mut self, team: Team, score: u8) {
        match team {
            Team::Home => self.home = score,
            Team::Away => self.away = score,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::Home => write!(f, "home"),
            Self::Away => write!(f, "away"),
        }
    }
}

/// What the LED panel is currently showing. Any wire value outside these
/// three is a protocol error and fails the decode of the whole snapshot.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Timer,
    Text,
    Time,
}

impl core::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::Timer => write!(f, "timer"),
            Self::Text => write!(f, "text"),
            Self::Time => write!(f, "time"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PowerStatus {
    pub battery_level: u8,
    pub panel_power: PanelPower,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PanelPower {
    pub voltage: f32,
}

/// Telemetry from the device's controller. The optional fields are absent
/// when the device's sensors have not reported yet, which is tolerated.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub cpu_temp: Option<f32>,
    pub wifi_connected: bool,
    #[serde(default)]
    pub connected_clients: Option<u32>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PanelStatus {
    pub brightness: u8,
    #[serde(default)]
    pub temperatures: PanelTemperatures,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct PanelTemperatures {
    #[serde(default)]
    pub electronics: Option<f32>,
}

/// Clamps a prospective score into the range the panel can show. Applied
/// before any score mutation is sent; values received from the device are
/// trusted as-is.
pub fn clamp_score(score: i32) -> u8 {
    score.clamp(0, MAX_SCORE as i32) as u8
}
