use scoreboard_common::snapshot::{DisplayMode, StatusSnapshot, Team};

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    StatusReceived(StatusSnapshot),
    PresetsLoaded(Vec<String>),
    User(UserCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    AdjustScore { team: Team, delta: i16 },
    StartTimer,
    StopTimer,
    SetTimerMinutes(u16),
    SetMode(DisplayMode),
    ShowPreset(usize),
    ShowMessage(String),
    ClearMessage,
    ToggleDisplayPower,
    SetBrightness(u8),
    ListPresets,
}

impl UserCommand {
    /// Parses one line of console input. Returns `None` for anything
    /// unrecognized; the caller reports it to the user.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("home", Some(delta)) => Self::AdjustScore {
                team: Team::Home,
                delta: delta.parse().ok()?,
            },
            ("away", Some(delta)) => Self::AdjustScore {
                team: Team::Away,
                delta: delta.parse().ok()?,
            },
            ("start", None) => Self::StartTimer,
            ("stop", None) => Self::StopTimer,
            ("timer", Some(minutes)) => Self::SetTimerMinutes(minutes.parse().ok()?),
            ("mode", Some("timer")) => Self::SetMode(DisplayMode::Timer),
            ("mode", Some("text")) => Self::SetMode(DisplayMode::Text),
            ("mode", Some("time")) => Self::SetMode(DisplayMode::Time),
            ("preset", Some(index)) => Self::ShowPreset(index.parse().ok()?),
            ("presets", None) => Self::ListPresets,
            ("msg", Some(first)) => {
                let mut text = first.to_string();
                for word in words {
                    text.push(' ');
                    text.push_str(word);
                }
                return Some(Self::ShowMessage(text));
            }
            ("clear", None) => Self::ClearMessage,
            ("power", None) => Self::ToggleDisplayPower,
            ("bright", Some(level)) => Self::SetBrightness(level.parse().ok()?),
            _ => return None,
        };

        // Commands with a fixed word count reject trailing garbage.
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_score_commands() {
        assert_eq!(
            UserCommand::parse("home +1"),
            Some(UserCommand::AdjustScore { team: Team::Home, delta: 1 })
        );
        assert_eq!(
            UserCommand::parse("away -1"),
            Some(UserCommand::AdjustScore { team: Team::Away, delta: -1 })
        );
        assert_eq!(UserCommand::parse("home"), None);
        assert_eq!(UserCommand::parse("home x"), None);
    }

    #[test]
    fn test_parse_timer_and_mode() {
        assert_eq!(UserCommand::parse("start"), Some(UserCommand::StartTimer));
        assert_eq!(UserCommand::parse("stop"), Some(UserCommand::StopTimer));
        assert_eq!(
            UserCommand::parse("timer 12"),
            Some(UserCommand::SetTimerMinutes(12))
        );
        assert_eq!(
            UserCommand::parse("mode time"),
            Some(UserCommand::SetMode(DisplayMode::Time))
        );
        assert_eq!(UserCommand::parse("mode scroll"), None);
    }

    #[test]
    fn test_parse_message_commands() {
        assert_eq!(
            UserCommand::parse("msg GOAL FOR HOME"),
            Some(UserCommand::ShowMessage("GOAL FOR HOME".to_string()))
        );
        assert_eq!(
            UserCommand::parse("preset 2"),
            Some(UserCommand::ShowPreset(2))
        );
        assert_eq!(UserCommand::parse("clear"), Some(UserCommand::ClearMessage));
    }

    #[test]
    fn test_parse_rejects_trailing_words() {
        assert_eq!(UserCommand::parse("start now"), None);
        assert_eq!(UserCommand::parse("home 1 2"), None);
        assert_eq!(UserCommand::parse(""), None);
    }
}
