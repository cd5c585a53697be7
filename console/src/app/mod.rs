use crate::{
    dispatcher::CommandDispatcher,
    presets::PresetCatalog,
    reconciler::{AlertSink, Presentation, Reconciler},
    view_state::ViewState,
};
use log::{info, warn};
use scoreboard_common::snapshot::StatusSnapshot;
use tokio::sync::{mpsc, watch};

mod message;
pub use message::{Message, UserCommand};

/// The single state-owning task of the console. All mutation funnels
/// through [`App::update`] via one message channel, so poll results and
/// user commands interleave by completion order, never concurrently.
pub struct App {
    state: ViewState,
    reconciler: Reconciler,
    dispatcher: CommandDispatcher,
    presets: PresetCatalog,
    last_snapshot: Option<StatusSnapshot>,
    alerts: Box<dyn AlertSink + Send>,
    presentation_tx: watch::Sender<Option<Presentation>>,
}

impl App {
    pub fn new(
        dispatcher: CommandDispatcher,
        alerts: Box<dyn AlertSink + Send>,
        presentation_tx: watch::Sender<Option<Presentation>>,
    ) -> Self {
        Self {
            state: ViewState::new(),
            reconciler: Reconciler::new(),
            dispatcher,
            presets: PresetCatalog::default(),
            last_snapshot: None,
            alerts,
            presentation_tx,
        }
    }

    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Message>) {
        while let Some(message) = rx.recv().await {
            self.update(message);
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::StatusReceived(snapshot) => {
                let presentation =
                    self.reconciler
                        .reconcile(&mut self.state, &snapshot, self.alerts.as_mut());
                self.last_snapshot = Some(snapshot);
                self.publish(presentation);
            }
            Message::PresetsLoaded(messages) => {
                info!("Loaded {} preset messages", messages.len());
                self.presets = PresetCatalog::from_messages(messages);
            }
            Message::User(command) => {
                self.handle_user(command);
                self.refresh();
            }
        }
    }

    fn handle_user(&mut self, command: UserCommand) {
        match command {
            UserCommand::AdjustScore { team, delta } => {
                self.dispatcher.adjust_score(&mut self.state, team, delta);
            }
            UserCommand::StartTimer => self.dispatcher.start_timer(&mut self.state),
            UserCommand::StopTimer => self.dispatcher.stop_timer(&mut self.state),
            UserCommand::SetTimerMinutes(minutes) => self.dispatcher.set_timer_minutes(minutes),
            UserCommand::SetMode(mode) => {
                self.dispatcher.set_display_mode(&mut self.state, mode);
            }
            UserCommand::ShowPreset(index) => match self.presets.get(index) {
                Some(text) => {
                    let text = text.to_string();
                    self.state.preset_selection = Some(index);
                    self.state.message_entry = text.clone();
                    self.dispatcher.display_message(&mut self.state, &text);
                }
                None => warn!("No preset message at index {index}"),
            },
            UserCommand::ShowMessage(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.state.message_entry = text.to_string();
                    self.dispatcher.display_message(&mut self.state, text);
                }
            }
            UserCommand::ClearMessage => self.dispatcher.clear_message(&mut self.state),
            UserCommand::ToggleDisplayPower => {
                self.dispatcher.toggle_display_power(&mut self.state);
            }
            UserCommand::SetBrightness(brightness) => self.dispatcher.set_brightness(brightness),
            UserCommand::ListPresets => {
                if self.presets.is_empty() {
                    println!("No preset messages are loaded");
                } else {
                    for (index, message) in self.presets.iter().enumerate() {
                        println!("{index}: {message}");
                    }
                }
            }
        }
    }

    /// Re-derives the presentation after an optimistic write so the UI
    /// reflects intent ahead of confirmation. Telemetry comes from the
    /// last snapshot; before the first poll there is nothing to show.
    fn refresh(&mut self) {
        if let Some(snapshot) = &self.last_snapshot {
            let presentation =
                Presentation::derive(&self.state, snapshot, self.reconciler.warning_visible());
            self.publish(presentation);
        }
    }

    fn publish(&self, presentation: Presentation) {
        let _ = self.presentation_tx.send(Some(presentation));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{dispatcher::CommandRequest, reconciler::test::snapshot};
    use scoreboard_common::snapshot::DisplayMode;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    struct SilentAlert;

    impl AlertSink for SilentAlert {
        fn two_minute_warning(&mut self) {}
    }

    fn app() -> (
        App,
        UnboundedReceiver<CommandRequest>,
        watch::Receiver<Option<Presentation>>,
    ) {
        let (outbound_tx, outbound_rx) = unbounded_channel();
        let (presentation_tx, presentation_rx) = watch::channel(None);
        let app = App::new(
            CommandDispatcher::new(outbound_tx),
            Box::new(SilentAlert),
            presentation_tx,
        );
        (app, outbound_rx, presentation_rx)
    }

    #[test]
    fn test_start_then_later_paused_poll_wins() {
        let (mut app, _outbound, _presentation) = app();

        app.update(Message::User(UserCommand::StartTimer));
        let paused = snapshot();
        assert_eq!(paused.timer_paused, true);
        app.update(Message::StatusReceived(paused));

        assert_eq!(app.state.timer_running.get(), false);
    }

    #[test]
    fn test_optimistic_command_published_before_confirmation() {
        let (mut app, _outbound, presentation) = app();

        app.update(Message::StatusReceived(snapshot()));
        app.update(Message::User(UserCommand::SetMode(DisplayMode::Time)));

        let current = presentation.borrow().clone().unwrap();
        assert_eq!(current.current_mode, DisplayMode::Time);
    }

    #[test]
    fn test_cleared_message_survives_text_mode_poll() {
        let (mut app, _outbound, _presentation) = app();

        app.update(Message::PresetsLoaded(vec!["GOAL!".to_string()]));
        app.update(Message::User(UserCommand::ShowPreset(0)));
        assert_eq!(app.state.message_entry, "GOAL!");
        assert_eq!(app.state.preset_selection, Some(0));

        app.update(Message::User(UserCommand::ClearMessage));

        // The device still reports text mode with the now-empty message.
        let mut text_mode = snapshot();
        text_mode.display_mode = DisplayMode::Text;
        app.update(Message::StatusReceived(text_mode));

        assert!(app.state.message_entry.is_empty());
        assert_eq!(app.state.preset_selection, None);
    }

    #[test]
    fn test_preset_out_of_range_sends_nothing() {
        let (mut app, mut outbound, _presentation) = app();

        app.update(Message::PresetsLoaded(vec!["GOAL!".to_string()]));
        app.update(Message::User(UserCommand::ShowPreset(7)));

        assert!(outbound.try_recv().is_err());
        assert_eq!(app.state.preset_selection, None);
    }

    #[test]
    fn test_empty_message_is_ignored() {
        let (mut app, mut outbound, _presentation) = app();

        app.update(Message::User(UserCommand::ShowMessage("   ".to_string())));

        assert!(outbound.try_recv().is_err());
        assert!(app.state.message_entry.is_empty());
    }
}
