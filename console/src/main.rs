use clap::Parser;
use log::*;
#[cfg(debug_assertions)]
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::{
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use scoreboard_common::control::ControlClient;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
    task,
};

mod app;
mod dispatcher;
mod outbound;
mod poller;
mod presets;
mod reconciler;
mod view_state;

mod config;
use app::{App, Message, UserCommand};
use config::Config;
use dispatcher::CommandDispatcher;
use outbound::{OutboundSender, RetryPolicy};
use poller::StatusPoller;
use reconciler::{AlertSink, BatteryColor, Presentation};

const APP_NAME: &str = "scoreboard-console";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long)]
    /// Address of the scoreboard, overriding the config file
    address: Option<String>,

    #[clap(long)]
    /// Polling period in milliseconds, overriding the config file
    poll_period: Option<u64>,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = args.log_location.unwrap_or_else(|| {
        let mut path = directories::BaseDirs::new()
            .expect("Could not find a directory to store logs")
            .data_local_dir()
            .to_path_buf();
        path.push("scoreboard-console-logs");
        path
    });
    let mut log_path = log_base_path.clone();
    let mut archived_log_path = log_base_path.clone();
    log_path.push(format!("{APP_NAME}-log.txt"));
    archived_log_path.push(format!("{APP_NAME}-log-{{}}.txt.gz"));

    #[cfg(debug_assertions)]
    println!("Log path: {}", log_path.display());

    // Only log to the console in debug mode
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    // Setup the file log roller
    let roller = FixedWindowRoller::builder()
        .build(
            archived_log_path.as_os_str().to_str().unwrap(),
            args.num_old_logs,
        )
        .unwrap();
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))
        .unwrap();

    // Setup the logging from all locations to use `LevelFilter::Error`
    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    // Setup the top level logging config
    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    let log_config = log_config
        .logger(Logger::builder().build("console", log_level))
        .logger(Logger::builder().build("scoreboard_common", log_level))
        .build(root)
        .unwrap();

    log4rs::init_config(log_config).unwrap();
    log_panics::init();

    let mut config: Config = confy::load(APP_NAME, None).unwrap_or_else(|e| {
        warn!("Failed to read config file, using defaults: {e}");
        Default::default()
    });

    if let Some(address) = args.address {
        config.network.address = address;
    }
    if let Some(poll_period) = args.poll_period {
        config.network.poll_period_ms = poll_period;
    }

    info!("Starting scoreboard console for {}", config.base_url());
    run(config)
}

/// Rings the terminal bell when the game clock crosses two minutes.
struct TerminalAlert;

impl AlertSink for TerminalAlert {
    fn two_minute_warning(&mut self) {
        info!("Two minute warning");
        print!("\x07");
    }
}

#[tokio::main]
async fn run(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(ControlClient::new(
        &config.base_url(),
        Duration::from_millis(config.network.request_timeout_ms),
    )?);

    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (presentation_tx, presentation_rx) = watch::channel(None);

    let retry = RetryPolicy {
        attempts: config.outbound.retry_attempts,
        backoff: Duration::from_millis(config.outbound.retry_backoff_ms),
    };
    let sender = OutboundSender::spawn(client.clone(), outbound_rx, retry);

    StatusPoller::new(
        client.clone(),
        msg_tx.clone(),
        Duration::from_millis(config.network.poll_period_ms),
    )
    .spawn();

    presets::spawn_load(client.clone(), msg_tx.clone());

    task::spawn(read_input(msg_tx.clone()));
    task::spawn(render_loop(presentation_rx));

    let app = App::new(
        CommandDispatcher::new(outbound_tx),
        Box::new(TerminalAlert),
        presentation_tx,
    );
    app.run(msg_rx).await;
    sender.shutdown().await;

    Ok(())
}

async fn read_input(tx: mpsc::UnboundedSender<Message>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match UserCommand::parse(line) {
                    Some(command) => {
                        if tx.send(Message::User(command)).is_err() {
                            break;
                        }
                    }
                    None => println!("Unrecognized command: {line}"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Reading console input failed: {e}");
                break;
            }
        }
    }
}

async fn render_loop(mut rx: watch::Receiver<Option<Presentation>>) {
    while rx.changed().await.is_ok() {
        let presentation = rx.borrow_and_update().clone();
        if let Some(p) = presentation {
            print_status(&p);
        }
    }
}

fn print_status(p: &Presentation) {
    let battery = match p.battery_color {
        BatteryColor::Normal => format!("{}%", p.battery_level),
        BatteryColor::Warning => format!("{}% (low)", p.battery_level),
        BatteryColor::Critical => format!("{}% (CRITICAL)", p.battery_level),
    };
    let timer_state = if p.timer_running { "running" } else { "paused" };
    let display = if p.display_enabled { "on" } else { "off" };
    let wifi = if p.wifi_connected {
        "connected"
    } else {
        "disconnected"
    };

    println!(
        "HOME {:2} - {:2} AWAY | {} ({timer_state}) | mode: {} | display: {display}",
        p.scores.home, p.scores.away, p.timer_text, p.current_mode,
    );
    println!(
        "  battery: {battery} | panel: {}V {}C | cpu: {}C | brightness: {} | wifi: {wifi} ({} clients)",
        p.panel_voltage, p.panel_temp, p.cpu_temp, p.brightness, p.connected_clients,
    );
    if p.warning_visible {
        println!("  *** TWO MINUTE WARNING ***");
    }
}
