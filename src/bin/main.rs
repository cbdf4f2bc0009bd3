use std::path::PathBuf;

use clap::Parser;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_sync::channel::Channel;
use embassy_time::{Instant, Timer};
use env_logger::{Builder, Env};
use leitura_core::{
    app::ReaderApp,
    motion::{SAMPLE_INTERVAL_MS, SHAKE_THRESHOLD_G},
    session::{ReadingSession, SessionConfig, Speed, TickResult},
};
use leitura_hal_host::{
    feedback::playback::{HostFeedback, PlaybackQueue, SoundAsset, run_playback},
    input::terminal::TerminalInput,
    lifecycle::{self, LoopControl},
    motion::simulated::{SimulatedAccelerometer, load_script},
    render::terminal::TerminalRenderer,
    storage::file_store::FileKvStore,
};
use log::{info, warn};

use pace_report::PaceReport;

#[path = "main/pace_report.rs"]
mod pace_report;

const UI_POLL_MS: u64 = 10;
const DEFAULT_DATA_DIR: &str = ".leitura";

static PLAYBACK: PlaybackQueue = Channel::new();

type HostApp =
    ReaderApp<TerminalInput, SimulatedAccelerometer, HostFeedback, Option<FileKvStore>>;

/// Paced word-by-word reader for the terminal.
#[derive(Debug, Parser)]
#[command(name = "leitura", version)]
struct Cli {
    /// Directory holding the saved reading session.
    #[arg(long, env = "LEITURA_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Sound played on shake (WAV, MP3 or Ogg Vorbis). Defaults to the
    /// bundled chime.
    #[arg(long, env = "LEITURA_SOUND")]
    sound: Option<PathBuf>,

    /// Accelerometer samples (`x,y,z` per line) replayed while reading.
    #[arg(long, env = "LEITURA_ACCEL_SCRIPT")]
    accel_script: Option<PathBuf>,

    /// Speed used until a saved session is restored (0.5 to 3.0).
    #[arg(long, env = "LEITURA_SPEED", default_value_t = 1.0)]
    speed: f32,

    /// Acceleration magnitude, in g, that counts as a shake.
    #[arg(long, env = "LEITURA_SHAKE_THRESHOLD", default_value_t = SHAKE_THRESHOLD_G)]
    shake_threshold: f32,

    /// Accelerometer sampling interval while reading.
    #[arg(long, env = "LEITURA_SAMPLE_INTERVAL_MS", default_value_t = SAMPLE_INTERVAL_MS)]
    sample_interval_ms: u32,
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let store = match FileKvStore::open(&cli.data_dir) {
        Ok(store) => Some(store),
        Err(err) => {
            warn!("storage: {}; session will not be saved", err);
            None
        }
    };

    let sensor = match cli.accel_script.as_deref() {
        Some(path) => match load_script(path) {
            Ok(script) => {
                info!("accel: script samples={} path={}", script.len(), path.display());
                SimulatedAccelerometer::with_script(script)
            }
            Err(err) => {
                warn!("accel: {}; using resting sensor", err);
                SimulatedAccelerometer::resting()
            }
        },
        None => SimulatedAccelerometer::resting(),
    };
    let shakes = sensor.shake_handle();

    let input = match TerminalInput::spawn() {
        Ok(input) => input,
        Err(err) => {
            warn!("terminal: failed to start stdin reader: {}", err);
            return;
        }
    };

    let config = SessionConfig::default()
        .with_initial_speed(Speed::from_f32(cli.speed))
        .with_shake_threshold_g(cli.shake_threshold)
        .with_sample_interval_ms(cli.sample_interval_ms);
    let session = ReadingSession::new(sensor, HostFeedback::new(&PLAYBACK), store, config);
    let mut app: HostApp = ReaderApp::new(input, session);
    let restored = app.restore();

    info!(
        "Reader started: speed={} restored={} shake_threshold_g={} sample_interval_ms={}",
        app.session().speed(),
        restored,
        cli.shake_threshold,
        cli.sample_interval_ms
    );
    info!(
        "Commands: text <..> | append <..> | speed <v> | + | - | <enter> | clear | ok | bg | back | shake | quit"
    );

    let mut renderer = TerminalRenderer::stdout();
    let mut pace = PaceReport::new();
    let loop_start = Instant::now();

    let ui_future = async {
        loop {
            let now_ms = loop_start.elapsed().as_millis();
            let app_requests_render = app.tick(now_ms) == TickResult::RenderRequested;

            let mut control = LoopControl::Continue;
            while let Some(signal) = app.input_mut().take_signal() {
                control = lifecycle::handle_signal(&mut app, &shakes, signal);
                if control == LoopControl::Quit {
                    break;
                }
            }
            if control == LoopControl::Quit {
                break;
            }

            if app_requests_render {
                app.with_screen(|screen| {
                    if let Err(err) = renderer.render(screen) {
                        warn!("display: write failed: {}", err);
                    }
                });
            }

            pace.observe(app.drain_word_updates());

            Timer::after_millis(UI_POLL_MS).await;
        }
    };
    let playback_future = run_playback(&PLAYBACK, SoundAsset::from_path(cli.sound.clone()));

    match select(ui_future, playback_future).await {
        Either::First(()) => {}
        Either::Second(never) => match never {},
    }

    app.shutdown();
    info!("Reader stopped");
}
