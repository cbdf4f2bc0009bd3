use std::{
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
};

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, TrySendError},
};
use embassy_time::{Instant, Timer};
use leitura_core::feedback::Feedback;
use log::{debug, info, warn};
use rodio::{Decoder, OutputStream, PlayError, Sink, StreamError, decoder::DecoderError};

pub const PLAYBACK_QUEUE_DEPTH: usize = 4;
const SINK_POLL_MS: u64 = 20;

/// Short chime bundled with the binary, used when no asset path is given.
pub static DEFAULT_SOUND: &[u8] = include_bytes!("../../assets/sound.wav");

pub type PlaybackQueue = Channel<CriticalSectionRawMutex, PlaybackRequest, PLAYBACK_QUEUE_DEPTH>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlaybackRequest {
    pub requested_at_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("failed to read sound asset {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to decode sound asset: {0}")]
    Decode(#[from] DecoderError),
    #[error("no audio output: {0}")]
    Device(#[from] StreamError),
    #[error("audio output rejected the sink: {0}")]
    Sink(#[from] PlayError),
}

pub type Clip = Decoder<Cursor<Vec<u8>>>;

/// Where the shake sound comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SoundAsset {
    Embedded,
    /// Read on every request, so edits to the file apply without a restart.
    File(PathBuf),
}

impl SoundAsset {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Embedded, Self::File)
    }

    pub fn load(&self) -> Result<Clip, PlaybackError> {
        match self {
            Self::Embedded => decode_clip(DEFAULT_SOUND.to_vec()),
            Self::File(path) => load_clip(path),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Embedded => "embedded".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn decode_clip(bytes: Vec<u8>) -> Result<Clip, PlaybackError> {
    Ok(Decoder::new(Cursor::new(bytes))?)
}

pub fn load_clip(path: &Path) -> Result<Clip, PlaybackError> {
    let bytes = fs::read(path).map_err(|source| PlaybackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_clip(bytes)
}

/// Default output device and the sink clips are appended to. The stream
/// must outlive the sink.
struct AudioOutput {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioOutput {
    fn open() -> Result<Self, PlaybackError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        Ok(Self {
            _stream: stream,
            sink,
        })
    }
}

/// Sound playback worker. Plays one queued request at a time, each to
/// completion.
pub async fn run_playback(queue: &'static PlaybackQueue, asset: SoundAsset) -> ! {
    let output = match AudioOutput::open() {
        Ok(output) => {
            info!("sound: playback worker ready asset={}", asset.describe());
            Some(output)
        }
        Err(err) => {
            warn!("sound: {}; shakes will only vibrate", err);
            None
        }
    };

    loop {
        let request = queue.receive().await;
        let Some(output) = output.as_ref() else {
            debug!("sound: no output, skipped request");
            continue;
        };

        match asset.load() {
            Ok(clip) => {
                let waited_ms = Instant::now().as_millis().saturating_sub(request.requested_at_ms);
                info!("sound: play asset={} queued_ms={}", asset.describe(), waited_ms);
                output.sink.append(clip);
                while !output.sink.empty() {
                    Timer::after_millis(SINK_POLL_MS).await;
                }
            }
            Err(err) => warn!("sound: {}", err),
        }
    }
}

/// Feedback that queues sound playback and logs vibration pulses.
#[derive(Debug)]
pub struct HostFeedback {
    queue: &'static PlaybackQueue,
    pulses: u32,
    dropped: u32,
}

impl HostFeedback {
    pub const fn new(queue: &'static PlaybackQueue) -> Self {
        Self {
            queue,
            pulses: 0,
            dropped: 0,
        }
    }

    pub const fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Playback requests dropped because the queue was full.
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Feedback for HostFeedback {
    fn trigger(&mut self) {
        let request = PlaybackRequest {
            requested_at_ms: Instant::now().as_millis(),
        };
        if let Err(TrySendError::Full(_)) = self.queue.try_send(request) {
            self.dropped = self.dropped.saturating_add(1);
            debug!("sound: queue full, dropped={}", self.dropped);
        }
        self.vibrate();
    }

    fn vibrate(&mut self) {
        self.pulses = self.pulses.saturating_add(1);
        info!("vibration: pulse #{}", self.pulses);
    }
}
