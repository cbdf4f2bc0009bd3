use std::{
    collections::VecDeque,
    convert::Infallible,
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use leitura_core::{
    input::{Intent, IntentProvider},
    session::Speed,
};
use log::{debug, warn};

/// Platform events that bypass the reading screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlatformSignal {
    /// App moved to the background.
    Background,
    /// Hardware back button.
    Back,
    /// Inject one above-threshold accelerometer sample.
    Shake,
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Intent(Intent),
    Signal(PlatformSignal),
    Unknown(String),
}

/// Maps one terminal line to a command.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(' ') {
        Some((head, rest)) => (head, rest),
        None => (trimmed, ""),
    };

    match head {
        "" | "go" | "toggle" | "pause" => Command::Intent(Intent::ToggleReading),
        "text" => Command::Intent(Intent::EditText(rest.to_string())),
        "append" => Command::Intent(Intent::AppendText(rest.to_string())),
        "speed" => match rest.trim().replace(',', ".").parse::<f32>() {
            Ok(value) => Command::Intent(Intent::SetSpeed(Speed::from_f32(value))),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
        "+" => Command::Intent(Intent::SpeedUp),
        "-" => Command::Intent(Intent::SpeedDown),
        "clear" => Command::Intent(Intent::Clear),
        "ok" => Command::Intent(Intent::DismissAlert),
        "bg" => Command::Signal(PlatformSignal::Background),
        "back" => Command::Signal(PlatformSignal::Back),
        "shake" => Command::Signal(PlatformSignal::Shake),
        "quit" | "q" => Command::Signal(PlatformSignal::Quit),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Line-oriented terminal input.
///
/// A reader thread forwards raw stdin lines; parsing happens on the caller's
/// thread inside [`IntentProvider::poll_intent`]. End of input becomes a
/// [`PlatformSignal::Quit`].
#[derive(Debug)]
pub struct TerminalInput {
    lines: Receiver<String>,
    signals: VecDeque<PlatformSignal>,
    closed: bool,
}

impl TerminalInput {
    /// Starts the stdin reader thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self::from_receiver(rx))
    }

    pub fn from_receiver(lines: Receiver<String>) -> Self {
        Self {
            lines,
            signals: VecDeque::new(),
            closed: false,
        }
    }

    /// Next platform signal collected while polling for intents.
    pub fn take_signal(&mut self) -> Option<PlatformSignal> {
        self.signals.pop_front()
    }
}

impl IntentProvider for TerminalInput {
    type Error = Infallible;

    fn poll_intent(&mut self) -> Result<Option<Intent>, Self::Error> {
        loop {
            let line = match self.lines.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        self.closed = true;
                        debug!("terminal: input closed");
                        self.signals.push_back(PlatformSignal::Quit);
                    }
                    return Ok(None);
                }
            };

            match parse_command(&line) {
                Command::Intent(intent) => return Ok(Some(intent)),
                Command::Signal(signal) => self.signals.push_back(signal),
                Command::Unknown(text) => warn!("terminal: unknown command {:?}", text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(line: &str) -> Intent {
        match parse_command(line) {
            Command::Intent(intent) => intent,
            other => panic!("expected intent for {line:?}, got {other:?}"),
        }
    }

    fn signal(line: &str) -> PlatformSignal {
        match parse_command(line) {
            Command::Signal(signal) => signal,
            other => panic!("expected signal for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn text_commands_keep_inner_spacing() {
        assert_eq!(
            intent("text  ola   mundo"),
            Intent::EditText(" ola   mundo".to_string())
        );
        assert_eq!(intent("text"), Intent::EditText(String::new()));
        assert_eq!(
            intent("append mais palavras\r\n"),
            Intent::AppendText("mais palavras".to_string())
        );
    }

    #[test]
    fn speed_commands_round_and_clamp() {
        assert_eq!(intent("speed 1.5"), Intent::SetSpeed(Speed::from_tenths(15)));
        assert_eq!(intent("speed 2,04"), Intent::SetSpeed(Speed::from_tenths(20)));
        assert_eq!(intent("speed 9"), Intent::SetSpeed(Speed::MAX));
        assert_eq!(intent("+"), Intent::SpeedUp);
        assert_eq!(intent("-"), Intent::SpeedDown);
        assert_eq!(
            parse_command("speed fast"),
            Command::Unknown("speed fast".to_string())
        );
    }

    #[test]
    fn button_commands() {
        for line in ["", "   ", "go", "toggle", "pause"] {
            assert_eq!(intent(line), Intent::ToggleReading);
        }
        assert_eq!(intent("clear"), Intent::Clear);
        assert_eq!(intent("ok"), Intent::DismissAlert);
    }

    #[test]
    fn platform_signals() {
        assert_eq!(signal("bg"), PlatformSignal::Background);
        assert_eq!(signal("back"), PlatformSignal::Back);
        assert_eq!(signal("shake"), PlatformSignal::Shake);
        assert_eq!(signal("quit"), PlatformSignal::Quit);
        assert_eq!(signal("q"), PlatformSignal::Quit);
        assert_eq!(parse_command("dance"), Command::Unknown("dance".to_string()));
    }

    #[test]
    fn signals_are_collected_while_polling_intents() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput::from_receiver(rx);
        for line in ["bg", "nonsense", "text a b", "shake"] {
            tx.send(line.to_string()).unwrap();
        }

        assert_eq!(
            input.poll_intent().unwrap(),
            Some(Intent::EditText("a b".to_string()))
        );
        assert_eq!(input.take_signal(), Some(PlatformSignal::Background));
        assert_eq!(input.poll_intent().unwrap(), None);
        assert_eq!(input.take_signal(), Some(PlatformSignal::Shake));
        assert_eq!(input.take_signal(), None);
    }

    #[test]
    fn end_of_input_quits_once() {
        let (tx, rx) = mpsc::channel::<String>();
        let mut input = TerminalInput::from_receiver(rx);
        drop(tx);

        assert_eq!(input.poll_intent().unwrap(), None);
        assert_eq!(input.poll_intent().unwrap(), None);
        assert_eq!(input.take_signal(), Some(PlatformSignal::Quit));
        assert_eq!(input.take_signal(), None);
    }
}
