use std::{
    fmt::Write as _,
    io::{self, Write},
};

use leitura_core::{
    render::{ButtonView, Screen},
    text_policy::{progress_label, speed_label},
};

const RULE: &str = "----------------------------------------";

/// Draws the reading screen as a block of text lines.
///
/// Identical consecutive frames are written once.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    last_frame: String,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: String::new(),
        }
    }

    /// Returns whether anything was written.
    pub fn render(&mut self, screen: Screen<'_>) -> io::Result<bool> {
        let frame = compose_frame(&screen);
        if frame == self.last_frame {
            return Ok(false);
        }

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.last_frame = frame;
        Ok(true)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn button(view: ButtonView) -> String {
    if view.enabled {
        format!("[ {} ]", view.label)
    } else {
        format!("( {} )", view.label)
    }
}

pub fn compose_frame(screen: &Screen<'_>) -> String {
    let mut frame = String::new();
    let _ = writeln!(frame, "{RULE}");

    if screen.text.is_empty() {
        let _ = writeln!(frame, "  {}", screen.placeholder);
    } else {
        let _ = writeln!(frame, "  {}", screen.text);
    }
    if !screen.text_editable {
        let _ = writeln!(frame, "  (texto bloqueado)");
    }

    let speed = speed_label(screen.speed);
    if screen.speed_enabled {
        let _ = writeln!(frame, "  {speed}  [-] [+]");
    } else {
        let _ = writeln!(frame, "  {speed}");
    }

    let _ = write!(frame, "  {}  {}", button(screen.primary), button(screen.clear));
    if let Some(progress) = screen.progress {
        let _ = write!(
            frame,
            "  {}",
            progress_label(progress.revealed, progress.total)
        );
    }
    let _ = writeln!(frame);

    if let Some(alert) = screen.alert {
        let _ = writeln!(frame, "  ! {alert}  [ok]");
    }
    frame
}
