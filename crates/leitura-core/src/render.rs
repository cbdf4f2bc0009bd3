//! Screen view model for the single reading screen.

use crate::session::Speed;

pub const START_LABEL: &str = "Leitura";
pub const PAUSE_LABEL: &str = "Pausar Leitura";
pub const CLEAR_LABEL: &str = "Limpar";
pub const TEXT_PLACEHOLDER: &str = "Cole seu texto aqui...";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Progress {
    pub revealed: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Screen<'a> {
    /// Current text; empty means the placeholder should show.
    pub text: &'a str,
    pub placeholder: &'static str,
    pub text_editable: bool,
    pub speed: Speed,
    pub speed_enabled: bool,
    pub primary: ButtonView,
    pub clear: ButtonView,
    /// `None` outside of a reading run.
    pub progress: Option<Progress>,
    pub alert: Option<&'static str>,
}
