//! # UI State Controller
//!
//! The calculator shows four surfaces: the input line, a status line, and
//! two result panels (numeric value and LaTeX). `View` is the interface the
//! orchestrator drives; `Screen` is the standard implementation holding the
//! surfaces as plain data so any host (terminal, GUI, test) can render them.
//!
//! State machine:
//! ```text
//! Idle -> Validating                      (empty input)
//! Idle -> Loading(Credential) -> Loading(Evaluation) -> Success | Error
//! any  -> Idle                            (reset)
//! ```
//! Every transition replaces the status line and both panels in full.

use crate::normalize::EvaluationResult;
use futures_util::future::BoxFuture;
use std::fmt;

pub const VALIDATION_MESSAGE: &str = "Enter an operation first.";
pub const CREDENTIAL_MESSAGE: &str = "Fetching API key...";
pub const EVALUATION_MESSAGE: &str = "Querying the model...";
pub const SUCCESS_MESSAGE: &str = "Operation evaluated successfully";
pub const COMPUTING_PLACEHOLDER: &str = "Computing...";
pub const ERROR_PLACEHOLDER: &str = "No result due to error";
pub const EMPTY_PLACEHOLDER: &str = "No result yet";

/// Visual tone of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Error,
}

/// Which request a loading run is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Credential,
    Evaluation,
}

impl Phase {
    pub fn message(&self) -> &'static str {
        match self {
            Phase::Credential => CREDENTIAL_MESSAGE,
            Phase::Evaluation => EVALUATION_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Validating,
    Loading(Phase),
    Success,
    Error,
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiState::Idle => write!(f, "idle"),
            UiState::Validating => write!(f, "validating"),
            UiState::Loading(Phase::Credential) => write!(f, "loading (credential)"),
            UiState::Loading(Phase::Evaluation) => write!(f, "loading (evaluation)"),
            UiState::Success => write!(f, "success"),
            UiState::Error => write!(f, "error"),
        }
    }
}

/// One text surface with its tone
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Surface {
    pub text: String,
    pub tone: Tone,
}

impl Surface {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Neutral)
    }
}

/// Everything the user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surfaces {
    pub input: String,
    pub status: Surface,
    pub value: Surface,
    pub latex: Surface,
}

impl Default for Surfaces {
    fn default() -> Self {
        Self {
            input: String::new(),
            status: Surface::default(),
            value: Surface::neutral(EMPTY_PLACEHOLDER),
            latex: Surface::neutral(EMPTY_PLACEHOLDER),
        }
    }
}

/// The UI operations the orchestrator depends on
pub trait View {
    fn show_validation_error(&mut self);
    fn show_loading(&mut self, phase: Phase);
    fn show_success(&mut self, result: &EvaluationResult);
    fn show_error(&mut self, message: &str);
    fn reset(&mut self);
}

/// Math typesetting collaborator (MathJax in a browser host).
///
/// `typeset` re-renders any `$$...$$` block currently on screen. The
/// returned future is spawned on the current tokio runtime, never awaited,
/// and its outcome is ignored. Without a runtime it is not started.
pub trait Typesetter: Send + Sync {
    fn typeset(&self) -> BoxFuture<'static, ()>;
}

type RenderCallback = Box<dyn Fn(&Surfaces, UiState) + Send>;

/// Standard `View`: owns the surfaces and the current `UiState`
pub struct Screen {
    surfaces: Surfaces,
    state: UiState,
    typesetter: Option<Box<dyn Typesetter>>,
    on_render: Option<RenderCallback>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            surfaces: Surfaces::default(),
            state: UiState::Idle,
            typesetter: None,
            on_render: None,
        }
    }

    /// Install a typesetter, invoked after each successful evaluation
    pub fn with_typesetter(mut self, typesetter: impl Typesetter + 'static) -> Self {
        self.typesetter = Some(Box::new(typesetter));
        self
    }

    /// Called with the new surfaces after every transition
    pub fn with_render_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Surfaces, UiState) + Send + 'static,
    {
        self.on_render = Some(Box::new(callback));
        self
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Replace the input line (what the user typed)
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.surfaces.input = input.into();
    }

    fn transition(&mut self, state: UiState) {
        tracing::debug!(from = %self.state, to = %state, "ui transition");
        self.state = state;
        if let Some(callback) = &self.on_render {
            callback(&self.surfaces, self.state);
        }
    }

    fn set_panels(&mut self, text: &str) {
        self.surfaces.value = Surface::neutral(text);
        self.surfaces.latex = Surface::neutral(text);
    }
}

impl View for Screen {
    fn show_validation_error(&mut self) {
        self.surfaces.status = Surface::new(VALIDATION_MESSAGE, Tone::Error);
        self.transition(UiState::Validating);
    }

    fn show_loading(&mut self, phase: Phase) {
        self.surfaces.status = Surface::neutral(phase.message());
        self.set_panels(COMPUTING_PLACEHOLDER);
        self.transition(UiState::Loading(phase));
    }

    fn show_success(&mut self, result: &EvaluationResult) {
        self.surfaces.status = Surface::new(SUCCESS_MESSAGE, Tone::Success);
        self.surfaces.value = Surface::neutral(result.resultado_text());
        self.surfaces.latex = Surface::neutral(format!("$${}$$", result.latex));

        if let Some(typesetter) = &self.typesetter {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(typesetter.typeset());
                }
                Err(_) => tracing::debug!("no async runtime, typesetting skipped"),
            }
        }

        self.transition(UiState::Success);
    }

    fn show_error(&mut self, message: &str) {
        self.surfaces.status = Surface::new(format!("Error: {}", message), Tone::Error);
        self.set_panels(ERROR_PLACEHOLDER);
        self.transition(UiState::Error);
    }

    fn reset(&mut self) {
        self.surfaces = Surfaces::default();
        self.transition(UiState::Idle);
    }
}
