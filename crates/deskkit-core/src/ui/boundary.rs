//! Render error boundary with panic recovery
//!
//! Wraps a render in [`catch_unwind`] so a panicking custom component shows
//! the recovery screen instead of taking the host down. The captured error is
//! reported through [`Diagnostics`] once per failure.

use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::{DateTime, Utc};

use super::fallback::recovery_screen;
use super::node::Node;
use crate::diagnostics::{Diagnostics, Level};

/// Error captured by the boundary
#[derive(Debug, Clone)]
pub struct CapturedError {
    pub message: String,
    pub panicked: bool,
    pub captured_at: DateTime<Utc>,
}

impl CapturedError {
    fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self {
            message,
            panicked: true,
            captured_at: Utc::now(),
        }
    }

    fn from_error(err: &crate::Error) -> Self {
        Self {
            message: err.to_string(),
            panicked: false,
            captured_at: Utc::now(),
        }
    }
}

/// Boundary state
#[derive(Debug, Clone, Default)]
pub enum BoundaryState {
    #[default]
    Healthy,
    Failed(CapturedError),
}

impl BoundaryState {
    pub fn error(&self) -> Option<&CapturedError> {
        match self {
            Self::Healthy => None,
            Self::Failed(e) => Some(e),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Catches failed renders and shows the recovery screen
#[derive(Debug, Default)]
pub struct ErrorBoundary {
    state: BoundaryState,
    fallback: Option<Node>,
    show_detail: bool,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self {
            state: BoundaryState::Healthy,
            fallback: None,
            show_detail: cfg!(debug_assertions),
        }
    }

    /// Use a custom node instead of the recovery screen
    pub fn with_fallback(mut self, fallback: Node) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    /// Back to healthy. The next render runs the wrapped closure again.
    pub fn reset(&mut self) {
        if self.state.is_failed() {
            tracing::info!("error boundary reset");
        }
        self.state = BoundaryState::Healthy;
    }

    /// Run `render`, falling back to the recovery screen on error or panic
    ///
    /// While failed the closure is not called again until [`reset`].
    ///
    /// [`reset`]: ErrorBoundary::reset
    pub fn render<F>(&mut self, diagnostics: &Diagnostics, render: F) -> Node
    where
        F: FnOnce() -> crate::Result<Node>,
    {
        if let BoundaryState::Failed(err) = &self.state {
            return self.fallback_node(err);
        }

        let captured = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(node)) => return node,
            Ok(Err(err)) => {
                diagnostics.capture_error(&err);
                CapturedError::from_error(&err)
            }
            Err(payload) => {
                let captured = CapturedError::from_panic(payload);
                diagnostics.capture_message(&captured.message, Level::Error);
                captured
            }
        };

        tracing::error!(
            panicked = captured.panicked,
            message = %captured.message,
            "render failed, showing recovery screen"
        );
        let node = self.fallback_node(&captured);
        self.state = BoundaryState::Failed(captured);
        node
    }

    fn fallback_node(&self, err: &CapturedError) -> Node {
        if let Some(fallback) = &self.fallback {
            return fallback.clone();
        }
        let detail = self.show_detail.then(|| {
            format!(
                "{}{}",
                err.message,
                if err.panicked { " (panic)" } else { "" }
            )
        });
        recovery_screen(Some(&err.message), detail.as_deref())
    }
}
