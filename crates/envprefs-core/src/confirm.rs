// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Confirmation dialog as a request/response exchange.
//!
//! Each request gets a [`ConfirmToken`]. Exactly one [`ConfirmOutcome`] is ever
//! produced per token: by confirm, by cancel, or by being superseded when a new
//! request opens while it is still pending (superseded requests count as
//! cancelled).

use thiserror::Error;

/// Correlation token identifying one confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfirmToken(pub u64);

/// Caller-provided dialog text; `None` fields use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmOptions {
    /// Body text.
    pub message: String,
    /// Dialog title (default `Confirm`).
    pub title: Option<String>,
    /// Confirm button label (default `OK`).
    pub confirm_label: Option<String>,
    /// Cancel button label (default `Cancel`).
    pub cancel_label: Option<String>,
}

impl ConfirmOptions {
    /// Options with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// The dialog currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    /// Request this dialog answers.
    pub token: ConfirmToken,
    /// Title line.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Confirm button label.
    pub confirm_label: String,
    /// Cancel button label.
    pub cancel_label: String,
}

/// Resolution of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmOutcome {
    /// Request that was resolved.
    pub token: ConfirmToken,
    /// True if the user confirmed.
    pub confirmed: bool,
}

/// Result of [`ConfirmationModal::confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opened {
    /// Token of the new request.
    pub token: ConfirmToken,
    /// Cancellation of the request that was pending, if any.
    pub superseded: Option<ConfirmOutcome>,
}

/// Error for responses that do not match the open request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmError {
    /// No dialog is open.
    #[error("no confirmation pending")]
    NoPending,
    /// Token does not belong to the open dialog (already resolved or superseded).
    #[error("stale confirmation token {0:?}")]
    StaleToken(ConfirmToken),
}

/// Single-slot confirmation dialog state.
#[derive(Debug, Default)]
pub struct ConfirmationModal {
    current: Option<ConfirmDialog>,
    next_token: u64,
}

impl ConfirmationModal {
    /// Create a closed modal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a dialog for `options`.
    pub fn confirm(&mut self, options: ConfirmOptions) -> Opened {
        self.next_token += 1;
        let token = ConfirmToken(self.next_token);
        let superseded = self.current.take().map(|d| ConfirmOutcome {
            token: d.token,
            confirmed: false,
        });
        self.current = Some(ConfirmDialog {
            token,
            title: options.title.unwrap_or_else(|| "Confirm".into()),
            message: options.message,
            confirm_label: options.confirm_label.unwrap_or_else(|| "OK".into()),
            cancel_label: options.cancel_label.unwrap_or_else(|| "Cancel".into()),
        });
        Opened { token, superseded }
    }

    /// Whether a dialog is open.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// The open dialog, if any.
    pub fn dialog(&self) -> Option<&ConfirmDialog> {
        self.current.as_ref()
    }

    /// Resolve the open dialog as confirmed.
    pub fn handle_confirm(&mut self) -> Option<ConfirmOutcome> {
        self.resolve(true)
    }

    /// Resolve the open dialog as cancelled.
    pub fn handle_cancel(&mut self) -> Option<ConfirmOutcome> {
        self.resolve(false)
    }

    /// Resolve the request identified by `token`.
    pub fn respond(
        &mut self,
        token: ConfirmToken,
        confirmed: bool,
    ) -> Result<ConfirmOutcome, ConfirmError> {
        match self.current.as_ref().map(|d| d.token) {
            None => Err(ConfirmError::NoPending),
            Some(open) if open != token => Err(ConfirmError::StaleToken(token)),
            Some(_) => self.resolve(confirmed).ok_or(ConfirmError::NoPending),
        }
    }

    fn resolve(&mut self, confirmed: bool) -> Option<ConfirmOutcome> {
        self.current.take().map(|d| ConfirmOutcome {
            token: d.token,
            confirmed,
        })
    }
}
