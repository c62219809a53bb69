//! Packet creation: raw form input, validation, fee preview and the
//! submit / confirm lifecycle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::format;
use crate::tx::TxState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Share count must be between 1 and 100")]
    InvalidCount,

    #[error("Expiry must be between 1 and 168 hours")]
    InvalidDuration,

    #[error("Message must be at most 100 characters")]
    MessageTooLong,
}

/// Form fields exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePacketForm {
    pub amount: String,
    pub count: String,
    pub duration: String,
    pub message: String,
    pub is_random: bool,
}

impl Default for CreatePacketForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            count: DEFAULT_SHARES.into(),
            duration: DEFAULT_DURATION_HOURS.into(),
            message: String::new(),
            is_random: true,
        }
    }
}

/// Arguments of the program's create instruction, with the deposit in lamports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePacketRequest {
    pub count: u32,
    pub duration_seconds: u64,
    pub message: String,
    pub is_random: bool,
    pub lamports: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeePreview {
    pub total: f64,
    pub after_fee: f64,
    pub count: u32,
    pub per_share: Option<f64>,
    pub total_display: String,
    pub after_fee_display: String,
    pub per_share_display: Option<String>,
}

impl CreatePacketForm {
    /// Build a form from action query parameters; missing fields keep their defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut form = Self::default();
        if let Some(amount) = params.get("amount") {
            form.amount = amount.clone();
        }
        if let Some(count) = params.get("count") {
            form.count = count.clone();
        }
        if let Some(duration) = params.get("duration") {
            form.duration = duration.clone();
        }
        if let Some(message) = params.get("message") {
            form.message = message.clone();
        }
        if let Some(is_random) = params.get("is_random") {
            form.is_random = matches!(is_random.trim(), "true" | "1" | "random");
        }
        form
    }

    fn parse_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
    }

    fn parse_count(&self) -> Option<u32> {
        self.count.trim().parse().ok()
    }

    pub fn validate(&self) -> Result<CreatePacketRequest, ValidationError> {
        let amount = self
            .parse_amount()
            .filter(|a| *a > 0.0)
            .ok_or(ValidationError::InvalidAmount)?;
        let lamports = format::sol_to_lamports(amount)
            .filter(|l| *l > 0)
            .ok_or(ValidationError::InvalidAmount)?;

        let count = self
            .parse_count()
            .filter(|c| (MIN_SHARES..=MAX_SHARES).contains(c))
            .ok_or(ValidationError::InvalidCount)?;

        let hours: u64 = self
            .duration
            .trim()
            .parse()
            .ok()
            .filter(|h| (MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(h))
            .ok_or(ValidationError::InvalidDuration)?;

        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong);
        }

        Ok(CreatePacketRequest {
            count,
            duration_seconds: hours * SECONDS_PER_HOUR,
            message: self.message.clone(),
            is_random: self.is_random,
            lamports,
        })
    }

    /// Live preview; `None` until both amount and count hold numbers.
    pub fn preview(&self) -> Option<FeePreview> {
        let total = self.parse_amount()?;
        let count = self.parse_count().filter(|c| *c > 0)?;

        let ratio = (FEE_DENOMINATOR - PREVIEW_FEE_BPS) as f64 / FEE_DENOMINATOR as f64;
        let after_fee = total * ratio;
        let per_share = (!self.is_random).then(|| after_fee / count as f64);

        Some(FeePreview {
            total,
            after_fee,
            count,
            per_share,
            total_display: self.amount.trim().to_string(),
            after_fee_display: format!("{after_fee:.4}"),
            per_share_display: per_share.map(|s| format!("{s:.6}")),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Create,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("A create request is already waiting for the wallet")]
    Busy,
}

/// Create-form lifecycle: Idle -> Pending -> Confirmed | Failed.
///
/// Invalid input never leaves Idle. A confirmation resets the form, switches
/// to the list view and fires the completion callback once.
pub struct CreateFlow {
    pub form: CreatePacketForm,
    pub state: TxState,
    pub view: View,
    on_success: Option<Box<dyn FnMut() + Send>>,
}

impl CreateFlow {
    pub fn new(form: CreatePacketForm) -> Self {
        Self {
            form,
            state: TxState::Idle,
            view: View::Create,
            on_success: None,
        }
    }

    pub fn on_success(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// The submit control is disabled while a request is pending.
    pub fn can_submit(&self) -> bool {
        !self.state.is_pending()
    }

    pub fn submit(&mut self) -> Result<CreatePacketRequest, SubmitError> {
        if !self.can_submit() {
            return Err(SubmitError::Busy);
        }
        let request = self.form.validate()?;
        self.state = TxState::Pending;
        Ok(request)
    }

    pub fn on_confirmed(&mut self) {
        if !self.state.is_pending() {
            return;
        }
        self.state = TxState::Confirmed;
        self.form.reset();
        self.view = View::List;
        if let Some(callback) = self.on_success.as_mut() {
            callback();
        }
    }

    /// Wallet rejection or revert: keep the input, re-enable the control.
    pub fn on_failed(&mut self, message: impl Into<String>) {
        self.state = TxState::Failed(message.into());
    }
}
