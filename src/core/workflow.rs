//! Workflow engine for fabric item status transitions
//!
//! Items move forward through a fixed chain:
//! `REQUESTED → IN_SAMPLING → SENT → APPROVED`. `REJECTED` is a terminal
//! override reachable from any non-terminal status through an explicit reject
//! action, never through "advance".
//!
//! Moving an item to `SENT` deducts its required meters from the matching
//! inventory record on the server, so that transition must be confirmed
//! before it can be executed. [`TransitionPlan::confirm`] is the only way to
//! obtain a [`ConfirmedTransition`], which is what the gateway accepts.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::entity::Status;
use crate::core::role::Role;
use crate::entities::sample_request::FabricItem;

/// The forward chain. Terminal statuses have no next status.
pub fn next_status(status: Status) -> Option<Status> {
    match status {
        Status::Requested => Some(Status::InSampling),
        Status::InSampling => Some(Status::Sent),
        Status::Sent => Some(Status::Approved),
        Status::Approved | Status::Rejected => None,
    }
}

/// Errors that can occur while planning a status change
#[derive(Debug, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Authorization required: status changes need role ADMIN or SAMPLING_HEAD (current: {role})")]
    Unauthorized { role: String },

    #[error("No next status after {current}")]
    NoNextStatus { current: Status },

    #[error("Invalid status transition: {from} → {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("Moving {fabric_name} to SENT deducts {meters} m from inventory and must be confirmed")]
    ConfirmationRequired { fabric_name: String, meters: Decimal },

    #[error("Fabric item has no ID; save the request before changing item status")]
    MissingItemId,
}

/// Inventory deduction performed by the server when an item is sent
#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub fabric_name: String,
    pub color: String,
    pub meters: Decimal,
}

/// A validated, authorized status change that may still need confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub item_id: String,
    pub from: Status,
    pub to: Status,
    /// Present when the transition deducts stock
    pub deduction: Option<Deduction>,
}

impl TransitionPlan {
    /// Whether the user must confirm before the plan runs
    pub fn requires_confirmation(&self) -> bool {
        self.deduction.is_some()
    }

    /// Text for the confirmation step, naming fabric and quantity
    pub fn confirmation_prompt(&self) -> Option<String> {
        self.deduction.as_ref().map(|d| {
            format!(
                "Mark {} ({}) as SENT? This deducts {} m from inventory.",
                d.fabric_name, d.color, d.meters
            )
        })
    }

    /// Turn the plan into an executable transition
    ///
    /// `confirmed` is the user's answer to [`Self::confirmation_prompt`].
    /// Plans without a side effect are ready regardless.
    pub fn confirm(self, confirmed: bool) -> Result<ConfirmedTransition, WorkflowError> {
        if let Some(d) = &self.deduction {
            if !confirmed {
                return Err(WorkflowError::ConfirmationRequired {
                    fabric_name: d.fabric_name.clone(),
                    meters: d.meters,
                });
            }
        }
        Ok(ConfirmedTransition { plan: self })
    }
}

/// A transition that is authorized and, where needed, confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedTransition {
    plan: TransitionPlan,
}

impl ConfirmedTransition {
    pub fn item_id(&self) -> &str {
        &self.plan.item_id
    }

    pub fn from(&self) -> Status {
        self.plan.from
    }

    pub fn to(&self) -> Status {
        self.plan.to
    }
}

/// Workflow engine bound to the acting user's role
#[derive(Debug, Clone, Copy)]
pub struct WorkflowEngine {
    role: Option<Role>,
}

impl WorkflowEngine {
    /// Create an engine for the given actor (`None` when signed out)
    pub fn new(role: Option<Role>) -> Self {
        Self { role }
    }

    /// Check if a status transition is valid, ignoring authorization
    pub fn is_valid_transition(from: Status, to: Status) -> bool {
        Self::allowed_transitions(from).contains(&to)
    }

    /// Get allowed transitions from the current status
    pub fn allowed_transitions(current: Status) -> Vec<Status> {
        if current.is_terminal() {
            return Vec::new();
        }
        next_status(current)
            .into_iter()
            .chain(std::iter::once(Status::Rejected))
            .collect()
    }

    /// Whether the "advance" control is offered for an item in `status`
    pub fn can_show_advance(&self, status: Status) -> bool {
        self.authorize().is_ok() && next_status(status).is_some()
    }

    /// Whether the "reject" control is offered for an item in `status`
    pub fn can_show_reject(&self, status: Status) -> bool {
        self.authorize().is_ok() && !status.is_terminal()
    }

    /// Verify the actor may change statuses at all
    pub fn authorize(&self) -> Result<Role, WorkflowError> {
        match self.role {
            Some(role) if role.can_transition() => Ok(role),
            Some(role) => Err(WorkflowError::Unauthorized {
                role: role.to_string(),
            }),
            None => Err(WorkflowError::Unauthorized {
                role: "anonymous".to_string(),
            }),
        }
    }

    /// Plan the forward transition for an item
    pub fn plan_advance(&self, item: &FabricItem) -> Result<TransitionPlan, WorkflowError> {
        self.authorize()?;
        let to = next_status(item.status).ok_or(WorkflowError::NoNextStatus {
            current: item.status,
        })?;
        self.plan(item, to)
    }

    /// Plan the administrative rejection of an item
    pub fn plan_reject(&self, item: &FabricItem) -> Result<TransitionPlan, WorkflowError> {
        self.plan(item, Status::Rejected)
    }

    /// Plan a transition of `item` to `to`
    pub fn plan(&self, item: &FabricItem, to: Status) -> Result<TransitionPlan, WorkflowError> {
        self.authorize()?;

        let from = item.status;
        if !Self::is_valid_transition(from, to) {
            return Err(WorkflowError::InvalidTransition { from, to });
        }

        let item_id = item.id.clone().ok_or(WorkflowError::MissingItemId)?;

        let deduction = (to == Status::Sent).then(|| Deduction {
            fabric_name: item.fabric_name.clone(),
            color: item.color.clone(),
            meters: item.required_meters,
        });

        tracing::debug!(item = %item_id, %from, %to, confirm = deduction.is_some(), "planned transition");

        Ok(TransitionPlan {
            item_id,
            from,
            to,
            deduction,
        })
    }
}
