//! Projection of backend statuses onto the closing workflow shown to users.
//!
//! The backend owns the transaction state machine. This module only reads a
//! status and answers display questions about it:
//!
//! - which of the eight workflow steps it corresponds to ([`step_of`]),
//! - how each step of the progress bar should render ([`step_states`]),
//! - which badge to show in lists ([`transaction_badge`], [`offer_badge`]),
//! - whether a given role has something to do ([`needs_buyer_action`],
//!   [`needs_seller_action`], [`needs_admin_action`]).
//!
//! Step classification and badge classification are separate tables on
//! purpose: badges are finer grained (`DEPOSIT_RECEIVED` and `IN_REVIEW` both
//! show "Needs Review" while sitting on different steps).
//!
//! Every function here is total. Unrecognised statuses fall back to the first
//! step rather than failing, so new server-side statuses render as "just
//! started" until the client learns them.

use std::fmt;

use super::{Offer, OfferStatus, Transaction, TransactionStatus};

/// Number of steps on the closing workflow.
pub const STEP_COUNT: usize = 8;

/// One step of the closing workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkflowStep {
    TermsAgreement,
    AwaitingDeposit,
    DepositReceived,
    InReview,
    Approved,
    AwaitingFinal,
    PaymentReceived,
    Completed,
}

/// The workflow in display order.
pub const WORKFLOW: [WorkflowStep; STEP_COUNT] = [
    WorkflowStep::TermsAgreement,
    WorkflowStep::AwaitingDeposit,
    WorkflowStep::DepositReceived,
    WorkflowStep::InReview,
    WorkflowStep::Approved,
    WorkflowStep::AwaitingFinal,
    WorkflowStep::PaymentReceived,
    WorkflowStep::Completed,
];

impl WorkflowStep {
    /// Stable identifier, e.g. `awaiting-final`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            WorkflowStep::TermsAgreement => "terms-agreement",
            WorkflowStep::AwaitingDeposit => "awaiting-deposit",
            WorkflowStep::DepositReceived => "deposit-received",
            WorkflowStep::InReview => "in-review",
            WorkflowStep::Approved => "approved",
            WorkflowStep::AwaitingFinal => "awaiting-final",
            WorkflowStep::PaymentReceived => "payment-received",
            WorkflowStep::Completed => "completed",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            WorkflowStep::TermsAgreement => "Terms Agreement",
            WorkflowStep::AwaitingDeposit => "Awaiting Deposit",
            WorkflowStep::DepositReceived => "Deposit Received",
            WorkflowStep::InReview => "In Review",
            WorkflowStep::Approved => "Approved",
            WorkflowStep::AwaitingFinal => "Awaiting Final Payment",
            WorkflowStep::PaymentReceived => "Payment Received",
            WorkflowStep::Completed => "Completed",
        }
    }

    /// Look a step up by its identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        WORKFLOW.iter().copied().find(|step| step.id() == id)
    }

    /// Zero-based position in [`WORKFLOW`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The happy-path status that sits on this step.
    #[must_use]
    pub fn status(self) -> TransactionStatus {
        match self {
            WorkflowStep::TermsAgreement => TransactionStatus::TermsPending,
            WorkflowStep::AwaitingDeposit => TransactionStatus::AwaitingDeposit,
            WorkflowStep::DepositReceived => TransactionStatus::DepositReceived,
            WorkflowStep::InReview => TransactionStatus::InReview,
            WorkflowStep::Approved => TransactionStatus::Approved,
            WorkflowStep::AwaitingFinal => TransactionStatus::AwaitingFinalPayment,
            WorkflowStep::PaymentReceived => TransactionStatus::PaymentReceived,
            WorkflowStep::Completed => TransactionStatus::Completed,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Why progress stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Cancelled,
    Disputed,
}

impl Halt {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Halt::Cancelled => "cancelled",
            Halt::Disputed => "disputed",
        }
    }
}

/// Where a transaction sits on the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPosition {
    /// Progressing normally on the given step.
    Active(WorkflowStep),
    /// Stopped by cancellation or dispute at the given step.
    Halted { halt: Halt, at: WorkflowStep },
}

impl StepPosition {
    /// The step the position points at, halted or not.
    #[must_use]
    pub const fn step(self) -> WorkflowStep {
        match self {
            StepPosition::Active(step) | StepPosition::Halted { at: step, .. } => step,
        }
    }

    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, StepPosition::Halted { .. })
    }
}

/// Render state of a single progress-bar step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Current,
    Pending,
    Error,
}

impl StepState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StepState::Completed => "completed",
            StepState::Current => "current",
            StepState::Pending => "pending",
            StepState::Error => "error",
        }
    }
}

/// Map a status to its workflow step.
///
/// Cancelled and disputed statuses carry no position of their own and land on
/// the first step; use [`position_of`] with a hint to place them precisely.
/// Unrecognised statuses also land on the first step.
#[must_use]
pub fn step_of(status: &TransactionStatus) -> WorkflowStep {
    position_of(status, None).step()
}

/// Map a status to a workflow position.
///
/// `halted_at` places cancelled/disputed transactions; it is ignored for any
/// other status.
#[must_use]
pub fn position_of(status: &TransactionStatus, halted_at: Option<WorkflowStep>) -> StepPosition {
    let step = match status {
        TransactionStatus::TermsPending => WorkflowStep::TermsAgreement,
        TransactionStatus::AwaitingDeposit => WorkflowStep::AwaitingDeposit,
        TransactionStatus::DepositReceived => WorkflowStep::DepositReceived,
        TransactionStatus::InReview => WorkflowStep::InReview,
        TransactionStatus::Approved => WorkflowStep::Approved,
        TransactionStatus::AwaitingFinalPayment => WorkflowStep::AwaitingFinal,
        TransactionStatus::PaymentReceived => WorkflowStep::PaymentReceived,
        TransactionStatus::Completed => WorkflowStep::Completed,
        TransactionStatus::Cancelled => {
            return StepPosition::Halted {
                halt: Halt::Cancelled,
                at: halted_at.unwrap_or(WorkflowStep::TermsAgreement),
            }
        }
        TransactionStatus::Disputed => {
            return StepPosition::Halted {
                halt: Halt::Disputed,
                at: halted_at.unwrap_or(WorkflowStep::TermsAgreement),
            }
        }
        TransactionStatus::Unknown(_) => WorkflowStep::TermsAgreement,
    };
    StepPosition::Active(step)
}

/// Workflow position of a transaction, using its own flags to place halts.
#[must_use]
pub fn position_of_transaction(txn: &Transaction) -> StepPosition {
    position_of(&txn.status, Some(txn.furthest_evidenced_step()))
}

/// Zero-based index of `step` in [`WORKFLOW`].
#[must_use]
pub fn step_index(step: WorkflowStep) -> usize {
    WORKFLOW
        .iter()
        .position(|candidate| *candidate == step)
        .unwrap_or(0)
}

/// Progress-bar states for a bare status.
#[must_use]
pub fn step_states(status: &TransactionStatus) -> [StepState; STEP_COUNT] {
    states_at(position_of(status, None))
}

/// Progress-bar states for a position.
///
/// Normal progress marks earlier steps completed, the current one current and
/// the rest pending. A halted position marks everything up to and including
/// the halt point as error and the rest pending.
#[must_use]
pub fn states_at(position: StepPosition) -> [StepState; STEP_COUNT] {
    let current = step_index(position.step());
    let mut states = [StepState::Pending; STEP_COUNT];
    for (index, state) in states.iter_mut().enumerate() {
        *state = match (position.is_halted(), index.cmp(&current)) {
            (true, std::cmp::Ordering::Greater) => StepState::Pending,
            (true, _) => StepState::Error,
            (false, std::cmp::Ordering::Less) => StepState::Completed,
            (false, std::cmp::Ordering::Equal) => StepState::Current,
            (false, std::cmp::Ordering::Greater) => StepState::Pending,
        };
    }
    states
}

/// Percentage of the workflow reached, for progress bars.
#[must_use]
pub fn progress_percent(position: StepPosition) -> u8 {
    let reached = step_index(position.step()) + 1;
    ((reached * 100) / STEP_COUNT) as u8
}

/// Semantic colour class of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Warning,
    Attention,
    Success,
    Danger,
}

/// Label and colour class shown in lists and detail headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}

/// Badge for a transaction status.
#[must_use]
pub fn transaction_badge(status: &TransactionStatus) -> Badge {
    match status {
        TransactionStatus::TermsPending => Badge::new("Terms Pending", Tone::Neutral),
        TransactionStatus::AwaitingDeposit => Badge::new("Awaiting Deposit", Tone::Warning),
        TransactionStatus::DepositReceived | TransactionStatus::InReview => {
            Badge::new("Needs Review", Tone::Attention)
        }
        TransactionStatus::Approved => Badge::new("Approved", Tone::Info),
        TransactionStatus::AwaitingFinalPayment => Badge::new("Awaiting Payment", Tone::Warning),
        TransactionStatus::PaymentReceived => Badge::new("Verify Payment", Tone::Attention),
        TransactionStatus::Completed => Badge::new("Completed", Tone::Success),
        TransactionStatus::Cancelled => Badge::new("Cancelled", Tone::Danger),
        TransactionStatus::Disputed => Badge::new("Disputed", Tone::Danger),
        TransactionStatus::Unknown(_) => Badge::new("Unknown", Tone::Neutral),
    }
}

/// Badge for an offer status.
#[must_use]
pub fn offer_badge(status: &OfferStatus) -> Badge {
    match status {
        OfferStatus::Pending => Badge::new("Pending Review", Tone::Attention),
        OfferStatus::Approved => Badge::new("Approved", Tone::Info),
        OfferStatus::Rejected => Badge::new("Rejected", Tone::Danger),
        OfferStatus::Accepted => Badge::new("Accepted", Tone::Success),
        OfferStatus::Countered => Badge::new("Countered", Tone::Warning),
        OfferStatus::Expired => Badge::new("Expired", Tone::Neutral),
        OfferStatus::Withdrawn => Badge::new("Withdrawn", Tone::Neutral),
        OfferStatus::Unknown(_) => Badge::new("Unknown", Tone::Neutral),
    }
}

/// Seller has to sign off: the buyer approved and the seller has not.
#[must_use]
pub fn needs_seller_action(txn: &Transaction) -> bool {
    txn.buyer_approved && !txn.seller_approved
}

/// Buyer has to approve the review, pay the deposit, or pay the balance.
#[must_use]
pub fn needs_buyer_action(txn: &Transaction) -> bool {
    match position_of(&txn.status, None) {
        StepPosition::Active(WorkflowStep::AwaitingDeposit) => !txn.deposit_recorded(),
        StepPosition::Active(WorkflowStep::InReview) => !txn.buyer_approved,
        StepPosition::Active(WorkflowStep::AwaitingFinal) => !txn.final_payment_recorded(),
        _ => false,
    }
}

/// Admin has to verify money, give final approval, or resolve a dispute.
#[must_use]
pub fn needs_admin_action(txn: &Transaction) -> bool {
    match txn.status {
        TransactionStatus::DepositReceived
        | TransactionStatus::PaymentReceived
        | TransactionStatus::Disputed => true,
        TransactionStatus::InReview => {
            txn.buyer_approved && txn.seller_approved && !txn.admin_approved
        }
        _ => false,
    }
}

/// Offer waits on an admin decision.
#[must_use]
pub fn offer_needs_review(offer: &Offer) -> bool {
    offer.status == OfferStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(status: TransactionStatus) -> Transaction {
        Transaction {
            status,
            ..Default::default()
        }
    }

    #[test]
    fn known_statuses_land_on_workflow_steps() {
        for status in TransactionStatus::KNOWN {
            let step = step_of(status);
            assert!(WORKFLOW.contains(&step), "{status} -> {step}");
            assert_eq!(step_of(status), step);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_first_step() {
        let status = TransactionStatus::parse("ESCROW_HOLD");
        assert_eq!(step_of(&status), WorkflowStep::TermsAgreement);
        assert_eq!(step_states(&status)[0], StepState::Current);
    }

    #[test]
    fn step_index_matches_enum_order() {
        for (i, step) in WORKFLOW.iter().enumerate() {
            assert_eq!(step_index(*step), i);
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn ids_round_trip() {
        for step in WORKFLOW {
            assert_eq!(WorkflowStep::from_id(step.id()), Some(step));
        }
        assert_eq!(WorkflowStep::from_id("cancelled"), None);
    }

    #[test]
    fn active_position_has_single_current() {
        let states = step_states(&TransactionStatus::InReview);
        assert_eq!(
            states,
            [
                StepState::Completed,
                StepState::Completed,
                StepState::Completed,
                StepState::Current,
                StepState::Pending,
                StepState::Pending,
                StepState::Pending,
                StepState::Pending,
            ]
        );
    }

    #[test]
    fn halted_position_marks_errors_through_halt_point() {
        let position = position_of(&TransactionStatus::Disputed, Some(WorkflowStep::Approved));
        let states = states_at(position);
        assert!(states[..=4].iter().all(|s| *s == StepState::Error));
        assert!(states[5..].iter().all(|s| *s == StepState::Pending));
    }

    #[test]
    fn halt_hint_ignored_for_active_status() {
        let position = position_of(&TransactionStatus::Approved, Some(WorkflowStep::AwaitingDeposit));
        assert_eq!(position, StepPosition::Active(WorkflowStep::Approved));
    }

    #[test]
    fn progress_percent_spans_workflow() {
        assert_eq!(progress_percent(StepPosition::Active(WorkflowStep::TermsAgreement)), 12);
        assert_eq!(progress_percent(StepPosition::Active(WorkflowStep::InReview)), 50);
        assert_eq!(progress_percent(StepPosition::Active(WorkflowStep::Completed)), 100);
    }

    #[test]
    fn badges_diverge_from_steps() {
        let deposit = transaction_badge(&TransactionStatus::DepositReceived);
        let review = transaction_badge(&TransactionStatus::InReview);
        assert_eq!(deposit, review);
        assert_ne!(
            step_of(&TransactionStatus::DepositReceived),
            step_of(&TransactionStatus::InReview)
        );
        assert_eq!(
            transaction_badge(&TransactionStatus::PaymentReceived).label,
            "Verify Payment"
        );
    }

    #[test]
    fn offer_badges() {
        assert_eq!(offer_badge(&OfferStatus::Pending).tone, Tone::Attention);
        assert_eq!(offer_badge(&OfferStatus::Accepted).tone, Tone::Success);
    }

    #[test]
    fn buyer_action_in_review_until_buyer_approves() {
        let mut t = txn(TransactionStatus::InReview);
        assert!(needs_buyer_action(&t));
        t.buyer_approved = true;
        assert!(!needs_buyer_action(&t));
    }

    #[test]
    fn buyer_action_until_final_payment_recorded() {
        let mut t = txn(TransactionStatus::AwaitingFinalPayment);
        assert!(needs_buyer_action(&t));
        t.final_payment_reference = Some("ACH-991".into());
        assert!(!needs_buyer_action(&t));
    }

    #[test]
    fn buyer_has_nothing_to_do_when_cancelled() {
        assert!(!needs_buyer_action(&txn(TransactionStatus::Cancelled)));
    }

    #[test]
    fn seller_action_only_after_buyer_approval() {
        let mut t = txn(TransactionStatus::InReview);
        assert!(!needs_seller_action(&t));
        t.buyer_approved = true;
        assert!(needs_seller_action(&t));
        t.seller_approved = true;
        assert!(!needs_seller_action(&t));
    }

    #[test]
    fn admin_action_on_money_and_final_approval() {
        assert!(needs_admin_action(&txn(TransactionStatus::DepositReceived)));
        assert!(needs_admin_action(&txn(TransactionStatus::PaymentReceived)));
        assert!(needs_admin_action(&txn(TransactionStatus::Disputed)));
        assert!(!needs_admin_action(&txn(TransactionStatus::Completed)));

        let mut t = txn(TransactionStatus::InReview);
        t.buyer_approved = true;
        assert!(!needs_admin_action(&t));
        t.seller_approved = true;
        assert!(needs_admin_action(&t));
        t.admin_approved = true;
        assert!(!needs_admin_action(&t));
    }
}
