use mcdesk::domain::projector::{
    needs_admin_action, needs_buyer_action, needs_seller_action, position_of, position_of_transaction,
    states_at, step_index, step_of, step_states, transaction_badge, StepPosition, StepState, Tone,
    WorkflowStep, STEP_COUNT, WORKFLOW,
};
use mcdesk::domain::{Transaction, TransactionStatus};

const NON_ABSORBING: [TransactionStatus; 8] = [
    TransactionStatus::TermsPending,
    TransactionStatus::AwaitingDeposit,
    TransactionStatus::DepositReceived,
    TransactionStatus::InReview,
    TransactionStatus::Approved,
    TransactionStatus::AwaitingFinalPayment,
    TransactionStatus::PaymentReceived,
    TransactionStatus::Completed,
];

#[test]
fn every_known_status_maps_into_the_workflow() {
    for status in TransactionStatus::KNOWN {
        let step = step_of(status);
        assert!(WORKFLOW.contains(&step), "{status} mapped outside the workflow");
        assert_eq!(step_of(status), step, "{status} mapping is not stable");
    }
}

#[test]
fn happy_path_statuses_map_in_order() {
    for (status, step) in NON_ABSORBING.iter().zip(WORKFLOW.iter()) {
        assert_eq!(step_of(status), *step);
    }
}

#[test]
fn unknown_status_falls_back_to_first_step() {
    for raw in ["ESCROW_HOLD", "", "in-review", "42"] {
        let status = TransactionStatus::parse(raw);
        if status.is_unknown() {
            assert_eq!(step_of(&status), WorkflowStep::TermsAgreement);
            assert_eq!(step_states(&status)[0], StepState::Current);
        }
    }
}

#[test]
fn absorbing_statuses_mark_errors_up_to_the_halt() {
    for status in [TransactionStatus::Cancelled, TransactionStatus::Disputed] {
        for halted_at in WORKFLOW {
            let position = position_of(&status, Some(halted_at));
            let states = states_at(position);
            let current = step_index(halted_at);
            for (index, state) in states.iter().enumerate() {
                if index <= current {
                    assert_eq!(*state, StepState::Error, "{status} step {index}");
                } else {
                    assert_eq!(*state, StepState::Pending, "{status} step {index}");
                }
            }
            assert!(!states
                .iter()
                .any(|s| matches!(s, StepState::Completed | StepState::Current)));
        }
    }
}

#[test]
fn non_absorbing_statuses_have_exactly_one_current_step() {
    for status in NON_ABSORBING {
        let states = step_states(&status);
        let current: Vec<usize> = states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == StepState::Current)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(current.len(), 1, "{status}");
        let at = current[0];
        assert!(states[..at].iter().all(|s| *s == StepState::Completed));
        assert!(states[at + 1..].iter().all(|s| *s == StepState::Pending));
    }
}

#[test]
fn seller_action_depends_only_on_approval_flags() {
    let statuses = TransactionStatus::KNOWN;
    for status in statuses {
        for buyer in [false, true] {
            for seller in [false, true] {
                for admin in [false, true] {
                    let txn = Transaction {
                        status: status.clone(),
                        buyer_approved: buyer,
                        seller_approved: seller,
                        admin_approved: admin,
                        final_payment_reference: admin.then(|| "wire".to_string()),
                        ..Default::default()
                    };
                    assert_eq!(needs_seller_action(&txn), buyer && !seller);
                }
            }
        }
    }
}

#[test]
fn role_predicates_are_independent() {
    let txn = Transaction {
        status: TransactionStatus::InReview,
        buyer_approved: true,
        seller_approved: true,
        ..Default::default()
    };
    assert!(!needs_buyer_action(&txn));
    assert!(!needs_seller_action(&txn));
    assert!(needs_admin_action(&txn));

    let awaiting_final = Transaction {
        status: TransactionStatus::AwaitingFinalPayment,
        ..Default::default()
    };
    assert!(needs_buyer_action(&awaiting_final));
    assert!(!needs_admin_action(&awaiting_final));
}

#[test]
fn classification_round_trip_is_idempotent() {
    for status in TransactionStatus::KNOWN {
        let first = step_index(step_of(status));
        for _ in 0..3 {
            let step = step_of(status);
            assert_eq!(step_index(step), first);
            assert_eq!(WORKFLOW[step_index(step)], step);
            assert_eq!(step_states(status), step_states(status));
        }
        assert!(first < STEP_COUNT);
    }
}

#[test]
fn cancelled_transaction_is_placed_by_its_evidence() {
    let txn = Transaction {
        status: TransactionStatus::Cancelled,
        deposit_reference: Some("WIRE-7".into()),
        buyer_approved: true,
        ..Default::default()
    };
    assert_eq!(
        position_of_transaction(&txn),
        StepPosition::Halted {
            halt: mcdesk::domain::projector::Halt::Cancelled,
            at: WorkflowStep::InReview,
        }
    );
}

#[test]
fn badges_diverge_from_steps() {
    let review = transaction_badge(&TransactionStatus::DepositReceived);
    assert_eq!(review, transaction_badge(&TransactionStatus::InReview));
    assert_eq!(review.label, "Needs Review");
    assert_ne!(
        step_of(&TransactionStatus::DepositReceived),
        step_of(&TransactionStatus::InReview)
    );
    assert_eq!(
        transaction_badge(&TransactionStatus::PaymentReceived).tone,
        Tone::Attention
    );
}
