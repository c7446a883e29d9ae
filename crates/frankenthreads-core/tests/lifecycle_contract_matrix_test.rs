use frankenthreads_core::errno;
use frankenthreads_core::thread::{ThreadOp, ThreadState, lifecycle_transition};

#[derive(Clone, Copy)]
struct Case {
    old_state: ThreadState,
    op: ThreadOp,
    expected_state: ThreadState,
    expected_errno: i32,
    expected_blocks: bool,
}

fn state_name(state: ThreadState) -> &'static str {
    match state {
        ThreadState::Constructed => "Constructed",
        ThreadState::Running => "Running",
        ThreadState::Exited => "Exited",
        ThreadState::Joined => "Joined",
        ThreadState::Detached => "Detached",
    }
}

fn op_name(op: ThreadOp) -> &'static str {
    match op {
        ThreadOp::Create => "Create",
        ThreadOp::Join => "Join",
        ThreadOp::Detach => "Detach",
        ThreadOp::Cancel => "Cancel",
    }
}

fn matrix_cases() -> Vec<Case> {
    vec![
        Case {
            old_state: ThreadState::Constructed,
            op: ThreadOp::Create,
            expected_state: ThreadState::Running,
            expected_errno: 0,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Constructed,
            op: ThreadOp::Join,
            expected_state: ThreadState::Constructed,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Constructed,
            op: ThreadOp::Detach,
            expected_state: ThreadState::Constructed,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Running,
            op: ThreadOp::Create,
            expected_state: ThreadState::Running,
            expected_errno: errno::EBUSY,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Running,
            op: ThreadOp::Join,
            expected_state: ThreadState::Joined,
            expected_errno: 0,
            expected_blocks: true,
        },
        Case {
            old_state: ThreadState::Running,
            op: ThreadOp::Detach,
            expected_state: ThreadState::Detached,
            expected_errno: 0,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Running,
            op: ThreadOp::Cancel,
            expected_state: ThreadState::Running,
            expected_errno: 0,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Exited,
            op: ThreadOp::Join,
            expected_state: ThreadState::Joined,
            expected_errno: 0,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Exited,
            op: ThreadOp::Detach,
            expected_state: ThreadState::Detached,
            expected_errno: 0,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Joined,
            op: ThreadOp::Join,
            expected_state: ThreadState::Joined,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Joined,
            op: ThreadOp::Detach,
            expected_state: ThreadState::Joined,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Detached,
            op: ThreadOp::Join,
            expected_state: ThreadState::Detached,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Detached,
            op: ThreadOp::Detach,
            expected_state: ThreadState::Detached,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
        Case {
            old_state: ThreadState::Detached,
            op: ThreadOp::Cancel,
            expected_state: ThreadState::Detached,
            expected_errno: errno::EINVAL,
            expected_blocks: false,
        },
    ]
}

#[test]
fn lifecycle_contract_matrix() {
    for case in matrix_cases() {
        let outcome = lifecycle_transition(case.old_state, case.op);
        let label = format!("{} + {}", state_name(case.old_state), op_name(case.op));
        assert_eq!(
            outcome.next, case.expected_state,
            "unexpected next state for {label}"
        );
        assert_eq!(
            outcome.errno, case.expected_errno,
            "unexpected errno for {label}"
        );
        assert_eq!(
            outcome.blocks, case.expected_blocks,
            "unexpected blocking for {label}"
        );
    }
}

#[test]
fn terminal_states_reject_every_operation() {
    for state in [ThreadState::Joined, ThreadState::Detached] {
        for op in [
            ThreadOp::Create,
            ThreadOp::Join,
            ThreadOp::Detach,
            ThreadOp::Cancel,
        ] {
            let outcome = lifecycle_transition(state, op);
            assert_eq!(outcome.next, state, "terminal state must not change");
            assert_eq!(
                outcome.errno,
                errno::EINVAL,
                "{} in {} must be rejected",
                op_name(op),
                state_name(state)
            );
        }
    }
}
