//! Multi-step operation bookkeeping

use std::fmt;

use crate::error::Error;

/// A single server call inside a multi-step operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    AddUser,
    SetUserStatus,
    AttachPolicy,
    UpdateServiceAccount,
    ReadServiceAccount,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::AddUser => "add-user",
            Step::SetUserStatus => "set-user-status",
            Step::AttachPolicy => "attach-policy",
            Step::UpdateServiceAccount => "update-service-account",
            Step::ReadServiceAccount => "read-service-account",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an ordered step sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    FullySucceeded,
    PartiallySucceeded { completed: Vec<Step>, failed: Step },
    Failed { at: Step },
}

/// Runs the steps of one operation in order and converts a failure after
/// at least one completed step into [`Error::PartialFailure`].
///
/// A failure of the first step is returned unchanged so its transport,
/// status or decode classification survives.
#[derive(Debug, Default)]
pub struct StepSequence {
    completed: Vec<Step>,
    failed: Option<Step>,
}

impl StepSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of `step`.
    pub fn record<T>(&mut self, step: Step, result: Result<T, Error>) -> Result<T, Error> {
        match result {
            Ok(value) => {
                self.completed.push(step);
                Ok(value)
            }
            Err(err) => {
                self.failed = Some(step);
                if self.completed.is_empty() {
                    Err(err)
                } else {
                    Err(Error::PartialFailure {
                        completed: self.completed.clone(),
                        failed: step,
                        source: Box::new(err),
                    })
                }
            }
        }
    }

    pub fn completed(&self) -> &[Step] {
        &self.completed
    }

    pub fn outcome(&self) -> StepOutcome {
        match self.failed {
            None => StepOutcome::FullySucceeded,
            Some(at) if self.completed.is_empty() => StepOutcome::Failed { at },
            Some(failed) => StepOutcome::PartiallySucceeded {
                completed: self.completed.clone(),
                failed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_failure_keeps_original_error() {
        let mut seq = StepSequence::new();
        let result: Result<(), Error> =
            seq.record(Step::AddUser, Err(Error::Transport("refused".into())));

        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(seq.outcome(), StepOutcome::Failed { at: Step::AddUser });
    }

    #[test]
    fn test_late_failure_is_partial() {
        let mut seq = StepSequence::new();
        seq.record(Step::AddUser, Ok(())).unwrap();
        let result: Result<(), Error> = seq.record(
            Step::AttachPolicy,
            Err(Error::Status {
                status: 404,
                message: "policy not found".into(),
            }),
        );

        assert_eq!(
            seq.outcome(),
            StepOutcome::PartiallySucceeded {
                completed: vec![Step::AddUser],
                failed: Step::AttachPolicy,
            }
        );
        match result {
            Err(Error::PartialFailure { source, failed, .. }) => {
                assert_eq!(failed, Step::AttachPolicy);
                assert_eq!(source.status(), Some(404));
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[test]
    fn test_all_steps_succeed() {
        let mut seq = StepSequence::new();
        seq.record(Step::SetUserStatus, Ok(())).unwrap();
        seq.record(Step::AttachPolicy, Ok(())).unwrap();

        assert_eq!(seq.outcome(), StepOutcome::FullySucceeded);
        assert_eq!(seq.completed(), &[Step::SetUserStatus, Step::AttachPolicy]);
    }
}
