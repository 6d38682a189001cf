//! Minimal saga executor for the tenant↔space flows.
//!
//! There is no transaction spanning the tenant and space rows, so each
//! multi-step flow is written as an ordered list of (action, compensation)
//! pairs. When a step fails, the compensations of every previously completed
//! step run in reverse order, and the outcome — including a compensation
//! that itself failed — is reported to the caller rather than swallowed.

use std::fmt;

type StepFn<'a, E> = Box<dyn FnOnce() -> Result<(), E> + 'a>;

struct SagaStep<'a, E> {
    label: &'static str,
    action: StepFn<'a, E>,
    compensation: Option<StepFn<'a, E>>,
}

/// An ordered list of forward steps with optional compensations.
pub struct Saga<'a, E> {
    steps: Vec<SagaStep<'a, E>>,
}

impl<'a, E> Saga<'a, E> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step with no compensation.
    pub fn step(mut self, label: &'static str, action: impl FnOnce() -> Result<(), E> + 'a) -> Self {
        self.steps.push(SagaStep {
            label,
            action: Box::new(action),
            compensation: None,
        });
        self
    }

    /// Append a step whose effect can be undone if a later step fails.
    pub fn step_with_compensation(
        mut self,
        label: &'static str,
        action: impl FnOnce() -> Result<(), E> + 'a,
        compensation: impl FnOnce() -> Result<(), E> + 'a,
    ) -> Self {
        self.steps.push(SagaStep {
            label,
            action: Box::new(action),
            compensation: Some(Box::new(compensation)),
        });
        self
    }

    /// Run the steps in order. On the first failure, run the compensations
    /// of all completed steps in reverse and report the combined outcome.
    /// When several compensations fail, the first failure is the one
    /// reported.
    pub fn run(self) -> Result<(), SagaFailure<E>>
    where
        E: fmt::Display,
    {
        let mut completed: Vec<(&'static str, Option<StepFn<'a, E>>)> = Vec::new();

        for step in self.steps {
            match (step.action)() {
                Ok(()) => completed.push((step.label, step.compensation)),
                Err(cause) => {
                    let mut first_failure = None;
                    for (label, compensation) in completed.into_iter().rev() {
                        let Some(compensation) = compensation else {
                            continue;
                        };
                        if let Err(comp_cause) = compensation() {
                            tracing::warn!(step = label, "compensating step failed: {comp_cause}");
                            if first_failure.is_none() {
                                first_failure = Some((label, comp_cause));
                            }
                        }
                    }

                    let compensation = match first_failure {
                        None => CompensationOutcome::Completed,
                        Some((step, cause)) => CompensationOutcome::Failed { step, cause },
                    };
                    return Err(SagaFailure {
                        step: step.label,
                        cause,
                        compensation,
                    });
                }
            }
        }

        Ok(())
    }
}

impl<'a, E> Default for Saga<'a, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A step failed; `compensation` records whether the rollback of earlier
/// steps restored the previous state.
#[derive(Debug)]
pub struct SagaFailure<E> {
    pub step: &'static str,
    pub cause: E,
    pub compensation: CompensationOutcome<E>,
}

/// Outcome of running the compensations after a failed step.
#[derive(Debug)]
pub enum CompensationOutcome<E> {
    /// Every compensating step ran (trivially so when none were needed).
    Completed,
    /// A compensating step itself failed; the system cannot self-heal and
    /// an operator must reconcile manually.
    Failed { step: &'static str, cause: E },
}

impl<E: fmt::Display> fmt::Display for CompensationOutcome<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompensationOutcome::Completed => write!(f, "compensation completed"),
            CompensationOutcome::Failed { step, cause } => {
                write!(f, "compensation step '{step}' failed: {cause}")
            }
        }
    }
}
