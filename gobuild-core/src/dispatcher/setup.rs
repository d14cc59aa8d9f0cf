//! Create-manifest-then-retry workflow
//!
//! When a command needs a module and auto-creation is enabled, the original
//! invocation is parked here while go.mod is created, then released for
//! exactly one retry.

use crate::models::Invocation;
use thiserror::Error;

/// Progress of a module setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    /// Waiting for go.mod to be created
    Pending,
    /// go.mod exists; the retry has not been issued yet
    ManifestCreated,
    /// The original invocation has been released for its single retry
    Retried,
    /// Setup was abandoned; the invocation will not run
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("Module setup cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: SetupState, to: SetupState },
}

/// A pending invocation plus its continuation after go.mod exists
#[derive(Debug, Clone)]
pub struct ModuleSetup {
    pending: Invocation,
    module_name: Option<String>,
    state: SetupState,
}

impl ModuleSetup {
    pub fn new(pending: Invocation) -> Self {
        Self {
            pending,
            module_name: None,
            state: SetupState::Pending,
        }
    }

    pub fn state(&self) -> SetupState {
        self.state
    }

    /// Module name recorded when the manifest was created
    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    fn transition(&mut self, allowed_from: &[SetupState], to: SetupState) -> Result<(), SetupError> {
        if !allowed_from.contains(&self.state) {
            return Err(SetupError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!(from = ?self.state, to = ?to, command = %self.pending.command_line(), "Module setup transition");
        self.state = to;
        Ok(())
    }

    /// Pending → ManifestCreated
    pub fn manifest_created(&mut self, module_name: impl Into<String>) -> Result<(), SetupError> {
        self.transition(&[SetupState::Pending], SetupState::ManifestCreated)?;
        self.module_name = Some(module_name.into());
        Ok(())
    }

    /// ManifestCreated → Retried, releasing the original invocation with the
    /// manifest check disabled. Can succeed only once.
    pub fn take_retry(&mut self) -> Result<Invocation, SetupError> {
        self.transition(&[SetupState::ManifestCreated], SetupState::Retried)?;
        Ok(self.pending.clone().skip_module_check())
    }

    /// Pending or ManifestCreated → Failed
    pub fn fail(&mut self) -> Result<(), SetupError> {
        self.transition(
            &[SetupState::Pending, SetupState::ManifestCreated],
            SetupState::Failed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModuleCheck;

    fn setup() -> ModuleSetup {
        ModuleSetup::new(Invocation::new("go", ["build", "."], "/work"))
    }

    #[test]
    fn test_happy_path() {
        let mut setup = setup();
        assert_eq!(setup.state(), SetupState::Pending);

        setup.manifest_created("example.com/demo").unwrap();
        assert_eq!(setup.state(), SetupState::ManifestCreated);
        assert_eq!(setup.module_name(), Some("example.com/demo"));

        let retry = setup.take_retry().unwrap();
        assert_eq!(setup.state(), SetupState::Retried);
        assert_eq!(retry.args, vec!["build", "."]);
        assert_eq!(retry.module_check, ModuleCheck::Skip);
    }

    #[test]
    fn test_retry_only_once() {
        let mut setup = setup();
        setup.manifest_created("demo").unwrap();
        setup.take_retry().unwrap();

        assert_eq!(
            setup.take_retry().unwrap_err(),
            SetupError::InvalidTransition {
                from: SetupState::Retried,
                to: SetupState::Retried,
            }
        );
    }

    #[test]
    fn test_retry_requires_manifest() {
        let mut setup = setup();
        assert!(setup.take_retry().is_err());
        assert_eq!(setup.state(), SetupState::Pending);
    }

    #[test]
    fn test_failed_setup_never_retries() {
        let mut setup = setup();
        setup.fail().unwrap();
        assert_eq!(setup.state(), SetupState::Failed);
        assert!(setup.manifest_created("demo").is_err());
        assert!(setup.take_retry().is_err());
        assert!(setup.fail().is_err());
    }
}
