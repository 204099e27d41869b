use crate::prelude::*;
use std::sync::PoisonError;
use tokio_util::sync::CancellationToken;

/// Shared by every task of one load: remembers the first error and cancels
/// the rest.
#[derive(Default)]
pub(crate) struct FailFast {
    token: CancellationToken,
    first: Mutex<Option<LoadError>>,
}

impl FailFast {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `err` unless an earlier error is already recorded, then cancel.
    pub(crate) fn fail(&self, err: LoadError) {
        {
            let mut first = self.first.lock().unwrap_or_else(PoisonError::into_inner);
            if first.is_none() {
                warn!("Aborting load: {}", err);
                *first = Some(err);
            } else {
                debug!("Ignoring error after abort: {}", err);
            }
        }
        self.token.cancel();
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn take_error(&self) -> Option<LoadError> {
        self.first
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let fail_fast = FailFast::new();
        assert!(!fail_fast.is_cancelled());

        fail_fast.fail(LoadError::EmptyArchive);
        fail_fast.fail(LoadError::Cancelled);

        assert!(fail_fast.is_cancelled());
        assert!(matches!(fail_fast.take_error(), Some(LoadError::EmptyArchive)));
        assert!(fail_fast.take_error().is_none());
    }
}
