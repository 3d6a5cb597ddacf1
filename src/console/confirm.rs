//! Confirmation modal carrying the action it guards.
//!
//! The dialog owns the pending action; the only way to get it back is
//! [`ConfirmDialog::resolve`], which consumes the dialog. Whoever holds the
//! `Option<ConfirmDialog<_>>` therefore `take()`s it on every resolution path
//! (confirm, cancel, Escape) and nothing is left open behind the caller.

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog<A> {
    pub title: String,
    pub message: String,
    action: A,
}

impl<A> ConfirmDialog<A> {
    pub fn new(title: impl Into<String>, message: impl Into<String>, action: A) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            action,
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    /// `Some(action)` when confirmed, `None` when cancelled
    pub fn resolve(self, confirmed: bool) -> Option<A> {
        confirmed.then_some(self.action)
    }
}

/// Actions that require confirmation before running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteKeybinding(i64),
    DeleteImage(String),
    RestartServer,
    ShutdownServer,
    InstallUpdate { version: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        let dialog = ConfirmDialog::new("Delete image", "Really?", PendingAction::DeleteImage("a.png".into()));
        assert_eq!(dialog.action(), &PendingAction::DeleteImage("a.png".into()));
        assert_eq!(
            dialog.clone().resolve(true),
            Some(PendingAction::DeleteImage("a.png".into()))
        );
        assert_eq!(dialog.resolve(false), None);
    }

    #[test]
    fn test_take_leaves_no_dialog() {
        let mut slot = Some(ConfirmDialog::new("Restart", "Restart?", PendingAction::RestartServer));
        let outcome = slot.take().and_then(|dialog| dialog.resolve(false));
        assert!(outcome.is_none());
        assert!(slot.is_none());
    }
}
