//! Active document scope.
//!
//! Builders created without an explicit [`Document`] allocate into the active
//! scope of the current thread: the innermost [`with_isolated_scope`] call, or
//! else a lazily created default document. Handles are `!Send`, so every thread
//! has its own default.

use std::cell::RefCell;

use crate::document::Document;

#[derive(Default)]
struct ScopeStack {
    default: Option<Document>,
    isolated: Vec<Document>,
}

thread_local! {
    static SCOPES: RefCell<ScopeStack> = RefCell::new(ScopeStack::default());
}

/// The document new builders allocate into on this thread.
#[must_use]
pub fn current_scope() -> Document {
    SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        if let Some(doc) = scopes.isolated.last() {
            return doc.clone();
        }
        scopes.default.get_or_insert_with(Document::new).clone()
    })
}

/// Run `f` with a fresh document as the active scope.
///
/// The previous scope is restored when `f` returns or unwinds. Calls nest.
///
/// # Example
///
/// ```
/// use elem::{current_scope, div, with_isolated_scope};
///
/// let outer = current_scope();
/// let html = with_isolated_scope(|doc| {
///     assert!(current_scope().ptr_eq(doc));
///     div().append("isolated").to_html()
/// });
/// assert_eq!(html, "<div>isolated</div>");
/// assert!(current_scope().ptr_eq(&outer));
/// ```
pub fn with_isolated_scope<R>(f: impl FnOnce(&Document) -> R) -> R {
    let doc = Document::new();
    SCOPES.with(|scopes| scopes.borrow_mut().isolated.push(doc.clone()));
    let _guard = ScopeGuard;
    tracing::debug!(document = ?doc.id(), "Entered isolated scope");
    f(&doc)
}

/// Pops the innermost isolated scope on drop.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread teardown.
        let _ = SCOPES.try_with(|scopes| {
            if let Some(doc) = scopes.borrow_mut().isolated.pop() {
                tracing::debug!(document = ?doc.id(), "Left isolated scope");
            }
        });
    }
}

/// Discard this thread's default document.
///
/// The next builder created outside an isolated scope gets a fresh document.
/// Existing handles keep the old document alive until they are dropped.
pub fn reset_default_scope() {
    SCOPES.with(|scopes| {
        if let Some(doc) = scopes.borrow_mut().default.take() {
            tracing::debug!(document = ?doc.id(), "Reset default scope");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn test_default_scope_is_stable() {
        let a = current_scope();
        let b = current_scope();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_reset_default_scope() {
        let before = current_scope();
        reset_default_scope();
        let after = current_scope();
        assert!(!before.ptr_eq(&after));
    }

    #[test]
    fn test_isolated_scopes_nest() {
        let outer = current_scope();
        with_isolated_scope(|first| {
            assert!(current_scope().ptr_eq(first));
            with_isolated_scope(|second| {
                assert!(!second.ptr_eq(first));
                assert!(current_scope().ptr_eq(second));
            });
            assert!(current_scope().ptr_eq(first));
        });
        assert!(current_scope().ptr_eq(&outer));
    }

    #[test]
    fn test_isolated_scope_restored_on_panic() {
        let outer = current_scope();
        let result = catch_unwind(AssertUnwindSafe(|| {
            with_isolated_scope(|_| panic!("boom"));
        }));
        assert!(result.is_err());
        assert!(current_scope().ptr_eq(&outer));
    }

    #[test]
    fn test_reset_inside_isolated_scope_keeps_isolation() {
        with_isolated_scope(|doc| {
            reset_default_scope();
            assert!(current_scope().ptr_eq(doc));
        });
    }
}
