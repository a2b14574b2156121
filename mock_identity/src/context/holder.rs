use std::cell::RefCell;
use std::marker::PhantomData;

use super::types::SecurityContext;

thread_local! {
    static CURRENT_CONTEXT: RefCell<Option<SecurityContext>> = const { RefCell::new(None) };
}

/// Per-thread slot holding the security context of the running test
///
/// Each test worker thread has its own slot, so tests running in parallel on
/// different threads never see each other's context.
pub struct SecurityContextHolder;

impl SecurityContextHolder {
    /// Current context, or an empty one when nothing is installed
    pub fn get() -> SecurityContext {
        Self::current().unwrap_or_default()
    }

    pub fn current() -> Option<SecurityContext> {
        CURRENT_CONTEXT.with(|slot| slot.borrow().clone())
    }

    /// Borrow the current context without cloning it
    pub fn with<R>(f: impl FnOnce(Option<&SecurityContext>) -> R) -> R {
        CURRENT_CONTEXT.with(|slot| f(slot.borrow().as_ref()))
    }

    pub fn is_installed() -> bool {
        CURRENT_CONTEXT.with(|slot| slot.borrow().is_some())
    }

    pub fn set(context: SecurityContext) {
        tracing::debug!(
            principal = context.authentication().map(|a| a.name()),
            "Installing security context"
        );
        CURRENT_CONTEXT.with(|slot| *slot.borrow_mut() = Some(context));
    }

    /// Clearing an empty holder is a no-op
    pub fn clear() {
        let previous = CURRENT_CONTEXT.with(|slot| slot.borrow_mut().take());
        if previous.is_some() {
            tracing::debug!("Cleared security context");
        }
    }

    /// Install `context` until the returned guard is dropped
    #[must_use = "the previous context is restored as soon as the guard is dropped"]
    pub fn install(context: SecurityContext) -> HolderGuard {
        let previous = Self::current();
        Self::set(context);
        HolderGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `f` with `context` installed; the previous context is restored
    /// afterwards, including when `f` panics
    pub fn scope<R>(context: SecurityContext, f: impl FnOnce() -> R) -> R {
        let _guard = Self::install(context);
        f()
    }
}

/// Restores the holder of the thread that created it when dropped
pub struct HolderGuard {
    previous: Option<SecurityContext>,
    // Tied to the creating thread's slot.
    _not_send: PhantomData<*const ()>,
}

impl Drop for HolderGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => SecurityContextHolder::set(previous),
            None => SecurityContextHolder::clear(),
        }
    }
}
