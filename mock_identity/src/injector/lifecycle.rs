use std::future::Future;

use crate::context::{SecurityContext, SecurityContextHolder};
use crate::descriptor::SetupPhase;
use crate::factory::{Collaborators, FactoryRegistry, SetupError};

use super::declaration::TestDeclaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorState {
    /// Nothing installed
    Idle,
    /// Context resolved, waiting for the test execution phase
    Pending,
    /// Context installed in the holder
    Installed,
}

/// Per-test hook that installs the declared identity and clears it afterwards
#[derive(Debug)]
pub struct ContextInjector {
    registry: FactoryRegistry,
    services: Collaborators,
    state: InjectorState,
    pending: Option<SecurityContext>,
}

impl Default for ContextInjector {
    fn default() -> Self {
        Self::new(FactoryRegistry::new(), Collaborators::new())
    }
}

impl ContextInjector {
    pub fn new(registry: FactoryRegistry, services: Collaborators) -> Self {
        Self {
            registry,
            services,
            state: InjectorState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> InjectorState {
        self.state
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    pub fn services(&self) -> &Collaborators {
        &self.services
    }

    /// Resolve the declaration and install (or stage) its context
    ///
    /// A declaration without any descriptor leaves the injector idle and the
    /// holder empty.
    #[tracing::instrument(skip(self, declaration), fields(test = declaration.name()))]
    pub fn before_test_method(&mut self, declaration: &TestDeclaration) -> Result<(), SetupError> {
        if self.state != InjectorState::Idle {
            tracing::warn!("Previous test did not tear down; clearing its context first");
            self.after_test_method();
        }

        let Some(descriptor) = declaration.resolve() else {
            tracing::debug!("No identity declared");
            return Ok(());
        };

        let context = self
            .registry
            .create(descriptor, &self.services)
            .inspect_err(|e| {
                tracing::error!("Failed to set up {} identity: {}", descriptor.kind(), e);
            })?;

        match descriptor.setup_phase() {
            SetupPhase::TestMethod => {
                SecurityContextHolder::set(context);
                self.state = InjectorState::Installed;
            }
            SetupPhase::TestExecution => {
                tracing::debug!("Deferring {} identity until test execution", descriptor.kind());
                self.pending = Some(context);
                self.state = InjectorState::Pending;
            }
        }
        Ok(())
    }

    /// Install a context staged for the test execution phase
    pub fn before_test_execution(&mut self) {
        if let Some(context) = self.pending.take() {
            SecurityContextHolder::set(context);
            self.state = InjectorState::Installed;
        }
    }

    /// Clear the holder unconditionally; repeated calls are no-ops
    pub fn after_test_method(&mut self) {
        SecurityContextHolder::clear();
        self.pending = None;
        self.state = InjectorState::Idle;
    }

    /// Run one test with its identity bracketed around `setup` and `body`
    ///
    /// Teardown runs on every exit path, including a panicking body. A
    /// setup failure is returned before `setup` or `body` run.
    pub fn run_test<R>(
        &mut self,
        declaration: &TestDeclaration,
        setup: impl FnOnce(),
        body: impl FnOnce() -> R,
    ) -> Result<R, SetupError> {
        let teardown = Teardown { injector: self };
        teardown.injector.before_test_method(declaration)?;
        setup();
        teardown.injector.before_test_execution();
        Ok(body())
    }

    /// Async form of [`ContextInjector::run_test`]
    ///
    /// The holder is per thread, so the body must be polled on the calling
    /// thread (a current-thread runtime, as `#[tokio::test]` uses).
    pub async fn run_test_async<Fut>(
        &mut self,
        declaration: &TestDeclaration,
        body: impl FnOnce() -> Fut,
    ) -> Result<Fut::Output, SetupError>
    where
        Fut: Future,
    {
        let teardown = Teardown { injector: self };
        teardown.injector.before_test_method(declaration)?;
        teardown.injector.before_test_execution();
        Ok(body().await)
    }
}

struct Teardown<'a> {
    injector: &'a mut ContextInjector,
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        self.injector.after_test_method();
    }
}
