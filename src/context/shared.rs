use super::{Command, EditOutcome, GraphContext, GraphEditor};
use crate::error::{EditFailure, GraphError};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// A cloneable handle to one [`GraphContext`], for views that keep a
/// back-reference to their editor.
///
/// Every access takes the lock without waiting. Reaching for the context
/// while it is already held, most notably starting an edit from inside an
/// edit callback, fails with [`GraphError::EditInProgress`] instead of
/// deadlocking.
#[derive(Clone)]
pub struct SharedContext {
    inner: Arc<Mutex<GraphContext>>,
}

impl SharedContext {
    pub fn new(context: GraphContext) -> Self {
        Self {
            inner: Arc::new(Mutex::new(context)),
        }
    }

    fn acquire(&self) -> Result<MutexGuard<'_, GraphContext>, GraphError> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(GraphError::EditInProgress),
            Err(TryLockError::Poisoned(poisoned)) => {
                log::warn!("Graph context lock was poisoned; continuing with its last state");
                Ok(poisoned.into_inner())
            }
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&GraphContext) -> R) -> Result<R, GraphError> {
        let guard = self.acquire()?;
        Ok(f(&guard))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut GraphContext) -> R) -> Result<R, GraphError> {
        let mut guard = self.acquire()?;
        Ok(f(&mut guard))
    }

    pub fn edit(
        &self,
        cause: &str,
        f: impl Fn(&mut GraphEditor<'_>) -> Result<(), EditFailure> + Send + Sync + 'static,
    ) -> Result<EditOutcome, GraphError> {
        self.acquire()?.edit(cause, f)
    }

    pub fn execute(&self, cause: &str, command: Command) -> Result<EditOutcome, GraphError> {
        self.acquire()?.execute(cause, command)
    }

    pub fn undo(&self) -> Result<bool, GraphError> {
        Ok(self.acquire()?.undo())
    }

    pub fn redo(&self) -> Result<bool, GraphError> {
        self.acquire()?.redo()
    }
}

impl From<GraphContext> for SharedContext {
    fn from(context: GraphContext) -> Self {
        Self::new(context)
    }
}

impl std::fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Ok(context) => f.debug_tuple("SharedContext").field(&*context).finish(),
            Err(_) => f.write_str("SharedContext(<locked>)"),
        }
    }
}
