pub mod aggregation;
pub mod board;
pub mod calendar;
pub mod completion;
pub mod fetchers;
pub mod normalizer;
pub mod page;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{error, warn};

use crate::error::AppError;

pub use board::TodoBoard;
pub use completion::{CompletionMutator, ToggleOutcome};
pub use page::{CalendarPage, PageState};

pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, AppError> {
    mutex.lock().map_err(|_| {
        error!("{} lock poisoned", what);
        AppError::InternalServerError
    })
}

/// For writes that reset the value wholesale (page state, clearing the
/// board), a poisoned lock is taken over instead of failing.
pub(crate) fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("{} lock poisoned, taking it over", what);
        mutex.clear_poison();
        PoisonError::into_inner(poisoned)
    })
}
