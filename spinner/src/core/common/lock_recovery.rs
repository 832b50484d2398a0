// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::StdMutex;
use std::sync::{MutexGuard, PoisonError};

/// Lock the mutex, and if it is poisoned, take the guard anyway.
///
/// Every critical section in this crate leaves the guarded value consistent before it
/// can panic (state is only mutated after the fallible I/O for a cycle completes, or is
/// reset unconditionally), so a poisoned lock carries no torn state.
pub fn lock_recovering<T: ?Sized>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_lock_recovering_after_poison() {
        let mutex = Arc::new(StdMutex::new(1));
        let mutex_clone = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(mutex.is_poisoned());
        *lock_recovering(&mutex) += 1;
        assert_eq!(*lock_recovering(&mutex), 2);
    }
}
