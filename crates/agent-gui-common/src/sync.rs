use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

static POISON_RECOVERIES: AtomicUsize = AtomicUsize::new(0);

/// Number of times a poisoned lock has been recovered since startup.
pub fn poison_recovery_count() -> usize {
    POISON_RECOVERIES.load(Ordering::Relaxed)
}

pub fn mutex_lock_or_recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        POISON_RECOVERIES.fetch_add(1, Ordering::Relaxed);
        eprintln!("Warning: recovering from poisoned mutex");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutex_lock_or_recover_normal() {
        let m = Mutex::new(5);
        let guard = mutex_lock_or_recover(&m);
        assert_eq!(*guard, 5);
    }

    #[test]
    fn test_mutex_lock_or_recover_poisoned() {
        let m = std::sync::Arc::new(Mutex::new(0));
        let m2 = m.clone();
        let _ = std::thread::spawn(move || {
            let _guard = m2.lock().unwrap();
            panic!("poison the mutex");
        })
        .join();

        let before = poison_recovery_count();
        let guard = mutex_lock_or_recover(&m);
        assert_eq!(*guard, 0);
        assert!(poison_recovery_count() > before);
    }
}
