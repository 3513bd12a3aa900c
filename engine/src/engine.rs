//! The process-wide WebAssembly engine and its optional epoch-based deadline ticker.
//!
//! Grounded on `spec.md` §4.A: exactly one engine exists while any handle is alive, and its
//! deadline configuration is fixed for the lifetime of that engine. Re-initializing with the
//! same deadline is a no-op that just bumps the refcount; re-initializing with a different
//! deadline while a handle is still outstanding is a configuration error (`spec.md` §9: "do not
//! permit silent reconfiguration while live modules exist; fail loudly").

use crate::error::EngineError;
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

static GLOBAL: OnceLock<Mutex<Weak<Engine>>> = OnceLock::new();

fn registry() -> &'static Mutex<Weak<Engine>> {
    GLOBAL.get_or_init(|| Mutex::new(Weak::new()))
}

/// A process-wide handle to the `wasmtime` engine backing every [`Module`](crate::Module) and
/// [`Instance`](crate::Instance). Reference-counted: the last `Arc<Engine>` dropped tears down
/// the epoch ticker, if any.
pub struct Engine {
    wasmtime_engine: wasmtime::Engine,
    deadline_millis: Option<u32>,
    ticker: Mutex<Option<Ticker>>,
}

struct Ticker {
    stop: Arc<std::sync::atomic::AtomicBool>,
    handle: JoinHandle<()>,
}

impl Engine {
    /// `globalInit(deadlineMillis)`: returns the live engine if one exists and its deadline
    /// matches, creates a new one otherwise. Idempotent for the same deadline.
    pub fn global_init(deadline_millis: Option<u32>) -> Result<Arc<Self>, EngineError> {
        let mut slot = registry().lock().unwrap();
        if let Some(existing) = slot.upgrade() {
            return if existing.deadline_millis == deadline_millis {
                Ok(existing)
            } else {
                Err(EngineError::DeadlineMismatch)
            };
        }

        let mut config = wasmtime::Config::new();
        config.epoch_interruption(deadline_millis.is_some());

        let wasmtime_engine = wasmtime::Engine::new(&config)
            .map_err(|e| EngineError::configuration(format!("failed to create engine: {e}")))?;

        let ticker = deadline_millis.map(|_| {
            let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
            let stop_clone = stop.clone();
            let ticker_engine = wasmtime_engine.clone();
            let handle = std::thread::Builder::new()
                .name("wclap-epoch-ticker".into())
                .spawn(move || {
                    while !stop_clone.load(std::sync::atomic::Ordering::Relaxed) {
                        std::thread::sleep(Duration::from_millis(10));
                        ticker_engine.increment_epoch();
                    }
                })
                .expect("failed to spawn epoch ticker thread");
            Ticker { stop, handle }
        });

        let engine = Arc::new(Self {
            wasmtime_engine,
            deadline_millis,
            ticker: Mutex::new(ticker),
        });
        *slot = Arc::downgrade(&engine);
        Ok(engine)
    }

    /// The live process-wide engine, if `global_init` has been called and not yet matched by a
    /// final `global_deinit`. Returns `None` rather than creating one, unlike `global_init`.
    pub fn current() -> Option<Arc<Self>> {
        registry().lock().unwrap().upgrade()
    }

    /// The per-call epoch budget: `ceil(deadlineMillis/10)+2` ticks, per `spec.md` §3.
    pub fn epoch_budget_ticks(&self) -> Option<u64> {
        self.deadline_millis
            .map(|ms| u64::from(ms).div_ceil(10) + 2)
    }

    pub(crate) fn wasmtime(&self) -> &wasmtime::Engine {
        &self.wasmtime_engine
    }

    /// Whether this engine has a deadline configured (and thus epoch interruption enabled).
    pub fn has_deadline(&self) -> bool {
        self.deadline_millis.is_some()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().unwrap().take() {
            ticker.stop.store(true, std::sync::atomic::Ordering::Relaxed);
            // Joining here is best-effort: the ticker wakes at most every 10ms, so this adds
            // bounded latency to `globalDeinit` rather than leaking the thread past engine death.
            let _ = ticker.handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_init_is_idempotent_for_same_deadline() {
        let a = Engine::global_init(Some(250)).unwrap();
        let b = Engine::global_init(Some(250)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn global_init_rejects_deadline_change_while_live() {
        let _a = Engine::global_init(Some(100)).unwrap();
        let err = Engine::global_init(Some(200)).unwrap_err();
        assert!(matches!(err, EngineError::DeadlineMismatch));
    }

    #[test]
    fn no_deadline_means_no_ticker() {
        drop(Engine::global_init(Some(1)));
        let engine = Engine::global_init(None).unwrap();
        assert!(!engine.has_deadline());
        assert_eq!(engine.epoch_budget_ticks(), None);
    }
}
