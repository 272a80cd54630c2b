//! Run-once initializer guard.
//!
//! UI lifecycle hooks can fire more than once for the same component (effects
//! re-run when tracked state changes, and dev tooling may invoke them twice).
//! The web shell keeps one `InitGuard` per mounted component and routes the
//! game start through it, so the game core is started at most once per
//! component lifetime. A remounted component owns a fresh guard.

/// Per-instance flag that lets a setup routine run at most once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InitGuard {
    initialized: bool,
}

impl InitGuard {
    pub fn new() -> Self {
        Self { initialized: false }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Call `init` if the guard is unset, then set it.
    ///
    /// Returns `Some` with the initializer's result on the first call and
    /// `None` afterwards. The flag is set once `init` returns; a panic inside
    /// `init` propagates and leaves the guard unset.
    pub fn run<R>(&mut self, init: impl FnOnce() -> R) -> Option<R> {
        if self.initialized {
            return None;
        }
        let out = init();
        self.initialized = true;
        Some(out)
    }
}
