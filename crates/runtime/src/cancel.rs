use std::cell::Cell;
use std::rc::Rc;

/// Session-wide generation counter.
///
/// Each reset bumps the generation; tokens minted before the bump observe
/// themselves as cancelled at their next suspension point. Single-threaded by
/// design, so a shared `Cell` is all the synchronization needed.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Rc<Cell<u64>>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.get()
    }

    /// Invalidates every token minted for the current generation.
    pub fn bump(&self) -> u64 {
        let next = self.current.get() + 1;
        self.current.set(next);
        next
    }

    /// Mints a token tied to the current generation.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            counter: Rc::clone(&self.current),
            generation: self.current.get(),
        }
    }
}

/// Cooperative cancellation token checked at the top of every frame and timer
/// callback. Once stale, all work holding it must no-op and resolve quietly.
#[derive(Debug, Clone)]
pub struct CancelToken {
    counter: Rc<Cell<u64>>,
    generation: u64,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.counter.get() != self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
