//! State identity and resume capabilities.

use std::fmt;

/// Identifier of a reached program state.
///
/// Assigned by the virtual machine the first time a state is reached:
/// monotonically increasing, unique, never reused within one run. Derives
/// `Ord` so it can serve as the deterministic tie-breaker in rank ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u64);

impl StateId {
    /// Construct from the raw id value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque capability to resume execution from a previously reached state.
///
/// Issued by the virtual machine via `snapshot()` and consumed by
/// `restore()`. The engine never inspects the token; it only stores the
/// handle and hands it back. Cloning copies the handle, not the captured
/// state — after a snapshot has been restored, outstanding clones of it must
/// not be handed back again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    token: u64,
}

impl Snapshot {
    /// Wrap a VM-issued token.
    #[must_use]
    pub const fn new(token: u64) -> Self {
        Self { token }
    }

    /// The raw token, for the VM that issued it.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }
}
