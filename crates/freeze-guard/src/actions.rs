use crate::domain_models::{ResourceRef, ServiceFreezeStatus};
use crate::oracle::OracleError;

/// Triggers into the freeze monitor.
/// Every source (startup, history events, DOM mutations, the re-check timer,
/// finished freeze queries) is funnelled through one queue.
#[derive(Debug, Clone)]
pub enum Action {
    /// Guard loaded on the page
    Bootstrap,
    /// History navigation event or location poll
    LocationChanged,
    /// Structural change somewhere under the document body
    DomMutated,
    /// Fixed-period freeze re-check
    RecheckTick,
    /// A freeze query finished
    FreezeStatusLoaded {
        generation: u64,
        target: ResourceRef,
        result: Result<ServiceFreezeStatus, OracleError>,
    },
    /// Page is unloading; tear everything down
    Shutdown,
}

/// Why a freeze check was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckReason {
    Startup,
    Navigation,
    Timer,
}
