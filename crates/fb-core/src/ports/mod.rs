//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the onboarding logic to remain independent of
//! storage, transport and identity providers.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port to `fb-core/ports`, ask yourself three questions:
//!
//! 1. **Does this port represent a business capability?**
//! 2. **Will it be depended upon by multiple use cases or domains?**
//! 3. **Is it implemented by the infrastructure layer?**
//!
//! If all three answers are **yes**, place it in `fb-core/ports`.
//! Otherwise, place it in the relevant domain submodule.

pub mod auth;
mod clock;
pub mod remote_onboarding;
pub mod sports_catalog;
pub mod storage_slot;

pub use auth::{AuthError, AuthSessionPort};
pub use clock::ClockPort;
pub use remote_onboarding::{RemoteError, RemoteOnboardingPort};
pub use sports_catalog::SportsCatalogPort;
pub use storage_slot::StorageSlotPort;
