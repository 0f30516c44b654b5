//! Deterministic simulation module
//!
//! All animation logic lives here. This module must stay platform-free:
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or browser dependencies

pub mod ice;
pub mod input;
pub mod particle;
pub mod policy;
pub mod state;
pub mod step;
pub mod store;

pub use ice::{IceBlock, IceField, IceOptions, RelaxReport, count_overlaps, relax, scatter};
pub use input::{PointerState, advance_ambient, clicked, pointer_left, pointer_moved};
pub use particle::{Particle, Phase};
pub use policy::{
    AmbientSpawn, CountRange, LifecyclePolicy, OpacityCurve, PointerMode, Replication, Span,
    SpawnRanges, SpawnRegion,
};
pub use state::SimContext;
pub use step::step;
pub use store::ParticleStore;
