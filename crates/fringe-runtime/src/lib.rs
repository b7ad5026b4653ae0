#![forbid(unsafe_code)]

//! Runtime: particle engine, screen accumulation, and the frame loop.
//!
//! # Role in Fringe
//! `fringe-runtime` owns mutable simulation state and decides when frames
//! happen. It pulls intensities and landing samples from `fringe-core`,
//! draws through `fringe-render`, and hands finished surfaces to any
//! [`fringe_render::Present`] sink.
//!
//! # Frame order
//! 1. Mode and geometry bookkeeping (clearing as needed).
//! 2. Particle mode: emission, advancement, landing, fading.
//! 3. Drawing into the back surface, swap, present.
//! 4. Scheduling the next frame.

pub mod accumulation;
pub mod animation;
pub mod config;
pub mod particles;
pub mod scene;
pub mod scheduler;
pub mod simulation;

pub use accumulation::{ScreenAccumulationBuffer, ScreenPoint};
pub use animation::AnimationLoop;
pub use config::{ConfigError, RuntimeConfig};
pub use particles::{FrameStats, Particle, ParticleEngine};
pub use scene::SceneRenderer;
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler, RefreshScheduler};
pub use simulation::{FrameReport, Simulation};
