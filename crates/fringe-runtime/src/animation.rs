#![forbid(unsafe_code)]

//! Double-buffered frame loop.
//!
//! [`AnimationLoop`] ties a [`Simulation`] to a [`FrameScheduler`] and a
//! [`Present`] sink. Each delivered frame is drawn into the back surface,
//! the surfaces are swapped, the front surface is presented, and the next
//! frame is scheduled.
//!
//! # Invariants
//!
//! - At most one frame is pending at any time.
//! - A delivered handle that is not the pending one is ignored.
//! - Stopping cancels the pending frame exactly once; dropping the loop
//!   stops it.

use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::simulation::{FrameReport, Simulation};
use fringe_core::Controls;
use fringe_render::{DoubleBuffer, Present, Surface};
use std::io;

/// Frame loop over a simulation.
pub struct AnimationLoop<S: FrameScheduler, P: Present> {
    simulation: Simulation,
    buffers: DoubleBuffer,
    scheduler: S,
    presenter: P,
    controls: Controls,
    pending: Option<FrameHandle>,
    presented: u64,
}

impl<S: FrameScheduler, P: Present> AnimationLoop<S, P> {
    /// Create a stopped loop; surfaces match the simulation canvas.
    pub fn new(simulation: Simulation, scheduler: S, presenter: P, controls: Controls) -> Self {
        let geometry = simulation.config().geometry;
        Self {
            buffers: DoubleBuffer::new(geometry.width, geometry.height),
            simulation,
            scheduler,
            presenter,
            controls,
            pending: None,
            presented: 0,
        }
    }

    /// Schedule the first frame. Idempotent while running.
    pub fn start(&mut self) -> FrameHandle {
        if let Some(handle) = self.pending {
            return handle;
        }
        let handle = self.scheduler.schedule();
        tracing::debug!(handle = handle.id(), "animation started");
        self.pending = Some(handle);
        handle
    }

    /// Cancel the pending frame. Returns `false` if the loop was not
    /// running.
    pub fn stop(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                tracing::debug!(handle = handle.id(), "animation stopped");
                true
            }
            None => false,
        }
    }

    /// Whether a frame is pending.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the controls for subsequent frames.
    ///
    /// A mode change takes effect immediately (particles and landings are
    /// cleared). A geometry change cancels the pending frame, drops
    /// in-flight particles and reschedules, so no frame is drawn with
    /// particles aimed at the old slits.
    pub fn set_controls(&mut self, controls: Controls) {
        let previous = self.controls;
        self.controls = controls;
        self.simulation.set_mode(controls.mode);
        if previous.params.geometry_differs(&controls.params) {
            self.simulation.observe_params(&controls.params.sanitized());
            if self.stop() {
                self.start();
            }
        }
    }

    /// Controls in effect.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Handle a frame callback.
    ///
    /// Returns `Ok(None)` for stale handles. Presentation errors are
    /// returned after the next frame has been scheduled, so the host decides
    /// whether to stop.
    pub fn on_frame(&mut self, handle: FrameHandle) -> io::Result<Option<FrameReport>> {
        if self.pending != Some(handle) {
            tracing::trace!(handle = handle.id(), "ignoring stale frame");
            return Ok(None);
        }
        self.pending = None;

        let report = self.simulation.step(&self.controls, self.buffers.back_mut());
        self.buffers.swap();
        let presented = self.presenter.present(self.buffers.front());
        self.pending = Some(self.scheduler.schedule());
        presented?;
        self.presented += 1;
        Ok(Some(report))
    }

    /// Deliver up to `frames` scheduled frames, blocking on the scheduler.
    /// Returns how many frames were drawn.
    pub fn run_frames(&mut self, frames: usize) -> io::Result<usize> {
        let mut drawn = 0;
        while drawn < frames && self.is_running() {
            let Some(handle) = self.scheduler.next_frame() else {
                break;
            };
            if self.on_frame(handle)?.is_some() {
                drawn += 1;
            }
        }
        Ok(drawn)
    }

    /// Deliver the pending frame if it is due, without blocking.
    pub fn poll(&mut self) -> io::Result<Option<FrameReport>> {
        match self.scheduler.poll_ready() {
            Some(handle) => self.on_frame(handle),
            None => Ok(None),
        }
    }

    /// Frames successfully presented.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// The simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Mutable simulation.
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Most recently completed frame.
    pub fn front(&self) -> &Surface {
        self.buffers.front()
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable scheduler (hosts inject or cancel frames through this).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

impl<S: FrameScheduler, P: Present> Drop for AnimationLoop<S, P> {
    fn drop(&mut self) {
        self.stop();
    }
}
