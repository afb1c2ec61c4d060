use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::config::{Palette, SimulationConfig};
use crate::error::LifecycleError;
use crate::field::{SimulationState, Viewport};
use crate::physics;
use crate::proximity::ProximityGraph;
use crate::render::{Renderer, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Running,
    Disposed,
}

/// Owns the particle field and drives it one frame at a time.
///
/// The host is expected to call [`Engine::tick`] once per display frame
/// and forward pointer and resize events as they arrive. Events only stage
/// data; all simulation work happens inside `tick`. Once disposed, every
/// entry point is a no-op, including ticks that were already scheduled.
pub struct Engine {
    config: SimulationConfig,
    renderer: Renderer,
    rng: StdRng,
    lifecycle: Lifecycle,
    state: Option<SimulationState>,
    missing_surface_reported: bool,
}

impl Engine {
    pub fn new(config: SimulationConfig, palette: Palette) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Engine {
            config,
            renderer: Renderer::new(palette),
            rng,
            lifecycle: Lifecycle::Uninitialized,
            state: None,
            missing_surface_reported: false,
        }
    }

    pub fn start(&mut self, viewport: Viewport) -> Result<(), LifecycleError> {
        match self.lifecycle {
            Lifecycle::Running => return Err(LifecycleError::AlreadyRunning),
            Lifecycle::Disposed => return Err(LifecycleError::Disposed),
            Lifecycle::Uninitialized => {}
        }

        let state = SimulationState::initialize(viewport, &self.config, &mut self.rng);
        info!(
            width = viewport.width,
            height = viewport.height,
            particles = state.particles.len(),
            "particle field started"
        );
        self.state = Some(state);
        self.lifecycle = Lifecycle::Running;
        Ok(())
    }

    /// Runs one frame: step, build the proximity graph, paint.
    ///
    /// Returns whether a frame was drawn. Without a surface nothing is
    /// simulated or drawn.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: Option<&mut S>) -> bool {
        if self.lifecycle != Lifecycle::Running {
            trace!(lifecycle = ?self.lifecycle, "tick ignored");
            return false;
        }
        let surface = match surface {
            Some(surface) => surface,
            None => {
                if !self.missing_surface_reported {
                    warn!("no drawing surface available, skipping frames");
                    self.missing_surface_reported = true;
                }
                return false;
            }
        };
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return false,
        };

        physics::advance(state, &self.config);
        let graph = ProximityGraph::build(state, &self.config);
        self.renderer.render(state, &graph, surface);
        trace!(edges = graph.len(), "frame drawn");
        true
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(state) = self.running_state() {
            state.pointer.move_to(x, y);
        }
    }

    pub fn pointer_pressed(&mut self) {
        if let Some(state) = self.running_state() {
            state.pointer.press();
        }
    }

    pub fn resized(&mut self, viewport: Viewport) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        if let Some(state) = self.state.as_mut() {
            let before = state.particles.len();
            state.resize(viewport, &self.config, &mut self.rng);
            debug!(
                width = viewport.width,
                height = viewport.height,
                before,
                after = state.particles.len(),
                "particle field repopulated"
            );
        }
    }

    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.lifecycle = Lifecycle::Disposed;
        self.state = None;
        info!("particle field disposed");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    #[cfg(test)]
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.renderer.palette
    }

    fn running_state(&mut self) -> Option<&mut SimulationState> {
        if self.lifecycle == Lifecycle::Running {
            self.state.as_mut()
        } else {
            None
        }
    }
}
