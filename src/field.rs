use rand::Rng;

use crate::config::SimulationConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorClass {
    A,
    B,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: ColorClass,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(viewport: Viewport, config: &SimulationConfig, rng: &mut R) -> Self {
        let speed = config.max_speed;
        Particle {
            x: rng.gen::<f32>() * viewport.width as f32,
            y: rng.gen::<f32>() * viewport.height as f32,
            vx: rng.gen_range(-speed..=speed),
            vy: rng.gen_range(-speed..=speed),
            size: rng.gen_range(config.size_min..config.size_max),
            color: if rng.gen_bool(0.5) {
                ColorClass::A
            } else {
                ColorClass::B
            },
        }
    }

    #[cfg(test)]
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }
}

pub type Particles = Vec<Particle>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub clicked: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        // far enough off-screen that nothing is in range
        PointerState {
            x: -1000.0,
            y: -1000.0,
            clicked: false,
        }
    }
}

impl PointerState {
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn press(&mut self) {
        self.clicked = true;
    }

    /// Clears the click flag, returning whether it was set.
    pub fn consume_click(&mut self) -> bool {
        std::mem::replace(&mut self.clicked, false)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport { width, height }
    }
}

#[derive(Clone, Debug)]
pub struct SimulationState {
    pub particles: Particles,
    pub pointer: PointerState,
    pub viewport: Viewport,
}

impl SimulationState {
    pub fn initialize<R: Rng + ?Sized>(viewport: Viewport, config: &SimulationConfig, rng: &mut R) -> Self {
        SimulationState {
            particles: populate(viewport, config, rng),
            pointer: PointerState::default(),
            viewport,
        }
    }

    pub fn particle_count_for(width: u32, config: &SimulationConfig) -> usize {
        if width < config.mobile_breakpoint {
            config.mobile_particle_count
        } else {
            config.desktop_particle_count
        }
    }

    /// Throws away the whole population and regenerates it for `viewport`.
    /// The pointer is left untouched.
    pub fn resize<R: Rng + ?Sized>(&mut self, viewport: Viewport, config: &SimulationConfig, rng: &mut R) {
        self.viewport = viewport;
        self.particles = populate(viewport, config, rng);
    }
}

fn populate<R: Rng + ?Sized>(viewport: Viewport, config: &SimulationConfig, rng: &mut R) -> Particles {
    let count = SimulationState::particle_count_for(viewport.width, config);
    (0..count)
        .map(|_| Particle::random(viewport, config, rng))
        .collect()
}
