use crate::config::SimulationConfig;
use crate::field::{Particle, PointerState, SimulationState, Viewport};

/// Advances every particle by one frame, then consumes the pointer's click.
///
/// Each particle is moved by its velocity, has its velocity reflected if it
/// ended up outside the viewport, and is finally displaced by the pointer:
/// pushed away if a click is pending and it lies within `click_radius`,
/// otherwise pulled in if it lies within `pointer_influence_distance`.
/// Positions are never clamped, so a particle may sit up to one frame's
/// displacement outside the viewport.
pub fn advance(state: &mut SimulationState, config: &SimulationConfig) {
    let viewport = state.viewport;
    let pointer = state.pointer;

    for particle in state.particles.iter_mut() {
        integrate(particle);
        reflect(particle, viewport);
        apply_pointer(particle, &pointer, config);
    }

    state.pointer.consume_click();
}

fn integrate(particle: &mut Particle) {
    particle.x += particle.vx;
    particle.y += particle.vy;
}

fn reflect(particle: &mut Particle, viewport: Viewport) {
    if particle.x < 0.0 || particle.x > viewport.width as f32 {
        particle.vx = -particle.vx;
    }
    if particle.y < 0.0 || particle.y > viewport.height as f32 {
        particle.vy = -particle.vy;
    }
}

fn apply_pointer(particle: &mut Particle, pointer: &PointerState, config: &SimulationConfig) {
    let dx = pointer.x - particle.x;
    let dy = pointer.y - particle.y;
    let distance = dx.hypot(dy);

    // no direction to push along, and dividing by it would poison the
    // particle with NaN for good
    if distance == 0.0 {
        return;
    }

    let (ux, uy) = (dx / distance, dy / distance);

    if pointer.clicked && distance < config.click_radius {
        let force = (config.click_radius - distance) / config.click_radius;
        particle.x -= ux * force * config.click_force_scale;
        particle.y -= uy * force * config.click_force_scale;
    } else if distance < config.pointer_influence_distance {
        let force =
            (config.pointer_influence_distance - distance) / config.pointer_influence_distance;
        particle.x += ux * force * config.hover_force_scale;
        particle.y += uy * force * config.hover_force_scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ColorClass;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f32, y: f32) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 3.0,
            color: ColorClass::A,
        }
    }

    fn single(particle: Particle, pointer: PointerState) -> SimulationState {
        SimulationState {
            particles: vec![particle],
            pointer,
            viewport: Viewport::new(1000, 1000),
        }
    }

    fn distance_to(state: &SimulationState, x: f32, y: f32) -> f32 {
        let p = &state.particles[0];
        (p.x - x).hypot(p.y - y)
    }

    #[test]
    fn speed_is_conserved_without_pointer() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = SimulationState::initialize(Viewport::new(400, 300), &config, &mut rng);
        let speeds: Vec<f32> = state.particles.iter().map(Particle::speed).collect();

        for _ in 0..2000 {
            advance(&mut state, &config);
        }

        for (particle, speed) in state.particles.iter().zip(speeds) {
            assert_relative_eq!(particle.speed(), speed);
        }
    }

    #[test]
    fn overshoot_is_reflected_not_clamped() {
        let config = SimulationConfig::default();
        let mut particle = still(999.5, 500.0);
        particle.vx = 1.5;
        let mut state = single(particle, PointerState::default());

        advance(&mut state, &config);

        let p = &state.particles[0];
        assert_eq!(p.vx, -1.5);
        assert!(p.x > 1000.0);
        assert!(p.x <= 1001.5);
    }

    #[test]
    fn click_pushes_particle_away() {
        let config = SimulationConfig::default();
        let pointer = PointerState {
            x: 600.0,
            y: 500.0,
            clicked: true,
        };
        let mut state = single(still(500.0, 500.0), pointer);

        advance(&mut state, &config);

        // force (400 - 100) / 400 = 0.75, times a scale of 50
        assert_relative_eq!(state.particles[0].x, 500.0 - 0.75 * 50.0);
        assert_relative_eq!(state.particles[0].y, 500.0);
        assert!(distance_to(&state, 600.0, 500.0) > 100.0);
    }

    #[test]
    fn hover_pulls_particle_in() {
        let config = SimulationConfig::default();
        let pointer = PointerState {
            x: 500.0,
            y: 650.0,
            clicked: false,
        };
        let mut state = single(still(500.0, 500.0), pointer);

        advance(&mut state, &config);

        // force (300 - 150) / 300 = 0.5, times a scale of 2
        assert_relative_eq!(state.particles[0].y, 501.0);
        assert!(distance_to(&state, 500.0, 650.0) < 150.0);
    }

    #[test]
    fn click_beyond_radius_falls_back_to_nothing() {
        let config = SimulationConfig::default();
        let pointer = PointerState {
            x: 500.0,
            y: 950.0,
            clicked: true,
        };
        let mut state = single(still(500.0, 500.0), pointer);

        advance(&mut state, &config);

        assert_eq!(state.particles[0], still(500.0, 500.0));
    }

    #[test]
    fn click_is_consumed_after_one_step() {
        let config = SimulationConfig::default();
        let mut state = single(still(500.0, 500.0), PointerState::default());
        state.pointer.move_to(600.0, 500.0);
        state.pointer.press();

        advance(&mut state, &config);
        assert!(!state.pointer.clicked);
        let after_click = state.particles[0].x;
        assert!(after_click < 500.0);

        advance(&mut state, &config);
        // second step is a hover pull back towards the pointer
        assert!(state.particles[0].x > after_click);
    }

    #[test]
    fn click_is_consumed_with_no_particles() {
        let config = SimulationConfig::default();
        let mut state = SimulationState {
            particles: Vec::new(),
            pointer: PointerState::default(),
            viewport: Viewport::new(10, 10),
        };
        state.pointer.press();

        advance(&mut state, &config);

        assert!(!state.pointer.clicked);
    }

    #[test]
    fn pointer_on_top_of_particle_applies_no_force() {
        let config = SimulationConfig::default();
        for clicked in [false, true].iter().copied() {
            let pointer = PointerState {
                x: 500.0,
                y: 500.0,
                clicked,
            };
            let mut state = single(still(500.0, 500.0), pointer);

            advance(&mut state, &config);

            let p = &state.particles[0];
            assert!(p.x.is_finite() && p.y.is_finite());
            assert_eq!((p.x, p.y), (500.0, 500.0));
        }
    }
}
