use crate::config::SimulationConfig;
use crate::field::SimulationState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Particle(usize),
    Pointer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: Endpoint,
    pub opacity: f32,
}

/// Edges between everything within interaction range in the current frame.
///
/// Edges are grouped by their `from` particle in ascending order; within a
/// group the particle-particle edges come first (by ascending `to`), then
/// the pointer edge if there is one.
#[derive(Clone, Debug, Default)]
pub struct ProximityGraph {
    edges: Vec<Edge>,
}

impl ProximityGraph {
    pub fn build(state: &SimulationState, config: &SimulationConfig) -> Self {
        let particles = &state.particles;
        let pointer = &state.pointer;
        let mut edges = Vec::new();

        for (i, a) in particles.iter().enumerate() {
            for (j, b) in particles.iter().enumerate().skip(i + 1) {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if distance < config.connection_distance {
                    edges.push(Edge {
                        from: i,
                        to: Endpoint::Particle(j),
                        opacity: falloff(distance, config.connection_distance),
                    });
                }
            }

            let distance = (a.x - pointer.x).hypot(a.y - pointer.y);
            if distance < config.pointer_influence_distance {
                edges.push(Edge {
                    from: i,
                    to: Endpoint::Pointer,
                    opacity: falloff(distance, config.pointer_influence_distance),
                });
            }
        }

        ProximityGraph { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[cfg(test)]
    pub fn pair_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|edge| matches!(edge.to, Endpoint::Particle(_)))
    }

    #[cfg(test)]
    pub fn pointer_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| edge.to == Endpoint::Pointer)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Linear falloff from 1 at zero distance to 0 at `range`.
pub fn falloff(distance: f32, range: f32) -> f32 {
    (1.0 - distance / range).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ColorClass, Particle, PointerState, Viewport};
    use approx::assert_relative_eq;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 2.0,
            color: ColorClass::B,
        }
    }

    fn state(particles: Vec<Particle>, pointer: PointerState) -> SimulationState {
        SimulationState {
            particles,
            pointer,
            viewport: Viewport::new(1000, 1000),
        }
    }

    #[test]
    fn opacity_falls_off_linearly() {
        assert_relative_eq!(falloff(100.0, 200.0), 0.5);
        assert_eq!(falloff(200.0, 200.0), 0.0);
        assert_eq!(falloff(0.0, 200.0), 1.0);
    }

    #[test]
    fn pair_at_half_range_is_half_opaque() {
        let config = SimulationConfig::default();
        let graph = ProximityGraph::build(
            &state(vec![at(0.0, 0.0), at(60.0, 80.0)], PointerState::default()),
            &config,
        );

        assert_eq!(graph.len(), 1);
        let edge = graph.edges()[0];
        assert_eq!(edge.from, 0);
        assert_eq!(edge.to, Endpoint::Particle(1));
        assert_relative_eq!(edge.opacity, 0.5);
    }

    #[test]
    fn pair_at_exact_range_is_not_connected() {
        let config = SimulationConfig::default();
        let graph = ProximityGraph::build(
            &state(vec![at(0.0, 0.0), at(200.0, 0.0)], PointerState::default()),
            &config,
        );

        assert!(graph.is_empty());
    }

    #[test]
    fn pointer_edges_use_influence_range() {
        let config = SimulationConfig::default();
        let pointer = PointerState {
            x: 0.0,
            y: 0.0,
            clicked: false,
        };
        let graph = ProximityGraph::build(
            &state(vec![at(150.0, 0.0), at(0.0, 299.0), at(0.0, -300.0)], pointer),
            &config,
        );

        let pointer_edges: Vec<_> = graph.pointer_edges().collect();
        assert_eq!(pointer_edges.len(), 2);
        assert_eq!(pointer_edges[0].from, 0);
        assert_relative_eq!(pointer_edges[0].opacity, 0.5);
        assert_eq!(pointer_edges[1].from, 1);
        assert_eq!(graph.pair_edges().count(), 0);
    }

    #[test]
    fn every_close_pair_appears_once_in_order() {
        let config = SimulationConfig::default();
        let particles = vec![at(0.0, 0.0), at(10.0, 0.0), at(20.0, 0.0)];
        let graph = ProximityGraph::build(&state(particles, PointerState::default()), &config);

        let pairs: Vec<_> = graph
            .pair_edges()
            .map(|edge| (edge.from, edge.to))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (0, Endpoint::Particle(1)),
                (0, Endpoint::Particle(2)),
                (1, Endpoint::Particle(2)),
            ]
        );
    }
}
