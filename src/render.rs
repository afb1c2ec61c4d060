use crate::config::{Palette, Rgba};
use crate::field::{ColorClass, SimulationState};
use crate::proximity::{Endpoint, ProximityGraph};

/// Something the field can be painted onto.
pub trait Surface {
    fn clear(&mut self);
    fn fill_glow_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba, blur: f32);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    GlowCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgba,
        blur: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgba,
        width: f32,
    },
}

/// A surface that only records what was drawn, so a frame can be produced
/// in one place and replayed onto the real target later.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    calls: Vec<DrawCall>,
}

impl DisplayList {
    #[cfg(test)]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for call in &self.calls {
            match *call {
                DrawCall::Clear => surface.clear(),
                DrawCall::GlowCircle {
                    x,
                    y,
                    radius,
                    color,
                    blur,
                } => surface.fill_glow_circle(x, y, radius, color, blur),
                DrawCall::Line {
                    from,
                    to,
                    color,
                    width,
                } => surface.line(from, to, color, width),
            }
        }
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        // everything before a clear is invisible anyway
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn fill_glow_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba, blur: f32) {
        self.calls.push(DrawCall::GlowCircle {
            x,
            y,
            radius,
            color,
            blur,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            color,
            width,
        });
    }
}

#[derive(Clone, Debug, Default)]
pub struct Renderer {
    pub palette: Palette,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Renderer { palette }
    }

    /// Clears the surface and paints one frame. Each particle is filled,
    /// then the edges leaving it are stroked.
    pub fn render<S: Surface + ?Sized>(
        &self,
        state: &SimulationState,
        graph: &ProximityGraph,
        surface: &mut S,
    ) {
        let palette = &self.palette;
        let mut edges = graph.edges().iter().peekable();

        surface.clear();

        for (i, particle) in state.particles.iter().enumerate() {
            let color = match particle.color {
                ColorClass::A => palette.class_a,
                ColorClass::B => palette.class_b,
            };
            surface.fill_glow_circle(particle.x, particle.y, particle.size, color, palette.glow_blur);

            while let Some(edge) = edges.next_if(|edge| edge.from == i) {
                let from = (particle.x, particle.y);
                match edge.to {
                    Endpoint::Particle(j) => {
                        let other = &state.particles[j];
                        surface.line(
                            from,
                            (other.x, other.y),
                            palette
                                .pair_edge
                                .with_alpha(edge.opacity * palette.pair_edge_intensity),
                            palette.pair_edge_width,
                        );
                    }
                    Endpoint::Pointer => {
                        surface.line(
                            from,
                            (state.pointer.x, state.pointer.y),
                            palette
                                .pointer_edge
                                .with_alpha(edge.opacity * palette.pointer_edge_intensity),
                            palette.pointer_edge_width,
                        );
                    }
                }
            }
        }
    }
}
