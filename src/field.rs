// The particle field itself: owns the particles and the viewport bounds,
// advances the simulation one frame at a time, and works out which pairs
// sit close enough to be drawn connected. No browser types in here, so the
// whole simulation runs (and tests) natively.

extern crate nalgebra_glm as glm;

use rand::Rng;
use vecmath::Vector2;

use crate::color::Color;
use crate::config::FieldConfig;
use crate::particle::Particle;

// A pair of particle positions close enough to join with a stroked segment,
// plus the alpha the segment has faded to at that distance
#[derive(Copy, Clone)]
pub struct Connection {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub alpha: f64,
}

pub struct ParticleField {
    width: f64,
    height: f64,
    config: FieldConfig,
    particles: Vec<Particle>,
}

impl ParticleField {
    // Non-positive dimensions are clamped to zero rather than rejected: the
    // field degrades to particles pinned to the origin, and the page loads
    // with a blank background instead of an exception.
    pub fn new(width: f64, height: f64, config: FieldConfig) -> ParticleField {
        let mut field = ParticleField {
            width: width.max(0.0),
            height: height.max(0.0),
            config,
            particles: Vec::new(),
        };
        field.spawn_particles();
        field
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    // Viewport width picks the population tier: narrow viewports get the
    // small count, everything at or past the threshold the large one
    fn particle_count(&self) -> u32 {
        if self.width < self.config.width_threshold {
            self.config.particle_count_small
        } else {
            self.config.particle_count_large
        }
    }

    // Throw the current population away and spawn from scratch for the
    // current bounds
    fn spawn_particles(&mut self) {
        let num_particles = self.particle_count();
        self.particles.clear();
        self.particles.reserve(num_particles as usize);
        let base_color = Color::from_u32(self.config.base_color);
        let min_vel = self.config.speed_min;
        let max_vel = self.config.speed_max;
        let mut rng = rand::thread_rng();
        for _ in 0..num_particles {
            let pos_x = rng.gen::<f64>() * self.width;
            let pos_y = rng.gen::<f64>() * self.height;
            let vel_x = rng.gen::<f64>() * (max_vel - min_vel) + min_vel;
            let vel_y = rng.gen::<f64>() * (max_vel - min_vel) + min_vel;
            let radius = rng.gen::<f64>() * (self.config.size_max - self.config.size_min)
                + self.config.size_min;
            let alpha = rng.gen::<f64>() * (self.config.alpha_max - self.config.alpha_min)
                + self.config.alpha_min;
            let color = base_color.with_alpha(alpha);
            let particle = Particle::new(pos_x, pos_y, vel_x, vel_y, radius, color);
            self.particles.push(particle);
        }
    }

    // One frame step. Each particle moves by its velocity; a coordinate that
    // lands outside its bound flips that velocity component and is clamped
    // back inside in the same step, so positions are always within
    // [0, width] x [0, height] when this returns. Purely per-particle, no
    // randomness after spawn.
    pub fn advance(&mut self) {
        for particle in &mut self.particles {
            let pos: Vector2<f64> = particle.pos;
            particle.pos = vecmath::vec2_add(pos, particle.vel);
            if particle.pos[0] < 0.0 || particle.pos[0] > self.width {
                particle.vel[0] *= -1.0;
                particle.pos[0] = particle.pos[0].max(0.0);
                particle.pos[0] = particle.pos[0].min(self.width);
            }
            if particle.pos[1] < 0.0 || particle.pos[1] > self.height {
                particle.vel[1] *= -1.0;
                particle.pos[1] = particle.pos[1].max(0.0);
                particle.pos[1] = particle.pos[1].min(self.height);
            }
        }
    }

    // New bounds, fresh population. The count is re-picked from the new
    // width, never carried over.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.spawn_particles();
    }

    // Every unordered pair strictly closer than the connection distance,
    // with the stroke alpha fading linearly from 1 at distance 0 to 0 at
    // the threshold. Brute force over all pairs; at the configured counts
    // that is at most a couple of thousand distance checks per frame. A
    // spatial bucket would cut the pair count at much larger populations,
    // as long as it produces this exact pair and alpha set.
    pub fn connections(&self) -> Vec<Connection> {
        let max_distance = self.config.connection_distance;
        let mut connections = Vec::new();
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                let delta = vecmath::vec2_sub(self.particles[j].pos, self.particles[i].pos);
                let distance = glm::length(&glm::vec2(delta[0], delta[1]));
                if distance < max_distance {
                    connections.push(Connection {
                        from: self.particles[i].pos,
                        to: self.particles[j].pos,
                        alpha: 1.0 - distance / max_distance,
                    });
                }
            }
        }
        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_particle(pos_x: f64, pos_y: f64, vel_x: f64, vel_y: f64) -> Particle {
        Particle::new(
            pos_x,
            pos_y,
            vel_x,
            vel_y,
            2.0,
            Color::from_u32(0x818cf8ff),
        )
    }

    #[test]
    fn wide_viewports_get_the_large_tier() {
        let field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        assert_eq!(field.particles().len(), 60);
    }

    #[test]
    fn the_threshold_itself_counts_as_wide() {
        let field = ParticleField::new(768.0, 600.0, FieldConfig::default());
        assert_eq!(field.particles().len(), 60);
    }

    #[test]
    fn narrow_viewports_get_the_small_tier() {
        let field = ParticleField::new(500.0, 600.0, FieldConfig::default());
        assert_eq!(field.particles().len(), 30);
    }

    #[test]
    fn spawned_particles_start_inside_bounds() {
        let field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        for particle in field.particles() {
            assert!(particle.pos[0] >= 0.0 && particle.pos[0] <= 800.0);
            assert!(particle.pos[1] >= 0.0 && particle.pos[1] <= 600.0);
        }
    }

    #[test]
    fn spawned_radii_velocities_and_alphas_respect_the_config() {
        let field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        for particle in field.particles() {
            assert!(particle.radius >= 1.0 && particle.radius <= 4.0);
            assert!(particle.vel[0] >= -0.5 && particle.vel[0] <= 0.5);
            assert!(particle.vel[1] >= -0.5 && particle.vel[1] <= 0.5);
            // alpha_min/alpha_max scaled to u8, with a step of rounding slack
            assert!(particle.color.a >= 25 && particle.color.a <= 154);
            assert_eq!(particle.color.r, 0x81);
            assert_eq!(particle.color.g, 0x8c);
            assert_eq!(particle.color.b, 0xf8);
        }
    }

    #[test]
    fn advance_moves_an_interior_particle_by_exactly_its_velocity() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(400.0, 300.0, 0.4, -0.3)];
        field.advance();
        let particle = field.particles[0];
        assert!((particle.pos[0] - 400.4).abs() < 1e-12);
        assert!((particle.pos[1] - 299.7).abs() < 1e-12);
        assert_eq!(particle.vel, [0.4, -0.3]);
    }

    #[test]
    fn crossing_the_right_edge_reflects_and_clamps() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(799.9, 300.0, 0.5, 0.0)];
        field.advance();
        let particle = field.particles[0];
        assert_eq!(particle.pos, [800.0, 300.0]);
        assert_eq!(particle.vel, [-0.5, 0.0]);
        // and it is actually moving left on the next step
        field.advance();
        assert!((field.particles[0].pos[0] - 799.5).abs() < 1e-12);
    }

    #[test]
    fn crossing_the_left_edge_reflects_and_clamps() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(0.1, 300.0, -0.5, 0.0)];
        field.advance();
        let particle = field.particles[0];
        assert_eq!(particle.pos, [0.0, 300.0]);
        assert_eq!(particle.vel, [0.5, 0.0]);
    }

    #[test]
    fn crossing_the_top_edge_reflects_and_clamps() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(400.0, 0.2, 0.0, -0.4)];
        field.advance();
        let particle = field.particles[0];
        assert_eq!(particle.pos, [400.0, 0.0]);
        assert_eq!(particle.vel, [0.0, 0.4]);
    }

    #[test]
    fn crossing_the_bottom_edge_reflects_and_clamps() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(400.0, 599.8, 0.0, 0.4)];
        field.advance();
        let particle = field.particles[0];
        assert_eq!(particle.pos, [400.0, 600.0]);
        assert_eq!(particle.vel, [0.0, -0.4]);
    }

    #[test]
    fn corners_reflect_both_axes_independently() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(799.9, 599.9, 0.5, 0.5)];
        field.advance();
        let particle = field.particles[0];
        assert_eq!(particle.pos, [800.0, 600.0]);
        assert_eq!(particle.vel, [-0.5, -0.5]);
    }

    #[test]
    fn positions_stay_inside_bounds_over_many_frames() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        for _ in 0..2000 {
            field.advance();
            for particle in field.particles() {
                assert!(particle.pos[0] >= 0.0 && particle.pos[0] <= 800.0);
                assert!(particle.pos[1] >= 0.0 && particle.pos[1] <= 600.0);
            }
        }
    }

    #[test]
    fn connection_alpha_fades_linearly_with_distance() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![
            test_particle(0.0, 0.0, 0.0, 0.0),
            test_particle(100.0, 0.0, 0.0, 0.0),
        ];
        let connections = field.connections();
        assert_eq!(connections.len(), 1);
        assert!((connections[0].alpha - (1.0 - 100.0 / 150.0)).abs() < 1e-12);
    }

    #[test]
    fn pairs_exactly_at_the_threshold_are_not_connected() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![
            test_particle(0.0, 0.0, 0.0, 0.0),
            test_particle(150.0, 0.0, 0.0, 0.0),
        ];
        assert!(field.connections().is_empty());

        field.particles[1].pos[0] = 150.0 - 1e-9;
        assert_eq!(field.connections().len(), 1);
    }

    #[test]
    fn connections_are_order_independent() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![
            test_particle(10.0, 20.0, 0.0, 0.0),
            test_particle(90.0, 60.0, 0.0, 0.0),
        ];
        let forward = field.connections();

        field.particles.reverse();
        let reversed = field.connections();

        assert_eq!(forward.len(), 1);
        assert_eq!(reversed.len(), 1);
        assert!((forward[0].alpha - reversed[0].alpha).abs() < 1e-12);
    }

    #[test]
    fn a_lone_particle_never_connects_to_itself() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        field.particles = vec![test_particle(400.0, 300.0, 0.0, 0.0)];
        assert!(field.connections().is_empty());
    }

    #[test]
    fn resize_repicks_the_tier_from_the_new_width() {
        let mut field = ParticleField::new(800.0, 600.0, FieldConfig::default());
        assert_eq!(field.particles().len(), 60);

        field.resize(500.0, 400.0);
        assert_eq!(field.particles().len(), 30);
        for particle in field.particles() {
            assert!(particle.pos[0] >= 0.0 && particle.pos[0] <= 500.0);
            assert!(particle.pos[1] >= 0.0 && particle.pos[1] <= 400.0);
        }

        field.resize(900.0, 100.0);
        assert_eq!(field.particles().len(), 60);
    }

    #[test]
    fn degenerate_dimensions_pin_particles_to_the_origin() {
        let mut field = ParticleField::new(0.0, 0.0, FieldConfig::default());
        assert_eq!(field.particles().len(), 30);
        for _ in 0..5 {
            field.advance();
            for particle in field.particles() {
                assert_eq!(particle.pos, [0.0, 0.0]);
            }
        }
    }

    #[test]
    fn negative_dimensions_are_treated_as_zero() {
        let field = ParticleField::new(-10.0, -10.0, FieldConfig::default());
        assert_eq!(field.width(), 0.0);
        assert_eq!(field.height(), 0.0);
        assert_eq!(field.particles().len(), 30);
        for particle in field.particles() {
            assert_eq!(particle.pos, [0.0, 0.0]);
        }
    }
}
