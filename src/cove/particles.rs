//! Ambient particles: fireflies, butterflies and drifting leaves.
//!
//! A fixed pool is spawned on mount and never grows or shrinks. A particle
//! that outlives its lifetime or drifts off the canvas is reset in place
//! with a fresh position, phase and lifetime.

use bevy::prelude::*;
use rand::Rng;

use crate::config::CoveConfig;
use crate::shared::*;

/// How far past the canvas edge a particle may drift before it is reset.
pub const PARTICLE_MARGIN: f32 = 20.0;

/// Fraction of a lifetime spent fading in, and again fading out.
const FADE_FRACTION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Firefly,
    Butterfly,
    Leaf,
}

impl ParticleKind {
    fn lifetime_range(self) -> std::ops::Range<f32> {
        match self {
            ParticleKind::Firefly => 4.0..9.0,
            ParticleKind::Butterfly => 6.0..12.0,
            ParticleKind::Leaf => 5.0..10.0,
        }
    }

    fn size(self) -> Vec2 {
        match self {
            ParticleKind::Firefly => Vec2::splat(3.0),
            ParticleKind::Butterfly => Vec2::new(6.0, 4.0),
            ParticleKind::Leaf => Vec2::new(5.0, 3.0),
        }
    }

    fn rgb(self, variant: u8) -> (f32, f32, f32) {
        match self {
            ParticleKind::Firefly => (1.0, 0.95, 0.55),
            ParticleKind::Butterfly => match variant % 3 {
                0 => (1.0, 0.80, 0.35),
                1 => (0.75, 0.65, 1.0),
                _ => (1.0, 1.0, 1.0),
            },
            ParticleKind::Leaf => match variant % 2 {
                0 => (0.55, 0.75, 0.30),
                _ => (0.85, 0.60, 0.25),
            },
        }
    }

    /// Whether this kind shows at the given time of day.
    pub fn is_active(self, time_of_day: TimeOfDay) -> bool {
        match self {
            ParticleKind::Firefly => time_of_day.is_dark(),
            ParticleKind::Butterfly => !time_of_day.is_dark(),
            ParticleKind::Leaf => true,
        }
    }
}

/// Canvas rectangle particles live in, in canvas pixels (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for ParticleBounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }
}

impl ParticleBounds {
    /// Inside the rectangle grown by `PARTICLE_MARGIN` on every side.
    pub fn contains_with_margin(&self, p: Vec2) -> bool {
        p.x >= self.min.x - PARTICLE_MARGIN
            && p.x <= self.max.x + PARTICLE_MARGIN
            && p.y >= self.min.y - PARTICLE_MARGIN
            && p.y <= self.max.y + PARTICLE_MARGIN
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct AmbientParticle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: f32,
    pub life: f32,
    pub max_life: f32,
    pub alpha: f32,
    pub variant: u8,
}

impl AmbientParticle {
    pub fn new(kind: ParticleKind, bounds: &ParticleBounds, rng: &mut impl Rng) -> Self {
        let mut particle = Self {
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            phase: 0.0,
            life: 0.0,
            max_life: 1.0,
            alpha: 0.0,
            variant: rng.gen(),
        };
        particle.reset(bounds, rng);
        particle
    }

    /// Redraw position, velocity, phase and lifetime from the reset
    /// distribution. Kind and colour variant are kept.
    pub fn reset(&mut self, bounds: &ParticleBounds, rng: &mut impl Rng) {
        self.pos = Vec2::new(
            rng.gen_range(bounds.min.x..bounds.max.x),
            rng.gen_range(bounds.min.y..bounds.max.y),
        );
        self.vel = match self.kind {
            ParticleKind::Firefly => Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0)),
            ParticleKind::Butterfly => Vec2::new(rng.gen_range(-22.0..22.0), rng.gen_range(-8.0..8.0)),
            ParticleKind::Leaf => Vec2::new(rng.gen_range(8.0..20.0), rng.gen_range(12.0..24.0)),
        };
        self.phase = rng.gen_range(0.0..std::f32::consts::TAU);
        self.life = 0.0;
        self.max_life = rng.gen_range(self.kind.lifetime_range());
        self.alpha = 0.0;
    }

    pub fn is_expired(&self) -> bool {
        self.life > self.max_life
    }

    /// Advance by `dt` seconds. Returns true if the particle was reset.
    pub fn update(&mut self, dt: f32, bounds: &ParticleBounds, rng: &mut impl Rng) -> bool {
        self.life += dt;
        self.phase += dt;

        let wobble = match self.kind {
            ParticleKind::Firefly => Vec2::new(self.phase.sin() * 6.0, (self.phase * 0.7).cos() * 6.0),
            ParticleKind::Butterfly => Vec2::new(0.0, (self.phase * 6.0).sin() * 24.0),
            ParticleKind::Leaf => Vec2::new(self.phase.sin() * 12.0, 0.0),
        };
        self.pos += (self.vel + wobble) * dt;

        if self.is_expired() || !bounds.contains_with_margin(self.pos) {
            self.reset(bounds, rng);
            return true;
        }

        self.alpha = particle_alpha(self.kind, self.life, self.max_life, self.phase);
        false
    }
}

/// Type-specific opacity: fireflies flicker, the rest fade in and out over
/// their lifetime.
pub fn particle_alpha(kind: ParticleKind, life: f32, max_life: f32, phase: f32) -> f32 {
    match kind {
        ParticleKind::Firefly => 0.25 + 0.75 * (0.5 + 0.5 * (phase * 4.0).sin()),
        ParticleKind::Butterfly | ParticleKind::Leaf => {
            let peak = if kind == ParticleKind::Butterfly { 0.9 } else { 0.8 };
            peak * fade_envelope(life, max_life)
        }
    }
}

/// 0 at birth, 1 through mid-life, 0 again at death.
pub fn fade_envelope(life: f32, max_life: f32) -> f32 {
    if max_life <= 0.0 {
        return 0.0;
    }
    let t = (life / max_life).clamp(0.0, 1.0);
    (t / FADE_FRACTION).min((1.0 - t) / FADE_FRACTION).min(1.0)
}

pub fn spawn_particle_layer(parent: &mut ChildBuilder, config: &CoveConfig) {
    let bounds = ParticleBounds::default();
    let mut rng = rand::thread_rng();

    let pool = [
        (ParticleKind::Firefly, config.firefly_count),
        (ParticleKind::Butterfly, config.butterfly_count),
        (ParticleKind::Leaf, config.leaf_count),
    ];
    for (kind, count) in pool {
        for i in 0..count {
            let particle = AmbientParticle::new(kind, &bounds, &mut rng);
            let (r, g, b) = kind.rgb(particle.variant);
            let z = Z_PARTICLES + i as f32 * 0.001;
            parent.spawn((
                Sprite {
                    color: Color::srgba(r, g, b, 0.0),
                    custom_size: Some(kind.size()),
                    ..default()
                },
                Transform::from_translation(canvas_to_world(particle.pos).extend(z)),
                particle,
            ));
        }
    }
}

/// Advance every particle and redraw it.
pub fn update_particles(
    time: Res<Time>,
    time_of_day: Res<TimeOfDay>,
    mut query: Query<(&mut AmbientParticle, &mut Transform, &mut Sprite, &mut Visibility)>,
) {
    let dt = time.delta_secs();
    let bounds = ParticleBounds::default();
    let mut rng = rand::thread_rng();

    for (mut particle, mut transform, mut sprite, mut visibility) in query.iter_mut() {
        particle.update(dt, &bounds, &mut rng);

        if !particle.kind.is_active(*time_of_day) {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Inherited;

        let world = canvas_to_world(particle.pos);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
        if particle.kind == ParticleKind::Butterfly {
            // Wing flap.
            transform.scale.x = 0.4 + 0.6 * (particle.phase * 14.0).sin().abs();
        } else if particle.kind == ParticleKind::Leaf {
            transform.rotation = Quat::from_rotation_z(particle.phase * 1.5);
        }

        let (r, g, b) = particle.kind.rgb(particle.variant);
        sprite.color = Color::srgba(r, g, b, particle.alpha);
    }
}
