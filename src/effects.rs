//! Cosmetic effects fed by game events: particles from cleared cells,
//! power-up markers and screen shake. Nothing here feeds back into the game.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::board::WIDTH;
use crate::game::GameEvent;
use crate::piece::BlockColor;

/// Particles spawned per cleared cell.
const PARTICLES_PER_CELL: usize = 3;
const PARTICLE_LIFETIME: u32 = 60;
/// Downward acceleration in cells per frame squared.
const PARTICLE_GRAVITY: f32 = 0.01;
/// Chance that a clear leaves a power-up marker behind.
const POWER_UP_CHANCE: f64 = 0.1;
const POWER_UP_LIFETIME: u32 = 300;
const SHAKE_FRAMES: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Board coordinates in cells; fractional.
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub color: BlockColor,
    life: u32,
}

impl Particle {
    /// Remaining life in 0.0..=1.0.
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFETIME as f32
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    ClearLine,
    SlowTime,
    GhostBlock,
}

impl PowerUpKind {
    const ALL: [Self; 3] = [Self::ClearLine, Self::SlowTime, Self::GhostBlock];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::ClearLine => "≡",
            Self::SlowTime => "◷",
            Self::GhostBlock => "◌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub x: usize,
    pub y: usize,
    life: u32,
}

impl PowerUp {
    pub fn alpha(&self) -> f32 {
        self.life as f32 / POWER_UP_LIFETIME as f32
    }
}

#[derive(Debug)]
pub struct Effects {
    particles: Vec<Particle>,
    power_ups: Vec<PowerUp>,
    shake_frames: u32,
    rng: StdRng,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            power_ups: Vec::new(),
            shake_frames: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    /// Horizontal board offset (in cells) for this frame.
    pub fn shake_offset(&self) -> u16 {
        u16::from(self.shake_frames % 2 == 1)
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.power_ups.clear();
        self.shake_frames = 0;
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started => self.clear(),
            GameEvent::ScreenShake => self.shake_frames = SHAKE_FRAMES,
            GameEvent::LinesCleared { rows, colors } => {
                self.burst(rows, colors);
                self.maybe_power_up(rows);
            }
            _ => {}
        }
    }

    fn burst(&mut self, rows: &[usize], colors: &[crate::board::Row]) {
        for (&y, row) in rows.iter().zip(colors) {
            for (x, cell) in row.iter().enumerate() {
                let Some(color) = *cell else { continue };
                for _ in 0..PARTICLES_PER_CELL {
                    self.particles.push(Particle {
                        x: x as f32 + 0.5,
                        y: y as f32 + 0.5,
                        vx: self.rng.random_range(-0.3..=0.3),
                        vy: self.rng.random_range(-0.5..=-0.1),
                        color,
                        life: PARTICLE_LIFETIME,
                    });
                }
            }
        }
    }

    fn maybe_power_up(&mut self, rows: &[usize]) {
        if !self.rng.random_bool(POWER_UP_CHANCE) {
            return;
        }
        let Some(&y) = rows.choose(&mut self.rng) else {
            return;
        };
        let Some(&kind) = PowerUpKind::ALL.choose(&mut self.rng) else {
            return;
        };
        let x = self.rng.random_range(0..WIDTH);
        self.power_ups.push(PowerUp {
            kind,
            x,
            y,
            life: POWER_UP_LIFETIME,
        });
    }

    /// Advance one frame and drop everything that has expired.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.step();
        }
        self.particles.retain(|p| p.life > 0);
        for p in &mut self.power_ups {
            p.life = p.life.saturating_sub(1);
        }
        self.power_ups.retain(|p| p.life > 0);
        self.shake_frames = self.shake_frames.saturating_sub(1);
    }
}
