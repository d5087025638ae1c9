use std::time::{Duration, Instant};

use crate::rng::GameRng;
use crate::{Coords, TermInt};

const MATRIX_CHARS: &str = "01アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";

/// How often the rain advances and a new drop spawns.
pub const RAIN_PERIOD: Duration = Duration::from_millis(100);
const INITIAL_DROPS: usize = 12;
const MIN_TRAIL: i32 = 3;
const MAX_TRAIL: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub left: TermInt,
    pub top: TermInt,
    pub width: TermInt,
    pub height: TermInt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    Head,
    Bright,
    Dim,
}

struct Raindrop {
    column: TermInt,
    /// Row of the leading glyph, relative to the region top. Fractional so
    /// slow drops only move every few steps.
    row: f32,
    speed: f32,
    trail: Vec<char>,
}

impl Raindrop {
    fn head_row(&self) -> i32 {
        self.row.floor() as i32
    }
}

/// Falling glyphs drawn next to the board. Knows nothing about the game.
pub struct MatrixRain {
    region: Region,
    drops: Vec<Raindrop>,
    glyphs: Vec<char>,
    rng: GameRng,
    next_step: Instant,
}

impl MatrixRain {
    pub fn new(region: Region, rng: GameRng) -> Self {
        let mut rain = MatrixRain {
            region,
            drops: vec![],
            glyphs: MATRIX_CHARS.chars().collect(),
            rng,
            next_step: Instant::now() + RAIN_PERIOD,
        };

        for _ in 0..INITIAL_DROPS {
            rain.spawn_drop();
        }

        // Scatter the first drops so the screen does not start empty
        for i in 0..rain.drops.len() {
            let height = rain.region.height.max(1) as i32;
            rain.drops[i].row = rain.rng.gen_range(0..height) as f32;
        }

        rain
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn resize(&mut self, region: Region) {
        self.region = region;
        let width = region.width;
        self.drops.retain(|d| d.column < width);
    }

    /// Steps the rain if its period has elapsed. Returns true when it moved.
    pub fn advance_to(&mut self, now: Instant) -> bool {
        if now < self.next_step {
            return false;
        }

        self.next_step = now + RAIN_PERIOD;
        self.step();
        true
    }

    pub fn step(&mut self) {
        for drop in self.drops.iter_mut() {
            drop.row += drop.speed;
        }

        // Mutate a glyph here and there, like the film
        for i in 0..self.drops.len() {
            if self.rng.gen_f32() < 0.3 {
                let len = self.drops[i].trail.len() as i32;
                let pos = self.rng.gen_range(0..len) as usize;
                self.drops[i].trail[pos] = self.random_glyph();
            }
        }

        let height = self.region.height as i32;
        self.drops.retain(|d| d.head_row() - (d.trail.len() as i32) < height);
        self.spawn_drop();
    }

    /// Visible glyphs in absolute terminal coordinates.
    pub fn glyphs(&self) -> Vec<(Coords, char, Shade)> {
        let mut out = vec![];
        let height = self.region.height as i32;

        for drop in &self.drops {
            let head = drop.head_row();
            for (i, ch) in drop.trail.iter().enumerate() {
                let row = head - i as i32;
                if row < 0 || row >= height {
                    continue;
                }

                let shade = match i {
                    0 => Shade::Head,
                    i if i < drop.trail.len() / 2 => Shade::Bright,
                    _ => Shade::Dim,
                };
                let pos = (self.region.left + drop.column, self.region.top + row as TermInt);
                out.push((pos, *ch, shade));
            }
        }

        out
    }

    ///////////////////////////////////////////////////////////////////////////

    fn spawn_drop(&mut self) {
        // Full-width glyphs take two columns, so only even columns are used
        let columns = (self.region.width / 2) as i32;
        if columns == 0 || self.region.height == 0 {
            return;
        }

        let column = (self.rng.gen_range(0..columns) * 2) as TermInt;
        let trail_len = self.rng.gen_range(MIN_TRAIL..MAX_TRAIL + 1);
        let trail = (0..trail_len).map(|_| self.random_glyph()).collect();
        let speed = 0.3 + self.rng.gen_f32() * 0.7;

        self.drops.push(Raindrop { column, row: 0.0, speed, trail });
    }

    fn random_glyph(&mut self) -> char {
        self.rng.choose(&self.glyphs).copied().unwrap_or('0')
    }
}
