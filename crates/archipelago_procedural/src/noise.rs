//! # Deterministic Random Source
//!
//! Stateless hashing of coordinates into `[0, 1)`.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, every function in this module produces
//! **exactly** the same values every time. There is no hidden state and no
//! wall-clock input; a draw is addressed by coordinates, never by call order.
//!
//! The hash is a trigonometric mix, not a cryptographic primitive. It is
//! uniform enough for visual variety and nothing more.

/// Number of octaves summed by [`noise2d`].
pub const NOISE_OCTAVES: u32 = 3;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSeed(f64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: f64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., tile classification).
    ///
    /// The purpose is mixed into a phase offset in `[0, 1000)` so that two
    /// purposes never read the same stream.
    #[inline]
    #[must_use]
    pub fn derive(self, purpose: u64) -> Self {
        let mut hash = purpose ^ 0xcbf2_9ce4_8422_2325;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        #[allow(clippy::cast_precision_loss)]
        let unit = (hash >> 11) as f64 / (1u64 << 53) as f64;
        Self(self.0 + unit * 1000.0)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(42.0)
    }
}

impl From<u32> for WorldSeed {
    fn from(seed: u32) -> Self {
        Self(f64::from(seed))
    }
}

/// Maps `(x, y, seed)` to a pseudo-random value in `[0, 1)`.
///
/// Pure and total over finite inputs.
#[inline]
#[must_use]
pub fn rand(x: f64, y: f64, seed: f64) -> f64 {
    let h = (x * 12.9898 + y * 78.233 + seed * 37.719).sin() * 43_758.545_3;
    let fract = h - h.floor();
    // h - floor(h) rounds up to 1.0 for tiny negative h
    if fract >= 1.0 {
        0.0
    } else {
        fract
    }
}

/// Multi-octave value noise over continuous coordinates, roughly in `[0, 1)`.
///
/// Sums [`NOISE_OCTAVES`] layers of interpolated [`rand`] lattices at
/// doubling frequency and halving amplitude, starting at `scale`.
#[must_use]
pub fn noise2d(x: f64, y: f64, seed: f64, scale: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = scale;
    let mut max_amplitude = 0.0;

    for _ in 0..NOISE_OCTAVES {
        total += value_noise(x * frequency, y * frequency, seed) * amplitude;
        max_amplitude += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / max_amplitude
}

/// Single lattice of smoothly interpolated [`rand`] values.
#[inline]
fn value_noise(x: f64, y: f64, seed: f64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);

    let top = lerp(rand(x0, y0, seed), rand(x0 + 1.0, y0, seed), tx);
    let bottom = lerp(rand(x0, y0 + 1.0, seed), rand(x0 + 1.0, y0 + 1.0, seed), tx);
    lerp(top, bottom, ty)
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A pure, counter-indexed sequence of [`rand`] draws.
///
/// A stream is addressed by `(chunk, lane)`. Two streams built from the same
/// address yield the same values, so a synthesizer can give every slot its
/// own lane and rejecting one slot never shifts the draws of the next.
///
/// The first draw of lane 0 is exactly `rand(chunk_x, chunk_y, seed)`.
#[derive(Clone, Debug)]
pub struct DrawStream {
    x: f64,
    y: f64,
    seed: f64,
    index: u32,
}

impl DrawStream {
    /// Offset along x per draw (golden ratio conjugate).
    const INDEX_STEP: f64 = 0.618_033_988_749_895;
    /// Offset along y per lane (sqrt(2) - 1).
    const LANE_STEP: f64 = 0.414_213_562_373_095;

    /// Creates the stream for one chunk lane.
    #[must_use]
    pub fn new(chunk_x: i32, chunk_y: i32, lane: u32, seed: WorldSeed) -> Self {
        Self {
            x: f64::from(chunk_x),
            y: f64::from(chunk_y) + f64::from(lane) * Self::LANE_STEP,
            seed: seed.value(),
            index: 0,
        }
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let value = rand(
            self.x + f64::from(self.index) * Self::INDEX_STEP,
            self.y,
            self.seed,
        );
        self.index += 1;
        value
    }

    /// Next draw scaled to `[low, high)`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Next draw mapped to an integer in `[0, n)`. `n` must be non-zero.
    pub fn below(&mut self, n: u32) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = (self.next_f64() * f64::from(n)) as u32;
        value.min(n.saturating_sub(1))
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> u32 {
        self.index
    }
}
