//! Die sources for the move engine.
//!
//! The engine never touches a global RNG: every roll comes from a
//! [`DieRoller`], so a game can run on OS entropy, a fixed seed, or a scripted
//! sequence of faces.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::constants::DIE_FACES;
use crate::error::{Error, Result};

/// Anything that can produce a die face in 1..=6.
pub trait DieRoller {
    fn roll(&mut self) -> u8;
}

/// Uniform die backed by `SmallRng`.
#[derive(Clone, Debug)]
pub struct RandomDie {
    rng: SmallRng,
}

impl RandomDie {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DieRoller for RandomDie {
    #[inline(always)]
    fn roll(&mut self) -> u8 {
        self.rng.random_range(1..=DIE_FACES)
    }
}

/// Replays a fixed list of faces, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedDie {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDie {
    /// Fails on an empty list or a face outside 1..=6.
    pub fn new(faces: impl Into<Vec<u8>>) -> Result<Self> {
        let faces = faces.into();
        if faces.is_empty() {
            return Err(Error::EmptyDie);
        }
        if let Some(&value) = faces.iter().find(|f| !(1..=DIE_FACES).contains(*f)) {
            return Err(Error::InvalidDieValue { value });
        }
        Ok(Self { faces, next: 0 })
    }

    /// Number of faces handed out so far.
    pub fn rolls(&self) -> usize {
        self.next
    }
}

impl DieRoller for ScriptedDie {
    fn roll(&mut self) -> u8 {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}

impl<R: DieRoller + ?Sized> DieRoller for &mut R {
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}

impl<R: DieRoller + ?Sized> DieRoller for Box<R> {
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}
