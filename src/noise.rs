//! Random initial grids.
//!
//! Three models are supported, selected by [`NoiseKind`]:
//!
//! - `uniform`: every cell is alive with probability `p`.
//! - `gaussian`: every cell draws from `N(0.5, std)` and is alive when the
//!   draw exceeds `0.5`. The threshold sits on the mean, so `std` only
//!   sharpens or flattens the draws; the alive probability stays `0.5`.
//! - `salt_and_pepper`: every cell draws one of three grains with weights
//!   `pepper = svp * (1 - p)`, `salt = (1 - svp) * (1 - p)` and
//!   `alive = p`. Salt and alive both land as alive cells, pepper as
//!   dead, so the net alive probability is `p + (1 - svp) * (1 - p)`.
//!
//! Parameters are validated before any cell is drawn.

use std::{fmt, str::FromStr};

use rand::{
    distributions::{Bernoulli, Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{Cell, Grid, Result, SimError, Size};

const GAUSSIAN_MEAN: f64 = 0.5;
const GAUSSIAN_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NoiseKind {
    #[default]
    Uniform,
    Gaussian,
    SaltAndPepper,
}

impl NoiseKind {
    pub const ALL: [NoiseKind; 3] = [Self::Uniform, Self::Gaussian, Self::SaltAndPepper];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Gaussian => "gaussian",
            Self::SaltAndPepper => "salt_and_pepper",
        }
    }
}

impl FromStr for NoiseKind {
    type Err = SimError;

    fn from_str(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| SimError::UnsupportedNoiseKind(tag.to_string()))
    }
}

impl TryFrom<String> for NoiseKind {
    type Error = SimError;
    fn try_from(tag: String) -> Result<Self> {
        tag.parse()
    }
}

impl From<NoiseKind> for String {
    fn from(kind: NoiseKind) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Settings for one initial grid draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    pub kind: NoiseKind,
    /// Alive probability, in `[0, 1]`.
    pub p: f64,
    /// Standard deviation of the gaussian draws, strictly positive.
    pub std: f64,
    /// Share of pepper among the non-alive mass, in `[0, 1]`.
    pub salt_vs_pepper: f64,
    /// Fixed seed for reproducible grids, fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Uniform,
            p: 0.5,
            std: 1.0,
            salt_vs_pepper: 0.5,
            seed: None,
        }
    }
}

impl NoiseParameters {
    pub fn uniform(p: f64) -> Self {
        Self {
            kind: NoiseKind::Uniform,
            p,
            ..Self::default()
        }
    }

    pub fn gaussian(std: f64) -> Self {
        Self {
            kind: NoiseKind::Gaussian,
            std,
            ..Self::default()
        }
    }

    pub fn salt_and_pepper(p: f64, salt_vs_pepper: f64) -> Self {
        Self {
            kind: NoiseKind::SaltAndPepper,
            p,
            salt_vs_pepper,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.p) {
            return Err(SimError::invalid("p", self.p, "must lie in [0, 1]"));
        }
        if !(self.std.is_finite() && self.std > 0.0) {
            return Err(SimError::invalid("std", self.std, "must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.salt_vs_pepper) {
            return Err(SimError::invalid(
                "salt_vs_pepper",
                self.salt_vs_pepper,
                "must lie in [0, 1]",
            ));
        }
        if self.kind == NoiseKind::SaltAndPepper {
            for weight in self.grain_weights() {
                if weight < 0.0 {
                    return Err(SimError::invalid("weight", weight, "must not be negative"));
                }
            }
        }
        Ok(())
    }

    /// Pepper, salt and alive weights, in [`GRAINS`] order.
    pub fn grain_weights(&self) -> [f64; 3] {
        let rest = 1.0 - self.p;
        [
            self.salt_vs_pepper * rest,
            (1.0 - self.salt_vs_pepper) * rest,
            self.p,
        ]
    }
}

/// Outcome of a salt and pepper draw, before it is folded into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grain {
    Pepper,
    Salt,
    Alive,
}

pub const GRAINS: [Grain; 3] = [Grain::Pepper, Grain::Salt, Grain::Alive];

impl Grain {
    pub fn project(self) -> Cell {
        match self {
            Grain::Pepper => Cell::dead(),
            Grain::Salt | Grain::Alive => Cell::alive(),
        }
    }
}

/// Draws a grid with the caller's random source.
pub fn generate<R>(size: Size, params: &NoiseParameters, rng: &mut R) -> Result<Grid>
where
    R: Rng + ?Sized,
{
    params.validate()?;
    trace!(%size, kind = %params.kind, "drawing noise");

    let grid = match params.kind {
        NoiseKind::Uniform => {
            let bernoulli = Bernoulli::new(params.p)
                .map_err(|_| SimError::invalid("p", params.p, "must lie in [0, 1]"))?;
            Grid::from_fn(size, |_| Cell::from(bernoulli.sample(&mut *rng)))
        }
        NoiseKind::Gaussian => {
            let normal = Normal::new(GAUSSIAN_MEAN, params.std)
                .map_err(|_| SimError::invalid("std", params.std, "must be finite and > 0"))?;
            Grid::from_fn(size, |_| Cell::from(normal.sample(&mut *rng) > GAUSSIAN_THRESHOLD))
        }
        NoiseKind::SaltAndPepper => {
            let weights = params.grain_weights();
            let index = WeightedIndex::new(weights).map_err(|_| {
                SimError::invalid("weights", format!("{weights:?}"), "not a distribution")
            })?;
            Grid::from_fn(size, |_| GRAINS[index.sample(&mut *rng)].project())
        }
    };
    Ok(grid)
}

/// Draws the first grid of a run, seeded from `params.seed` when present.
pub fn create_initial_grid(size: Size, params: NoiseParameters) -> Result<Grid> {
    params.validate()?;
    let mut rng = match params.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let grid = generate(size, &params, &mut rng)?;
    debug!(
        %size,
        kind = %params.kind,
        seed = ?params.seed,
        population = grid.population(),
        "initial grid created"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(rows: usize, cols: usize) -> Size {
        Size::new(rows, cols).unwrap()
    }

    fn alive_fraction(grid: &Grid) -> f64 {
        grid.population() as f64 / grid.size().area() as f64
    }

    #[test]
    fn test_uniform_extremes() {
        for (rows, cols) in [(1, 1), (3, 7), (40, 25)] {
            let empty = create_initial_grid(size(rows, cols), NoiseParameters::uniform(0.0)).unwrap();
            assert_eq!(empty.population(), 0);
            let full = create_initial_grid(size(rows, cols), NoiseParameters::uniform(1.0)).unwrap();
            assert_eq!(full.population(), (rows * cols) as u64);
        }
    }

    #[test]
    fn test_salt_and_pepper_full_alive() {
        for svp in [0.0, 0.3, 1.0] {
            let params = NoiseParameters::salt_and_pepper(1.0, svp).with_seed(7);
            let grid = create_initial_grid(size(30, 30), params).unwrap();
            assert_eq!(grid.population(), 900);
        }
    }

    #[test]
    fn test_salt_and_pepper_all_pepper() {
        let params = NoiseParameters::salt_and_pepper(0.0, 1.0).with_seed(7);
        let grid = create_initial_grid(size(30, 30), params).unwrap();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_salt_and_pepper_density() {
        let params = NoiseParameters::salt_and_pepper(0.2, 0.75).with_seed(11);
        let grid = create_initial_grid(size(100, 100), params).unwrap();
        let expected = 0.2 + (1.0 - 0.75) * (1.0 - 0.2);
        assert!((alive_fraction(&grid) - expected).abs() < 0.05);
    }

    #[test]
    fn test_gaussian_density_ignores_std() {
        for std in [0.01, 1.0, 25.0] {
            let params = NoiseParameters::gaussian(std).with_seed(3);
            let grid = create_initial_grid(size(100, 100), params).unwrap();
            assert!(
                (alive_fraction(&grid) - 0.5).abs() < 0.05,
                "std {std} gave {}",
                alive_fraction(&grid)
            );
        }
    }

    #[test]
    fn test_invalid_probability() {
        for p in [1.5, -0.1, f64::NAN] {
            let result = create_initial_grid(size(4, 4), NoiseParameters::uniform(p));
            assert!(matches!(
                result,
                Err(SimError::InvalidParameter { name: "p", .. })
            ));
        }
    }

    #[test]
    fn test_invalid_std() {
        for std in [0.0, -1.0, f64::INFINITY] {
            let result = create_initial_grid(size(4, 4), NoiseParameters::gaussian(std));
            assert!(matches!(
                result,
                Err(SimError::InvalidParameter { name: "std", .. })
            ));
        }
    }

    #[test]
    fn test_invalid_salt_vs_pepper() {
        let result = create_initial_grid(size(4, 4), NoiseParameters::salt_and_pepper(0.5, 1.2));
        assert!(matches!(
            result,
            Err(SimError::InvalidParameter {
                name: "salt_vs_pepper",
                ..
            })
        ));
    }

    #[test]
    fn test_seeded_draws_repeat() {
        for kind in NoiseKind::ALL {
            let params = NoiseParameters {
                kind,
                seed: Some(42),
                ..NoiseParameters::default()
            };
            let a = create_initial_grid(size(20, 30), params.clone()).unwrap();
            let b = create_initial_grid(size(20, 30), params).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!("uniform".parse::<NoiseKind>().unwrap(), NoiseKind::Uniform);
        assert_eq!("gaussian".parse::<NoiseKind>().unwrap(), NoiseKind::Gaussian);
        assert_eq!(
            "salt_and_pepper".parse::<NoiseKind>().unwrap(),
            NoiseKind::SaltAndPepper
        );
        assert_eq!(
            "perlin".parse::<NoiseKind>(),
            Err(SimError::UnsupportedNoiseKind("perlin".to_string()))
        );
    }

    #[test]
    fn test_grain_projection() {
        assert_eq!(Grain::Pepper.project(), Cell::dead());
        assert_eq!(Grain::Salt.project(), Cell::alive());
        assert_eq!(Grain::Alive.project(), Cell::alive());
    }
}
