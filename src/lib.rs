//! Game of life over a bounded, zero padded grid.
//!
//! A run starts from a random grid ([`create_initial_grid`]) and is pulled
//! forward one frame at a time ([`SimulationState::advance`] or the
//! [`Frames`] iterator). Each frame carries the number of second order
//! changes between the previous grid and the new one.
//!
//! ```
//! use soupsim::{NoiseParameters, SimulationState, Size};
//!
//! let size = Size::new(32, 32).unwrap();
//! let params = NoiseParameters::uniform(0.3).with_seed(7);
//! let state = SimulationState::from_noise(size, params, 10).unwrap();
//! let frames: Vec<_> = state.into_frames().collect();
//! assert_eq!(frames.len(), 10);
//! assert!(frames.iter().all(|frame| frame.diagnostic >= 1));
//! ```

pub use error::{Result, SimError};
mod error;

pub use utils::{Pos, Size};
mod utils;

pub use grid::{Cell, Grid};
pub mod grid;

pub use rule::transition;
pub mod rule;

pub use noise::{create_initial_grid, generate, NoiseKind, NoiseParameters};
pub mod noise;

pub use metric::second_order_changes;
pub mod metric;

pub use sim::{Frame, Frames, Phase, SimulationState, DIAGNOSTIC_FLOOR};
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub mod config;
