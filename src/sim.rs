use tracing::{debug, info};

use crate::{
    metric::second_order_changes, noise::create_initial_grid, rule::transition, Grid,
    NoiseParameters, Result, SimError, Size,
};

/// Lowest value ever stored in the diagnostic history.
///
/// Consumers plot the history on a logarithmic axis where 0 has no place,
/// so a raw metric of 0 is recorded as 1. A consumer using a linear scale
/// should read a stored 1 as "0 or 1".
pub const DIAGNOSTIC_FLOOR: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Holds the first grid, no frame produced yet.
    Initialized,
    Running,
    /// The configured frame count is reached; `advance` only fails from here.
    Terminated,
}

/// One produced step: the new current grid and its clamped diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Zero-based position of the frame in the run.
    pub index: usize,
    pub grid: Grid,
    pub diagnostic: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    grid: Grid,
    frame_index: usize,
    frame_count: usize,
    history: Vec<u64>,
}

impl SimulationState {
    pub fn new(grid: Grid, frame_count: usize) -> Self {
        info!(size = %grid.size(), frame_count, "simulation initialized");
        Self {
            grid,
            frame_index: 0,
            frame_count,
            history: Vec::with_capacity(frame_count),
        }
    }

    /// Starts a run from a fresh noise draw. Nothing is built if the
    /// parameters are rejected.
    pub fn from_noise(size: Size, params: NoiseParameters, frame_count: usize) -> Result<Self> {
        let grid = create_initial_grid(size, params)?;
        Ok(Self::new(grid, frame_count))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Diagnostics of every produced frame, in order, floored at
    /// [`DIAGNOSTIC_FLOOR`].
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn latest_diagnostic(&self) -> Option<u64> {
        self.history.last().copied()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn phase(&self) -> Phase {
        if self.frame_index >= self.frame_count {
            Phase::Terminated
        } else if self.frame_index == 0 {
            Phase::Initialized
        } else {
            Phase::Running
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.phase() == Phase::Terminated
    }

    /// Produces the next frame.
    ///
    /// Fails with [`SimError::SimulationTerminated`] once the configured
    /// frame count is reached, in which case the state is left as it was.
    pub fn advance(&mut self) -> Result<Frame> {
        if self.is_terminated() {
            return Err(SimError::SimulationTerminated {
                frame_count: self.frame_count,
            });
        }

        let next = transition(&self.grid);
        let raw = second_order_changes(&self.grid, &next)?;
        let diagnostic = raw.max(DIAGNOSTIC_FLOOR);
        debug!(frame = self.frame_index, raw, diagnostic, "frame advanced");

        let frame = Frame {
            index: self.frame_index,
            grid: next.clone(),
            diagnostic,
        };
        self.grid = next;
        self.history.push(diagnostic);
        self.frame_index += 1;

        if self.is_terminated() {
            info!(frame_count = self.frame_count, "simulation terminated");
        }
        Ok(frame)
    }

    /// Lazily pulls frames until the run terminates.
    pub fn into_frames(self) -> Frames {
        Frames { state: self }
    }
}

/// Iterator over the remaining frames of a run.
pub struct Frames {
    state: SimulationState,
}

impl Frames {
    pub fn state(&self) -> &SimulationState {
        &self.state
    }
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.state.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.state.frame_count - self.state.frame_index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames {}
