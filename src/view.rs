use std::{
    io::{stdin, stdout, Write},
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{anyhow, Result};
use termion::{cursor, event::Key, input::TermRead, raw::IntoRawMode};
use tracing::debug;

use soupsim::{pos, Frames, Pos, SimulationState};

pub use canvas::Canvas;
mod canvas;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const MIN_INTERVAL: Duration = Duration::from_millis(1);
const MAX_INTERVAL: Duration = Duration::from_secs(2);
/// Lines kept under the grid for the sparkline and the status bar.
const FOOTER_HEIGHT: usize = 2;

pub struct View {
    thread: JoinHandle<Result<()>>,
}

impl View {
    pub fn spawn(frames: Frames, interval: Duration) -> Self {
        let thread = thread::spawn(move || view_loop(frames, interval));
        Self { thread }
    }

    pub fn join(self) -> Result<()> {
        self.thread
            .join()
            .map_err(|_| anyhow!("view thread panicked"))?
    }
}

#[derive(Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug)]
pub enum InputCmd {
    Exit,
    Move(Dir),
    Accelerate,
    Decelerate,
}

fn input_loop(sender: mpsc::Sender<InputCmd>) {
    for key in stdin().keys() {
        let command = match key {
            Ok(Key::Char('q')) | Ok(Key::Ctrl('c')) => InputCmd::Exit,
            Ok(Key::Up) => InputCmd::Move(Dir::Up),
            Ok(Key::Down) => InputCmd::Move(Dir::Down),
            Ok(Key::Left) => InputCmd::Move(Dir::Left),
            Ok(Key::Right) => InputCmd::Move(Dir::Right),
            Ok(Key::Char('+')) => InputCmd::Accelerate,
            Ok(Key::Char('-')) => InputCmd::Decelerate,
            Ok(_) => continue,
            Err(_) => InputCmd::Exit,
        };

        if sender.send(command).is_err() {
            break;
        }
    }
}

struct ViewState {
    origin: Pos,
    interval: Duration,
}

impl ViewState {
    fn new(interval: Duration) -> Self {
        Self {
            origin: pos!(0, 0),
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
        }
    }
}

fn view_loop(mut frames: Frames, interval: Duration) -> Result<()> {
    let mut out = stdout().into_raw_mode()?;
    write!(out, "{}", cursor::Hide)?;

    let (sender, receiver) = mpsc::channel();
    let _input_handle = thread::spawn(|| input_loop(sender));

    let mut view = ViewState::new(interval);
    let result = loop {
        if !handle_inputs(&receiver, &mut view) {
            break Ok(());
        }
        // past the last frame the final grid simply stays on screen
        frames.next();
        if let Err(err) = display_state(frames.state(), view.origin, &mut out) {
            break Err(err.into());
        }
        thread::sleep(view.interval);
    };

    write!(out, "{}{}", termion::clear::All, cursor::Show)?;
    out.flush()?;
    result
}

/// Drains pending commands, returns `false` once the user asked to quit.
fn handle_inputs(receiver: &mpsc::Receiver<InputCmd>, view: &mut ViewState) -> bool {
    while let Ok(cmd) = receiver.try_recv() {
        debug!(?cmd, "input");
        match cmd {
            InputCmd::Exit => return false,
            InputCmd::Move(direction) => {
                view.origin = view.origin
                    + match direction {
                        Dir::Up => pos!(-4, 0),
                        Dir::Down => pos!(4, 0),
                        Dir::Left => pos!(0, -4),
                        Dir::Right => pos!(0, 4),
                    }
            }
            InputCmd::Accelerate => view.interval = (view.interval / 2).max(MIN_INTERVAL),
            InputCmd::Decelerate => {
                view.interval = view.interval.saturating_mul(2).min(MAX_INTERVAL)
            }
        }
    }
    true
}

fn display_state(state: &SimulationState, origin: Pos, out: &mut impl Write) -> std::io::Result<()> {
    let mut canvas = Canvas::from_screen()?;
    draw_state(&mut canvas, state, origin);
    canvas.display(out)
}

pub fn draw_state(canvas: &mut Canvas, state: &SimulationState, origin: Pos) {
    let grid = state.grid();
    let grid_height = canvas.height().saturating_sub(FOOTER_HEIGHT) as i32;
    canvas.layer(|screen| {
        if screen.row >= grid_height {
            return None;
        }
        grid.is_alive(origin + screen).then_some('#')
    });

    if canvas.height() < FOOTER_HEIGHT {
        return;
    }
    let ceiling = grid.size().area() as u64;
    let history = state.history();
    let shown = history.len().saturating_sub(canvas.width());
    let spark: String = history[shown..]
        .iter()
        .map(|&value| spark_char(value, ceiling))
        .collect();
    canvas.text(canvas.height() - 2, &spark);

    let status = format!(
        "frame {}/{}  changes {}  alive {}  #{:016x}  [q]uit [arrows]move [+/-]speed",
        state.frame_index(),
        state.frame_count(),
        state.latest_diagnostic().unwrap_or(0),
        grid.population(),
        grid.fingerprint(),
    );
    canvas.text(canvas.height() - 1, &status);
}

/// Position of `value` on a log axis running from 1 to `ceiling`, in `[0, 1]`.
pub fn log_scale(value: u64, ceiling: u64) -> f64 {
    if ceiling <= 1 || value <= 1 {
        return 0.0;
    }
    ((value as f64).ln() / (ceiling as f64).ln()).clamp(0.0, 1.0)
}

fn spark_char(value: u64, ceiling: u64) -> char {
    let top = SPARK_LEVELS.len() - 1;
    let level = (log_scale(value, ceiling) * top as f64).round() as usize;
    SPARK_LEVELS[level.min(top)]
}
