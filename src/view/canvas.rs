use std::io::{self, Write};

use soupsim::{pos, Pos};

pub struct Canvas {
    lines: Vec<Vec<char>>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn from_screen() -> io::Result<Self> {
        let (width, height) = termion::terminal_size()?;
        Ok(Self::new(width as usize, height as usize))
    }

    pub fn new(width: usize, height: usize) -> Self {
        let lines = (0..height).map(|_| vec![' '; width]).collect();
        Self {
            height,
            lines,
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Paints every screen position for which `f` returns a char.
    /// `pos.row` is the screen line, `pos.col` the screen column.
    pub fn layer(&mut self, f: impl Fn(Pos) -> Option<char>) {
        for (y, line) in self.lines.iter_mut().enumerate() {
            for (x, slot) in line.iter_mut().enumerate() {
                if let Some(char) = f(pos!(y as i32, x as i32)) {
                    *slot = char;
                }
            }
        }
    }

    /// Writes `text` on line `y`, cut at the canvas width.
    pub fn text(&mut self, y: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(y) {
            for (slot, char) in line.iter_mut().zip(text.chars()) {
                *slot = char;
            }
        }
    }

    #[cfg(test)]
    pub fn line(&self, y: usize) -> String {
        self.lines[y].iter().collect()
    }

    pub fn display(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", termion::clear::All)?;
        for (index, line) in self.lines.iter().enumerate() {
            let goto = termion::cursor::Goto(1, index as u16 + 1);
            let line: String = line.iter().collect();
            write!(out, "{goto}{line}")?;
        }
        out.flush()
    }
}

#[test]
fn test_layer_and_text() {
    let mut canvas = Canvas::new(4, 2);
    canvas.layer(|pos| (pos.row == pos.col).then_some('#'));
    canvas.text(1, "ab");
    assert_eq!(canvas.line(0), "#   ");
    assert_eq!(canvas.line(1), "ab  ");
}

#[test]
fn test_text_is_cut() {
    let mut canvas = Canvas::new(3, 1);
    canvas.text(0, "abcdef");
    canvas.text(5, "ignored");
    assert_eq!(canvas.line(0), "abc");
}
