// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text renderer: one character per grid point.
//!
//! `-` and `|` are wall runs, `+` joins, `o` open ends, `#` the selected
//! wall, `*` the draw preview, `D`/`W` opening centers.

use floorsketch_core::{Frame, OpeningKind, Point, Renderer};

#[derive(Debug, Default)]
pub struct AsciiRenderer {
    pub output: String,
}

impl Renderer for AsciiRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.output = draw(frame);
    }
}

struct Canvas {
    origin: Point,
    width: usize,
    rows: Vec<Vec<char>>,
}

/// Largest canvas drawn, in grid points
const MAX_CANVAS_CELLS: u64 = 1 << 22;

impl Canvas {
    /// Canvas spanning every point; `Err` with the would-be size when it
    /// exceeds [`MAX_CANVAS_CELLS`]
    fn covering(points: impl Iterator<Item = Point>) -> Result<Option<Self>, (u64, u64)> {
        let (mut min, mut max) = (Point::new(i32::MAX, i32::MAX), Point::new(i32::MIN, i32::MIN));
        let mut any = false;
        for p in points {
            any = true;
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        if !any {
            return Ok(None);
        }
        let width = u64::from(max.x.abs_diff(min.x)) + 1;
        let height = u64::from(max.y.abs_diff(min.y)) + 1;
        if width * height > MAX_CANVAS_CELLS {
            return Err((width, height));
        }
        // Both fit in usize: their product is under MAX_CANVAS_CELLS
        let (width, height) = (width as usize, height as usize);
        Ok(Some(Self {
            origin: min,
            width,
            rows: vec![vec![' '; width]; height],
        }))
    }

    fn cell(&mut self, p: Point) -> Option<&mut char> {
        let col = usize::try_from(p.x - self.origin.x).ok()?;
        let row = usize::try_from(p.y - self.origin.y).ok()?;
        if col >= self.width {
            return None;
        }
        self.rows.get_mut(row)?.get_mut(col)
    }

    /// Stroke from `start` to `end`, with `body` for interior points
    fn stroke(&mut self, start: Point, end: Point, body: Option<char>) {
        let steps = start.manhattan_to(&end);
        let (sx, sy) = ((end.x - start.x).signum(), (end.y - start.y).signum());
        let run = if sy == 0 { '-' } else { '|' };
        for t in 0..=steps {
            let p = Point::new(start.x + sx * t, start.y + sy * t);
            let Some(cell) = self.cell(p) else { continue };
            let next = if t == 0 || t == steps {
                '+'
            } else if let Some(c) = body {
                c
            } else {
                match *cell {
                    ' ' => run,
                    c if c == run => run,
                    _ => '+',
                }
            };
            *cell = next;
        }
    }

    fn put(&mut self, p: Point, c: char) {
        if let Some(cell) = self.cell(p) {
            *cell = c;
        }
    }

    fn finish(self) -> String {
        let mut out = String::new();
        for row in self.rows {
            let line: String = row.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

pub fn draw(frame: &Frame<'_>) -> String {
    let wall_points = frame.walls.iter().flat_map(|w| [w.start(), w.end()]);
    let preview_points = frame.preview.iter().flat_map(|s| [s.start(), s.end()]);
    let mut canvas = match Canvas::covering(wall_points.chain(preview_points)) {
        Ok(Some(canvas)) => canvas,
        Ok(None) => return String::new(),
        Err((width, height)) => {
            tracing::warn!(width, height, "Plan too large to draw");
            return format!("(plan spans {width} x {height} cells, too large to draw)\n");
        }
    };

    for (index, wall) in frame.walls.iter().enumerate() {
        let body = (frame.selected == Some(index)).then_some('#');
        canvas.stroke(wall.start(), wall.end(), body);
    }
    for wall in frame.walls {
        let length = wall.length();
        let (dx, dy) = (
            (wall.end().x - wall.start().x).signum(),
            (wall.end().y - wall.start().y).signum(),
        );
        for feature in wall.features() {
            let t = (feature.position * f64::from(length)).round() as i32;
            let mark = match feature.kind {
                OpeningKind::Door => 'D',
                OpeningKind::Window => 'W',
            };
            canvas.put(Point::new(wall.start().x + dx * t, wall.start().y + dy * t), mark);
        }
    }
    if let Some(preview) = frame.preview {
        canvas.stroke(preview.start(), preview.end(), Some('*'));
    }
    for &p in frame.open_endpoints {
        canvas.put(p, 'o');
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorsketch_core::{OpeningRequest, Segment, Session};

    fn render(session: &mut Session) -> String {
        let mut renderer = AsciiRenderer::default();
        session.render(&mut renderer);
        renderer.output
    }

    #[test]
    fn empty_plan_is_blank() {
        assert_eq!(render(&mut Session::new()), "");
    }

    #[test]
    fn closed_room() {
        let mut session = Session::new();
        for segment in [
            Segment::new(0, 0, 2, 0),
            Segment::new(2, 0, 2, 2),
            Segment::new(2, 2, 0, 2),
            Segment::new(0, 2, 0, 0),
        ] {
            session.draw_wall(segment).unwrap();
        }
        assert_eq!(render(&mut session), "+-+\n| |\n+-+\n");
    }

    #[test]
    fn open_wall_with_door_and_selection() {
        let mut session = Session::new();
        session.draw_wall(Segment::new(0, 0, 4, 0)).unwrap();
        session.draw_wall(Segment::new(0, 1, 3, 1)).unwrap();
        session
            .add_opening(0, &OpeningRequest::new(OpeningKind::Door, 0.5))
            .unwrap();
        session.select_wall(1).unwrap();

        assert_eq!(render(&mut session), "o-D-o\no##o\n");
    }

    #[test]
    fn preview_is_drawn() {
        let mut session = Session::new();
        session.begin_draw(Point::new(0, 0));
        session.update_draw(Point::new(0, 2));
        assert_eq!(render(&mut session), "+\n*\n+\n");
    }

    #[test]
    fn oversized_plans_are_summarized() {
        let mut session = Session::new();
        session.draw_wall(Segment::new(0, 0, 4, 0)).unwrap();
        session.draw_wall(Segment::new(0, 3000, 0, 3004)).unwrap();
        session.draw_wall(Segment::new(3000, 0, 3000, 4)).unwrap();
        assert_eq!(
            render(&mut session),
            "(plan spans 3001 x 3005 cells, too large to draw)\n"
        );

        let mut session = Session::new();
        session.begin_draw(Point::new(-2_000_000_000, 0));
        session.update_draw(Point::new(2_000_000_000, 0));
        assert!(render(&mut session).contains("too large to draw"));
    }
}
