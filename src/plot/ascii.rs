//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - temperature over time: `*`
//! - humidity over time: `+`
//! - scatter points: `o`

use chrono::NaiveDate;

use crate::domain::Observation;
use crate::plot::{finite_range, pad_range};

const TEMPERATURE_MARK: char = '*';
const HUMIDITY_MARK: char = '+';
const SCATTER_MARK: char = 'o';

/// Temperature and humidity over date on a shared value axis.
pub fn render_series_plot(observations: &[Observation], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        return "Plot: no data\n".to_string();
    };
    let values = observations
        .iter()
        .flat_map(|o| [o.temperature, o.humidity])
        .flatten();
    let Some((y_min, y_max)) = finite_range(values) else {
        return "Plot: no measurements\n".to_string();
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let span_days = (last.date - first.date).num_days() as f64;
    let (x_min, x_max) = pad_range(0.0, span_days, 0.0);
    let day_x = |date: NaiveDate| (date - first.date).num_days() as f64;

    let mut grid = vec![vec![' '; width]; height];
    let series: [(char, fn(&Observation) -> Option<f64>); 2] = [
        (HUMIDITY_MARK, |o| o.humidity),
        (TEMPERATURE_MARK, |o| o.temperature),
    ];
    for (mark, value) in series {
        let mut prev: Option<(usize, usize)> = None;
        for o in observations {
            let Some(v) = value(o).filter(|v| v.is_finite()) else {
                // A gap breaks the line.
                prev = None;
                continue;
            };
            let x = map_x(day_x(o.date), x_min, x_max, width);
            let y = map_y(v, y_min, y_max, height);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, mark),
                None => grid[y][x] = mark,
            }
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: fecha=[{}, {}] | y=[{y_min:.2}, {y_max:.2}]\n",
        first.date, last.date
    ));
    out.push_str(&format!("{TEMPERATURE_MARK} T2M (°C)   {HUMIDITY_MARK} RH2M (%)\n"));
    push_grid(&mut out, grid);
    out
}

/// Temperature (x) vs humidity (y) scatter over complete rows.
pub fn render_scatter_plot(observations: &[Observation], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64)> = observations
        .iter()
        .filter_map(|o| Some((o.temperature?, o.humidity?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let (Some((x_min, x_max)), Some((y_min, y_max))) = (
        finite_range(points.iter().map(|p| p.0)),
        finite_range(points.iter().map(|p| p.1)),
    ) else {
        return "Scatter: no complete rows\n".to_string();
    };
    let (x_min, x_max) = pad_range(x_min, x_max, 0.0);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for &(x, y) in &points {
        grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = SCATTER_MARK;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Scatter: t2m=[{x_min:.2}, {x_max:.2}] | rh2m=[{y_min:.2}, {y_max:.2}]\n"
    ));
    push_grid(&mut out, grid);
    out
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn scatter_golden_snapshot_small() {
        let rows = vec![
            Observation::new(day(1), Some(1.0), Some(1.0)),
            Observation::new(day(2), Some(2.0), Some(2.0)),
            Observation::new(day(3), Some(3.0), Some(3.0)),
            Observation::new(day(4), None, Some(2.5)),
        ];

        let txt = render_scatter_plot(&rows, 10, 5);
        let expected = concat!(
            "Scatter: t2m=[1.00, 3.00] | rh2m=[0.90, 3.10]\n",
            "         o\n",
            "          \n",
            "     o    \n",
            "          \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn series_plot_places_both_series() {
        let rows = vec![
            Observation::new(day(1), Some(20.0), Some(80.0)),
            Observation::new(day(2), Some(25.0), Some(70.0)),
            Observation::new(day(3), Some(30.0), Some(60.0)),
        ];

        let txt = render_series_plot(&rows, 20, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Plot: fecha=[2024-06-01, 2024-06-03] | y=[17.00, 83.00]");
        assert_eq!(lines.len(), 2 + 5);
        assert!(lines[2..].iter().all(|l| l.chars().count() == 20));
        // Humidity starts at the top-left, temperature at the bottom-left.
        assert!(lines[2].starts_with('+'));
        assert!(lines[6].starts_with('*'));
    }

    #[test]
    fn empty_inputs_render_a_note() {
        assert_eq!(render_series_plot(&[], 20, 5), "Plot: no data\n");
        let no_values = vec![Observation::new(day(1), None, None)];
        assert_eq!(render_series_plot(&no_values, 20, 5), "Plot: no measurements\n");
        assert_eq!(render_scatter_plot(&no_values, 20, 5), "Scatter: no complete rows\n");
    }
}
