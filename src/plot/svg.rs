//! SVG charts rendered with Plotters.
//!
//! Two files per analysis run: the daily T2M/RH2M lines and the T2M vs RH2M
//! scatter. The x axis of the line chart is "days since the first reading",
//! labelled back as dates, which avoids needing Plotters' chrono ranges.

use std::error::Error;
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use plotters::prelude::*;

use crate::domain::Observation;
use crate::error::AppError;
use crate::plot::{finite_range, pad_range};

pub const SERIES_FILE: &str = "lecturas_series.svg";
pub const SCATTER_FILE: &str = "lecturas_scatter.svg";

const SIZE: (u32, u32) = (1024, 600);

type PlotResult = Result<(), Box<dyn Error>>;

/// Line chart of temperature and humidity over date.
pub fn write_series_svg(path: &Path, observations: &[Observation], title: &str) -> Result<(), AppError> {
    draw_series(path, observations, title).map_err(|e| chart_error(path, e))
}

/// Scatter of temperature (x) against humidity (y).
pub fn write_scatter_svg(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    draw_scatter(path, observations).map_err(|e| chart_error(path, e))
}

fn chart_error(path: &Path, e: Box<dyn Error>) -> AppError {
    AppError::new(2, format!("Failed to render chart '{}': {e}", path.display()))
}

fn draw_series(path: &Path, observations: &[Observation], title: &str) -> PlotResult {
    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        return Err("no rows to plot".into());
    };
    let start = first.date;
    let values = observations
        .iter()
        .flat_map(|o| [o.temperature, o.humidity])
        .flatten();
    let (y0, y1) = finite_range(values).ok_or("no measurements to plot")?;
    let (y0, y1) = pad_range(y0, y1, 0.05);
    let (x0, x1) = pad_range(0.0, (last.date - start).num_days() as f64, 0.0);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Fecha")
        .y_desc("Valor")
        .x_labels(8)
        .x_label_formatter(&|v| day_label(start, *v))
        .draw()?;

    let series: [(&str, RGBColor, fn(&Observation) -> Option<f64>); 2] = [
        ("T2M (°C)", RED, |o| o.temperature),
        ("RH2M (%)", BLUE, |o| o.humidity),
    ];
    for (label, color, value) in series {
        let mut labelled = false;
        for run in contiguous_runs(observations, start, value) {
            let drawn = chart.draw_series(LineSeries::new(run, &color))?;
            if !labelled {
                drawn
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                labelled = true;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_scatter(path: &Path, observations: &[Observation]) -> PlotResult {
    let points: Vec<(f64, f64)> = observations
        .iter()
        .filter_map(|o| Some((o.temperature?, o.humidity?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let (x0, x1) = finite_range(points.iter().map(|p| p.0)).ok_or("no complete rows to plot")?;
    let (y0, y1) = finite_range(points.iter().map(|p| p.1)).ok_or("no complete rows to plot")?;
    let (x0, x1) = pad_range(x0, x1, 0.05);
    let (y0, y1) = pad_range(y0, y1, 0.05);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Scatter: T2M vs RH2M", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("T2M (°C)")
        .y_desc("RH2M (%)")
        .draw()?;

    chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())))?;

    root.present()?;
    Ok(())
}

/// Split a series into runs of consecutive present values so gaps are not
/// bridged by a line.
fn contiguous_runs(
    observations: &[Observation],
    start: NaiveDate,
    value: fn(&Observation) -> Option<f64>,
) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for o in observations {
        match value(o).filter(|v| v.is_finite()) {
            Some(v) => current.push(((o.date - start).num_days() as f64, v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn day_label(start: NaiveDate, offset: f64) -> String {
    TimeDelta::try_days(offset.round() as i64)
        .and_then(|d| start.checked_add_signed(d))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn sample() -> Vec<Observation> {
        vec![
            Observation::new(day(1), Some(26.1), Some(82.3)),
            Observation::new(day(2), Some(27.4), None),
            Observation::new(day(3), Some(28.0), Some(77.9)),
            Observation::new(day(4), Some(27.2), Some(80.5)),
        ]
    }

    #[test]
    fn gaps_split_runs() {
        let runs = contiguous_runs(&sample(), day(1), |o| o.humidity);
        assert_eq!(runs, vec![vec![(0.0, 82.3)], vec![(2.0, 77.9), (3.0, 80.5)]]);
    }

    #[test]
    fn day_labels_map_back_to_dates() {
        assert_eq!(day_label(day(1), 0.0), "2024-06-01");
        assert_eq!(day_label(day(1), 2.4), "2024-06-03");
    }

    #[test]
    fn writes_both_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join(SERIES_FILE);
        let scatter = dir.path().join(SCATTER_FILE);

        write_series_svg(&series, &sample(), "Guayas - T2M y RH2M").unwrap();
        write_scatter_svg(&scatter, &sample()).unwrap();

        let series_svg = std::fs::read_to_string(&series).unwrap();
        assert!(series_svg.contains("<svg"));
        assert!(series_svg.contains("Guayas - T2M y RH2M"));
        assert!(std::fs::read_to_string(&scatter).unwrap().contains("<svg"));
    }

    #[test]
    fn empty_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_scatter_svg(&dir.path().join("x.svg"), &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
