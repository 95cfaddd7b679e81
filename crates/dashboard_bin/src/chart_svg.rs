use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;
use trend_forecast::ChartSeries;

pub const CHART_SIZE: (u32, u32) = (960, 480);

const HISTORICAL_COLOR: RGBColor = RGBColor(0, 191, 255);
const PROJECTED_COLOR: RGBColor = RGBColor(0, 200, 0);

#[derive(Debug, Error)]
pub enum ChartRenderError {
    #[error("no prices to plot")]
    NoData,

    #[error("failed to draw chart: {0}")]
    Draw(String),
}

/// Caption naming how many days of history and forecast the chart holds.
pub fn chart_title(past_days: usize, ahead_days: usize) -> String {
    format!(
        "Stock Price: {} Days Past & {} Days Ahead",
        past_days, ahead_days
    )
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartRenderError {
    ChartRenderError::Draw(e.to_string())
}

/// Plots the chart series as SVG: historical prices as a solid line, the
/// projection as a dashed line sharing the anchor point.
pub fn render_svg(
    series: &ChartSeries,
    title: &str,
    size: (u32, u32),
) -> Result<String, ChartRenderError> {
    let (min_price, max_price) = series
        .historical
        .iter()
        .chain(&series.projected)
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    if !min_price.is_finite() || !max_price.is_finite() {
        return Err(ChartRenderError::NoData);
    }

    let padding = (max_price - min_price).max(1e-8) * 0.1;
    let x_max = series.len().saturating_sub(1).max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..x_max, (min_price - padding)..(max_price + padding))
            .map_err(draw_err)?;

        let label_at = |i: &usize| {
            series
                .labels
                .get(*i)
                .map(|date| date.format("%m-%d").to_string())
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels(series.len())
            .x_label_formatter(&label_at)
            .x_desc("Date")
            .y_desc("Price ($)")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(
                plotted(&series.historical),
                HISTORICAL_COLOR.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label("Historical Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &HISTORICAL_COLOR));

        chart
            .draw_series(DashedLineSeries::new(
                plotted(&series.projected),
                5,
                5,
                PROJECTED_COLOR.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label("Predicted Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &PROJECTED_COLOR));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    Ok(svg)
}

// Gaps only ever pad the start or the end of a series, so skipping them
// leaves one contiguous line.
fn plotted(values: &[Option<f64>]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|price| (i, price)))
        .collect()
}
