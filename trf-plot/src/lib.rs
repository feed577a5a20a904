//! Rendering of fitted TRF weight curves

#[macro_use]
extern crate log;

use common::{Direction, TrfError};
use plotters::prelude::*;
use trf_model::Trf;

/// A lag-by-weight curve
pub type Series = Vec<(f64, f64)>;

/// Extract the weight curves of one channel of a trained model.
///
/// For a forward model `channel` selects an input feature and one curve per
/// output channel is returned; for a backward model it selects an output
/// (stimulus) channel and one curve per input feature is returned.
pub fn weight_curves(trf: &Trf, channel: usize) -> Result<Vec<Series>, TrfError> {
    let weights = trf.weights().ok_or(TrfError::Untrained)?;
    let times = trf.times().ok_or(TrfError::Untrained)?;
    let n_features = trf.n_features();
    let n_lags = times.len();

    let n_channels = match trf.direction {
        Direction::Forward => n_features,
        Direction::Backward => trf.n_outputs(),
    };
    if channel >= n_channels {
        return Err(TrfError::InvalidData(format!(
            "channel {} out of range for a model with {} channels",
            channel, n_channels
        )));
    }

    let curves = match trf.direction {
        Direction::Forward => (0..trf.n_outputs())
            .map(|out| {
                (0..n_lags)
                    .map(|lag| (times[lag], weights[(lag * n_features + channel, out)]))
                    .collect()
            })
            .collect(),
        Direction::Backward => (0..n_features)
            .map(|feature| {
                (0..n_lags)
                    .map(|lag| (times[lag], weights[(lag * n_features + feature, channel)]))
                    .collect()
            })
            .collect(),
    };
    Ok(curves)
}

/// Plot the lag-by-weight curves of one channel to a bitmap file
pub fn plot_weights(
    trf: &Trf,
    channel: usize,
    filename: &str,
    dims: (u32, u32),
) -> Result<(), TrfError> {
    let curves = weight_curves(trf, channel)?;
    let times = trf.times().ok_or(TrfError::Untrained)?;
    debug!("plotting {} weight curves to {}", curves.len(), filename);

    let t_min = times.first().copied().unwrap_or(0.0);
    let t_max = times.last().copied().unwrap_or(1.0);
    let mut w_min = f64::MAX;
    let mut w_max = f64::MIN;
    for curve in &curves {
        for (_, w) in curve {
            w_min = w_min.min(*w);
            w_max = w_max.max(*w);
        }
    }
    if w_min >= w_max {
        w_min -= 1.0;
        w_max += 1.0;
    }

    let root = BitMapBackend::new(filename, dims).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let mut cc0 = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(20)
        .y_label_area_size(40)
        .caption(filename, ("sans-serif", 20).into_font().with_color(BLACK))
        .build_cartesian_2d(t_min..t_max, w_min..w_max)
        .unwrap();

    cc0.configure_mesh()
        .x_labels(20)
        .y_labels(20)
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.3}", v))
        .draw()
        .unwrap();

    for (i, curve) in curves.iter().enumerate() {
        let color = Palette99::pick(i);
        cc0.draw_series(LineSeries::new(curve.clone(), &color))
            .unwrap()
            .label(format!("channel_{}", i))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(i)));
    }
    cc0.configure_series_labels().border_style(BLACK).draw().unwrap();

    root.present().unwrap();
    Ok(())
}
