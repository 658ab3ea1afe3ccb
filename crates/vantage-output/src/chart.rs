//! Chart inputs for the relative-performance and risk/return views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use vantage_analytics::AnalyticsReport;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Sequential color scale used for the scatter points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorScale {
    /// Red at the low end, blue at the high end.
    #[default]
    BlueRedReversed,
}

impl ColorScale {
    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// Color at position `t` in `[0, 1]` (clamped).
    pub fn at(self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::BlueRedReversed => Self::RED.lerp(Self::BLUE, t),
        }
    }

    /// Color every value relative to the finite range of `values`.
    ///
    /// Non-finite values get `None` and do not affect the range. When all
    /// finite values are equal they sit in the middle of the scale.
    pub fn map(self, values: &[f64]) -> Vec<Option<Rgb>> {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let span = hi - lo;

        values
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    return None;
                }
                let t = if span > 0.0 { (v - lo) / span } else { 0.5 };
                Some(self.at(t))
            })
            .collect()
    }
}

/// One line of the relative-performance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Series label.
    pub label: String,
    /// Values aligned with [`PerformanceChart::dates`].
    pub values: Vec<f64>,
}

/// Normalized prices of every series over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceChart {
    /// Chart title.
    pub title: String,
    /// X axis.
    pub dates: Vec<NaiveDate>,
    /// One line per series, `Portfolio` last.
    pub series: Vec<ChartSeries>,
}

impl PerformanceChart {
    /// Build from a report's normalized table.
    pub fn from_report(report: &AnalyticsReport) -> Self {
        let normalized = report.normalized();
        let series = report
            .keys()
            .iter()
            .zip(normalized.columns())
            .map(|(key, column)| ChartSeries {
                label: key.to_string(),
                values: column.to_vec(),
            })
            .collect();

        Self {
            title: "Desempenho Relativo".to_string(),
            dates: report.dates().to_vec(),
            series,
        }
    }

    /// Line for one label.
    pub fn series(&self, label: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// One point of the risk/return scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Series label, drawn as the point's text.
    pub label: String,
    /// X: annualized volatility.
    pub volatility: f64,
    /// Y: total return.
    pub total_return: f64,
    /// Color value: total return over volatility, unguarded.
    pub ratio: f64,
    /// Color from the scale, `None` when the ratio is not finite.
    pub color: Option<Rgb>,
}

/// Risk/return scatter with axis metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnChart {
    /// Chart title.
    pub title: String,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
    /// Color bar title.
    pub color_title: String,
    /// Scale used for [`ScatterPoint::color`].
    pub scale: ColorScale,
    /// One point per series.
    pub points: Vec<ScatterPoint>,
}

impl RiskReturnChart {
    /// Build from a report's metrics.
    pub fn from_report(report: &AnalyticsReport, scale: ColorScale) -> Self {
        let ratios: Vec<f64> = report.metrics().iter().map(|m| m.sharpe_like()).collect();
        let colors = scale.map(&ratios);

        let points = report
            .metrics()
            .iter()
            .zip(ratios)
            .zip(colors)
            .map(|((m, ratio), color)| ScatterPoint {
                label: m.key.to_string(),
                volatility: m.volatility,
                total_return: m.total_return,
                ratio,
                color,
            })
            .collect();

        Self {
            title: "Risco Retorno".to_string(),
            x_title: "Volatilidade (Anualizada)".to_string(),
            y_title: "Retorno Total".to_string(),
            color_title: "Sharpe".to_string(),
            scale,
            points,
        }
    }

    /// Point for one label.
    pub fn point(&self, label: &str) -> Option<&ScatterPoint> {
        self.points.iter().find(|p| p.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        let scale = ColorScale::BlueRedReversed;
        assert_eq!(scale.at(0.0), Rgb::new(255, 0, 0));
        assert_eq!(scale.at(1.0), Rgb::new(0, 0, 255));
        assert_eq!(scale.at(2.0), Rgb::new(0, 0, 255));
        assert_eq!(scale.at(0.5), Rgb::new(128, 0, 128));
    }

    #[test]
    fn test_map_skips_non_finite() {
        let colors = ColorScale::BlueRedReversed.map(&[-1.0, f64::NAN, 3.0, f64::INFINITY]);

        assert_eq!(colors[0], Some(Rgb::new(255, 0, 0)));
        assert_eq!(colors[1], None);
        assert_eq!(colors[2], Some(Rgb::new(0, 0, 255)));
        assert_eq!(colors[3], None);
    }

    #[test]
    fn test_map_single_value_is_centered() {
        let colors = ColorScale::BlueRedReversed.map(&[0.7]);
        assert_eq!(colors, vec![Some(Rgb::new(128, 0, 128))]);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb::new(255, 0, 16).to_string(), "#ff0010");
    }
}
