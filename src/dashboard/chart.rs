//! Payoff diagram as inline SVG
//!
//! Prices run along X, profit/loss along Y. The payoff range is padded by
//! 10% on both sides so the curve never touches the frame.


use crate::types::PayoffCurve;

use super::render::format_number;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 60.0;
const GRID_LINES: u32 = 10;
const AXIS_LABELS: u32 = 5;

/// Maps prices and payoffs onto chart coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffScale {
    pub min_price: f64,
    pub max_price: f64,
    pub min_payoff: f64,
    pub max_payoff: f64,
}

impl PayoffScale {
    /// `None` for empty, mismatched or non-finite curves
    pub fn new(curve: &PayoffCurve) -> Option<Self> {
        if curve.prices.is_empty()
            || curve.prices.len() != curve.payoffs.len()
            || !curve.prices.iter().chain(&curve.payoffs).all(|v| v.is_finite())
        {
            return None;
        }

        let (mut min_price, mut max_price) = bounds(&curve.prices);
        if max_price - min_price == 0.0 {
            let pad = (min_price.abs() * 0.01).max(1.0);
            min_price -= pad;
            max_price += pad;
        }

        let (min_payoff, max_payoff) = bounds(&curve.payoffs);
        let range = max_payoff - min_payoff;
        let pad = if range == 0.0 {
            (min_payoff.abs() * 0.1).max(1.0)
        } else {
            range * 0.1
        };

        Some(Self {
            min_price,
            max_price,
            min_payoff: min_payoff - pad,
            max_payoff: max_payoff + pad,
        })
    }

    pub fn x(&self, price: f64) -> f64 {
        PADDING + (price - self.min_price) / (self.max_price - self.min_price) * (WIDTH - 2.0 * PADDING)
    }

    pub fn y(&self, payoff: f64) -> f64 {
        PADDING + (self.max_payoff - payoff) / (self.max_payoff - self.min_payoff) * (HEIGHT - 2.0 * PADDING)
    }

    /// Y of the zero line, kept inside the plot area
    fn zero_y(&self) -> f64 {
        self.y(0.0).clamp(PADDING, HEIGHT - PADDING)
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}

fn step(from: f64, to: f64, i: u32, steps: u32) -> f64 {
    from + (to - from) * f64::from(i) / f64::from(steps)
}

/// Area between the curve and the zero line, clamped to one side of it
fn fill_points(scale: &PayoffScale, curve: &PayoffCurve, above: bool) -> String {
    let zero = scale.zero_y();
    let inner = curve.prices.iter().zip(&curve.payoffs).map(|(price, payoff)| {
        let y = scale.y(*payoff);
        let y = if above { y.min(zero) } else { y.max(zero) };
        format!("{:.1},{y:.1}", scale.x(*price))
    });
    std::iter::once(format!("{PADDING:.1},{zero:.1}"))
        .chain(inner)
        .chain(std::iter::once(format!("{:.1},{zero:.1}", WIDTH - PADDING)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the payoff diagram; empty when the curve cannot be drawn
pub fn payoff_svg(curve: &PayoffCurve, breakevens: &[f64]) -> String {
    let Some(scale) = PayoffScale::new(curve) else {
        return String::new();
    };
    let (left, right, top, bottom) = (PADDING, WIDTH - PADDING, PADDING, HEIGHT - PADDING);
    let mut svg = format!(
        r#"<svg class="payoff-chart" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg">"#
    );

    // Grid
    for i in 0..=GRID_LINES {
        let x = scale.x(step(scale.min_price, scale.max_price, i, GRID_LINES));
        let y = scale.y(step(scale.min_payoff, scale.max_payoff, i, GRID_LINES));
        svg.push_str(&format!(
            r##"<line class="grid" x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#e2e8f0" stroke-width="1"/><line class="grid" x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#e2e8f0" stroke-width="1"/>"##
        ));
    }

    // Profit and loss areas under the curve
    svg.push_str(&format!(
        r#"<polygon class="profit-area" points="{}" fill="rgba(16, 185, 129, 0.2)"/><polygon class="loss-area" points="{}" fill="rgba(239, 68, 68, 0.2)"/>"#,
        fill_points(&scale, curve, true),
        fill_points(&scale, curve, false),
    ));

    let zero = scale.zero_y();
    svg.push_str(&format!(
        r##"<line class="zero-line" x1="{left:.1}" y1="{zero:.1}" x2="{right:.1}" y2="{zero:.1}" stroke="#374151" stroke-width="2"/>"##
    ));

    let line: Vec<String> = curve
        .prices
        .iter()
        .zip(&curve.payoffs)
        .map(|(p, v)| format!("{:.1},{:.1}", scale.x(*p), scale.y(*v)))
        .collect();
    svg.push_str(&format!(
        r##"<polyline class="payoff-line" points="{}" fill="none" stroke="#3b82f6" stroke-width="3"/>"##,
        line.join(" ")
    ));

    for breakeven in breakevens.iter().filter(|b| b.is_finite()) {
        let x = scale.x(*breakeven);
        svg.push_str(&format!(
            r##"<line class="breakeven-line" x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#d97706" stroke-width="2" stroke-dasharray="5,5"/><circle class="breakeven" cx="{x:.1}" cy="{zero:.1}" r="6" fill="#f59e0b" stroke="#d97706" stroke-width="2"/>"##
        ));
    }

    // Axis labels
    for i in 0..=AXIS_LABELS {
        let price = step(scale.min_price, scale.max_price, i, AXIS_LABELS);
        let payoff = step(scale.min_payoff, scale.max_payoff, i, AXIS_LABELS);
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{label_y:.1}" text-anchor="middle" font-size="12" fill="#374151">₹{price_text}</text><text x="{label_x:.1}" y="{y:.1}" text-anchor="end" font-size="12" fill="#374151">₹{payoff_text}</text>"##,
            x = scale.x(price),
            label_y = bottom + 20.0,
            price_text = format_number(price.round()),
            label_x = left - 10.0,
            y = scale.y(payoff) + 4.0,
            payoff_text = format_number(payoff.round()),
        ));
    }

    svg.push_str(&format!(
        r##"<text x="{cx:.1}" y="{bx:.1}" text-anchor="middle" font-size="14" font-weight="bold" fill="#374151">Underlying Price</text><text x="15" y="{cy:.1}" text-anchor="middle" font-size="14" font-weight="bold" fill="#374151" transform="rotate(-90 15 {cy:.1})">Profit/Loss</text><text x="{cx:.1}" y="25" text-anchor="middle" font-size="16" font-weight="bold" fill="#374151">Strategy Payoff Diagram</text></svg>"##,
        cx = WIDTH / 2.0,
        bx = HEIGHT - 10.0,
        cy = HEIGHT / 2.0,
    ));

    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(prices: &[f64], payoffs: &[f64]) -> PayoffCurve {
        PayoffCurve {
            prices: prices.to_vec(),
            payoffs: payoffs.to_vec(),
        }
    }

    #[test]
    fn test_scale_maps_corners() {
        let scale = PayoffScale::new(&curve(&[100.0, 200.0], &[-50.0, 50.0])).unwrap();
        assert!((scale.min_payoff + 60.0).abs() < 1e-9);
        assert!((scale.max_payoff - 60.0).abs() < 1e-9);

        assert!((scale.x(100.0) - 60.0).abs() < 1e-9);
        assert!((scale.x(200.0) - 740.0).abs() < 1e-9);
        assert!((scale.y(scale.max_payoff) - 60.0).abs() < 1e-9);
        assert!((scale.y(scale.min_payoff) - 340.0).abs() < 1e-9);
        assert!((scale.y(0.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_points_clamp_to_zero_line() {
        let data = curve(&[100.0, 200.0], &[-50.0, 50.0]);
        let scale = PayoffScale::new(&data).unwrap();
        assert_eq!(fill_points(&scale, &data, true), "60.0,200.0 60.0,200.0 740.0,83.3 740.0,200.0");
        assert_eq!(fill_points(&scale, &data, false), "60.0,200.0 60.0,316.7 740.0,200.0 740.0,200.0");
    }

    #[test]
    fn test_unusable_curves_render_nothing() {
        assert_eq!(payoff_svg(&curve(&[], &[]), &[]), "");
        assert_eq!(payoff_svg(&curve(&[1.0, 2.0], &[1.0]), &[]), "");
        assert_eq!(payoff_svg(&curve(&[1.0, f64::NAN], &[1.0, 2.0]), &[]), "");
    }

    #[test]
    fn test_degenerate_ranges_are_widened() {
        let scale = PayoffScale::new(&curve(&[25000.0], &[0.0])).unwrap();
        assert!(scale.max_price > scale.min_price);
        assert!(scale.max_payoff > scale.min_payoff);

        let svg = payoff_svg(&curve(&[25000.0, 25000.0], &[10.0, 10.0]), &[]);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_svg_elements() {
        let svg = payoff_svg(
            &curve(&[25000.0, 25600.0, 26200.0], &[-400.0, 200.0, -400.0]),
            &[25400.0, 25800.0],
        );
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="grid""#).count(), 22);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
        assert_eq!(svg.matches("<text").count(), 15);
        assert!(svg.contains("Strategy Payoff Diagram"));
        assert!(svg.contains("₹25,000"));
        assert!(svg.contains("₹26,200"));
    }
}
