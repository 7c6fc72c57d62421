//! Dashboard charts: top-selling items and transactions by hour.

use core::fmt;
use std::sync::Arc;

use crate::api::types::{Heatmap, SalesItem};
use crate::api::{ApiClient, ApiError};

/// Floor for the bar chart scale, so a few small values do not fill the chart.
pub const BAR_SCALE_FLOOR: f64 = 100.0;

/// Bar width in percent of the chart.
#[must_use]
pub fn bar_width(value: f64, max: f64) -> f64 {
    value / max.max(BAR_SCALE_FLOOR) * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub name: String,
    pub value: f64,
    /// Percent of the chart width.
    pub width: f64,
}

/// Scale the top items into bars.
#[must_use]
pub fn bars(items: &[SalesItem]) -> Vec<Bar> {
    let max = items.iter().map(|i| i.value).fold(f64::MIN, f64::max);
    items
        .iter()
        .map(|item| Bar {
            name: item.name.clone(),
            value: item.value,
            width: bar_width(item.value, max),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

const COLD: Rgb = Rgb(230, 240, 255);
const HOT: Rgb = Rgb(30, 90, 210);

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp(start: u8, end: u8, t: f64) -> u8 {
    let value = (f64::from(end) - f64::from(start)).mul_add(t, f64::from(start));
    value.round().clamp(0.0, 255.0) as u8
}

/// Colour for an intensity in `0.0..=1.0`.
#[must_use]
pub fn heat_color(intensity: f64) -> Rgb {
    let t = intensity.clamp(0.0, 1.0);
    Rgb(
        lerp(COLD.0, HOT.0, t),
        lerp(COLD.1, HOT.1, t),
        lerp(COLD.2, HOT.2, t),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub value: u64,
    pub intensity: f64,
    pub color: Rgb,
    /// Render the count in light text on dark cells.
    pub light_text: bool,
}

/// Cells of the heatmap, one row per time slot and one column per day.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn heatmap_cells(heatmap: &Heatmap) -> Vec<Vec<HeatCell>> {
    let max = heatmap.data.iter().flatten().copied().max().unwrap_or(0);
    heatmap
        .data
        .iter()
        .map(|row| {
            row.iter()
                .map(|&value| {
                    let intensity = if max == 0 {
                        0.0
                    } else {
                        value as f64 / max as f64
                    };
                    HeatCell {
                        value,
                        intensity,
                        color: heat_color(intensity),
                        light_text: intensity > 0.5,
                    }
                })
                .collect()
        })
        .collect()
}

/// Loads the chart datasets through the API client's cache.
#[derive(Debug, Clone)]
pub struct DashboardService<'a> {
    api: &'a ApiClient,
}

impl<'a> DashboardService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns an error if the dataset cannot be fetched.
    pub async fn top_items(&self) -> Result<Vec<Bar>, ApiError> {
        let items: Arc<Vec<SalesItem>> = self.api.top_items().await?;
        Ok(bars(&items))
    }

    /// # Errors
    ///
    /// Returns an error if the dataset cannot be fetched.
    pub async fn transactions_by_hour(&self) -> Result<(Arc<Heatmap>, Vec<Vec<HeatCell>>), ApiError> {
        let heatmap = self.api.transactions_by_hour().await?;
        let cells = heatmap_cells(&heatmap);
        Ok((heatmap, cells))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width_uses_floor() {
        assert_eq!(bar_width(50.0, 20.0), 50.0);
        assert_eq!(bar_width(200.0, 400.0), 50.0);

        let items = vec![
            SalesItem { name: "Pens".to_string(), value: 400.0 },
            SalesItem { name: "Ink".to_string(), value: 100.0 },
        ];
        let widths: Vec<f64> = bars(&items).iter().map(|b| b.width).collect();
        assert_eq!(widths, vec![100.0, 25.0]);
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), Rgb(230, 240, 255));
        assert_eq!(heat_color(1.0), Rgb(30, 90, 210));
        assert_eq!(heat_color(0.5), Rgb(130, 165, 233));
        assert_eq!(heat_color(0.5).to_string(), "rgb(130, 165, 233)");
    }

    #[test]
    fn test_heatmap_cells() {
        let heatmap = Heatmap {
            data: vec![vec![0, 10], vec![4, 6]],
            days: vec!["Mon".to_string(), "Tue".to_string()],
            time_slots: vec!["9-12".to_string(), "12-15".to_string()],
        };
        let cells = heatmap_cells(&heatmap);
        assert_eq!(cells[0][1].intensity, 1.0);
        assert!(cells[0][1].light_text);
        assert!(!cells[1][0].light_text);
        assert!(cells[1][1].light_text);
        assert_eq!(cells[0][0].color, Rgb(230, 240, 255));
    }

    #[test]
    fn test_empty_heatmap_has_zero_intensity() {
        let heatmap = Heatmap {
            data: vec![vec![0, 0]],
            days: vec![],
            time_slots: vec![],
        };
        assert!(heatmap_cells(&heatmap)[0].iter().all(|c| c.intensity == 0.0));
    }
}
