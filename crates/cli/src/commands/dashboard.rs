//! Dashboard charts rendered as text.

use storedesk_client::App;

use super::CliError;
use crate::output;

const BAR_COLUMNS: f64 = 40.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(width_percent: f64) -> String {
    let cells = (width_percent / 100.0 * BAR_COLUMNS).round().clamp(0.0, BAR_COLUMNS) as usize;
    "█".repeat(cells)
}

/// Shade for a heatmap cell, light to dark.
fn shade(intensity: f64) -> char {
    match intensity {
        i if i > 0.75 => '█',
        i if i > 0.5 => '▓',
        i if i > 0.25 => '▒',
        i if i > 0.0 => '░',
        _ => '·',
    }
}

pub async fn show(app: &App) -> Result<(), CliError> {
    let dashboard = app.dashboard();

    output::line("Top selling items");
    for item in dashboard.top_items().await? {
        output::line(format!("  {:<20} {:>8.0} {}", item.name, item.value, bar(item.width)));
    }

    output::line("");
    output::line("Transactions by hour");
    let (heatmap, cells) = dashboard.transactions_by_hour().await?;
    let header: String = heatmap.days.iter().map(|d| format!("{d:>5}")).collect();
    output::line(format!("  {:<10}{header}", ""));
    for (slot, row) in heatmap.time_slots.iter().zip(&cells) {
        let rendered: String = row
            .iter()
            .map(|cell| format!("{:>4}{}", cell.value, shade(cell.intensity)))
            .collect();
        output::line(format!("  {slot:<10}{rendered}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_columns() {
        assert_eq!(bar(100.0).chars().count(), 40);
        assert_eq!(bar(50.0).chars().count(), 20);
        assert!(bar(0.0).is_empty());
    }

    #[test]
    fn test_shade_steps() {
        assert_eq!(shade(0.0), '·');
        assert_eq!(shade(0.6), '▓');
        assert_eq!(shade(1.0), '█');
    }
}
