use std::path::PathBuf;

use anyhow::bail;
use chrono::NaiveDate;
use clap::Parser;

use greenland_albedo::dashboard::{self, render_cycle};
use greenland_albedo::DataStore;

#[derive(Parser)]
#[command(
    name = "greenland-albedo",
    version,
    about = "Greenland ice-albedo dashboard data layer"
)]
struct Cli {
    /// Date to render, YYYY-MM-DD (2012-01-01 .. 2014-12-31).
    #[arg(long, default_value_t = dashboard::default_date())]
    date: NaiveDate,

    /// Root directory of the backing data stores.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !dashboard::in_range(cli.date) {
        bail!(
            "date {} is outside the selectable range {}..={}",
            cli.date,
            dashboard::min_date(),
            dashboard::max_date()
        );
    }

    let store = DataStore::new(&cli.data_dir);
    let snap = render_cycle(&store, cli.date)?;

    // Stand-in for the external renderer: a text summary of what each chart
    // would be fed.
    println!("Greenland Change of Albedo S of 70°N, {}", snap.date);
    println!(
        "  albedo scatter: {} points ({} histogram bands)",
        snap.albedo.observations.len(),
        snap.albedo.bands.len()
    );
    match snap.surface {
        Some(class) => println!("  surface: {class}"),
        None => println!("  surface: no histogram bands for this date"),
    }
    println!(
        "  KAN_B: {} daily / {} hourly readings ({} in ±14d window)",
        snap.kan_b.daily.len(),
        snap.kan_b.hourly.len(),
        snap.kan_b_hourly_window.len()
    );
    println!(
        "  KAN_L: {} daily / {} hourly readings ({} in ±14d window)",
        snap.kan_l.daily.len(),
        snap.kan_l.hourly.len(),
        snap.kan_l_hourly_window.len()
    );
    println!(
        "  Watson River: {} hourly flux readings in ±7d window",
        snap.flux_window.len()
    );
    println!(
        "  hexagon maps: {} cells ({} grid cells, {} basins)",
        snap.hexbins.cells.len(),
        snap.reference.hexgrid.len(),
        snap.reference.basins.len()
    );

    Ok(())
}
