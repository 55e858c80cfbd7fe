use std::env;
use std::process;

use stock_dashboard::data::DataLoader;
use stock_dashboard::forecast::{years_to_days, ForecastAdapter, ForecastInput};
use stock_dashboard::select::Selector;

const USAGE: &str = "usage: dashboard TICKER=path.csv [TICKER=path.csv ...] TICKER YEARS";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let years: u32 = args[args.len() - 1].parse().map_err(|_| USAGE)?;
    let ticker = args[args.len() - 2].clone();

    let mut sources = Vec::new();
    for arg in &args[..args.len() - 2] {
        let (entity, path) = arg.split_once('=').ok_or(USAGE)?;
        sources.push((entity, path));
    }

    println!("Ratio Analysis & Prediction of Stocks Dashboard");
    println!("===============================================\n");

    let table = DataLoader::load(&sources)?;
    println!("Loaded {} rows for {:?}", table.len(), table.entities());
    println!("Numeric columns:     {:?}", table.numeric_columns());
    println!("Categorical columns: {:?}\n", table.categorical_columns());

    let fields: Vec<&str> = std::iter::once(table.date_column())
        .chain(table.numeric_columns().iter().map(|s| s.as_str()))
        .collect();
    let selected = Selector::select(&table, &ticker, &fields)?;
    println!("{} raw data (last rows):", ticker);
    println!("{}\n", selected.tail(Some(5)));

    let series = ForecastInput::from_table(&table, &ticker)?;
    let horizon = years_to_days(years);
    let forecast = ForecastAdapter::default().forecast(&series, horizon)?;

    println!(
        "Forecast: {} rows ({} observed + {} days ahead), last rows:",
        forecast.len(),
        series.len(),
        horizon
    );
    for row in forecast.tail(5) {
        println!(
            "  {}  {:>10.2}  [{:>10.2}, {:>10.2}]",
            row.date, row.predicted, row.lower, row.upper
        );
    }

    Ok(())
}
