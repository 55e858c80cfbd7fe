use std::io::Write;
use stock_dashboard::forecast::{years_to_days, ForecastAdapter, ForecastInput};
use stock_dashboard::{DataLoader, Selector};
use tempfile::NamedTempFile;

// Two-ticker fixture mirroring the dashboard's source files, one of them
// already carrying its entity tag
fn create_sources() -> (NamedTempFile, NamedTempFile) {
    let mut apu = NamedTempFile::new().unwrap();
    writeln!(apu, "date,open,close,name").unwrap();
    for (i, close) in [100.0, 102.0, 101.0, 103.0, 102.0, 104.0, 103.0, 105.0]
        .iter()
        .enumerate()
    {
        writeln!(apu, "2023-01-{:02},{},{},APU", i + 1, close - 1.0, close).unwrap();
    }

    let mut suu = NamedTempFile::new().unwrap();
    writeln!(suu, "date,open,close,name").unwrap();
    for (i, close) in [50.0, 51.0, 50.5, 52.0].iter().enumerate() {
        writeln!(suu, "2023-01-{:02},{},{},SUU", i + 1, close - 0.5, close).unwrap();
    }

    (apu, suu)
}

#[test]
fn test_full_dashboard_pipeline() {
    // 1. Load both tickers into one table
    let (apu, suu) = create_sources();
    let table = DataLoader::load(&[("APU", apu.path()), ("SUU", suu.path())]).unwrap();

    assert_eq!(table.len(), 12);
    assert_eq!(table.entities(), &["APU".to_string(), "SUU".to_string()]);
    assert!(table.numeric_columns().contains(&"close".to_string()));

    // 2. Select the plotted fields for one ticker
    let selected = Selector::select(&table, "SUU", &["date", "close"]).unwrap();
    assert_eq!(selected.height(), 4);

    // 3. Shape the close series and forecast one year out
    let series = ForecastInput::from_table(&table, "APU").unwrap();
    assert_eq!(series.len(), 8);

    let forecast = ForecastAdapter::default()
        .forecast(&series, years_to_days(1))
        .unwrap();
    assert_eq!(forecast.len(), 8 + 365);

    // 4. The tail is what the dashboard renders
    let tail = forecast.tail(5);
    assert_eq!(tail.len(), 5);
    for row in tail {
        assert!(row.lower <= row.predicted && row.predicted <= row.upper);
    }
}

#[test]
fn test_recompute_on_demand_from_one_table() {
    // Switching tickers recomputes downstream outputs from the same
    // immutable table
    let (apu, suu) = create_sources();
    let table = DataLoader::load(&[("APU", apu.path()), ("SUU", suu.path())]).unwrap();

    for entity in ["APU", "SUU"] {
        let series = ForecastInput::from_table(&table, entity).unwrap();
        let forecast = ForecastAdapter::default().forecast(&series, 30).unwrap();
        assert_eq!(forecast.len(), series.len() + 30);
    }

    // The table is untouched by either pass
    assert_eq!(table.len(), 12);
}
