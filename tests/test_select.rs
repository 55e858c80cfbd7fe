use std::io::Write;
use stock_dashboard::data::{DataLoader, UnifiedTable};
use stock_dashboard::error::DashboardError;
use stock_dashboard::select::Selector;
use tempfile::NamedTempFile;

fn load_two_entities() -> UnifiedTable {
    let mut apu = NamedTempFile::new().unwrap();
    writeln!(apu, "date,close").unwrap();
    writeln!(apu, "2020-01-01,100.0").unwrap();
    writeln!(apu, "2020-01-02,102.0").unwrap();

    let mut suu = NamedTempFile::new().unwrap();
    writeln!(suu, "date,close").unwrap();
    writeln!(suu, "2020-01-01,50.0").unwrap();

    DataLoader::load(&[("APU", apu.path()), ("SUU", suu.path())]).unwrap()
}

#[test]
fn test_select_projects_in_original_order() {
    let table = load_two_entities();

    let selected = Selector::select(&table, "APU", &["close"]).unwrap();
    assert_eq!(selected.height(), 2);

    let closes: Vec<f64> = selected
        .column("close")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(closes, vec![100.0, 102.0]);
}

#[test]
fn test_select_is_idempotent() {
    let table = load_two_entities();

    let once = Selector::select(&table, "APU", &["date", "name", "close"]).unwrap();
    let narrowed = UnifiedTable::from_dataframe(once.clone()).unwrap();
    let twice = Selector::select(&narrowed, "APU", &["date", "name", "close"]).unwrap();

    assert!(once.frame_equal(&twice));
}

#[test]
fn test_absent_entity_yields_empty_frame() {
    let table = load_two_entities();

    let selected = Selector::select(&table, "MSE", &["close"]).unwrap();
    assert_eq!(selected.height(), 0);
}

#[test]
fn test_unknown_field_is_an_error() {
    let table = load_two_entities();

    let result = Selector::select(&table, "APU", &["close", "dividend"]);
    match result {
        Err(DashboardError::FieldNotFound { field, known }) => {
            assert_eq!(field, "dividend");
            assert!(known.contains(&"close".to_string()));
        }
        other => panic!("expected FieldNotFound, got {:?}", other),
    }
}
