use std::sync::Arc;

use celestial_epoch::provider::{self, EopTableConfig, OffsetProvider};
use celestial_epoch::{EopTable, Epoch, TimeError, Ut1Record, TAI, UT1, UTC};

/// Daily UT1−UTC values around the end-2016 leap second.
fn install_table() {
    let records = (57_740..57_770)
        .map(|mjd| {
            let drift = -0.0006 * (mjd - 57_740) as f64;
            let value = if mjd < 57_754 { 0.5980 + drift } else { -0.4020 + drift };
            Ut1Record::new(mjd as f64, value)
        })
        .collect();
    let table = EopTable::new(records).with_config(EopTableConfig { max_gap_days: 2.0 });
    // Every test installs the same table; only the first call wins.
    let _ = provider::install(Arc::new(table));
}

#[test]
fn ut1_from_installed_table() {
    install_table();
    assert!(provider::installed().is_some());

    let utc = Epoch::from_calendar(UTC, 2016, 12, 20, 12, 0, 0.0).unwrap();
    let ut1 = utc.to_scale(UT1).unwrap();
    // MJD 57742.5: 0.5980 - 0.0015
    let dut1 = ut1.reading().seconds_since(&utc.reading());
    assert!((dut1 - 0.5965).abs() < 1e-9, "{}", dut1);
}

#[test]
fn ut1_round_trip_through_tai() {
    install_table();
    let ut1 = Epoch::from_calendar(UT1, 2017, 1, 5, 6, 0, 0.0).unwrap();
    let tai = ut1.to_scale(TAI).unwrap();
    let back = tai.to_scale(UT1).unwrap();
    assert!((back - ut1).value().abs() < 1e-9);
    assert_eq!(back.to_string(), "2017-01-05T06:00:00.000 UT1");
}

#[test]
fn outside_table_is_unavailable() {
    install_table();
    let utc = Epoch::from_date(UTC, 2019, 1, 1).unwrap();
    assert!(matches!(utc.to_scale(UT1), Err(TimeError::DataUnavailable(_))));
}

#[test]
fn second_install_is_rejected() {
    install_table();
    struct Nothing;
    impl OffsetProvider for Nothing {}
    let err = provider::install(Arc::new(Nothing)).unwrap_err();
    assert!(matches!(err, TimeError::ValidationError(_)));
}
