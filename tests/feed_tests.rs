use std::{fs, io::Write};

use brunel::{feed, prelude::*};
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

const FEED: &str = "\
Route,Departure City,Arrival City,Departure Time,Arrival Time,Train Type,Days of Operation,First Class,Second Class
R1,Paris,Lyon,08:00,10:00,TGV,Daily,50,30
R2,Lyon,Marseille,10:45,12:30,TGV,\"Monday, Wednesday\",40,25
N1,Paris,Berlin,23:30,00:45 (+1d),Night,Daily,100,60
";

#[test]
fn loads_rows_and_skips_the_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, FEED).unwrap();

    let mut catalog = Catalog::new();
    let report = feed::load_csv_file(&path, &mut catalog).unwrap();

    assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
    assert_eq!(catalog.len(), 3);
    let first = &catalog.connections()[0];
    assert_eq!(&*first.route_id, "R1");
    assert_eq!(&*first.departure_city.name, "Paris");
    assert_eq!(first.departure_time, Time::from_hm("08:00").unwrap());
    assert_eq!(first.first_class_fare, 50.0);
    assert_eq!(first.second_class_fare, 30.0);
    assert!(!first.crosses_midnight);
}

#[test]
fn quoted_day_lists_stay_one_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, FEED).unwrap();

    let mut catalog = Catalog::new();
    feed::load_csv_file(&path, &mut catalog).unwrap();

    let second = &catalog.connections()[1];
    assert_eq!(&*second.days_of_operation, "Monday, Wednesday");
}

#[test]
fn next_day_marker_sets_the_rollover_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, FEED).unwrap();

    let mut catalog = Catalog::new();
    feed::load_csv_file(&path, &mut catalog).unwrap();

    let night = &catalog.connections()[2];
    assert!(night.crosses_midnight);
    assert_eq!(night.arrival_time, Time::from_hm("00:45").unwrap());
    assert_eq!(night.duration().as_minutes(), 75);
}

#[test]
fn cities_and_train_types_are_deduped_across_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, FEED).unwrap();

    let mut catalog = Catalog::new();
    feed::load_csv_file(&path, &mut catalog).unwrap();

    // Paris, Lyon, Marseille, Berlin; TGV, Night.
    assert_eq!(catalog.cities().len(), 4);
    assert_eq!(catalog.train_types().len(), 2);
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let feed_text = "\
R1,Paris,Lyon,08:00,10:00,TGV,Daily,50,30
R2,Paris,Lyon,8 o'clock,10:00,TGV,Daily,50,30
R3,Paris,Lyon,08:00,10:00,TGV,Daily,lots,30
R4,Paris,Lyon,08:00,10:00,TGV,Daily,-5,30
R5,,Lyon,08:00,10:00,TGV,Daily,50,30
R6,Paris,Lyon,08:00
R7,Paris,Lyon,09:00,11:00,TGV,Daily,50,30
";
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, feed_text).unwrap();

    let mut catalog = Catalog::new();
    let report = feed::load_csv_file(&path, &mut catalog).unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, 5);
    assert_eq!(catalog.len(), 2);
    assert_eq!(&*catalog.connections()[0].route_id, "R1");
    assert_eq!(&*catalog.connections()[1].route_id, "R7");
}

#[test]
fn header_sniffing_applies_to_the_first_row_only() {
    let feed_text = "\
R1,Paris,Lyon,08:00,10:00,TGV,Daily,50,30
Route-X,Lyon,Marseille,10:45,12:30,TGV,Daily,40,25
";
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, feed_text).unwrap();

    let mut catalog = Catalog::new();
    let report = feed::load_csv_file(&path, &mut catalog).unwrap();

    // "Route-X" would look like a header, but only row one is sniffed.
    assert_eq!(report.loaded, 2);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn loads_csv_entry_from_zip_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feed.zip");
    let file = fs::File::create(&path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    archive
        .start_file("connections.csv", SimpleFileOptions::default())
        .unwrap();
    archive.write_all(FEED.as_bytes()).unwrap();
    archive.finish().unwrap();

    let mut catalog = Catalog::new();
    let report = feed::load_zip_file(&path, &mut catalog).unwrap();

    assert_eq!(report.loaded, 3);
    assert_eq!(catalog.len(), 3);
}

#[test]
fn zip_without_csv_entry_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feed.zip");
    let file = fs::File::create(&path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    archive
        .start_file("readme.txt", SimpleFileOptions::default())
        .unwrap();
    archive.write_all(b"no timetable here").unwrap();
    archive.finish().unwrap();

    let mut catalog = Catalog::new();
    let result = feed::load_zip_file(&path, &mut catalog);
    assert!(matches!(result, Err(feed::Error::NoCsvEntry(_))));
}

#[test]
fn loaded_feed_is_searchable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("connections.csv");
    fs::write(&path, FEED).unwrap();

    let mut catalog = Catalog::new();
    feed::load_csv_file(&path, &mut catalog).unwrap();

    let query = SearchQuery::new().from("paris").to("lyon");
    let trips = catalog.planner().search(&query);
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].total_second_class_fare(), 30.0);
}
