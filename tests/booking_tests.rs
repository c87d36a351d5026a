use brunel::prelude::*;
use chrono::NaiveDate;

/// Feed-shaped helper: an arrival of "00:45 (+1d)" marks an overnight leg.
fn add_connection(
    catalog: &mut Catalog,
    route: &str,
    from: &str,
    to: &str,
    departs: &str,
    arrives: &str,
    days: &str,
    fares: (f64, f64),
) {
    let crosses_midnight = arrives.contains("(+1d)");
    let arrives = arrives.split('(').next().unwrap().trim();
    let departure_city = catalog.find_or_create_city(from);
    let arrival_city = catalog.find_or_create_city(to);
    let train_type = catalog.find_or_create_train_type("IC");
    catalog.add(Connection {
        route_id: route.into(),
        departure_city,
        arrival_city,
        departure_time: Time::from_hm(departs).unwrap(),
        arrival_time: Time::from_hm(arrives).unwrap(),
        train_type,
        days_of_operation: days.into(),
        first_class_fare: fares.0,
        second_class_fare: fares.1,
        crosses_midnight,
    });
}

fn trip_from(catalog: &Catalog, fare_class: FareClass, transfer_minutes: u32) -> Trip {
    let mut trip = Trip::new();
    for connection in catalog.connections() {
        trip.add_leg(connection.clone());
    }
    trip.compute_totals(fare_class, Duration::from_minutes(transfer_minutes));
    trip
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn same_day_trip_arrives_on_the_departure_date() {
    let mut catalog = Catalog::new();
    add_connection(
        &mut catalog,
        "R1",
        "Paris",
        "Lyon",
        "08:00",
        "10:00",
        "Daily",
        (50.0, 30.0),
    );
    let trip = trip_from(&catalog, FareClass::Second, 0);
    let booked = BookedTrip::new(trip, FareClass::Second, date(2026, 3, 2));

    assert_eq!(booked.departure_date(), date(2026, 3, 2));
    assert_eq!(booked.arrival_date(), date(2026, 3, 2));
}

#[test]
fn overnight_leg_advances_the_arrival_date() {
    let mut catalog = Catalog::new();
    add_connection(
        &mut catalog,
        "N1",
        "Paris",
        "Berlin",
        "23:30",
        "00:45 (+1d)",
        "Daily",
        (100.0, 60.0),
    );
    let trip = trip_from(&catalog, FareClass::Second, 0);
    let booked = BookedTrip::new(trip, FareClass::Second, date(2026, 3, 2));

    assert_eq!(booked.arrival_date(), date(2026, 3, 3));
}

#[test]
fn transfer_past_midnight_advances_the_arrival_date() {
    let mut catalog = Catalog::new();
    add_connection(
        &mut catalog,
        "R1",
        "A",
        "B",
        "22:00",
        "23:50",
        "Daily",
        (10.0, 5.0),
    );
    // The connecting train leaves after the clock wraps.
    add_connection(
        &mut catalog,
        "R2",
        "B",
        "C",
        "00:30",
        "02:00",
        "Daily",
        (10.0, 5.0),
    );
    let trip = trip_from(&catalog, FareClass::Second, 40);
    let booked = BookedTrip::new(trip, FareClass::Second, date(2026, 3, 2));

    assert_eq!(booked.arrival_date(), date(2026, 3, 3));
}

#[test]
fn overnight_leg_and_overnight_transfer_stack() {
    let mut catalog = Catalog::new();
    add_connection(
        &mut catalog,
        "N1",
        "A",
        "B",
        "23:00",
        "01:00 (+1d)",
        "Daily",
        (10.0, 5.0),
    );
    add_connection(
        &mut catalog,
        "N2",
        "B",
        "C",
        "00:45",
        "03:00",
        "Daily",
        (10.0, 5.0),
    );
    let trip = trip_from(&catalog, FareClass::Second, 1425);
    let booked = BookedTrip::new(trip, FareClass::Second, date(2026, 3, 2));

    // One day for the overnight leg, one for the wrapped transfer.
    assert_eq!(booked.arrival_date(), date(2026, 3, 4));
}

#[test]
fn trip_ids_have_the_expected_shape_and_are_distinct() {
    let mut catalog = Catalog::new();
    add_connection(
        &mut catalog,
        "R1",
        "Paris",
        "Lyon",
        "08:00",
        "10:00",
        "Daily",
        (50.0, 30.0),
    );
    let first = BookedTrip::new(
        trip_from(&catalog, FareClass::Second, 0),
        FareClass::Second,
        date(2026, 3, 2),
    );
    let second = BookedTrip::new(
        trip_from(&catalog, FareClass::Second, 0),
        FareClass::Second,
        date(2026, 3, 2),
    );

    for booked in [&first, &second] {
        let id = booked.trip_id();
        assert!(id.starts_with("TR-"), "unexpected id {id}");
        assert_eq!(id.len(), 9, "unexpected id {id}");
        assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }
    assert_ne!(first.trip_id(), second.trip_id());
}

#[test]
fn price_follows_the_booked_fare_class() {
    let mut catalog = Catalog::new();
    add_connection(
        &mut catalog,
        "R1",
        "Paris",
        "Lyon",
        "08:00",
        "10:00",
        "Daily",
        (50.0, 30.0),
    );
    let first = BookedTrip::new(
        trip_from(&catalog, FareClass::First, 0),
        FareClass::First,
        date(2026, 3, 2),
    );
    let second = BookedTrip::new(
        trip_from(&catalog, FareClass::Second, 0),
        FareClass::Second,
        date(2026, 3, 2),
    );

    assert_eq!(first.price(), 50.0);
    assert_eq!(second.price(), 30.0);
}
