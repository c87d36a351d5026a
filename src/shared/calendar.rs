//! Weekly operating calendars.
//!
//! Connections carry their days of operation as a human-authored string
//! ("Daily", "Mon-Fri", "Fri-Sun", "Monday,Wednesday"). The raw string is
//! the stored form; all matching happens on the weekday set derived here.

use chrono::Weekday;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// A set of weekdays, one bit per day starting at Monday.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: Self = Self(0);
    /// All seven days.
    pub const ALL: Self = Self(0b0111_1111);

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// True when the two sets share at least one day.
    pub fn intersects(&self, other: WeekdaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn days(self) -> impl Iterator<Item = Weekday> {
        let mut day = Weekday::Mon;
        (0..7).filter_map(move |_| {
            let current = day;
            day = day.succ();
            self.contains(current).then_some(current)
        })
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.days()).finish()
    }
}

/// Parses a day-of-operation spec into the set of weekdays it covers.
///
/// Recognized forms, all case-insensitive:
/// - `"Daily"` for all seven days
/// - a weekday name or its 3-letter abbreviation
/// - a comma-separated list of the above
/// - a hyphen range `"A-B"`, wrapping past Sunday when A comes after B
///
/// Tokens that parse as nothing are dropped, not an error; a spec that
/// yields no days simply never matches anything.
pub fn parse(spec: &str) -> WeekdaySet {
    // En- and em-dashes show up in hand-authored feeds.
    let normalized = spec.trim().replace(['\u{2013}', '\u{2014}'], "-");
    if normalized.eq_ignore_ascii_case("daily") {
        return WeekdaySet::ALL;
    }

    let mut set = WeekdaySet::EMPTY;
    for token in normalized.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some((start, end)) = token.split_once('-') {
            match (parse_day(start), parse_day(end)) {
                (Some(start), Some(end)) => {
                    let range = expand_range(start, end);
                    for day in range.days() {
                        set.insert(day);
                    }
                }
                _ => trace!("dropping unrecognized day range {token:?}"),
            }
        } else if let Some(day) = parse_day(token) {
            set.insert(day);
        } else {
            trace!("dropping unrecognized day token {token:?}");
        }
    }
    set
}

/// The weekdays from `start` to `end` inclusive, wrapping around the week
/// when `start` comes after `end` (so Fri-Mon covers Fri, Sat, Sun, Mon).
pub fn expand_range(start: Weekday, end: Weekday) -> WeekdaySet {
    let mut set = WeekdaySet::EMPTY;
    let mut day = start;
    loop {
        set.insert(day);
        if day == end {
            break;
        }
        day = day.succ();
    }
    set
}

/// Whether a connection with the given spec runs on `day`.
pub fn operates_on(spec: &str, day: Weekday) -> bool {
    parse(spec).contains(day)
}

/// Whether a connection's calendar satisfies a query day filter.
///
/// Matching is semantic: both sides are parsed to weekday sets and any
/// shared day is enough, so a "Fri-Sun" connection satisfies a
/// "Friday,Saturday" filter. The one literal rule: a filter of `"Daily"`
/// asks for connections that run every day by their own declaration, and
/// matches only a spec that is literally `"Daily"`.
pub fn filter_matches(connection_spec: &str, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    if filter.eq_ignore_ascii_case("daily") {
        return connection_spec.trim().eq_ignore_ascii_case("daily");
    }
    let wanted = parse(filter);
    if wanted.is_empty() {
        // The filter was present but nonsense; nothing can satisfy it.
        return false;
    }
    parse(connection_spec).intersects(wanted)
}

fn parse_day(token: &str) -> Option<Weekday> {
    Weekday::from_str(token.trim()).ok()
}
