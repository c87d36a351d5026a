use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Minutes on the full day grid.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A local wall-clock time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u32);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Time {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    /// Parses an `"HH:MM"` string.
    ///
    /// Returns `None` on anything that does not look like a time of day;
    /// callers that treat a bad time as "no constraint" lean on this.
    pub fn from_hm(time: &str) -> Option<Self> {
        let (hours, minutes) = time.trim().split_once(':')?;
        let hours: u32 = hours.trim().parse().ok()?;
        let minutes: u32 = minutes.trim().parse().ok()?;
        if hours >= 24 || minutes >= 60 {
            return None;
        }
        Some(Self(hours * 60 + minutes))
    }

    /// Minutes to wait between this time and a later clock reading,
    /// rolling over midnight when the naive difference is negative.
    pub fn wait_until(&self, next: Time) -> Duration {
        let diff = next.0 as i64 - self.0 as i64;
        Duration(diff.rem_euclid(MINUTES_PER_DAY as i64) as u32)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00";
    let stime = Time::from_hm(time).unwrap();
    assert_eq!(time, stime.to_string())
}

#[test]
fn parse_unparse_2() {
    let time = "08:05";
    let stime = Time::from_hm(time).unwrap();
    assert_eq!(time, stime.to_string())
}

#[test]
fn parse_unparse_3() {
    let time = "23:59";
    let stime = Time::from_hm(time).unwrap();
    assert_eq!(time, stime.to_string())
}

#[test]
fn valid_time_test_1() {
    let time = "00:00";
    assert_eq!(Time::from_hm(time).unwrap().as_minutes(), 0);
}

#[test]
fn valid_time_test_2() {
    let time = "00:30";
    assert_eq!(Time::from_hm(time).unwrap().as_minutes(), 30);
}

#[test]
fn valid_time_test_3() {
    let time = "01:30";
    assert_eq!(Time::from_hm(time).unwrap().as_minutes(), 90);
}

#[test]
fn valid_time_test_4() {
    let time = " 12:45 ";
    assert_eq!(Time::from_hm(time).unwrap().as_minutes(), 765);
}

#[test]
fn invalid_time_test_1() {
    let time = "00:0a";
    assert!(Time::from_hm(time).is_none())
}

#[test]
fn invalid_time_test_2() {
    let time = "0800";
    assert!(Time::from_hm(time).is_none())
}

#[test]
fn invalid_time_test_3() {
    let time = "24:00";
    assert!(Time::from_hm(time).is_none())
}

#[test]
fn invalid_time_test_4() {
    let time = "08:60";
    assert!(Time::from_hm(time).is_none())
}

#[test]
fn wait_same_day() {
    let arr = Time::from_hm("10:00").unwrap();
    let dep = Time::from_hm("10:45").unwrap();
    assert_eq!(arr.wait_until(dep).as_minutes(), 45);
}

#[test]
fn wait_over_midnight() {
    let arr = Time::from_hm("23:30").unwrap();
    let dep = Time::from_hm("00:15").unwrap();
    assert_eq!(arr.wait_until(dep).as_minutes(), 45);
}

/// A span of minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const ZERO: Self = Self(0);

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self(hours * 60)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 60;
        let minutes = self.0 % 60;
        if hours > 0 {
            write!(f, "{hours}h {minutes}m")
        } else {
            write!(f, "{minutes}m")
        }
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

#[test]
fn format_minutes_only() {
    assert_eq!(Duration::from_minutes(45).to_string(), "45m");
}

#[test]
fn format_hours_and_minutes() {
    assert_eq!(Duration::from_minutes(270).to_string(), "4h 30m");
}
