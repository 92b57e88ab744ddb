/// Incident records and their timestamps
///
/// Source timestamps carry no zone; they are Japan Standard Time, so they are
/// pinned to +09:00 here instead of following the host's local zone.

use serde::{Deserialize, Serialize};

const JST_OFFSET_MS: i64 = 9 * 60 * 60 * 1000;

/// One incident row: when it happened and how many people it hurt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Display text, `YYYY/MM/DDTHH:MM:SS+09:00`
    pub date_label: String,
    pub death_count: u32,
    pub injury_count: u32,
}

impl Record {
    pub fn new(timestamp: LocalDateTime, death_count: u32, injury_count: u32) -> Self {
        Self {
            timestamp_ms: timestamp.epoch_ms(),
            date_label: timestamp.label(),
            death_count,
            injury_count,
        }
    }

    /// Saturates instead of overflowing on absurd sheet counts
    pub fn total(&self) -> u32 {
        self.death_count.saturating_add(self.injury_count)
    }
}

/// Wall-clock time in JST as written in the source sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl LocalDateTime {
    /// Accepts `YYYY/MM/DD HH:MM:SS`, with `-` date separators or a `T`
    /// between date and time. Seconds and the whole time part are optional.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (date, time) = match text.find([' ', 'T']) {
            Some(split) => (&text[..split], text[split + 1..].trim()),
            None => (text, ""),
        };

        let mut date_parts = date.split(['/', '-']);
        let year = date_parts.next()?.parse().ok()?;
        let month = date_parts.next()?.parse().ok()?;
        let day = date_parts.next()?.parse().ok()?;
        if date_parts.next().is_some() {
            return None;
        }

        let (mut hour, mut minute, mut second) = (0, 0, 0);
        if !time.is_empty() {
            let mut time_parts = time.split(':');
            hour = time_parts.next()?.parse().ok()?;
            minute = time_parts.next()?.parse().ok()?;
            if let Some(sec) = time_parts.next() {
                second = sec.parse().ok()?;
            }
            if time_parts.next().is_some() {
                return None;
            }
        }

        let parsed = Self { year, month, day, hour, minute, second };
        parsed.is_valid().then_some(parsed)
    }

    fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    pub fn epoch_ms(&self) -> i64 {
        let days = days_from_civil(self.year, self.month, self.day);
        let seconds = days * 86_400
            + self.hour as i64 * 3_600
            + self.minute as i64 * 60
            + self.second as i64;
        seconds * 1000 - JST_OFFSET_MS
    }

    pub fn label(&self) -> String {
        format!(
            "{:04}/{:02}/{:02}T{:02}:{:02}:{:02}+09:00",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 in the proleptic Gregorian calendar
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
