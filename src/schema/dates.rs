//! Fixed-format date patterns
//!
//! Each date field declares exactly one accepted pattern. Every digit
//! position in the pattern is mandatory; a value that does not have the
//! pattern's shape is rejected before any calendar parsing happens.
//!
//! Time-suffixed patterns separate date and time with a colon
//! (`dd/mm/yyyy:hh:mm:ss`). That first colon is rewritten to `T` before
//! parsing so the date/time boundary is unambiguous.
//!
//! Two-digit years are widened explicitly: 69-99 become 19xx, 00-68 become
//! 20xx.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Accepted textual layouts for date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `dd/mm/yyyy`
    DayMonthYear,
    /// `dd/mm/yy`
    DayMonthShortYear,
    /// `dd/mm/yyyy:hh:mm:ss`
    DayMonthYearTime,
    /// `dd/mm/yy:hh:mm:ss`
    DayMonthShortYearTime,
}

impl DatePattern {
    /// Human-readable template. Letters mark mandatory digits.
    pub fn template(&self) -> &'static str {
        match self {
            DatePattern::DayMonthYear => "dd/mm/yyyy",
            DatePattern::DayMonthShortYear => "dd/mm/yy",
            DatePattern::DayMonthYearTime => "dd/mm/yyyy:hh:mm:ss",
            DatePattern::DayMonthShortYearTime => "dd/mm/yy:hh:mm:ss",
        }
    }

    fn short_year(&self) -> bool {
        matches!(
            self,
            DatePattern::DayMonthShortYear | DatePattern::DayMonthShortYearTime
        )
    }

    fn has_time(&self) -> bool {
        matches!(
            self,
            DatePattern::DayMonthYearTime | DatePattern::DayMonthShortYearTime
        )
    }

    /// Length of the `dd/mm/yy[yy]` part
    fn date_len(&self) -> usize {
        if self.short_year() {
            8
        } else {
            10
        }
    }

    fn render_format(&self) -> &'static str {
        match self {
            DatePattern::DayMonthYear => "%d/%m/%Y",
            DatePattern::DayMonthShortYear => "%d/%m/%y",
            DatePattern::DayMonthYearTime => "%d/%m/%Y:%H:%M:%S",
            DatePattern::DayMonthShortYearTime => "%d/%m/%y:%H:%M:%S",
        }
    }

    /// Returns true if `raw` has exactly the pattern's shape.
    fn matches_shape(&self, raw: &str) -> bool {
        let template = self.template().as_bytes();
        let raw = raw.as_bytes();
        raw.len() == template.len()
            && template.iter().zip(raw).all(|(t, c)| {
                if t.is_ascii_alphabetic() {
                    c.is_ascii_digit()
                } else {
                    t == c
                }
            })
    }

    /// Parses `raw` into an absolute UTC instant. Date-only patterns resolve
    /// to midnight.
    pub fn parse(&self, raw: &str) -> Result<DateTime<Utc>, String> {
        if !self.matches_shape(raw) {
            return Err(format!("expected {}", self.template()));
        }

        let date_len = self.date_len();
        // Shape check guarantees ASCII, so byte slicing is on char boundaries.
        let date_part = widen_year(&raw[..date_len], self.short_year());

        let naive = if self.has_time() {
            let rewritten = format!("{}T{}", date_part, &raw[date_len + 1..]);
            NaiveDateTime::parse_from_str(&rewritten, "%d/%m/%YT%H:%M:%S")
                .map_err(|e| format!("invalid {}: {}", self.template(), e))?
        } else {
            NaiveDate::parse_from_str(&date_part, "%d/%m/%Y")
                .map_err(|e| format!("invalid {}: {}", self.template(), e))?
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| format!("invalid {}: midnight out of range", self.template()))?
        };

        Ok(Utc.from_utc_datetime(&naive))
    }

    /// Renders an instant back into this pattern.
    pub fn render(&self, instant: &DateTime<Utc>) -> String {
        instant.format(self.render_format()).to_string()
    }
}

/// Expands `dd/mm/yy` to `dd/mm/yyyy`; four-digit input passes through.
fn widen_year(date_part: &str, short_year: bool) -> String {
    if !short_year {
        return date_part.to_string();
    }
    let (day_month, yy) = date_part.split_at(6);
    let century = match yy.parse::<u32>() {
        Ok(y) if y >= 69 => "19",
        _ => "20",
    };
    format!("{}{}{}", day_month, century, yy)
}
