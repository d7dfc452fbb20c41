use chrono::{DateTime, NaiveDate, Utc};

/// A candidate layout for a numeric date token
#[derive(Debug, Clone, Copy)]
pub struct DateFormat {
    /// chrono format string
    pub pattern: &'static str,
    pub separator: char,
    /// Exact number of year digits this layout accepts
    pub year_digits: usize,
    pub year_first: bool,
}

impl DateFormat {
    /// Whether the token has this layout's shape.
    ///
    /// chrono's `%Y` happily reads "25" as year 25, so 4-digit layouts must
    /// refuse 2-digit years explicitly for the `%y` fallbacks to be reached.
    fn accepts(&self, token: &str) -> bool {
        let parts: Vec<&str> = token.split(self.separator).collect();
        if parts.len() != 3 {
            return false;
        }
        let year = if self.year_first { parts[0] } else { parts[2] };
        year.len() == self.year_digits
    }
}

/// Layouts in priority order; the first that parses wins
pub const DATE_FORMATS: [DateFormat; 5] = [
    DateFormat {
        pattern: "%m/%d/%Y",
        separator: '/',
        year_digits: 4,
        year_first: false,
    },
    DateFormat {
        pattern: "%m-%d-%Y",
        separator: '-',
        year_digits: 4,
        year_first: false,
    },
    DateFormat {
        pattern: "%m/%d/%y",
        separator: '/',
        year_digits: 2,
        year_first: false,
    },
    DateFormat {
        pattern: "%m-%d-%y",
        separator: '-',
        year_digits: 2,
        year_first: false,
    },
    DateFormat {
        pattern: "%Y-%m-%d",
        separator: '-',
        year_digits: 4,
        year_first: true,
    },
];

/// Parse a date token as midnight UTC, trying [`DATE_FORMATS`] in order
pub fn parse_date_token(token: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS
        .iter()
        .filter(|format| format.accepts(token))
        .find_map(|format| NaiveDate::parse_from_str(token, format.pattern).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
