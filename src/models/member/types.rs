use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read access to the subscription fields the status classifier and the
/// dashboard tables work with. Implemented by both string-dated records
/// (imports, JSON payloads, demo data) and stored records.
pub trait Subscriber {
    fn username(&self) -> &str;
    fn tier(&self) -> i32;
    fn starts_at(&self) -> Option<DateTime<Utc>>;
    /// `None` when the end date cannot be parsed.
    fn ends_at(&self) -> Option<DateTime<Utc>>;
    fn is_moderator(&self) -> bool;
}

/// A member as supplied by an import or a JSON request: dates are raw strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub username: String,
    #[serde(default = "default_tier")]
    pub tier: i32,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub is_moderator: bool,
}

fn default_tier() -> i32 {
    1
}

impl Member {
    pub fn new(username: &str, tier: i32, start: &str, end: &str, is_moderator: bool) -> Self {
        Self {
            username: username.to_string(),
            tier,
            start: start.to_string(),
            end: end.to_string(),
            is_moderator,
        }
    }
}

impl Subscriber for Member {
    fn username(&self) -> &str {
        &self.username
    }

    fn tier(&self) -> i32 {
        self.tier
    }

    fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start)
    }

    fn ends_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end)
    }

    fn is_moderator(&self) -> bool {
        self.is_moderator
    }
}

/// A member row from the `members` table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredMember {
    #[serde(skip)]
    pub id: i64,
    pub username: String,
    pub tier: i32,
    #[serde(rename = "start")]
    pub start_at: DateTime<Utc>,
    #[serde(rename = "end")]
    pub end_at: DateTime<Utc>,
    pub is_moderator: bool,
}

impl Subscriber for StoredMember {
    fn username(&self) -> &str {
        &self.username
    }

    fn tier(&self) -> i32 {
        self.tier
    }

    fn starts_at(&self) -> Option<DateTime<Utc>> {
        Some(self.start_at)
    }

    fn ends_at(&self) -> Option<DateTime<Utc>> {
        Some(self.end_at)
    }

    fn is_moderator(&self) -> bool {
        self.is_moderator
    }
}

/// Validated input for inserting a member.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub username: String,
    pub tier: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub is_moderator: bool,
}

impl TryFrom<&Member> for NewMember {
    type Error = String;

    fn try_from(m: &Member) -> Result<Self, Self::Error> {
        let username = m.username.trim();
        if username.is_empty() {
            return Err("username is required".to_string());
        }
        if m.tier < 1 {
            return Err(format!("tier must be at least 1 (got {})", m.tier));
        }
        let start_at = parse_timestamp(&m.start)
            .ok_or_else(|| format!("unparseable start date '{}'", m.start))?;
        let end_at = parse_timestamp(&m.end)
            .ok_or_else(|| format!("unparseable end date '{}'", m.end))?;
        Ok(NewMember {
            username: username.to_string(),
            tier: m.tier,
            start_at,
            end_at,
            is_moderator: m.is_moderator,
        })
    }
}

/// Parse an ISO-8601 timestamp or a bare `YYYY-MM-DD` date.
/// Dates and offset-less timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Display format for table cells, e.g. `Sep 01, 2025`.
pub fn format_date(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_bare_date_as_utc_midnight() {
        let dt = parse_timestamp("2025-09-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2025-09-01T02:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-09-01T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-09-01 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2025-09-01T10:30 "), Some(expected));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("2025-13-01").is_none());
    }

    #[test]
    fn formats_dates_for_tables() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(Some(dt)), "Sep 01, 2025");
        assert_eq!(format_date(None), "—");
    }

    #[test]
    fn new_member_requires_parseable_dates() {
        let ok = Member::new("Alice", 2, "2025-06-01", "2025-09-02", false);
        let new = NewMember::try_from(&ok).unwrap();
        assert_eq!(new.username, "Alice");
        assert_eq!(new.tier, 2);

        let bad_end = Member::new("Bob", 1, "2025-06-01", "soon", false);
        let err = NewMember::try_from(&bad_end).unwrap_err();
        assert!(err.contains("end date"));

        let bad_tier = Member::new("Carl", 0, "2025-06-01", "2025-09-02", false);
        assert!(NewMember::try_from(&bad_tier).is_err());
    }

    #[test]
    fn member_json_uses_camel_case_and_defaults() {
        let m: Member = serde_json::from_str(r#"{"username":"Syd","end":"2025-12-31","isModerator":true}"#).unwrap();
        assert_eq!(m.tier, 1);
        assert_eq!(m.start, "");
        assert!(m.is_moderator);
    }
}
