//! CSV member import.
//!
//! Expected header (any order, case-insensitive): `username,tier,start,end[,isModerator]`.
//! Rows without a username or end date are dropped silently; rows that have
//! them but fail validation are reported back as skipped.

use serde::Serialize;
use sqlx::PgPool;
use std::fmt;

use super::queries;
use super::types::{Member, NewMember};

pub const HEADER_HINT: &str = "username,tier,start,end[,isModerator]";

#[derive(Debug)]
pub enum ImportError {
    /// Missing required headers or no usable data rows.
    NoRows,
    /// Every row was rejected; the stored list is left untouched.
    NothingValid(Vec<SkippedRow>),
    Db(sqlx::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoRows => write!(f, "No rows found. Headers: {HEADER_HINT}"),
            ImportError::NothingValid(skipped) => {
                write!(f, "No valid rows found ({} rows skipped)", skipped.len())
            }
            ImportError::Db(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<sqlx::Error> for ImportError {
    fn from(e: sqlx::Error) -> Self {
        ImportError::Db(e)
    }
}

/// A data row that could not be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub username: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub imported: u64,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        let noun = if self.imported == 1 { "member" } else { "members" };
        if self.skipped.is_empty() {
            format!("Imported {} {noun}", self.imported)
        } else {
            format!("Imported {} {noun} ({} rows skipped)", self.imported, self.skipped.len())
        }
    }
}

struct Columns {
    username: usize,
    tier: Option<usize>,
    start: Option<usize>,
    end: usize,
    is_moderator: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Option<Self> {
        let find = |name: &str| header.iter().position(|h| h.to_lowercase() == name);
        Some(Columns {
            username: find("username")?,
            tier: find("tier"),
            start: find("start"),
            end: find("end")?,
            is_moderator: find("ismoderator"),
        })
    }
}

/// Split one CSV line. Double quotes group fields and `""` escapes a quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Blank or non-integer tiers fall back to 1; integers that don't fit are an error.
fn parse_tier(raw: Option<&str>) -> Result<i32, String> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(1);
    };
    match s.parse::<f64>() {
        Ok(t) if t.is_finite() && t.fract() == 0.0 => {
            i32::try_from(t as i64).map_err(|_| format!("tier {s} is out of range"))
        }
        _ => Ok(1),
    }
}

/// Split text into records. Newlines inside quoted cells stay in the record;
/// each record carries the 1-based line it starts on.
fn split_records(text: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut line = 1;
    let mut start_line = 1;
    let mut in_quotes = false;

    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '\n' if !in_quotes => {
                records.push((start_line, std::mem::take(&mut current)));
                line += 1;
                start_line = line;
            }
            '\n' => {
                line += 1;
                current.push(c);
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        records.push((start_line, current));
    }
    records
}

/// One data row as read from the file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub line: usize,
    pub member: Member,
    /// Set when a cell was present but unusable; the row will be skipped.
    pub problem: Option<String>,
}

/// Parse CSV text into rows.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRow>, ImportError> {
    let mut records = split_records(text)
        .into_iter()
        .map(|(n, r)| (n, r.trim().trim_start_matches('\u{feff}').to_string()))
        .filter(|(_, r)| !r.is_empty());

    let (_, header_line) = records.next().ok_or(ImportError::NoRows)?;
    let header = split_fields(&header_line);
    let cols = Columns::from_header(&header).ok_or(ImportError::NoRows)?;

    let rows: Vec<CsvRow> = records
        .map(|(line, record)| {
            let fields = split_fields(&record);
            let get = |ix: Option<usize>| ix.and_then(|i| fields.get(i)).map(String::as_str);
            let (tier, problem) = match parse_tier(get(cols.tier)) {
                Ok(t) => (t, None),
                Err(e) => (1, Some(e)),
            };
            let member = Member {
                username: get(Some(cols.username)).unwrap_or_default().to_string(),
                tier,
                start: get(cols.start).unwrap_or_default().to_string(),
                end: get(Some(cols.end)).unwrap_or_default().to_string(),
                is_moderator: get(cols.is_moderator)
                    .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            };
            CsvRow { line, member, problem }
        })
        .filter(|row| !row.member.username.is_empty() && !row.member.end.is_empty())
        .collect();

    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }
    Ok(rows)
}

/// Validate parsed rows for storage.
pub fn prepare(rows: &[CsvRow]) -> (Vec<NewMember>, Vec<SkippedRow>) {
    let mut valid = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    for row in rows {
        let checked = match &row.problem {
            Some(problem) => Err(problem.clone()),
            None => NewMember::try_from(&row.member),
        };
        match checked {
            Ok(m) => valid.push(m),
            Err(reason) => skipped.push(SkippedRow {
                line: row.line,
                username: row.member.username.clone(),
                reason,
            }),
        }
    }
    (valid, skipped)
}

/// Parse, validate and store a CSV import, replacing the current member list.
pub async fn import_csv(pool: &PgPool, text: &str) -> Result<ImportReport, ImportError> {
    let rows = parse_csv(text)?;
    let (valid, skipped) = prepare(&rows);
    if valid.is_empty() {
        return Err(ImportError::NothingValid(skipped));
    }

    let imported = queries::replace_all(pool, &valid).await?;
    for row in &skipped {
        log::warn!("Import: skipped line {} ({}): {}", row.line, row.username, row.reason);
    }
    Ok(ImportReport { imported, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "username,tier,start,end,isModerator\n\
        Shawn,1,2025-01-01,2025-08-31,TRUE\n\
        Alice,2,2025-06-01,2025-09-02,\n\
        \n\
        Bob,3,2025-07-10,2025-09-10,false\n";

    #[test]
    fn parses_rows_with_line_numbers() {
        let rows = parse_csv(SAMPLE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].member, Member::new("Shawn", 1, "2025-01-01", "2025-08-31", true));
        assert_eq!(rows[1].member.tier, 2);
        assert!(!rows[1].member.is_moderator);
        // blank line 4 is skipped but still counted
        assert_eq!(rows[2].line, 5);
        assert_eq!(rows[2].member.username, "Bob");
    }

    #[test]
    fn header_is_case_insensitive_and_reorderable() {
        let text = "End,USERNAME,Tier\r\n2025-12-31,Syd,4\r\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows.len(), 1);
        let m = &rows[0].member;
        assert_eq!(m.username, "Syd");
        assert_eq!(m.end, "2025-12-31");
        assert_eq!(m.tier, 4);
        assert_eq!(m.start, "");
        assert!(!m.is_moderator);
    }

    #[test]
    fn drops_rows_without_username_or_end() {
        let text = "username,tier,start,end\n,1,2025-01-01,2025-02-01\nAlice,1,2025-01-01,\nBob,1,2025-01-01,2025-03-01\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].member.username, "Bob");
    }

    #[test]
    fn missing_required_header_means_no_rows() {
        let text = "name,tier,start,finish\nAlice,1,2025-01-01,2025-02-01\n";
        assert!(matches!(parse_csv(text), Err(ImportError::NoRows)));
        assert!(matches!(parse_csv(""), Err(ImportError::NoRows)));
        assert!(matches!(parse_csv("username,end\n"), Err(ImportError::NoRows)));
    }

    #[test]
    fn quoted_fields_may_contain_commas() {
        let text = "username,tier,start,end\n\"Smith, J\",2,2025-01-01,2025-02-01\n\"Say \"\"hi\"\"\",1,2025-01-01,2025-02-01\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows[0].member.username, "Smith, J");
        assert_eq!(rows[1].member.username, "Say \"hi\"");
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let text = "username,tier,start,end\r\n\"Smith\r\nJr\",2,2025-01-01,2025-02-01\r\nBob,1,2025-01-01,2025-03-01\r\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].member.username, "Smith\r\nJr");
        assert_eq!(rows[0].member.tier, 2);
        assert_eq!(rows[0].member.end, "2025-02-01");
        // the quoted newline still advances the line count
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].member.username, "Bob");
    }

    #[test]
    fn tier_defaults_to_one() {
        assert_eq!(parse_tier(None), Ok(1));
        assert_eq!(parse_tier(Some("")), Ok(1));
        assert_eq!(parse_tier(Some("gold")), Ok(1));
        assert_eq!(parse_tier(Some("2.5")), Ok(1));
        assert_eq!(parse_tier(Some(" 3 ")), Ok(3));
        assert_eq!(parse_tier(Some("0")), Ok(0));
    }

    #[test]
    fn oversized_tier_is_skipped_not_clamped() {
        assert!(parse_tier(Some("99999999999")).is_err());
        assert!(parse_tier(Some("-3000000000")).is_err());

        let text = "username,tier,start,end\nAlice,99999999999,2025-01-01,2025-02-01\nBob,2,2025-01-01,2025-02-01\n";
        let rows = parse_csv(text).unwrap();
        let (valid, skipped) = prepare(&rows);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].username, "Bob");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line, 2);
        assert_eq!(skipped[0].username, "Alice");
        assert!(skipped[0].reason.contains("out of range"));
    }

    #[test]
    fn prepare_reports_invalid_rows() {
        let text = "username,tier,start,end\nAlice,1,2025-01-01,2025-02-01\nBob,1,yesterday,2025-02-01\nCarl,0,2025-01-01,2025-02-01\n";
        let rows = parse_csv(text).unwrap();
        let (valid, skipped) = prepare(&rows);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].username, "Alice");
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].line, 3);
        assert_eq!(skipped[0].username, "Bob");
        assert!(skipped[0].reason.contains("start date"));
        assert_eq!(skipped[1].username, "Carl");
    }

    #[test]
    fn report_summary_mentions_skips() {
        let clean = ImportReport { imported: 1, skipped: vec![] };
        assert_eq!(clean.summary(), "Imported 1 member");
        let partial = ImportReport {
            imported: 4,
            skipped: vec![SkippedRow { line: 3, username: "Bob".into(), reason: "x".into() }],
        };
        assert_eq!(partial.summary(), "Imported 4 members (1 rows skipped)");
    }
}
