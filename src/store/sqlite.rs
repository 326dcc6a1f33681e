//! SQLite adapter over the reporting database
//!
//! The reporting database is maintained by the nightly ingestion jobs;
//! this adapter only reads it. Dates are stored as ISO-8601 text, so
//! range predicates compare lexicographically in SQL and parse to
//! `NaiveDate` only where age arithmetic needs them.

use std::path::Path;

use chrono::NaiveDate;
use itertools::Itertools;
use rusqlite::{Connection, params, params_from_iter};

use crate::algorithm::Roster;
use crate::error::{ReportingError, Result};
use crate::models::{DoseStatus, PayerGroup, VaccineProgram};
use crate::period::DateRange;
use crate::store::{PopulationStore, RosterRow};

/// Fixture schema for the core tables. The production database is created
/// by the ingestion jobs; this exists for tests and ad-hoc rebuilds.
pub const CORE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS enrollment (
    member_id TEXT NOT NULL,
    center TEXT NOT NULL,
    enrollment_date TEXT NOT NULL,
    disenrollment_date TEXT,
    disenroll_type TEXT,
    medicare INTEGER NOT NULL DEFAULT 0,
    medicaid INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS demographics (
    member_id TEXT PRIMARY KEY,
    dob TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ppts (
    member_id TEXT PRIMARY KEY,
    first TEXT NOT NULL,
    last TEXT NOT NULL
);
";

/// Read-only store over the SQLite reporting database
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the reporting database.
    ///
    /// The enrollment roster is required; a database without it cannot
    /// produce any report and is rejected here, before any period math.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self {
            conn: Connection::open(path)?,
        };
        if !store.table_exists("enrollment")? {
            return Err(ReportingError::MissingSourceData(format!(
                "enrollment table not found in {}",
                path.display()
            )));
        }
        Ok(store)
    }

    /// Open an empty in-memory database (fixtures and tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the core tables if they are missing
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(CORE_SCHEMA)?;
        Ok(())
    }

    /// Create a program's event table if it is missing
    pub fn init_feed(&self, program: VaccineProgram) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                member_id TEXT NOT NULL,
                date_administered TEXT,
                dose_status INTEGER NOT NULL
            );",
            program.feed_name()
        ))?;
        Ok(())
    }

    /// The underlying connection, for fixture loading
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    fn collect_ids<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Roster> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;
        let mut roster = Roster::default();
        for id in rows {
            roster.insert(id?);
        }
        Ok(roster)
    }

    fn count<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<usize> {
        let n: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}

impl PopulationStore for SqliteStore {
    fn eligible_roster(
        &self,
        center: &str,
        range: &DateRange,
        min_age: Option<u32>,
    ) -> Result<Roster> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT e.member_id, d.dob, e.disenrollment_date
             FROM enrollment e
             LEFT JOIN demographics d ON e.member_id = d.member_id
             WHERE e.center = ?1
               AND e.enrollment_date <= ?2
               AND (e.disenrollment_date >= ?3 OR e.disenrollment_date IS NULL)",
        )?;
        let rows = stmt.query_map(
            params![center, date_param(range.end), date_param(range.start)],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )?;

        let mut roster = Roster::default();
        for row in rows {
            let (member_id, dob, disenrolled) = row?;
            if let Some(min) = min_age {
                // No demographic record means no age, which means excluded
                let Some(raw_dob) = dob else { continue };
                let dob = parse_date(&raw_dob)?;
                let reference = match disenrolled {
                    Some(raw) => parse_date(&raw)?,
                    None => range.end,
                };
                if reference.years_since(dob).is_none_or(|age| age < min) {
                    continue;
                }
            }
            roster.insert(member_id);
        }
        Ok(roster)
    }

    fn administered_within(
        &self,
        program: VaccineProgram,
        center: &str,
        window: &DateRange,
    ) -> Result<Roster> {
        self.collect_ids(
            &format!(
                "SELECT DISTINCT v.member_id
                 FROM {} v
                 JOIN enrollment e ON v.member_id = e.member_id
                 WHERE e.center = ?1
                   AND v.dose_status = ?2
                   AND v.date_administered IS NOT NULL
                   AND v.date_administered BETWEEN ?3 AND ?4",
                program.feed_name()
            ),
            params![
                center,
                DoseStatus::Administered.code(),
                date_param(window.start),
                date_param(window.end)
            ],
        )
    }

    fn administered_before(
        &self,
        program: VaccineProgram,
        center: &str,
        cutoff: NaiveDate,
        horizon: Option<NaiveDate>,
    ) -> Result<Roster> {
        let base = format!(
            "SELECT DISTINCT v.member_id
             FROM {} v
             JOIN enrollment e ON v.member_id = e.member_id
             WHERE e.center = ?1
               AND v.dose_status = ?2
               AND v.date_administered IS NOT NULL
               AND v.date_administered < ?3",
            program.feed_name()
        );
        match horizon {
            Some(h) => self.collect_ids(
                &format!("{base} AND v.date_administered >= ?4"),
                params![
                    center,
                    DoseStatus::Administered.code(),
                    date_param(cutoff),
                    date_param(h)
                ],
            ),
            None => self.collect_ids(
                &base,
                params![center, DoseStatus::Administered.code(), date_param(cutoff)],
            ),
        }
    }

    fn contraindicated(&self, program: VaccineProgram, center: &str) -> Result<Roster> {
        self.collect_ids(
            &format!(
                "SELECT DISTINCT v.member_id
                 FROM {} v
                 JOIN enrollment e ON v.member_id = e.member_id
                 WHERE e.center = ?1 AND v.dose_status = ?2",
                program.feed_name()
            ),
            params![center, DoseStatus::Contraindicated.code()],
        )
    }

    fn refused_within(
        &self,
        program: VaccineProgram,
        center: &str,
        window: &DateRange,
    ) -> Result<Roster> {
        self.collect_ids(
            &format!(
                "SELECT DISTINCT v.member_id
                 FROM {} v
                 JOIN enrollment e ON v.member_id = e.member_id
                 WHERE e.center = ?1
                   AND v.dose_status = ?2
                   AND (v.date_administered IS NULL
                        OR v.date_administered BETWEEN ?3 AND ?4)",
                program.feed_name()
            ),
            params![
                center,
                DoseStatus::Refused.code(),
                date_param(window.start),
                date_param(window.end)
            ],
        )
    }

    fn refused_before(
        &self,
        program: VaccineProgram,
        center: &str,
        cutoff: NaiveDate,
    ) -> Result<Roster> {
        self.collect_ids(
            &format!(
                "SELECT DISTINCT v.member_id
                 FROM {} v
                 JOIN enrollment e ON v.member_id = e.member_id
                 WHERE e.center = ?1
                   AND v.dose_status = ?2
                   AND v.date_administered IS NOT NULL
                   AND v.date_administered < ?3",
                program.feed_name()
            ),
            params![center, DoseStatus::Refused.code(), date_param(cutoff)],
        )
    }

    fn participant_details(&self, ids: &Roster) -> Result<Vec<RosterRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = ids.iter().map(|_| "?").join(",");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT e.member_id, p.first, p.last, e.enrollment_date, e.disenrollment_date
             FROM enrollment e
             JOIN ppts p ON e.member_id = p.member_id
             WHERE e.member_id IN ({placeholders})
             ORDER BY e.member_id, e.enrollment_date"
        ))?;

        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut details = Vec::with_capacity(ids.len());
        for row in rows {
            let (member_id, first, last, enrolled, disenrolled) = row?;
            details.push(RosterRow {
                member_id,
                first,
                last,
                enrollment_date: parse_date(&enrolled)?,
                disenrollment_date: disenrolled.as_deref().map(parse_date).transpose()?,
            });
        }
        Ok(details)
    }

    fn has_program_feed(&self, program: VaccineProgram) -> Result<bool> {
        self.table_exists(program.feed_name())
    }

    fn census_count(&self, center: Option<&str>, range: &DateRange) -> Result<usize> {
        let base = "SELECT COUNT(member_id) FROM enrollment
             WHERE enrollment_date <= ?1
               AND (disenrollment_date >= ?2 OR disenrollment_date IS NULL)";
        match center {
            Some(c) => self.count(
                &format!("{base} AND center = ?3"),
                params![date_param(range.end), date_param(range.start), c],
            ),
            None => self.count(base, params![date_param(range.end), date_param(range.start)]),
        }
    }

    fn enrolled_count(
        &self,
        center: Option<&str>,
        range: &DateRange,
        payer: PayerGroup,
    ) -> Result<usize> {
        let base = format!(
            "SELECT COUNT(member_id) FROM enrollment
             WHERE enrollment_date BETWEEN ?1 AND ?2{}",
            payer_clause(payer)
        );
        match center {
            Some(c) => self.count(
                &format!("{base} AND center = ?3"),
                params![date_param(range.start), date_param(range.end), c],
            ),
            None => self.count(&base, params![date_param(range.start), date_param(range.end)]),
        }
    }

    fn disenrolled_count(
        &self,
        center: Option<&str>,
        range: &DateRange,
        payer: PayerGroup,
    ) -> Result<usize> {
        let base = format!(
            "SELECT COUNT(member_id) FROM enrollment
             WHERE disenrollment_date BETWEEN ?1 AND ?2{}",
            payer_clause(payer)
        );
        match center {
            Some(c) => self.count(
                &format!("{base} AND center = ?3"),
                params![date_param(range.start), date_param(range.end), c],
            ),
            None => self.count(&base, params![date_param(range.start), date_param(range.end)]),
        }
    }

    fn death_count(&self, center: Option<&str>, range: &DateRange) -> Result<usize> {
        let base = "SELECT COUNT(member_id) FROM enrollment
             WHERE disenrollment_date BETWEEN ?1 AND ?2
               AND disenroll_type = 'Deceased'";
        match center {
            Some(c) => self.count(
                &format!("{base} AND center = ?3"),
                params![date_param(range.start), date_param(range.end), c],
            ),
            None => self.count(base, params![date_param(range.start), date_param(range.end)]),
        }
    }
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?)
}

fn payer_clause(payer: PayerGroup) -> &'static str {
    match payer {
        PayerGroup::All => "",
        PayerGroup::Dual => " AND medicare = 1 AND medicaid = 1",
        PayerGroup::MedicareOnly => " AND medicare = 1 AND medicaid = 0",
        PayerGroup::MedicaidOnly => " AND medicare = 0 AND medicaid = 1",
        PayerGroup::PrivatePay => " AND medicare = 0 AND medicaid = 0",
    }
}
