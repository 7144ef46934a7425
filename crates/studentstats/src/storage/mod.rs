//! Storage layer for studentstats.
//!
//! This module provides `SQLite`-based persistent storage for student
//! records and hands out consistent snapshots to the statistics engine.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::student::StudentRecord;

use schema::STUDENT_COLUMNS;

/// Storage engine for student records.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Upserting records keyed by student number
/// - Bulk import in a single transaction
/// - Lookup, listing and substring search
/// - Full snapshots for statistics
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// Filters for [`Storage::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentQuery {
    /// Substring matched against name, hometown and the free-text fields.
    pub text: Option<String>,
    /// Exact cohort label.
    pub cohort: Option<String>,
    /// Exact course code.
    pub course: Option<String>,
    /// Maximum number of results.
    pub limit: usize,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records that did not exist before.
    pub inserted: usize,
    /// Records that replaced an existing student number.
    pub updated: usize,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a record, or replace the one with the same student number.
    ///
    /// Returns the record's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn upsert(&self, student: &StudentRecord) -> Result<i64> {
        upsert_on(&self.conn, student)
    }

    /// Import many records in one transaction.
    ///
    /// Every record is checked before anything is written, so a bad record
    /// leaves the database untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] for the first record missing a
    /// required field, or a database error.
    pub fn import(&mut self, students: &[StudentRecord]) -> Result<ImportSummary> {
        for (index, student) in students.iter().enumerate() {
            if let Some(problem) = student.missing_required_field() {
                return Err(Error::invalid_record(index, problem));
            }
        }

        let tx = self.conn.transaction()?;
        let mut summary = ImportSummary::default();
        for student in students {
            if exists_by_student_number(&tx, &student.student_number)? {
                summary.updated += 1;
            } else {
                summary.inserted += 1;
            }
            upsert_on(&tx, student)?;
        }
        tx.commit()?;

        info!(
            "Imported {} students ({} new, {} updated)",
            students.len(),
            summary.inserted,
            summary.updated
        );
        Ok(summary)
    }

    /// Get a record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<StudentRecord>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1");
        let result = self
            .conn
            .query_row(&sql, [id], Self::row_to_student)
            .optional()?;
        Ok(result)
    }

    /// Get a record by its student number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_by_student_number(&self, student_number: &str) -> Result<Option<StudentRecord>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_number = ?1");
        let result = self
            .conn
            .query_row(&sql, [student_number], Self::row_to_student)
            .optional()?;
        Ok(result)
    }

    /// Get a record by its student number, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if no record has this number, or a
    /// database error.
    pub fn require_by_student_number(&self, student_number: &str) -> Result<StudentRecord> {
        self.get_by_student_number(student_number)?
            .ok_or_else(|| Error::student_not_found(student_number))
    }

    /// Read every record in a single statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn snapshot(&self) -> Result<Vec<StudentRecord>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let students = stmt
            .query_map([], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded snapshot of {} students", students.len());
        Ok(students)
    }

    /// List records ordered by cohort and student number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self, limit: usize) -> Result<Vec<StudentRecord>> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY cohort, student_number LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let students = stmt
            .query_map([limit_i64], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Search records.
    ///
    /// The text filter is a case-insensitive (ASCII) substring match over
    /// name, hometown, hobby, circle, likes and dislikes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search(&self, query: &StudentQuery) -> Result<Vec<StudentRecord>> {
        let sql = format!(
            r"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE (?1 IS NULL
                   OR full_name LIKE ?1 ESCAPE '\' OR hometown LIKE ?1 ESCAPE '\'
                   OR hobby LIKE ?1 ESCAPE '\' OR circle LIKE ?1 ESCAPE '\'
                   OR likes LIKE ?1 ESCAPE '\' OR dislikes LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR cohort = ?2)
              AND (?3 IS NULL OR course = ?3)
            ORDER BY cohort, student_number LIMIT ?4
            "
        );
        let pattern = query
            .text
            .as_ref()
            .map(|text| format!("%{}%", escape_like(text)));
        let limit_i64 = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&sql)?;
        let students = stmt
            .query_map(
                params![pattern, query.cohort, query.course, limit_i64],
                Self::row_to_student,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Count total records in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a record by ID.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", [id])?;
        if affected > 0 {
            info!("Deleted student {}", id);
        }
        Ok(affected > 0)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_students = self.count()?;

        let (cohorts, courses): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(DISTINCT cohort), COUNT(DISTINCT course) FROM students",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let last_updated: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM students ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let last_updated = last_updated
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok());

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_students,
            cohorts,
            courses,
            last_updated,
            db_size_bytes,
        })
    }

    /// Convert a database row to a `StudentRecord`.
    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<StudentRecord> {
        let student_number: String = row.get(1)?;
        let birth_date_str: Option<String> = row.get(3)?;

        let birth_date = birth_date_str.and_then(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| {
                    warn!(
                        "Unparseable birth date {:?} for student {}, ignoring",
                        s, student_number
                    );
                })
                .ok()
        });

        Ok(StudentRecord {
            id: Some(row.get(0)?),
            student_number,
            full_name: row.get(2)?,
            birth_date,
            hometown: row.get(4)?,
            blood_type: row.get(5)?,
            star_sign: row.get(6)?,
            personality_code: row.get(7)?,
            cohort: row.get(8)?,
            course: row.get(9)?,
            hobby: row.get(10)?,
            circle: row.get(11)?,
            likes: row.get(12)?,
            dislikes: row.get(13)?,
            owner_email: row.get(14)?,
        })
    }
}

/// Escape `LIKE` wildcards so the text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn exists_by_student_number(conn: &Connection, student_number: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM students WHERE student_number = ?1",
        [student_number],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn upsert_on(conn: &Connection, student: &StudentRecord) -> Result<i64> {
    let birth_date = student.birth_date.map(|d| d.format("%Y-%m-%d").to_string());

    let id: i64 = conn.query_row(
        r"
        INSERT INTO students (
            student_number, full_name, birth_date, hometown, blood_type, star_sign,
            personality_code, cohort, course, hobby, circle, likes, dislikes, owner_email
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        ON CONFLICT(student_number) DO UPDATE SET
            full_name = excluded.full_name,
            birth_date = excluded.birth_date,
            hometown = excluded.hometown,
            blood_type = excluded.blood_type,
            star_sign = excluded.star_sign,
            personality_code = excluded.personality_code,
            cohort = excluded.cohort,
            course = excluded.course,
            hobby = excluded.hobby,
            circle = excluded.circle,
            likes = excluded.likes,
            dislikes = excluded.dislikes,
            owner_email = excluded.owner_email,
            updated_at = datetime('now')
        RETURNING id
        ",
        params![
            student.student_number,
            student.full_name,
            birth_date,
            student.hometown,
            student.blood_type,
            student.star_sign,
            student.personality_code,
            student.cohort,
            student.course,
            student.hobby,
            student.circle,
            student.likes,
            student.dislikes,
            student.owner_email,
        ],
        |row| row.get(0),
    )?;

    debug!("Upserted student {} as id {}", student.student_number, id);
    Ok(id)
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of students stored.
    pub total_students: i64,
    /// Number of distinct cohort labels.
    pub cohorts: i64,
    /// Number of distinct course codes.
    pub courses: i64,
    /// When a record was last written (UTC).
    pub last_updated: Option<NaiveDateTime>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
