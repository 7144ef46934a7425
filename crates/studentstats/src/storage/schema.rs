//! `SQLite` schema definitions for studentstats.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the students table.
pub const CREATE_STUDENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_number TEXT NOT NULL UNIQUE,
    full_name TEXT NOT NULL,
    birth_date TEXT,
    hometown TEXT,
    blood_type TEXT,
    star_sign TEXT,
    personality_code TEXT,
    cohort TEXT NOT NULL,
    course TEXT NOT NULL,
    hobby TEXT,
    circle TEXT,
    likes TEXT,
    dislikes TEXT,
    owner_email TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on cohort for filtering.
pub const CREATE_COHORT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_students_cohort ON students(cohort)
";

/// SQL statement to create an index on course for filtering.
pub const CREATE_COURSE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_students_course ON students(course)
";

/// SQL statement to create an index on `owner_email` for ownership lookups.
pub const CREATE_OWNER_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_students_owner ON students(owner_email)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_STUDENTS_TABLE,
    CREATE_COHORT_INDEX,
    CREATE_COURSE_INDEX,
    CREATE_OWNER_INDEX,
    CREATE_METADATA_TABLE,
];

/// Column list shared by every query that materializes a `StudentRecord`.
pub const STUDENT_COLUMNS: &str = "id, student_number, full_name, birth_date, hometown, \
     blood_type, star_sign, personality_code, cohort, course, hobby, circle, likes, \
     dislikes, owner_email";
