//! # SQLite Schema Definitions
//!
//! This module centralizes the table creation SQL for the application.
//! Keeping all DDL in one place makes the store logic cleaner and isolates
//! database-specific syntax.

/// Creates the `courses` table.
pub const CREATE_COURSES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT
    );
";

/// Creates the `lessons` table. `position` is the lesson's sequence number,
/// unique within its course.
pub const CREATE_LESSONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS lessons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL REFERENCES courses(id),
        position INTEGER NOT NULL,
        title TEXT NOT NULL,
        summary TEXT,
        content TEXT,
        transcript TEXT,
        default_description TEXT,
        UNIQUE(course_id, position)
    );
";

/// Creates the `profiles` table. One profile per user per course.
pub const CREATE_PROFILES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        course_slug TEXT NOT NULL,
        answers TEXT NOT NULL DEFAULT '{}',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(user_id, course_slug)
    );
";

/// Creates the `personalized_lesson_descriptions` table. Unique per
/// (profile, lesson); `content` holds the JSON content object.
pub const CREATE_PERSONALIZATIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS personalized_lesson_descriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        profile_id INTEGER NOT NULL REFERENCES profiles(id),
        lesson_id INTEGER NOT NULL REFERENCES lessons(id),
        content TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(profile_id, lesson_id)
    );
";

/// Creates the legacy `lesson_descriptions` table. Rows hold the old 5-field
/// content shape and are only read, never written.
pub const CREATE_LEGACY_DESCRIPTIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS lesson_descriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        lesson_id INTEGER NOT NULL,
        profile_id INTEGER NOT NULL,
        description TEXT NOT NULL
    );
";

/// All table creation statements, in dependency order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_COURSES_TABLE,
    CREATE_LESSONS_TABLE,
    CREATE_PROFILES_TABLE,
    CREATE_PERSONALIZATIONS_TABLE,
    CREATE_LEGACY_DESCRIPTIONS_TABLE,
];
