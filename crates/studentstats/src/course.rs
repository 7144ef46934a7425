//! Built-in course catalog.
//!
//! Course codes in the directory come from two generations of the
//! curriculum: legacy Japanese course names and the current uppercase codes.
//! Both are listed here with a display name and chart color. Codes that are
//! not in the catalog are still counted; they display as themselves.

/// Chart color used for codes missing from the catalog.
pub const FALLBACK_COLOR: &str = "#CBD5E0";

/// A known course code and how to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseInfo {
    /// The code as stored on student records.
    pub code: &'static str,
    /// Human-readable course name.
    pub name: &'static str,
    /// Chart color.
    pub color: &'static str,
}

const CATALOG: &[CourseInfo] = &[
    CourseInfo {
        code: "DENKI_ENERGY_CONTROL",
        name: "電気・制御システム工学",
        color: "#4299E1",
    },
    CourseInfo {
        code: "DENSHI_DEVICE_OPTICAL",
        name: "電子デバイス・光学",
        color: "#48BB78",
    },
    CourseInfo {
        code: "JOHO_COMMUNICATION",
        name: "情報・通信システム工学",
        color: "#F6AD55",
    },
    CourseInfo {
        code: "KIKAI_SYSTEM",
        name: "機械システム工学",
        color: "#9F7AEA",
    },
    CourseInfo {
        code: "BUSSHITSU_MATERIALS",
        name: "物質材料工学",
        color: "#F56565",
    },
    // Legacy
    CourseInfo {
        code: "電気電子情報工学コース",
        name: "電気電子情報工学コース（旧）",
        color: "#718096",
    },
];

/// All catalog entries.
#[must_use]
pub fn catalog() -> &'static [CourseInfo] {
    CATALOG
}

/// Look up a course code.
#[must_use]
pub fn lookup(code: &str) -> Option<&'static CourseInfo> {
    CATALOG.iter().find(|c| c.code == code)
}

/// Display name for a code, falling back to the code itself.
#[must_use]
pub fn display_name(code: &str) -> &str {
    lookup(code).map_or(code, |c| c.name)
}

/// Chart color for a code.
#[must_use]
pub fn color(code: &str) -> &'static str {
    lookup(code).map_or(FALLBACK_COLOR, |c| c.color)
}
