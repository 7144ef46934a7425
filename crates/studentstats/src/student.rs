//! Core student record type.
//!
//! A [`StudentRecord`] is one row of the student directory as supplied by the
//! persistence layer. The statistics engine treats it as read-only input.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::star_sign::StarSign;

/// A single student directory entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Unique identifier for this record (assigned by storage layer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// University-issued student number. Unique per record.
    pub student_number: String,

    /// Full display name.
    pub full_name: String,

    /// Date of birth.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,

    /// Free-form hometown address, usually starting with a prefecture.
    #[serde(default)]
    pub hometown: Option<String>,

    /// Self-reported blood type.
    #[serde(default)]
    pub blood_type: Option<String>,

    /// Stored star sign label.
    #[serde(default)]
    pub star_sign: Option<String>,

    /// Self-reported 4-letter personality type, entered as free text.
    #[serde(default)]
    pub personality_code: Option<String>,

    /// Cohort (academic year) label, e.g. `B3`.
    pub cohort: String,

    /// Course or specialty code.
    pub course: String,

    /// Hobbies.
    #[serde(default, deserialize_with = "lenient_text")]
    pub hobby: Option<String>,

    /// Clubs and circles.
    #[serde(default, deserialize_with = "lenient_text")]
    pub circle: Option<String>,

    /// Things the student likes.
    #[serde(default, deserialize_with = "lenient_text")]
    pub likes: Option<String>,

    /// Things the student dislikes.
    #[serde(default, deserialize_with = "lenient_text")]
    pub dislikes: Option<String>,

    /// Identity of the account that owns this record.
    #[serde(default)]
    pub owner_email: Option<String>,
}

/// Decode a free-text field, treating anything that is not a string as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

impl StudentRecord {
    /// Create a record with the required fields set and everything else empty.
    #[must_use]
    pub fn new(
        student_number: impl Into<String>,
        full_name: impl Into<String>,
        cohort: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        Self {
            student_number: student_number.into(),
            full_name: full_name.into(),
            cohort: cohort.into(),
            course: course.into(),
            ..Self::default()
        }
    }

    /// The stored star sign, or the one derived from the birth date.
    #[must_use]
    pub fn effective_star_sign(&self) -> Option<String> {
        self.star_sign
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| {
                self.birth_date
                    .map(|d| StarSign::from_date(d).label().to_string())
            })
    }

    /// Check the fields storage requires before accepting the record.
    ///
    /// Returns a description of the first problem found.
    #[must_use]
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.student_number.trim().is_empty() {
            Some("student number is empty")
        } else if self.full_name.trim().is_empty() {
            Some("full name is empty")
        } else if self.cohort.trim().is_empty() {
            Some("cohort is empty")
        } else if self.course.trim().is_empty() {
            Some("course is empty")
        } else {
            None
        }
    }

    /// Feed every field that statistics depend on into a hasher.
    pub fn fingerprint(&self, hasher: &mut blake3::Hasher) {
        let fields = [
            Some(self.student_number.as_str()),
            Some(self.cohort.as_str()),
            Some(self.course.as_str()),
            self.hometown.as_deref(),
            self.blood_type.as_deref(),
            self.star_sign.as_deref(),
            self.personality_code.as_deref(),
            self.hobby.as_deref(),
            self.circle.as_deref(),
            self.likes.as_deref(),
            self.dislikes.as_deref(),
        ];
        for field in fields {
            match field {
                Some(value) => {
                    hasher.update(&[1]);
                    hasher.update(&(value.len() as u64).to_le_bytes());
                    hasher.update(value.as_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        let birth = self.birth_date.map(|d| d.to_string()).unwrap_or_default();
        hasher.update(birth.as_bytes());
        hasher.update(&[0xff]);
    }
}

/// Compute the BLAKE3 fingerprint of a record snapshot.
#[must_use]
pub fn snapshot_digest(records: &[StudentRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(records.len() as u64).to_le_bytes());
    for record in records {
        record.fingerprint(&mut hasher);
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_required_fields() {
        let record = StudentRecord::new("25314986", "山田 太郎", "B3", "KIKAI_SYSTEM");
        assert!(record.id.is_none());
        assert_eq!(record.student_number, "25314986");
        assert_eq!(record.cohort, "B3");
        assert!(record.hobby.is_none());
        assert!(record.missing_required_field().is_none());
    }

    #[test]
    fn test_missing_required_field() {
        let record = StudentRecord::new(" ", "name", "B1", "X");
        assert_eq!(
            record.missing_required_field(),
            Some("student number is empty")
        );

        let record = StudentRecord::new("1", "name", "B1", "");
        assert_eq!(record.missing_required_field(), Some("course is empty"));
    }

    #[test]
    fn test_effective_star_sign_prefers_stored() {
        let mut record = StudentRecord::new("1", "a", "B1", "X");
        record.star_sign = Some("獅子座".to_string());
        record.birth_date = NaiveDate::from_ymd_opt(2000, 5, 15);
        assert_eq!(record.effective_star_sign().as_deref(), Some("獅子座"));
    }

    #[test]
    fn test_effective_star_sign_derived() {
        let mut record = StudentRecord::new("1", "a", "B1", "X");
        record.star_sign = Some("  ".to_string());
        record.birth_date = NaiveDate::from_ymd_opt(2000, 5, 15);
        assert_eq!(record.effective_star_sign().as_deref(), Some("牡牛座"));

        record.birth_date = None;
        assert!(record.effective_star_sign().is_none());
    }

    #[test]
    fn test_deserialize_lenient_free_text() {
        let json = r#"{
            "studentNumber": "25314986",
            "fullName": "山田 太郎",
            "cohort": "B3",
            "course": "JOHO_COMMUNICATION",
            "birthDate": "2000-05-15",
            "hobby": 42,
            "circle": null,
            "likes": ["coffee"],
            "dislikes": "早起き"
        }"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();
        assert!(record.hobby.is_none());
        assert!(record.circle.is_none());
        assert!(record.likes.is_none());
        assert_eq!(record.dislikes.as_deref(), Some("早起き"));
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(2000, 5, 15));
    }

    #[test]
    fn test_serialize_camel_case() {
        let record = StudentRecord::new("1", "a", "B1", "X");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("studentNumber"));
        assert!(json.contains("personalityCode"));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_snapshot_digest_stable_and_sensitive() {
        let a = StudentRecord::new("1", "a", "B1", "X");
        let mut b = a.clone();
        assert_eq!(snapshot_digest(&[a.clone()]), snapshot_digest(&[b.clone()]));

        b.hobby = Some("サッカー".to_string());
        assert_ne!(snapshot_digest(&[a.clone()]), snapshot_digest(&[b]));

        assert_ne!(snapshot_digest(&[]), snapshot_digest(&[a]));
    }

    #[test]
    fn test_snapshot_digest_distinguishes_absent_from_empty() {
        let a = StudentRecord::new("1", "a", "B1", "X");
        let mut b = a.clone();
        b.likes = Some(String::new());
        assert_ne!(snapshot_digest(&[a]), snapshot_digest(&[b]));
    }
}
