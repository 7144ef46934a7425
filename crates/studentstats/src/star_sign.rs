//! Star sign derivation from birth dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One of the twelve western zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarSign {
    /// 牡羊座, Mar 21 - Apr 19.
    Aries,
    /// 牡牛座, Apr 20 - May 20.
    Taurus,
    /// 双子座, May 21 - Jun 21.
    Gemini,
    /// 蟹座, Jun 22 - Jul 22.
    Cancer,
    /// 獅子座, Jul 23 - Aug 22.
    Leo,
    /// 乙女座, Aug 23 - Sep 22.
    Virgo,
    /// 天秤座, Sep 23 - Oct 23.
    Libra,
    /// 蠍座, Oct 24 - Nov 22.
    Scorpio,
    /// 射手座, Nov 23 - Dec 21.
    Sagittarius,
    /// 山羊座, Dec 22 - Jan 19.
    Capricorn,
    /// 水瓶座, Jan 20 - Feb 18.
    Aquarius,
    /// 魚座, Feb 19 - Mar 20.
    Pisces,
}

impl StarSign {
    /// Determine the sign for a birth date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let (month, day) = (date.month(), date.day());
        match (month, day) {
            (1, 20..) | (2, ..=18) => Self::Aquarius,
            (2, _) | (3, ..=20) => Self::Pisces,
            (3, _) | (4, ..=19) => Self::Aries,
            (4, _) | (5, ..=20) => Self::Taurus,
            (5, _) | (6, ..=21) => Self::Gemini,
            (6, _) | (7, ..=22) => Self::Cancer,
            (7, _) | (8, ..=22) => Self::Leo,
            (8, _) | (9, ..=22) => Self::Virgo,
            (9, _) | (10, ..=23) => Self::Libra,
            (10, _) | (11, ..=22) => Self::Scorpio,
            (11, _) | (12, ..=21) => Self::Sagittarius,
            _ => Self::Capricorn,
        }
    }

    /// The label stored on student records.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Aries => "牡羊座",
            Self::Taurus => "牡牛座",
            Self::Gemini => "双子座",
            Self::Cancer => "蟹座",
            Self::Leo => "獅子座",
            Self::Virgo => "乙女座",
            Self::Libra => "天秤座",
            Self::Scorpio => "蠍座",
            Self::Sagittarius => "射手座",
            Self::Capricorn => "山羊座",
            Self::Aquarius => "水瓶座",
            Self::Pisces => "魚座",
        }
    }
}

impl std::fmt::Display for StarSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
