#![allow(dead_code)]

//! Localized display labels for the domain enums, plus the marker color key
//! for the map. Japanese is the default; Korean is the second app language.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::place::{Category, SoloAllowed, SoloOkLevel};
use crate::models::report::{MealPeriod, SeatType, SoloOutcome, StaffReaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLanguage {
    #[default]
    Ja,
    Ko,
    En,
    Zh,
}

/// Marker color for the map collaborator, keyed by confidence level.
pub fn confidence_color(level: SoloOkLevel) -> &'static str {
    match level {
        SoloOkLevel::High => "#22C55E",
        SoloOkLevel::Mid => "#EAB308",
        SoloOkLevel::Low => "#9CA3AF",
    }
}

pub fn confidence_label(level: SoloOkLevel, lang: AppLanguage) -> &'static str {
    match (level, lang) {
        (SoloOkLevel::High, AppLanguage::Ko) => "1인 가능",
        (SoloOkLevel::High, AppLanguage::En) => "Solo OK",
        (SoloOkLevel::High, _) => "ひとりOK",
        (SoloOkLevel::Mid, AppLanguage::Ko) => "조건부 가능",
        (SoloOkLevel::Mid, AppLanguage::En) => "Conditional",
        (SoloOkLevel::Mid, _) => "条件付きOK",
        (SoloOkLevel::Low, AppLanguage::Ko) => "정보 부족",
        (SoloOkLevel::Low, AppLanguage::En) => "Limited Info",
        (SoloOkLevel::Low, _) => "情報不足",
    }
}

pub fn category_label(category: Category, lang: AppLanguage) -> &'static str {
    let (ja, ko, en) = match category {
        Category::Bbq => ("焼肉", "고기/구이", "BBQ"),
        Category::Stew => ("鍋/チゲ", "찌개/탕", "Stew"),
        Category::KoreanSet => ("韓定食", "한식 정식", "Korean Set"),
        Category::Noodle => ("麺", "면류", "Noodle"),
        Category::Cafe => ("カフェ", "카페", "Cafe"),
        Category::Izakaya => ("居酒屋", "술집/포차", "Bar"),
        Category::Ramen => ("ラーメン", "라멘/일식", "Ramen"),
        Category::Chicken => ("チキン", "치킨", "Chicken"),
        Category::Convenience => ("コンビニ", "편의점", "Convenience"),
        Category::Other => ("その他", "기타", "Other"),
    };
    match lang {
        AppLanguage::Ko => ko,
        AppLanguage::En => en,
        _ => ja,
    }
}

pub fn solo_allowed_label(allowed: SoloAllowed, lang: AppLanguage) -> &'static str {
    let ko = matches!(lang, AppLanguage::Ko);
    match allowed {
        SoloAllowed::Yes => {
            if ko {
                "혼밥 가능"
            } else {
                "ひとりOK"
            }
        }
        SoloAllowed::No => {
            if ko {
                "불가"
            } else {
                "NG (1人不可)"
            }
        }
        SoloAllowed::Conditional => {
            if ko {
                "조건부 가능"
            } else {
                "条件付きOK"
            }
        }
    }
}

pub fn solo_outcome_label(outcome: SoloOutcome, lang: AppLanguage) -> &'static str {
    let ko = matches!(lang, AppLanguage::Ko);
    match outcome {
        SoloOutcome::Accepted => {
            if ko {
                "가능"
            } else {
                "ひとりOK"
            }
        }
        SoloOutcome::Rejected => {
            if ko {
                "거절"
            } else {
                "NG"
            }
        }
        SoloOutcome::AcceptedIf2Portions => {
            if ko {
                "2인분 조건"
            } else {
                "2人前~"
            }
        }
        SoloOutcome::Unknown => {
            if ko {
                "불명"
            } else {
                "不明"
            }
        }
    }
}

pub fn seat_type_label(seat_type: SeatType, lang: AppLanguage) -> &'static str {
    let ko = matches!(lang, AppLanguage::Ko);
    match seat_type {
        SeatType::Counter => {
            if ko {
                "카운터"
            } else {
                "カウンター"
            }
        }
        SeatType::Table => {
            if ko {
                "테이블"
            } else {
                "テーブル"
            }
        }
        SeatType::SingleBooth => {
            if ko {
                "1인 부스"
            } else {
                "一人ブース"
            }
        }
        SeatType::Unknown => {
            if ko {
                "불명"
            } else {
                "不明"
            }
        }
    }
}

pub fn staff_reaction_label(reaction: StaffReaction, lang: AppLanguage) -> &'static str {
    let ko = matches!(lang, AppLanguage::Ko);
    match reaction {
        StaffReaction::Friendly => {
            if ko {
                "친절"
            } else {
                "親切"
            }
        }
        StaffReaction::Neutral => {
            if ko {
                "보통"
            } else {
                "普通"
            }
        }
        StaffReaction::Unfriendly => {
            if ko {
                "불친절"
            } else {
                "不快"
            }
        }
        StaffReaction::Unknown => {
            if ko {
                "불명"
            } else {
                "不明"
            }
        }
    }
}

pub fn meal_period_label(period: MealPeriod, lang: AppLanguage) -> &'static str {
    let ko = matches!(lang, AppLanguage::Ko);
    match period {
        MealPeriod::Breakfast => {
            if ko {
                "아침"
            } else {
                "朝食"
            }
        }
        MealPeriod::Lunch => {
            if ko {
                "점심"
            } else {
                "ランチ"
            }
        }
        MealPeriod::Dinner => {
            if ko {
                "저녁"
            } else {
                "ディナー"
            }
        }
        MealPeriod::Late => {
            if ko {
                "야식"
            } else {
                "深夜"
            }
        }
    }
}

/// Renders an observation date as `YYYY/MM/DD`. Missing input renders as
/// `-`; input that is not a date passes through unchanged.
pub fn format_observed_date(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => date.format("%Y/%m/%d").to_string(),
            Err(_) => s.to_string(),
        },
    }
}
