//! Category label normalization.
//!
//! Remote sources label the same category in Arabic or English with
//! inconsistent spelling. [`normalize`] folds any label onto the fixed set of
//! canonical labels used by consumers, falling back to the trimmed input when
//! nothing matches.

pub const MORNING: &str = "أذكار الصباح";
pub const EVENING: &str = "أذكار المساء";
pub const WAKING: &str = "أذكار الاستيقاظ";
pub const SLEEP: &str = "أذكار النوم";
pub const DECEASED: &str = "أدعية للميت";
pub const AFTER_PRAYER: &str = "أذكار بعد الصلاة";
pub const PRAYER: &str = "أذكار الصلاة";
pub const QURANIC_DUAS: &str = "أدعية قرآنية";
pub const PROPHETIC_DUAS: &str = "أدعية نبوية";
pub const ABLUTION: &str = "أذكار الوضوء";
pub const MOSQUE: &str = "أذكار المسجد";
pub const FOOD: &str = "أذكار الطعام";
pub const FORGIVENESS: &str = "الاستغفار";
pub const TRAVEL: &str = "أذكار السفر";
pub const GLORIFICATIONS: &str = "تسابيح";
pub const MISCELLANEOUS: &str = "أذكار متفرقة";

pub const DEFAULT_CATEGORY: &str = MISCELLANEOUS;

pub const CANONICAL_LABELS: &[&str] = &[
    MORNING,
    EVENING,
    WAKING,
    SLEEP,
    DECEASED,
    AFTER_PRAYER,
    PRAYER,
    QURANIC_DUAS,
    PROPHETIC_DUAS,
    ABLUTION,
    MOSQUE,
    FOOD,
    FORGIVENESS,
    TRAVEL,
    GLORIFICATIONS,
    MISCELLANEOUS,
];

const PRAYER_WORDS: &[&str] = &["صلاة", "صلاه", "prayer", "salah"];
const SUPPLICATION_WORDS: &[&str] = &["دعاء", "أدعية", "ادعية", "dua", "supplication"];

/// One normalization rule: every trigger group must match, and a group
/// matches when the label contains any of its substrings.
struct CategoryRule {
    label: &'static str,
    all_of: &'static [&'static [&'static str]],
}

impl CategoryRule {
    fn matches(&self, folded: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|trigger| folded.contains(trigger)))
    }
}

// Order is significant: waking before sleep ("الاستيقاظ من النوم"), deceased
// before prayer ("صلاة الجنازة"), and each compound rule before the looser
// rule sharing its keywords.
const RULES: &[CategoryRule] = &[
    CategoryRule {
        label: MORNING,
        all_of: &[&["صباح", "morning"]],
    },
    CategoryRule {
        label: EVENING,
        all_of: &[&["مساء", "evening"]],
    },
    CategoryRule {
        label: WAKING,
        all_of: &[&["استيقاظ", "wake", "waking"]],
    },
    CategoryRule {
        label: SLEEP,
        all_of: &[&["نوم", "sleep", "bed"]],
    },
    CategoryRule {
        label: DECEASED,
        all_of: &[&["ميت", "جنازة", "متوفى", "deceased", "funeral", "janazah"]],
    },
    CategoryRule {
        label: AFTER_PRAYER,
        all_of: &[
            &["صلاة", "صلاه", "سلام", "prayer", "salah"],
            &["بعد", "after"],
        ],
    },
    CategoryRule {
        label: PRAYER,
        all_of: &[PRAYER_WORDS],
    },
    CategoryRule {
        label: QURANIC_DUAS,
        all_of: &[SUPPLICATION_WORDS, &["قرآن", "القران", "quran", "qur'an"]],
    },
    CategoryRule {
        label: PROPHETIC_DUAS,
        all_of: &[SUPPLICATION_WORDS, &["نبوي", "النبي", "prophet", "sunnah"]],
    },
    CategoryRule {
        label: ABLUTION,
        all_of: &[&["وضوء", "wudu", "ablution"]],
    },
    CategoryRule {
        label: MOSQUE,
        all_of: &[&["مسجد", "mosque"]],
    },
    CategoryRule {
        label: FOOD,
        all_of: &[&["طعام", "أكل", "food", "eating", "meal"]],
    },
    CategoryRule {
        label: FORGIVENESS,
        all_of: &[&["استغفار", "istighfar", "forgiveness"]],
    },
    CategoryRule {
        label: TRAVEL,
        all_of: &[&["سفر", "travel"]],
    },
    CategoryRule {
        label: GLORIFICATIONS,
        all_of: &[&["تسبيح", "تسابيح", "tasbih", "glorification"]],
    },
    CategoryRule {
        label: MISCELLANEOUS,
        all_of: &[&["متفرقة", "متنوعة", "misc"]],
    },
];

pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let folded = trimmed.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&folded))
        .map(|rule| rule.label.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
