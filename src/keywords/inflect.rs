use crate::keywords::Singularizer;

/// Plurals that do not follow a suffix rule
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("oxen", "ox"),
    ("dice", "die"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("data", "datum"),
    ("wolves", "wolf"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("calves", "calf"),
    ("loaves", "loaf"),
    ("selves", "self"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("zombies", "zombie"),
    ("rookies", "rookie"),
    ("buses", "bus"),
    ("shoes", "shoe"),
    ("toes", "toe"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
];

/// Words ending in `s` that are already singular or have no plural form
const INVARIANT: &[&str] = &[
    "news", "series", "species", "physics", "mathematics", "economics", "politics", "ethics",
    "athletics", "gymnastics", "linguistics", "statistics", "diabetes", "measles", "always",
    "perhaps", "sometimes", "whereas", "yes", "this", "thus", "was", "has", "does", "is", "its",
    "his", "hers", "ours", "yours", "theirs", "less", "gas", "lens", "christmas", "chaos",
    "canvas", "atlas", "alias", "bias", "iris", "kudos", "pants", "scissors", "glasses",
];

/// Rule-based English noun singularizer.
///
/// Mirrors the behaviour of a `singular_noun` lookup: returns the singular form
/// for a recognised plural, `None` when the word is already singular. For a
/// phrase only the last word is inflected.
pub struct EnglishInflector;

impl EnglishInflector {
    pub fn new() -> Self {
        Self
    }

    fn singularize_word(word: &str) -> Option<String> {
        let lower = word.to_lowercase();

        if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
            return Some(singular.to_string());
        }
        if INVARIANT.contains(&lower.as_str()) || word.chars().count() <= 2 {
            return None;
        }
        if ends_with_ignore_case(word, "ss")
            || ends_with_ignore_case(word, "us")
            || ends_with_ignore_case(word, "is")
        {
            return None;
        }

        if word.chars().count() > 4 {
            if let Some(stem) = strip_suffix_ignore_case(word, "ies") {
                return Some(format!("{}y", stem));
            }
        }
        if ["sses", "ches", "shes", "xes", "zzes", "oes"]
            .iter()
            .any(|suffix| ends_with_ignore_case(word, suffix))
        {
            return strip_suffix_ignore_case(word, "es").map(str::to_string);
        }
        strip_suffix_ignore_case(word, "s").map(str::to_string)
    }
}

/// Strip an ASCII suffix regardless of case; the rest of the word may be any script
fn strip_suffix_ignore_case<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = word.len().checked_sub(suffix.len())?;
    if !word.is_char_boundary(cut) || !word[cut..].eq_ignore_ascii_case(suffix) {
        return None;
    }
    Some(&word[..cut])
}

fn ends_with_ignore_case(word: &str, suffix: &str) -> bool {
    strip_suffix_ignore_case(word, suffix).is_some()
}

impl Default for EnglishInflector {
    fn default() -> Self {
        Self::new()
    }
}

impl Singularizer for EnglishInflector {
    fn singularize(&self, word: &str) -> Option<String> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }
        match word.rsplit_once(' ') {
            Some((head, last)) => {
                Self::singularize_word(last).map(|singular| format!("{} {}", head, singular))
            }
            None => Self::singularize_word(word),
        }
    }
}
