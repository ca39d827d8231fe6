//! Dictionary-free noun lemmatizer
//!
//! Reduces plural nouns to their base form with an irregular-forms table
//! followed by suffix rules. Tokens are treated as nouns regardless of their
//! actual part of speech, so verb forms such as "running" pass through.
//!
//! Only purely alphabetic lowercase tokens are rewritten. Every output is a
//! fixpoint: lemmatizing a lemma returns it unchanged.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Irregular plural → singular
const IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("dice", "die"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("wolves", "wolf"),
    ("thieves", "thief"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("elves", "elf"),
    ("loaves", "loaf"),
    ("calves", "calf"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("echoes", "echo"),
    ("vetoes", "veto"),
    ("torpedoes", "torpedo"),
    ("volcanoes", "volcano"),
    ("mosquitoes", "mosquito"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("oases", "oasis"),
    ("diagnoses", "diagnosis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("cacti", "cactus"),
    ("fungi", "fungus"),
    ("alumni", "alumnus"),
    ("bacteria", "bacterium"),
];

/// Words ending in "s" that are already base forms
const INVARIANT: &[&str] = &[
    "series", "species", "news", "always", "perhaps", "whereas", "towards", "afterwards",
    "besides", "sometimes", "nevertheless", "chaos", "lens", "canvas", "atlas", "bias", "alias",
    "christmas", "texas", "mathematics", "physics", "politics", "economics", "athletics",
    "aids", "pants", "scissors", "trousers", "glasses", "thanks", "ethics", "odds", "gallows",
    "headquarters", "means", "mumps", "measles", "billiards", "innings", "barracks", "sheep",
    "ourselves", "themselves", "yourselves", "paris", "vegas", "los", "angeles", "mars",
    "venus", "zeus", "jesus", "moses", "james", "charles", "thomas", "chris", "dennis",
    "boris", "doris", "francis", "lewis", "louis", "marcus",
];

/// Stems whose plural is formed with "-ies" over an "-ie" singular
const IE_SINGULARS: &[&str] = &[
    "movie", "zombie", "cookie", "rookie", "hippie", "goalie", "prairie", "calorie", "genie",
    "pixie", "auntie", "sweetie", "lie", "tie", "pie", "die", "hoodie", "selfie", "newbie",
    "yuppie", "junkie", "brownie", "bookie", "groupie", "freebie", "smoothie", "zombie",
    "boogie", "collie", "birdie", "roomie", "townie", "indie", "aussie", "commie", "hottie",
    "cutie", "bootie", "magpie", "necktie", "talkie", "walkie",
];

/// Words ending in "men" that are not plurals of "-man"
const NOT_MEN_PLURALS: &[&str] = &[
    "amen", "omen", "semen", "specimen", "abdomen", "regimen", "acumen", "stamen", "hymen",
    "ramen", "yemen", "carmen",
];

struct Tables {
    irregular: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
    ie_singulars: HashSet<&'static str>,
    not_men_plurals: HashSet<&'static str>,
}

static TABLES: Lazy<Tables> = Lazy::new(|| Tables {
    irregular: IRREGULAR.iter().copied().collect(),
    invariant: INVARIANT.iter().copied().collect(),
    ie_singulars: IE_SINGULARS.iter().copied().collect(),
    not_men_plurals: NOT_MEN_PLURALS.iter().copied().collect(),
});

/// Reduce a lowercase token to its noun lemma
pub fn lemmatize(token: &str) -> String {
    let tables = &*TABLES;

    if token.len() <= 3 || !token.chars().all(|c| c.is_alphabetic()) {
        return tables
            .irregular
            .get(token)
            .map(|s| s.to_string())
            .unwrap_or_else(|| token.to_string());
    }

    if let Some(singular) = tables.irregular.get(token) {
        return singular.to_string();
    }

    if tables.invariant.contains(token) {
        return token.to_string();
    }

    if token.ends_with("men") && !tables.not_men_plurals.contains(token) {
        return format!("{}an", &token[..token.len() - 2]);
    }

    if !token.ends_with('s') || token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        let ie_form = format!("{}ie", stem);
        if tables.ie_singulars.contains(ie_form.as_str()) || stem.len() < 2 {
            return ie_form;
        }
        return format!("{}y", stem);
    }

    // Stems shorter than three letters ("sh" from "shes") are not words
    for suffix in ["sses", "ches", "shes", "xes", "zzes"] {
        if token.ends_with(suffix) && token.len() >= 5 {
            return token[..token.len() - 2].to_string();
        }
    }

    let singular = &token[..token.len() - 1];
    // A lone trailing "s" would be stripped again on the next pass
    if singular.ends_with('s') && !singular.ends_with("ss") {
        return token.to_string();
    }
    singular.to_string()
}
