//! Fixed vocabularies used by query analysis.

use std::collections::BTreeSet;

/// Filler words dropped during keyword extraction.
pub(crate) const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "can", "you", "please", "want", "would", "like", "need", "help", "looking",
    "for", "some", "recipe", "recipes", "with", "using", "make", "cook", "cooking", "recommend",
    "show", "tell", "give", "a", "an", "the", "and", "or", "but", "to", "that", "this", "these",
    "those", "fill",
];

/// Any of these anywhere in the query appends the literal keyword "healthy".
pub(crate) const HEALTH_TERMS: &[&str] = &[
    "energy",
    "healthy",
    "nutritious",
    "protein",
    "vitamin",
    "minerals",
    "boost",
    "power",
];

/// Phrases whose following word names an ingredient to exclude.
pub(crate) const HEALTH_EXCLUSION_PHRASES: &[&str] = &[
    "can't eat",
    "cannot eat",
    "cant eat",
    "can't have",
    "cannot have",
    "cant have",
    "allergic to",
    "intolerant to",
    "avoid eating",
    "avoid having",
    "sensitive to",
    "bad with",
];

/// Single tokens that negate the food token immediately after them.
/// Tokens are compared after punctuation stripping, so contracted forms
/// appear without apostrophes.
pub(crate) const NEGATORS: &[&str] = &[
    "no",
    "not",
    "without",
    "exclude",
    "dont",
    "doesnt",
    "except",
    "excluding",
    "free",
    "none",
    "cant",
    "cannot",
    "avoid",
    "allergic",
    "allergy",
    "intolerant",
    "intolerance",
];

/// Bases accepted from `<base>-free` tokens.
pub(crate) const ALLERGEN_BASES: &[&str] = &["dairy", "gluten", "nut", "egg", "soy", "lactose"];

/// Common allergen families. A collected exclusion matching a family (by key
/// or by variation) expands to the key plus every variation.
pub(crate) const ALLERGEN_FAMILIES: &[(&str, &[&str])] = &[
    (
        "milk",
        &[
            "milk", "dairy", "lactose", "cream", "cheese", "butter", "yogurt", "whey",
        ],
    ),
    ("egg", &["egg", "eggs"]),
    ("nuts", &["nuts", "peanuts", "almonds", "cashews", "walnuts"]),
    ("soy", &["soy", "soybeans", "tofu", "soya"]),
    ("gluten", &["gluten", "wheat", "rye", "barley"]),
];

/// Expands collected exclusion tokens through the allergen families.
/// Tokens matching no family are kept as-is; the result is deduplicated.
pub(crate) fn expand_allergens<I>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    let mut expanded = BTreeSet::new();

    for token in tokens {
        let mut matched = false;
        for (allergen, variations) in ALLERGEN_FAMILIES {
            if token == *allergen || variations.contains(&token.as_str()) {
                expanded.insert((*allergen).to_string());
                expanded.extend(variations.iter().map(|v| (*v).to_string()));
                matched = true;
                break;
            }
        }
        if !matched {
            expanded.insert(token);
        }
    }

    expanded
}
