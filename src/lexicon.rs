//! Concern categories and the word lists the analyzers match against.
//!
//! Every term is stored in normalized form (lowercase, no diacritics,
//! punctuation folded to spaces) so it can be searched directly in the
//! output of [`crate::normalize::normalize`]. The tables are plain statics:
//! built at compile time, never mutated, shared freely across threads.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Declaration order is the iteration order everywhere, which makes
/// first-encountered tie-breaks reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Violence,
    Threats,
    Insults,
    Exclusion,
    Cyberbullying,
    Theft,
    Rumors,
    Distress,
    SelfHarm,
}

impl Category {
    pub const COUNT: usize = 9;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Violence,
        Category::Threats,
        Category::Insults,
        Category::Exclusion,
        Category::Cyberbullying,
        Category::Theft,
        Category::Rumors,
        Category::Distress,
        Category::SelfHarm,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Violence => "violence",
            Category::Threats => "threats",
            Category::Insults => "insults",
            Category::Exclusion => "exclusion",
            Category::Cyberbullying => "cyberbullying",
            Category::Theft => "theft",
            Category::Rumors => "rumors",
            Category::Distress => "distress",
            Category::SelfHarm => "self_harm",
        }
    }

    pub fn weight(self) -> f64 {
        LEXICON[self.index()].weight
    }

    pub fn terms(self) -> &'static [&'static str] {
        LEXICON[self.index()].terms
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid("category", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value per category, stored densely in category order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTable<T> {
    values: [T; Category::COUNT],
}

impl<T> CategoryTable<T> {
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            values: Category::ALL.map(&mut f),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.values.iter())
    }
}

impl<T> Index<Category> for CategoryTable<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.values[category.index()]
    }
}

impl<T> IndexMut<Category> for CategoryTable<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.values[category.index()]
    }
}

// ---------------------------------------------------------------------------
// Weighted lexicon
// ---------------------------------------------------------------------------

pub struct CategoryDef {
    pub category: Category,
    pub weight: f64,
    pub terms: &'static [&'static str],
}

pub static LEXICON: [CategoryDef; Category::COUNT] = [
    CategoryDef {
        category: Category::Violence,
        weight: 15.0,
        terms: &[
            "frappe", "frappent", "frapper", "frappes", "tape", "tapent", "taper", "cogne",
            "cognent", "coup", "coups", "gifle", "gifles", "pousse", "poussent", "bagarre",
            "battu", "battue", "blesse", "blessee", "mordu", "etrangle", "croche pied",
        ],
    },
    CategoryDef {
        category: Category::Threats,
        weight: 12.0,
        terms: &[
            "menace", "menacent", "menaces", "menacer", "menacee", "racket", "racketter",
            "rackette", "intimide", "intimident", "chantage", "obligent", "force a",
        ],
    },
    CategoryDef {
        category: Category::Insults,
        weight: 8.0,
        terms: &[
            "insulte", "insultent", "insultes", "moque", "moquent", "moquer", "traite",
            "traitent", "surnom", "surnoms", "bouffon", "debile", "nul", "nulle", "gros",
            "grosse", "moche",
        ],
    },
    CategoryDef {
        category: Category::Exclusion,
        weight: 8.0,
        terms: &[
            "seul", "seule", "exclu", "exclue", "exclus", "rejete", "rejetee", "ignore",
            "ignorent", "personne ne", "a l'ecart", "pas d'amis",
        ],
    },
    CategoryDef {
        category: Category::Cyberbullying,
        weight: 10.0,
        terms: &[
            "reseaux sociaux", "instagram", "snapchat", "snap", "tiktok", "whatsapp", "facebook",
            "en ligne", "story", "stories", "publie", "publient", "capture d'ecran",
            "commentaires",
        ],
    },
    CategoryDef {
        category: Category::Theft,
        weight: 6.0,
        terms: &[
            "vole", "volent", "voler", "vol", "casse", "cassent", "abime", "abiment", "dechire",
            "dechirent", "pris mes", "prennent mes",
        ],
    },
    CategoryDef {
        category: Category::Rumors,
        weight: 6.0,
        terms: &[
            "rumeur", "rumeurs", "ragots", "mensonge", "mensonges", "raconte", "racontent",
            "balance", "balancent", "colportent",
        ],
    },
    CategoryDef {
        category: Category::Distress,
        weight: 10.0,
        terms: &[
            "triste", "tristesse", "pleure", "pleurer", "pleurs", "angoisse", "angoisses",
            "stress", "stresse", "cauchemar", "cauchemars", "deprime", "deprimee",
            "mal au ventre", "peur", "honte", "malheureux", "malheureuse", "epuise", "epuisee",
        ],
    },
    CategoryDef {
        category: Category::SelfHarm,
        weight: 75.0,
        terms: &[
            "mourir", "suicide", "suicider", "en finir", "me faire du mal", "me couper",
            "me scarifier", "me pendre", "disparaitre", "plus envie de vivre",
            "sauter par la fenetre",
        ],
    },
];

/// Every (category, term) pair in table order.
pub fn all_terms() -> impl Iterator<Item = (Category, &'static str)> {
    LEXICON
        .iter()
        .flat_map(|def| def.terms.iter().map(move |t| (def.category, *t)))
}

// ---------------------------------------------------------------------------
// Contextual markers
// ---------------------------------------------------------------------------

pub static INTENSIFIERS: &[&str] = &[
    "toujours",
    "souvent",
    "chaque jour",
    "tous les jours",
    "tout le temps",
    "sans arret",
    "tres",
    "trop",
    "vraiment",
    "encore",
    "beaucoup",
    "de plus en plus",
];

pub static PLURALITY_MARKERS: &[&str] = &[
    "ils",
    "elles",
    "plusieurs",
    "groupe",
    "bande",
    "les autres",
    "toute la classe",
    "eux",
];

pub static NEGATIONS: &[&str] = &["pas", "jamais", "personne", "rien", "aucun", "aucune", "ni"];

pub static TEMPORAL_TERMS: &[&str] = &[
    "aujourd'hui",
    "ce matin",
    "cet apres midi",
    "ce midi",
    "ce soir",
    "hier",
    "a la recre",
    "a la recreation",
    "tous les jours",
    "maintenant",
    "cette semaine",
];

pub static LOCATION_TERMS: &[&str] = &[
    "classe",
    "cour",
    "cantine",
    "casier",
    "couloir",
    "couloirs",
    "toilettes",
    "vestiaire",
    "vestiaires",
    "gymnase",
    "bus",
    "ecole",
    "college",
    "recre",
];

/// Tokens that enrich a summary with where the problem happens.
pub static CLASSROOM_TERMS: &[&str] = &["classe", "en cours", "prof"];

pub static ONLINE_TERMS: &[&str] = &[
    "reseaux sociaux",
    "instagram",
    "snapchat",
    "snap",
    "tiktok",
    "whatsapp",
    "facebook",
    "internet",
    "en ligne",
];

// ---------------------------------------------------------------------------
// Conversation vocabulary
// ---------------------------------------------------------------------------

pub static EMOTIONAL_KEYWORDS: &[&str] = &[
    "triste", "peur", "seul", "seule", "pleure", "mal", "angoisse", "stress", "colere", "honte",
    "marre", "deteste", "nul", "nulle", "mourir", "aide",
];

/// Coarse subject of a single chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    School,
    Family,
    Friendship,
    Sadness,
    Anxiety,
    General,
}

/// Checked in this order; the first topic with a matching keyword wins.
pub static TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::School,
        &["ecole", "classe", "prof", "professeur", "college", "cours", "devoirs", "recre", "cantine"],
    ),
    (
        Topic::Family,
        &["maman", "papa", "parents", "mere", "pere", "frere", "soeur", "famille", "maison"],
    ),
    (
        Topic::Friendship,
        &["ami", "amie", "amis", "amies", "copain", "copine", "copains", "copines"],
    ),
    (
        Topic::Sadness,
        &["triste", "tristesse", "pleure", "pleurer", "seul", "seule", "malheureux"],
    ),
    (
        Topic::Anxiety,
        &["peur", "angoisse", "stress", "stresse", "inquiet", "inquiete"],
    ),
];

/// Words too generic to show that a reply engages with a question.
pub static QUESTION_STOPWORDS: &[&str] = &[
    "comment", "pourquoi", "quand", "quoi", "quel", "quelle", "quels", "quelles", "combien",
    "avec", "pour", "dans", "cette", "votre", "vous", "etre", "sont", "fait", "faire", "peux",
    "veux", "aussi", "mais", "donc", "alors", "tout", "bien",
];
