//! Built-in English polarity lexicon used by the default scorer.
//!
//! Scores sit in [-1.0, 1.0]. Intensifiers scale the next scored word; negations flip
//! and damp it (x -0.5).

use ahash::{AHashMap, AHashSet};

#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    words: AHashMap<String, f64>,
    intensifiers: AHashMap<String, f64>,
    negations: AHashSet<String>,
}

impl Lexicon {
    /// Empty lexicon; every text scores 0.0.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn english() -> Self {
        let mut lx = Lexicon::empty();
        for (w, p) in POLARITY {
            lx.words.insert((*w).to_string(), *p);
        }
        for (w, k) in INTENSIFIERS {
            lx.intensifiers.insert((*w).to_string(), *k);
        }
        for w in NEGATIONS {
            lx.negations.insert((*w).to_string());
        }
        lx
    }

    /// Add or override a word. Polarity is clamped to [-1, 1].
    pub fn insert(&mut self, word: impl AsRef<str>, polarity: f64) {
        self.words.insert(word.as_ref().to_lowercase(), polarity.clamp(-1.0, 1.0));
    }

    pub fn polarity(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    /// Listed negations plus any "-n't" contraction.
    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.ends_with("n't")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "cannot",
    "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "cant", "wont", "couldnt", "shouldnt",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3), ("really", 1.3), ("so", 1.2), ("too", 1.2), ("super", 1.5),
    ("extremely", 1.5), ("incredibly", 1.5), ("absolutely", 1.5), ("totally", 1.3),
    ("truly", 1.3), ("quite", 1.1), ("pretty", 1.1), ("most", 1.3), ("more", 1.2),
    ("highly", 1.4), ("completely", 1.4), ("especially", 1.2), ("slightly", 0.5),
    ("somewhat", 0.7), ("kinda", 0.7), ("barely", 0.4),
];

const POLARITY: &[(&str, f64)] = &[
    // positive
    ("love", 0.5), ("loved", 0.7), ("loves", 0.5), ("loving", 0.6), ("lovely", 0.5),
    ("like", 0.2), ("liked", 0.3), ("enjoy", 0.4), ("enjoyed", 0.5), ("enjoying", 0.4),
    ("good", 0.7), ("great", 0.8), ("excellent", 1.0), ("amazing", 0.6), ("awesome", 1.0),
    ("best", 1.0), ("better", 0.5), ("nice", 0.6), ("beautiful", 0.85), ("happy", 0.8),
    ("glad", 0.5), ("perfect", 1.0), ("wonderful", 1.0), ("fantastic", 0.4), ("brilliant", 0.9),
    ("incredible", 0.9), ("cool", 0.35), ("funny", 0.25), ("fun", 0.3), ("interesting", 0.5),
    ("helpful", 0.5), ("useful", 0.3), ("thanks", 0.2), ("thank", 0.2), ("grateful", 0.6),
    ("informative", 0.5), ("clear", 0.1), ("favorite", 0.5), ("favourite", 0.5), ("masterpiece", 0.9),
    ("epic", 0.6), ("legend", 0.5), ("legendary", 0.7), ("genius", 0.8), ("impressive", 1.0),
    ("outstanding", 0.5), ("superb", 1.0), ("adorable", 0.5), ("cute", 0.5), ("sweet", 0.35),
    ("fine", 0.4), ("wow", 0.1), ("recommend", 0.3), ("recommended", 0.3), ("inspiring", 0.6),
    ("inspirational", 0.6), ("talented", 0.7), ("smart", 0.2), ("correct", 0.2), ("right", 0.3),
    ("fresh", 0.3), ("clean", 0.4), ("pleasant", 0.7), ("pleased", 0.5), ("exciting", 0.3),
    ("excited", 0.4), ("hilarious", 0.5), ("valuable", 0.6), ("agree", 0.2), ("satisfying", 0.6),
    ("well", 0.1), ("win", 0.8), ("wins", 0.8), ("success", 0.3), ("successful", 0.75),
    ("positive", 0.23), ("gorgeous", 0.7), ("stunning", 0.5), ("magnificent", 1.0), ("classic", 0.17),
    ("calm", 0.3), ("peaceful", 0.5), ("safe", 0.5), ("strong", 0.43), ("easy", 0.43),
    ("lol", 0.8), ("haha", 0.2), ("yes", 0.1), ("bravo", 0.6), ("congrats", 0.6),
    ("congratulations", 0.6), ("respect", 0.3), ("proud", 0.8), ("wholesome", 0.6), ("underrated", 0.3),
    // negative
    ("bad", -0.7), ("worse", -0.4), ("worst", -1.0), ("terrible", -1.0), ("awful", -1.0),
    ("horrible", -1.0), ("hate", -0.8), ("hated", -0.9), ("hates", -0.8), ("dislike", -0.5),
    ("boring", -1.0), ("bored", -0.5), ("sad", -0.5), ("stupid", -0.8), ("dumb", -0.375),
    ("ugly", -0.7), ("poor", -0.4), ("wrong", -0.5), ("annoying", -0.8), ("annoyed", -0.6),
    ("disappointing", -0.6), ("disappointed", -0.75), ("disappointment", -0.6), ("fake", -0.5), ("lame", -0.5),
    ("useless", -0.5), ("waste", -0.2), ("wasted", -0.2), ("trash", -0.6), ("garbage", -0.6),
    ("pathetic", -1.0), ("ridiculous", -0.33), ("cringe", -0.6), ("cringy", -0.6), ("sucks", -0.3),
    ("suck", -0.3), ("angry", -0.5), ("mad", -0.625), ("scary", -0.5), ("scared", -0.4),
    ("sick", -0.71), ("pain", -0.3), ("painful", -0.7), ("broken", -0.4), ("fail", -0.5),
    ("failed", -0.5), ("failure", -0.32), ("problem", -0.2), ("problems", -0.2), ("issue", -0.1),
    ("misleading", -0.5), ("clickbait", -0.6), ("overrated", -0.5), ("mediocre", -0.5), ("slow", -0.3),
    ("confusing", -0.3), ("confused", -0.4), ("difficult", -0.5), ("hard", -0.29), ("unfortunately", -0.5),
    ("sorry", -0.5), ("lost", -0.2), ("lose", -0.3), ("dead", -0.2), ("die", -0.2),
    ("crazy", -0.6), ("insane", -0.4), ("disgusting", -1.0), ("gross", -0.5), ("nasty", -0.8),
    ("evil", -1.0), ("toxic", -0.6), ("cheap", -0.4), ("unfair", -0.5), ("horrendous", -1.0),
    ("negative", -0.3), ("weak", -0.375), ("unhappy", -0.6), ("miserable", -0.8), ("lies", -0.5),
    ("liar", -0.7), ("shame", -0.4), ("shameful", -0.7), ("fault", -0.3), ("hopeless", -0.6),
];
