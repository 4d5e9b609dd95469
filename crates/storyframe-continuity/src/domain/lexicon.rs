//! Word lists for entity and descriptor extraction.
//!
//! All lookups take lower-cased tokens.

use std::fmt;

/// Exclusive age descriptor of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    /// Child, teenager or young adult.
    Young,
    /// Middle-aged.
    MiddleAged,
    /// Old or elderly.
    Elderly,
}

impl AgeGroup {
    /// Display label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Young => "young",
            Self::MiddleAged => "middle-aged",
            Self::Elderly => "elderly",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const AGE_WORDS: &[(AgeGroup, &[&str])] = &[
    (
        AgeGroup::Young,
        &[
            "young", "teenage", "teenaged", "youthful", "little", "jovem", "joven", "jeune", "jung",
            "junge", "junger", "giovane", "pequena", "pequeño", "pequeña",
        ],
    ),
    (
        AgeGroup::MiddleAged,
        &["middle-aged", "meia-idade", "mediana"],
    ),
    (
        AgeGroup::Elderly,
        &[
            "elderly", "old", "aged", "aging", "ageing", "idosa", "idoso", "velha", "velho",
            "anciana", "anciano", "vieja", "viejo", "âgée", "âgé", "vieille", "vieux", "alte",
            "alter", "greise", "anziana", "anziano", "vecchia", "vecchio",
        ],
    ),
];

/// Colour words and the hex value used for palettes.
const COLORS: &[(&str, &str, &[&str])] = &[
    ("red", "#b3261e", &["red", "crimson", "scarlet", "vermelho", "vermelha", "rojo", "roja", "rouge", "rot", "rote", "roten", "rosso", "rossa"]),
    ("blue", "#1f4e9c", &["blue", "azul", "bleu", "bleue", "blau", "blaue", "blu"]),
    ("navy", "#1b2a4a", &["navy", "marinho"]),
    ("green", "#2e7d32", &["green", "verde", "vert", "verte", "grün", "grüne"]),
    ("yellow", "#f2c230", &["yellow", "amarelo", "amarela", "amarillo", "amarilla", "jaune", "gelb", "gelbe", "giallo", "gialla"]),
    ("orange", "#e07b24", &["orange", "laranja", "naranja", "arancione"]),
    ("purple", "#6a3d9a", &["purple", "violet", "roxo", "roxa", "morado", "morada", "lila", "viola"]),
    ("pink", "#e58fb1", &["pink", "rosa"]),
    ("black", "#1b1b1b", &["black", "preto", "preta", "negro", "negra", "noir", "noire", "schwarz", "schwarze", "nero", "nera"]),
    ("white", "#f4f1ea", &["white", "branco", "branca", "blanco", "blanca", "blanc", "blanche", "weiß", "weiße", "bianco", "bianca"]),
    ("grey", "#8a8a8a", &["grey", "gray", "cinza", "gris", "grau", "graue", "grigio", "grigia"]),
    ("brown", "#6d4c41", &["brown", "marrom", "castanho", "castanha", "marrón", "brun", "brune", "braun", "braune", "marrone"]),
    ("blonde", "#d8b863", &["blonde", "blond", "loiro", "loira", "rubio", "rubia", "biondo", "bionda"]),
    ("auburn", "#8e3b1f", &["auburn", "ruivo", "ruiva", "pelirrojo", "pelirroja", "roux", "rousse"]),
    ("silver", "#b8bcc2", &["silver", "prata", "plata", "argent", "silbern", "argento"]),
    ("gold", "#c9a227", &["gold", "golden", "dourado", "dourada", "dorado", "dorada", "doré", "oro"]),
];

const HAIR_WORDS: &[&str] = &["hair", "cabelo", "cabelos", "pelo", "cabello", "cheveux", "haare", "haar", "capelli"];

const GARMENTS: &[&str] = &[
    "coat", "scarf", "dress", "jacket", "hat", "shirt", "hoodie", "cloak", "gown", "suit",
    "sweater", "boots", "shoes", "tie", "uniform", "cape", "veil", "gloves", "raincoat", "skirt",
    "casaco", "vestido", "cachecol", "chapéu", "camisa", "jaqueta", "abrigo", "bufanda",
    "sombrero", "chaqueta", "manteau", "robe", "écharpe", "chapeau", "veste", "mantel", "kleid",
    "schal", "jacke", "cappotto", "vestito", "sciarpa", "cappello", "giacca",
];

const PROPS: &[&str] = &[
    "letter", "umbrella", "photograph", "photo", "key", "keys", "candle", "lantern", "suitcase",
    "guitar", "camera", "phone", "book", "notebook", "knife", "gun", "pistol", "map", "ring",
    "necklace", "bag", "backpack", "bottle", "cup", "mug", "glass", "box", "envelope",
    "sword", "compass", "radio", "violin", "bicycle", "flower", "flowers", "rose", "mask",
    "cigarette", "newspaper", "diary", "journal", "locket", "clock",
    "carta", "guarda-chuva", "fotografia", "foto", "chave", "vela", "lanterna", "mala",
    "violão", "câmera", "telefone", "livro", "faca", "mapa", "anel", "relógio", "caixa",
    "paraguas", "llave", "linterna", "maleta", "guitarra", "cámara", "teléfono", "libro",
    "cuchillo", "anillo", "reloj", "caja", "lettre", "parapluie", "clé", "bougie", "valise",
    "livre", "couteau", "carte", "bague", "montre", "boîte", "regenschirm",
    "schlüssel", "kerze", "koffer", "buch", "messer", "karte", "uhr", "lettera", "ombrello",
    "chiave", "candela", "valigia", "libro", "coltello", "anello", "orologio", "scatola",
];

const ATMOSPHERE: &[&str] = &[
    "rain", "fog", "mist", "smoke", "snow", "storm", "thunder", "lightning", "moonlight",
    "candlelight", "neon", "shadows", "shadow", "wind", "fire", "dust", "waves", "sunset",
    "sunrise", "darkness", "silence", "ash", "embers",
    "chuva", "neblina", "névoa", "fumaça", "neve", "tempestade", "trovão", "luar", "vento",
    "fogo", "poeira", "sombras", "lluvia", "niebla", "humo", "nieve", "tormenta", "viento",
    "fuego", "polvo", "sombras", "pluie", "brouillard", "brume", "fumée", "neige", "orage",
    "vent", "feu", "ombres", "regen", "nebel", "rauch", "schnee", "sturm", "wind", "feuer",
    "schatten", "pioggia", "nebbia", "fumo", "neve", "tempesta", "vento", "fuoco", "ombre",
];

const LOCATION_NOUNS: &[&str] = &[
    "kitchen", "street", "room", "house", "apartment", "flat", "office", "park", "beach",
    "forest", "woods", "station", "bar", "cafe", "café", "church", "school", "hospital", "car",
    "train", "bridge", "pier", "harbor", "harbour", "port", "roof", "rooftop", "garden", "hall",
    "corridor", "hallway", "alley", "market", "city", "village", "field", "lake", "river",
    "mountain", "desert", "cave", "attic", "basement", "cellar", "bedroom", "bathroom",
    "library", "shop", "store", "restaurant", "hotel", "stage", "studio", "lighthouse",
    "warehouse", "yard", "cemetery", "square", "plaza", "airport", "ship", "boat", "bus",
    "museum", "theater", "theatre", "factory", "farm", "barn", "castle", "palace", "tower",
    "classroom", "lobby", "balcony", "porch", "highway", "road", "tunnel", "subway", "platform",
    "cozinha", "rua", "casa", "praia", "quarto", "escola", "sala", "escritório", "floresta",
    "estação", "igreja", "hospital", "ponte", "cais", "jardim", "mercado", "cidade", "aldeia",
    "cocina", "calle", "playa", "habitación", "escuela", "oficina", "bosque", "estación",
    "iglesia", "puente", "muelle", "mercado", "ciudad", "pueblo", "cuisine", "rue", "maison",
    "plage", "chambre", "école", "bureau", "forêt", "gare", "église", "pont", "quai", "marché",
    "ville", "küche", "straße", "haus", "strand", "zimmer", "schule", "büro", "wald", "bahnhof",
    "kirche", "brücke", "markt", "stadt", "dorf", "cucina", "strada", "spiaggia",
    "scuola", "ufficio", "foresta", "stazione", "chiesa", "ponte", "mercato", "città",
];

const PERSON_NOUNS: &[&str] = &[
    "woman", "man", "lady", "girl", "boy", "person", "figure", "stranger", "mulher", "homem",
    "menina", "menino", "senhora", "senhor", "mujer", "hombre", "niña", "niño", "señora",
    "señor", "femme", "homme", "fille", "garçon", "dame", "frau", "mann", "mädchen", "junge",
    "donna", "uomo", "ragazza", "ragazzo", "signora",
];

const SUBJECT_PRONOUNS: &[&str] = &[
    "he", "she", "ele", "ela", "él", "ella", "il", "elle", "er", "sie", "lui", "lei",
];

/// Prepositions after which a capitalized word names a place, not a person.
const PLACE_PREPOSITIONS: &[&str] = &[
    "in", "at", "to", "from", "for", "into", "near", "toward", "towards", "em", "para", "de", "en",
    "a", "à", "au", "nach", "aus", "bei", "im", "da", "di",
];

/// Age group named by `word`, if any.
#[must_use]
pub fn age_group(word: &str) -> Option<AgeGroup> {
    AGE_WORDS
        .iter()
        .find(|(_, words)| words.contains(&word))
        .map(|(group, _)| *group)
}

/// Canonical colour name and hex value for a colour word.
#[must_use]
pub fn color(word: &str) -> Option<(&'static str, &'static str)> {
    let word = word.strip_suffix("-haired").unwrap_or(word);
    COLORS
        .iter()
        .find(|(_, _, words)| words.contains(&word))
        .map(|(name, hex, _)| (*name, *hex))
}

/// Hex value of a canonical colour name.
#[must_use]
pub fn color_hex(name: &str) -> Option<&'static str> {
    COLORS.iter().find(|(n, _, _)| *n == name).map(|(_, hex, _)| *hex)
}

/// Returns `true` for words meaning hair.
#[must_use]
pub fn is_hair(word: &str) -> bool {
    HAIR_WORDS.contains(&word)
}

/// Returns `true` for garments that can carry a colour.
#[must_use]
pub fn is_garment(word: &str) -> bool {
    GARMENTS.contains(&word)
}

/// Returns `true` for props worth tracking across beats.
#[must_use]
pub fn is_prop(word: &str) -> bool {
    PROPS.contains(&word)
}

/// Returns `true` for weather and atmosphere words that become motifs.
#[must_use]
pub fn is_atmosphere(word: &str) -> bool {
    ATMOSPHERE.contains(&word)
}

/// Returns `true` for nouns that name a place.
#[must_use]
pub fn is_location_noun(word: &str) -> bool {
    LOCATION_NOUNS.contains(&word)
}

/// Returns `true` for nouns that stand for a person (`woman`, `boy`).
#[must_use]
pub fn is_person_noun(word: &str) -> bool {
    PERSON_NOUNS.contains(&word)
}

/// Returns `true` for personal subject pronouns.
#[must_use]
pub fn is_subject_pronoun(word: &str) -> bool {
    SUBJECT_PRONOUNS.contains(&word)
}

/// Returns `true` for prepositions that introduce a place.
#[must_use]
pub fn is_place_preposition(word: &str) -> bool {
    PLACE_PREPOSITIONS.contains(&word)
}

/// Returns `true` for common nouns tracked elsewhere, which therefore cannot
/// start a character name even when capitalized.
#[must_use]
pub fn is_tracked_noun(word: &str) -> bool {
    is_prop(word)
        || is_atmosphere(word)
        || is_location_noun(word)
        || is_garment(word)
        || is_person_noun(word)
        || color(word).is_some()
        || age_group(word).is_some()
}
