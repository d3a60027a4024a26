//! Scryfall column names referenced by the default cleaning and modeling rules.

pub const ORACLE_ID: &str = "oracle_id";
pub const NAME: &str = "name";
pub const EDHREC_RANK: &str = "edhrec_rank";
pub const POWER: &str = "power";
pub const TOUGHNESS: &str = "toughness";
pub const CMC: &str = "cmc";
pub const COLORS: &str = "colors";
pub const COLOR_IDENTITY: &str = "color_identity";
pub const KEYWORDS: &str = "keywords";
pub const MANA_COST: &str = "mana_cost";
pub const ORACLE_TEXT: &str = "oracle_text";
pub const RELATED_URIS: &str = "related_uris";
pub const TYPE_LINE: &str = "type_line";
pub const SET_NAME: &str = "set_name";
pub const IMAGE_URIS: &str = "image_uris";

/// Sentinel for cards without a color
pub const COLORLESS: &str = "C";

/// Sentinel for cards without keywords
pub const NO_KEYWORD: &str = "None";

/// Columns with no value for modeling: identifiers, display and legal
/// metadata, pricing.
pub const MODELING_DROP_COLUMNS: &[&str] = &[
    "id",
    "multiverse_ids",
    "tcgplayer_id",
    "cardmarket_id",
    "lang",
    "object",
    "released_at",
    "uri",
    "scryfall_uri",
    "layout",
    "highres_image",
    "image_status",
    "image_uris",
    "games",
    "frame",
    "full_art",
    "textless",
    "booster",
    "story_spotlight",
    "prices",
    "legalities",
    "reserved",
    "foil",
    "nonfoil",
    "card_back_id",
    "artist",
    "artist_ids",
    "illustration_id",
    "border_color",
    "oversized",
    "finishes",
    "scryfall_set_uri",
    "rulings_uri",
    "promo",
    "set",
    "set_uri",
    "set_search_uri",
    "reprint",
    "variation",
    "set_id",
    "prints_search_uri",
    "collector_number",
    "digital",
    "mtgo_id",
];
