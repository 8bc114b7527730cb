//! Static catalog of commodities traded in the mandi.
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::locale::Language;
use crate::price::Price;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityNames {
    pub en: String,
    pub hi: String,
    pub te: String,
    pub ta: String,
    pub bn: String,
}

impl CommodityNames {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Hi => &self.hi,
            Language::Te => &self.te,
            Language::Ta => &self.ta,
            Language::Bn => &self.bn,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: String,
    pub names: CommodityNames,
    /// Reference price per `unit`, before market jitter.
    pub base_price: Price,
    pub unit: String,
}

impl Commodity {
    pub fn name(&self, language: Language) -> &str {
        self.names.get(language)
    }
}

fn commodity(
    id: &str,
    names: [&str; 5],
    base_price: Price,
    unit: &str,
) -> Commodity {
    let [en, hi, te, ta, bn] = names;
    Commodity {
        id: id.to_string(),
        names: CommodityNames {
            en: en.to_string(),
            hi: hi.to_string(),
            te: te.to_string(),
            ta: ta.to_string(),
            bn: bn.to_string(),
        },
        base_price,
        unit: unit.to_string(),
    }
}

lazy_static! {
    static ref CATALOG: Vec<Commodity> = vec![
        commodity("rice", ["Rice", "चावल", "బియ్యం", "அரிசி", "চাল"], 50, "kg"),
        commodity("wheat", ["Wheat", "गेहूं", "గోధుమ", "கோதுமை", "গম"], 30, "kg"),
        commodity("tomato", ["Tomatoes", "टमाटर", "టమోటా", "தக்காளி", "টমেটো"], 40, "kg"),
        commodity("onion", ["Onions", "प्याज", "ఉల్లిపాయ", "வெங்காயம்", "পেঁয়াজ"], 35, "kg"),
        commodity("potato", ["Potatoes", "आलू", "బంగాళాదుంప", "உருளைக்கிழங்கு", "আলু"], 25, "kg"),
        commodity("mango", ["Mangoes", "आम", "మామిడి", "மாம்பழம்", "আম"], 80, "kg"),
        commodity("banana", ["Bananas", "केला", "అరటి", "வாழைப்பழம்", "কলা"], 50, "dozen"),
        commodity("apple", ["Apples", "सेब", "ఆపిల్", "ஆப்பிள்", "আপেল"], 120, "kg"),
        commodity("milk", ["Milk", "दूध", "పాలు", "பால்", "দুধ"], 60, "liter"),
        commodity("egg", ["Eggs", "अंडे", "గుడ్లు", "முட்டை", "ডিম"], 70, "dozen"),
        commodity("chicken", ["Chicken", "मुर्गी", "కోడి", "கோழி", "মুরগি"], 180, "kg"),
        commodity("lentil", ["Lentils", "दाल", "పప్పు", "பருப்பு", "ডাল"], 100, "kg"),
        commodity("sugar", ["Sugar", "चीनी", "చక్కెర", "சர்க்கரை", "চিনি"], 45, "kg"),
        commodity("tea", ["Tea", "चाय", "టీ", "தேநீர்", "চা"], 400, "kg"),
        commodity("coffee", ["Coffee", "कॉफी", "కాఫీ", "காபி", "কফি"], 600, "kg"),
        commodity("turmeric", ["Turmeric", "हल्दी", "పసుపు", "மஞ்சள்", "হলুদ"], 150, "kg"),
        commodity("chili", ["Chili", "मिर्च", "మిరపకాయ", "மிளகாய்", "মরিচ"], 200, "kg"),
        commodity("coriander", ["Coriander", "धनिया", "కొత్తిమీర", "கொத்தமல்லி", "ধনে"], 80, "kg"),
    ];
}

pub fn all() -> &'static [Commodity] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static Commodity> {
    CATALOG.iter().find(|commodity| commodity.id == id)
}
