use serde::Deserialize;

const STATIC_NAMES_JSON: &str = include_str!("../data/names.json");

#[derive(Deserialize)]
pub struct PeopleNames {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

pub struct NamesLoader;

impl NamesLoader {
    pub fn load() -> PeopleNames {
        serde_json::from_str(STATIC_NAMES_JSON).expect("embedded names.json is valid")
    }
}
