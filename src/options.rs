use std::collections::BTreeMap;

/// Option names a player understands, in declaration order.
pub const PLAYER_OPTIONS: [&str; 2] = [
    // A player with a default source starts loading on init.
    "autoload",
    // A player starts playing once enough of the track has buffered.
    "autoplay",
];

/// Flag name to enabled, for a fixed schema of known names.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct OptionSet {
    flags: BTreeMap<String, bool>,
}

impl OptionSet {
    /// Every known option becomes a key; it is `true` iff it appears as a
    /// whitespace-delimited token in `raw`. Unknown tokens are dropped.
    pub fn parse(raw: Option<&str>, known: &[&str]) -> Self {
        let tokens: Vec<&str> = raw.unwrap_or_default().split_whitespace().collect();

        let flags = known
            .iter()
            .map(|name| (name.to_string(), tokens.contains(name)))
            .collect();

        OptionSet { flags }
    }

    /// `false` for both disabled and unknown names.
    pub fn get(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// The player's option schema, resolved once at init.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct PlayerOptions {
    pub autoload: bool,
    pub autoplay: bool,
}

impl PlayerOptions {
    pub fn parse(raw: Option<&str>) -> Self {
        PlayerOptions::from(&OptionSet::parse(raw, &PLAYER_OPTIONS))
    }
}

impl From<&OptionSet> for PlayerOptions {
    fn from(set: &OptionSet) -> Self {
        PlayerOptions {
            autoload: set.get("autoload"),
            autoplay: set.get("autoplay"),
        }
    }
}
