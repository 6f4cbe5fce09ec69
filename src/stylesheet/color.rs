//! Generated color identifiers for hex literals

use std::collections::HashMap;

use indexmap::IndexMap;

/// True for `#rgb` and `#rrggbb`
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|digits| {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        })
}

/// Append-only mapping from generated ids (`color1`, `color2`, ...) to hex values.
///
/// Lookup is case-insensitive on the hex value, so `#FF0000` and `#ff0000`
/// share one id. Iteration follows registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorRegistry {
    colors: IndexMap<String, String>,
    ids: HashMap<String, String>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for a hex value, registering it on first sight
    pub fn register(&mut self, hex: &str) -> String {
        let key = hex.to_ascii_lowercase();
        if let Some(id) = self.ids.get(&key) {
            return id.clone();
        }
        let id = format!("color{}", self.colors.len() + 1);
        self.colors.insert(id.clone(), hex.to_string());
        self.ids.insert(key, id.clone());
        id
    }

    /// Hex value registered under `id`
    pub fn get(&self, id: &str) -> Option<&str> {
        self.colors.get(id).map(String::as_str)
    }

    /// Id already assigned to a hex value
    pub fn id_of(&self, hex: &str) -> Option<&str> {
        self.ids.get(&hex.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `(id, hex)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(id, hex)| (id.as_str(), hex.as_str()))
    }
}

/// State owned by one style-resolution pass
#[derive(Debug, Default)]
pub struct RenderPass {
    pub colors: ColorRegistry,
}

impl RenderPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the pass, handing the registry to the emitter
    pub fn into_colors(self) -> ColorRegistry {
        self.colors
    }
}
