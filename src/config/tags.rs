use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::schema::TrackOrder;

/// One entry of the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagEntry {
    /// Folder relative to `audio_folder`.
    pub folder: PathBuf,
    /// Overrides `playback.track_order` for this tag.
    #[serde(default)]
    pub order: Option<TrackOrder>,
}

impl TagEntry {
    #[cfg(test)]
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            order: None,
        }
    }
}

/// Tag identifier → folder mapping. Identifiers are unique; a document that
/// repeats one is rejected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapping {
    entries: HashMap<String, TagEntry>,
}

impl TagMapping {
    pub fn get(&self, id: &str) -> Option<&TagEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, TagEntry> {
        self.entries.iter()
    }
}

impl FromIterator<(String, TagEntry)> for TagMapping {
    fn from_iter<I: IntoIterator<Item = (String, TagEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for TagMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = TagMapping;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of tag identifiers to { \"folder\": .. } entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = HashMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, entry)) = map.next_entry::<String, TagEntry>()? {
                    if entries.contains_key(&id) {
                        return Err(de::Error::custom(format!("duplicate tag identifier `{id}`")));
                    }
                    entries.insert(id, entry);
                }
                Ok(TagMapping { entries })
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}
