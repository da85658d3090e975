use std::collections::BTreeSet;
use std::fmt;
use serde::{
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

/// A voter's choice on a single photo.
///
/// Any value other than the strings `"up"` or `"down"` (including `null`,
/// numbers and objects) decodes as [`Stance::Clear`], which withdraws the
/// voter's previous stance without recording a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stance {
    Up,
    Down,
    #[default]
    Clear,
}

impl From<&str> for Stance {
    fn from(value: &str) -> Self {
        match value {
            "up" => Stance::Up,
            "down" => Stance::Down,
            _ => Stance::Clear,
        }
    }
}

impl<'de> Deserialize<'de> for Stance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StanceVisitor)
    }
}

struct StanceVisitor;

impl<'de> Visitor<'de> for StanceVisitor {
    type Value = Stance;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a vote stance")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Stance, E> {
        Ok(Stance::from(value))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Stance, E> {
        Ok(Stance::Clear)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Stance, E> {
        Ok(Stance::Clear)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Stance, E> {
        Ok(Stance::Clear)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Stance, E> {
        Ok(Stance::Clear)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Stance, E> {
        Ok(Stance::Clear)
    }

    fn visit_none<E: de::Error>(self) -> Result<Stance, E> {
        Ok(Stance::Clear)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Stance, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Stance, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Stance::Clear)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Stance, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Stance::Clear)
    }
}

/// Per-photo tally state.
///
/// A voter id is present in at most one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The voters currently up-voting the photo.
    #[serde(default)]
    pub upvotes: BTreeSet<String>,
    /// The voters currently down-voting the photo.
    #[serde(default)]
    pub downvotes: BTreeSet<String>,
}

impl VoteRecord {
    /// Replaces whatever stance `voter_id` held with `stance`.
    pub fn cast(&mut self, voter_id: &str, stance: Stance) {
        self.upvotes.remove(voter_id);
        self.downvotes.remove(voter_id);

        match stance {
            Stance::Up => {
                self.upvotes.insert(voter_id.to_string());
            }
            Stance::Down => {
                self.downvotes.insert(voter_id.to_string());
            }
            Stance::Clear => {}
        }
    }

    /// Upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        self.upvotes.len() as i64 - self.downvotes.len() as i64
    }

    /// The number of stances recorded in either direction.
    pub fn total(&self) -> usize {
        self.upvotes.len() + self.downvotes.len()
    }
}
