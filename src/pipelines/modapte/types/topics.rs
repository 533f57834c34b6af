//! Topic name↔id tables.
//!
//! Two deliberately distinct types: [ProvisionalTopics] numbers topics while
//! documents stream in and is only ever used to build the cross-split
//! membership sets; [TopicTable] is rebuilt from scratch once filtering is
//! done and holds the final, dense ids. Keeping them apart makes it
//! impossible to hand a provisional id to a consumer expecting a final one.
use std::collections::HashMap;

/// First-seen, 1-based topic numbering used during annotation.
///
/// Ids handed out here are discarded by the renumbering pass and must never
/// escape corpus construction.
#[derive(Debug, Default)]
pub struct ProvisionalTopics {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl ProvisionalTopics {
    /// Map a document's topic names to provisional ids, assigning fresh ids
    /// to names seen for the first time.
    pub fn assign(&mut self, topics: &[String]) -> Vec<u32> {
        topics.iter().map(|name| self.id_of(name)).collect()
    }

    fn id_of(&mut self, name: &str) -> u32 {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        self.names.push(name.to_string());
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Topic name for a provisional id.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id.checked_sub(1)? as usize).map(String::as_str)
    }
}

/// The final topic table: dense, gap-free, 1-based ids covering exactly the
/// topics that survived filtering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopicTable {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl TopicTable {
    /// Id for a topic name, assigning the next dense id on first sight.
    pub fn id_or_insert(&mut self, name: &str) -> u32 {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        self.names.push(name.to_string());
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id.checked_sub(1)? as usize).map(String::as_str)
    }

    /// Topic names in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisional_first_seen_order() {
        let mut table = ProvisionalTopics::default();
        let cats = table.assign(&[
            "grain".to_string(),
            "wheat".to_string(),
            "grain".to_string(),
        ]);
        assert_eq!(cats, [1, 2, 1]);
        assert_eq!(table.name(1), Some("grain"));
        assert_eq!(table.name(2), Some("wheat"));
        assert_eq!(table.name(3), None);
        assert_eq!(table.name(0), None);
    }

    #[test]
    fn test_table_dense_ids() {
        let mut table = TopicTable::default();
        assert_eq!(table.id_or_insert("corn"), 1);
        assert_eq!(table.id_or_insert("ship"), 2);
        assert_eq!(table.id_or_insert("corn"), 1);

        assert_eq!(table.len(), 2);
        assert_eq!(table.id("ship"), Some(2));
        assert_eq!(table.name(2), Some("ship"));
        assert_eq!(table.names(), ["corn", "ship"]);
    }
}
