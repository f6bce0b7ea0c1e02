//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};
use super::CassetteError;

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves a cassette's interactions in order, with one queue per
/// port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Indexes a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Returns the next interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// [`CassetteError::NotRecorded`] when the pair never occurs, and
    /// [`CassetteError::Exhausted`] once every recorded call was served.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, CassetteError> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(CassetteError::NotRecorded {
                port: port.to_string(),
                method: method.to_string(),
                available: available.join(", "),
            });
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(CassetteError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
                count: queue.len(),
                last_seq: queue.last().map_or(0, |i| i.seq),
            });
        };
        *cursor += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "backend".into(), method: method.into(), input: json!({}), output }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), scope: "acme".into(), interactions }
    }

    #[test]
    fn serves_each_method_in_order() {
        let cassette = make_cassette(vec![
            interaction(0, "load_tree", json!({"ok": []})),
            interaction(1, "sync_tree", json!({"ok": {}})),
            interaction(2, "load_tree", json!({"ok": [1]})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("backend", "load_tree").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("backend", "load_tree").unwrap().seq, 2);
        assert_eq!(replayer.next_interaction("backend", "sync_tree").unwrap().seq, 1);
    }

    #[test]
    fn exhaustion_is_reported() {
        let cassette = make_cassette(vec![interaction(4, "load_tree", json!({"ok": []}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        replayer.next_interaction("backend", "load_tree").unwrap();

        let err = replayer.next_interaction("backend", "load_tree").unwrap_err();
        assert!(matches!(err, CassetteError::Exhausted { count: 1, last_seq: 4, .. }));
        assert!(err.to_string().starts_with("cassette exhausted"));
    }

    #[test]
    fn unknown_pair_lists_what_was_recorded() {
        let cassette = make_cassette(vec![interaction(0, "load_tree", json!({"ok": []}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("backend", "sync_tree").unwrap_err();
        assert!(err.to_string().contains("recorded pairs: [backend::load_tree]"));
    }
}
