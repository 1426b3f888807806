//! Event indexing marks.

use shared_types::Event;
use std::collections::HashSet;

/// Mark attributes for indexing.
///
/// With an empty `index_set` every attribute is marked. Otherwise only
/// attributes whose `type.key` is in the set are.
pub fn mark_events_to_index(events: Vec<Event>, index_set: &HashSet<String>) -> Vec<Event> {
    let index_all = index_set.is_empty();

    events
        .into_iter()
        .map(|mut event| {
            for attr in &mut event.attributes {
                attr.index =
                    index_all || index_set.contains(&format!("{}.{}", event.kind, attr.key));
            }
            event
        })
        .collect()
}
