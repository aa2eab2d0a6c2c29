//! Keyword search across collection types

use super::{Engine, SearchResults, Window};
use crate::error::Result;
use crate::http::Transport;
use crate::types::CollectionType;
use tracing::{info, warn};

impl<T: Transport> Engine<T> {
    /// Search collections for keywords.
    ///
    /// An empty `types` slice searches every searchable built-in type.
    /// Each type gets its own fetch sequence with `search=<keywords>` on
    /// every page and no progress reporting. Results are a filtered subset
    /// of the collection and never touch the caches.
    pub async fn search(
        &mut self,
        types: &[CollectionType],
        keywords: &str,
        window: Window,
    ) -> Result<SearchResults> {
        let types = if types.is_empty() {
            CollectionType::searchable()
        } else {
            types.to_vec()
        };

        let mut results = SearchResults::new();
        for collection in types {
            if !collection.spec().searchable {
                warn!("{collection} does not support search, skipping");
                continue;
            }
            let fetched = self
                .fetch_window(&collection, window, Some(keywords), false)
                .await?;
            info!(
                "Search '{keywords}' matched {} {collection}",
                fetched.items.len()
            );
            results.insert(collection, fetched.items);
        }
        Ok(results)
    }
}
