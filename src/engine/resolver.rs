//! Single-object lookups

use super::Engine;
use crate::error::Result;
use crate::http::Transport;
use crate::types::{CollectionType, Item};
use tracing::debug;

impl<T: Transport> Engine<T> {
    /// Get one item by id.
    ///
    /// With `use_cache`, a materialized item with that id in the collection's
    /// cache is returned without any request. Otherwise a single request is
    /// made for `{endpoint}/{id}`; an item that does not exist yields an
    /// empty list. The result is never written to the cache since its
    /// position in the collection is unknown.
    pub async fn get_by_id(
        &mut self,
        collection: &CollectionType,
        id: u64,
        use_cache: bool,
    ) -> Result<Vec<Item>> {
        if use_cache {
            if let Some(item) = self
                .stores
                .get(collection)
                .and_then(|store| store.find_by_id(id))
            {
                debug!("{collection} {id} found in cache");
                self.stats.add_cache_hit();
                return Ok(vec![item.clone()]);
            }
        }

        self.stats.add_request();
        let item = self
            .fetcher
            .fetch_one(&collection.spec().endpoint, id)
            .await?;
        Ok(item.into_iter().collect())
    }
}
