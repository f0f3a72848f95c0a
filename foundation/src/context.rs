//! Per-block execution context.

use foundation_store::{CacheStore, KvStore};
use foundation_types::Timestamp;

use crate::event::Event;

/// Height and time of the block being processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub height: u64,
    pub time: Timestamp,
}

/// The store, block header and event buffer shared by every operation of
/// one transaction or block hook.
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    header: BlockHeader,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore, header: BlockHeader) -> Self {
        Self {
            store,
            header,
            events: Vec::new(),
        }
    }

    pub fn header(&self) -> BlockHeader {
        self.header
    }

    pub fn block_time(&self) -> Timestamp {
        self.header.time
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Run `f` against a buffered branch of this context. On `Ok` the
    /// branch's writes are committed and its events forwarded; on `Err`
    /// both are dropped.
    pub fn branch<T, E>(
        &mut self,
        f: impl FnOnce(&mut Context<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let header = self.header;
        let mut cache = CacheStore::new(&mut *self.store);
        let (result, events) = {
            let mut sub = Context::new(&mut cache, header);
            let result = f(&mut sub);
            (result, sub.events)
        };
        if result.is_ok() {
            cache.commit();
            self.events.extend(events);
        }
        result
    }
}
