//! Durable user preferences
//!
//! Preferences are small JSON values stored under string keys. The dashboard
//! only talks to the [`PreferenceStore`] trait so tests can swap the
//! filesystem for memory.

mod preferences;

pub use preferences::{
    read_value, write_value, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
    StoreError, LAST_LOCATION_KEY, THEME_MODE_KEY,
};
