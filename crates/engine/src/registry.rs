//! Global collection registry
//!
//! Opening the same directory twice in one process returns the same
//! `Collection` instance, so two handles never hold diverging copies of the
//! same documents. Entries are weak; a collection is dropped once the last
//! handle goes away.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Weak;

use crate::collection::Collection;

/// Open collections (canonical path -> weak reference)
pub static OPEN_COLLECTIONS: Lazy<Mutex<HashMap<PathBuf, Weak<Collection>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));
