//! Process-wide default bundle.
//!
//! Meant for the outermost layer of an application that does not want to
//! pass a [`Bundle`] around. Library code should take a `&Bundle` instead.
//! The global bundle starts out as [`Bundle::empty`].

use std::sync::{
    Arc,
    LazyLock,
    PoisonError,
    RwLock,
};

use serde::Serialize;

use crate::bundle::Bundle;
use crate::locale::LocaleTag;

static GLOBAL: LazyLock<RwLock<Arc<Bundle>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Bundle::empty())));

/// Replaces the global bundle, returning the previous one.
pub fn set_global_bundle(bundle: Bundle) -> Arc<Bundle> {
    tracing::debug!(
        fallback = %bundle.fallback_language(),
        languages = bundle.languages().len(),
        "Replacing global bundle"
    );
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *global, Arc::new(bundle))
}

/// The current global bundle.
#[must_use]
pub fn global_bundle() -> Arc<Bundle> {
    Arc::clone(&GLOBAL.read().unwrap_or_else(PoisonError::into_inner))
}

/// Translates with the global bundle.
#[must_use]
pub fn translate(locale: &LocaleTag, key: &str) -> String {
    global_bundle().translate(locale, key)
}

/// Translates with the global bundle, rendering against `data`.
#[must_use]
pub fn translate_with<D>(locale: &LocaleTag, key: &str, data: &D) -> String
where
    D: Serialize + ?Sized,
{
    global_bundle().translate_with(locale, key, data)
}
