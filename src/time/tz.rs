//! Timezone cache and session timezone.
//!
//! The timezone database itself (TZif file parsing, `tzload`) is an
//! external collaborator (`spec.md` §1) — the host supplies it through the
//! [`TzProvider`] trait, mirroring the way the teacher abstracts storage
//! behind `StorageBackend` (`src/storage.rs`) instead of hard-coding a
//! backend. What *is* core is the process-wide, initialize-once,
//! no-eviction caching discipline around whatever the host provides,
//! grounded directly on the teacher's `PATH_REGISTRY`
//! (`once_cell::sync::Lazy<Mutex<FxHashMap<...>>>` in `src/persistence.rs`).

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

use crate::error::{ChronoError, Result};

/// A resolved, fixed UTC offset in seconds. Named zones with DST rules are
/// outside the core's scope; the host resolves those and hands back the
/// offset that applies at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TzOffset {
    pub seconds_east_of_utc: i32,
}

/// Host hook for resolving a named timezone. `tzload`/TZif parsing lives
/// on the other side of this trait.
pub trait TzProvider: Send + Sync {
    fn resolve(&self, zone_name: &str) -> Option<TzOffset>;
}

static TZ_CACHE: Lazy<RwLock<FxHashMap<String, TzOffset>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

static SESSION_TZ: Lazy<RwLock<Option<TzOffset>>> = Lazy::new(|| RwLock::new(None));

/// `"GMT"` bypasses the filesystem and is always the zero offset.
const GMT: &str = "GMT";

/// Parse a fixed-offset zone spelled `<±HH[:MM[:SS]]>±HH[:MM[:SS]]`
/// (`spec.md` §6.5), e.g. `<+05:30>+05:30`.
pub fn parse_fixed_offset(spec: &str) -> Result<TzOffset> {
    let after_bracket = spec
        .split_once('>')
        .map(|(_, rest)| rest)
        .unwrap_or(spec);

    let sign = match after_bracket.as_bytes().first() {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => {
            return Err(ChronoError::InvalidTextRepresentation(format!(
                "fixed-offset timezone must start with + or -: {spec}"
            )));
        }
    };

    let digits = &after_bracket[1..];
    let mut parts = digits.split(':');
    let hh: i32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ChronoError::InvalidTextRepresentation(format!("bad offset hour: {spec}")))?;
    let mm: i32 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let ss: i32 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);

    Ok(TzOffset {
        seconds_east_of_utc: sign * (hh * 3600 + mm * 60 + ss),
    })
}

/// Resolve a zone name, consulting the process-wide cache first and
/// falling back to `provider` on a miss. Insertions are one-shot: the
/// cache never evicts or overwrites (`spec.md` §5).
pub fn init(zone_name: &str, provider: &dyn TzProvider) -> Result<TzOffset> {
    let key = zone_name.to_ascii_uppercase();

    if let Some(offset) = TZ_CACHE.read().unwrap().get(&key) {
        return Ok(*offset);
    }

    if key == GMT {
        let offset = TzOffset {
            seconds_east_of_utc: 0,
        };
        TZ_CACHE.write().unwrap().entry(key).or_insert(offset);
        return Ok(offset);
    }

    if key.starts_with('<') {
        let offset = parse_fixed_offset(zone_name)?;
        TZ_CACHE.write().unwrap().entry(key).or_insert(offset);
        return Ok(offset);
    }

    let offset = provider.resolve(zone_name).ok_or_else(|| {
        ChronoError::InvalidInput(format!("unknown timezone: {zone_name}"))
    })?;
    TZ_CACHE.write().unwrap().entry(key).or_insert(offset);
    Ok(offset)
}

/// Set the session timezone. Writes are only valid from initialization
/// paths (`spec.md` §5) — callers are expected to invoke this once, early.
pub fn set_session_timezone(offset: TzOffset) {
    *SESSION_TZ.write().unwrap() = Some(offset);
}

pub fn session_timezone() -> Option<TzOffset> {
    *SESSION_TZ.read().unwrap()
}

/// Release the whole cache (and the session timezone). Mirrors the
/// teacher's explicit `finalize`-style resource release for process-wide
/// state.
pub fn finalize() {
    TZ_CACHE.write().unwrap().clear();
    *SESSION_TZ.write().unwrap() = None;
}

struct NullProvider;
impl TzProvider for NullProvider {
    fn resolve(&self, _zone_name: &str) -> Option<TzOffset> {
        None
    }
}

/// A provider that always fails to resolve named zones; useful when only
/// `GMT` and fixed-offset specs are needed.
pub fn null_provider() -> &'static dyn TzProvider {
    static P: NullProvider = NullProvider;
    &P
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize access to the process-wide cache across tests in this module.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn gmt_bypasses_filesystem() {
        let _guard = TEST_LOCK.lock().unwrap();
        finalize();
        let off = init("GMT", null_provider()).unwrap();
        assert_eq!(off.seconds_east_of_utc, 0);
    }

    #[test]
    fn fixed_offset_spelling() {
        let _guard = TEST_LOCK.lock().unwrap();
        finalize();
        let off = parse_fixed_offset("<+05:30>+05:30").unwrap();
        assert_eq!(off.seconds_east_of_utc, 5 * 3600 + 30 * 60);

        let neg = parse_fixed_offset("<-08>-08").unwrap();
        assert_eq!(neg.seconds_east_of_utc, -8 * 3600);
    }

    #[test]
    fn unknown_named_zone_without_provider_errors() {
        let _guard = TEST_LOCK.lock().unwrap();
        finalize();
        assert!(init("America/New_York", null_provider()).is_err());
    }

    #[test]
    fn cache_is_initialize_once() {
        let _guard = TEST_LOCK.lock().unwrap();
        finalize();
        struct Once(std::sync::atomic::AtomicU32);
        impl TzProvider for Once {
            fn resolve(&self, _zone_name: &str) -> Option<TzOffset> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Some(TzOffset {
                    seconds_east_of_utc: 3600,
                })
            }
        }
        let provider = Once(std::sync::atomic::AtomicU32::new(0));
        init("Europe/Paris", &provider).unwrap();
        init("Europe/Paris", &provider).unwrap();
        assert_eq!(provider.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
