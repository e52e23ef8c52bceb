//! Process-wide registry of time scales, keyed by name.
//!
//! The built-in scales are present from first use. Further scales are added
//! with [`register`]; entries are never removed or replaced, so a [`Scale`]
//! handle obtained earlier keeps its behavior no matter what is registered
//! later. Registration normally happens during start-up, but the map sits
//! behind a read-mostly lock so concurrent readers stay safe either way.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::errors::{TimeError, TimeResult};
use crate::scales::{Scale, TimeScale, MAX_PARAMETERS};

static REGISTRY: Lazy<RwLock<HashMap<String, Scale>>> = Lazy::new(|| {
    let builtins = Scale::BUILTIN
        .iter()
        .map(|scale| (scale.name().to_string(), *scale))
        .collect();
    RwLock::new(builtins)
});

/// Adds `scale` to the registry and returns its handle.
///
/// Fails with [`TimeError::DuplicateScale`] if the name is taken, and with
/// [`TimeError::ValidationError`] for a name that could not be parsed back
/// (empty or not ASCII alphanumeric) or too many parameters.
pub fn register<S: TimeScale + 'static>(scale: S) -> TimeResult<Scale> {
    let name = scale.name().to_string();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TimeError::ValidationError(format!(
            "time scale name {:?} must be non-empty ASCII alphanumeric",
            name
        )));
    }
    if scale.parameter_count() > MAX_PARAMETERS {
        return Err(TimeError::ValidationError(format!(
            "time scale {} declares {} parameters, at most {} are supported",
            name,
            scale.parameter_count(),
            MAX_PARAMETERS
        )));
    }

    let mut map = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if map.contains_key(&name) {
        return Err(TimeError::DuplicateScale(name));
    }
    let handle = Scale::from_static(Box::leak(Box::new(scale)));
    map.insert(name.clone(), handle);
    log::debug!("registered time scale {}", name);
    Ok(handle)
}

/// Resolves a scale name, e.g. one read from text.
pub fn lookup(name: &str) -> TimeResult<Scale> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
        .ok_or_else(|| TimeError::UnknownScale(name.to_string()))
}

pub fn is_registered(name: &str) -> bool {
    lookup(name).is_ok()
}

/// Registered names in alphabetical order.
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::CustomScale;

    #[test]
    fn test_builtins_preregistered() {
        for name in ["TAI", "UTC", "UT1", "TT", "TCG", "TCB", "TDB"] {
            assert_eq!(lookup(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_unknown_scale() {
        let err = lookup("XYZ").unwrap_err();
        assert_eq!(err, TimeError::UnknownScale("XYZ".to_string()));
    }

    #[test]
    fn test_register_and_lookup() {
        let handle = register(CustomScale::new("REGTEST", |_, _| Ok(5.0))).unwrap();
        assert_eq!(lookup("REGTEST").unwrap(), handle);
        assert!(names().contains(&"REGTEST".to_string()));
        assert!(is_registered("REGTEST"));
    }

    #[test]
    fn test_duplicate_rejected_and_original_kept() {
        register(CustomScale::new("DUPTEST", |_, _| Ok(1.0))).unwrap();
        let err = register(CustomScale::new("DUPTEST", |_, _| Ok(2.0))).unwrap_err();
        assert!(matches!(err, TimeError::DuplicateScale(_)));

        let kept = lookup("DUPTEST").unwrap();
        let offset = kept.offset_from_tai(&crate::Instant::J2000, &[]).unwrap();
        assert_eq!(offset, 1.0);

        assert!(matches!(
            register(CustomScale::new("TT", |_, _| Ok(0.0))),
            Err(TimeError::DuplicateScale(_))
        ));
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(register(CustomScale::new("", |_, _| Ok(0.0))).is_err());
        assert!(register(CustomScale::new("BAD NAME", |_, _| Ok(0.0))).is_err());
        assert!(register(CustomScale::new("MANY", |_, _| Ok(0.0)).with_parameters(9)).is_err());
    }
}
