//! Named boolean flags that conditional directives are evaluated against.
//!
//! The engine never inspects the shape of the caller's answers. Anything that
//! can answer "is this flag on?" implements [`FlagSet`]; names it does not know
//! about are simply off.

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// Read-only lookup from flag name to boolean value.
pub trait FlagSet {
    /// Returns the value of `name`, or `false` if the flag is unknown.
    fn lookup(&self, name: &str) -> bool;
}

impl<T: FlagSet + ?Sized> FlagSet for &T {
    fn lookup(&self, name: &str) -> bool {
        (**self).lookup(name)
    }
}

impl<T: FlagSet + ?Sized> FlagSet for Box<T> {
    fn lookup(&self, name: &str) -> bool {
        (**self).lookup(name)
    }
}

impl FlagSet for IndexMap<String, bool> {
    fn lookup(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(false)
    }
}

impl<S: std::hash::BuildHasher> FlagSet for HashMap<String, bool, S> {
    fn lookup(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(false)
    }
}

impl FlagSet for BTreeMap<String, bool> {
    fn lookup(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(false)
    }
}

/// Only `true` JSON booleans count as set; strings, numbers and nulls are off.
impl FlagSet for serde_json::Map<String, serde_json::Value> {
    fn lookup(&self, name: &str) -> bool {
        self.get(name).and_then(serde_json::Value::as_bool).unwrap_or(false)
    }
}

impl FlagSet for serde_json::Value {
    fn lookup(&self, name: &str) -> bool {
        match self {
            serde_json::Value::Object(map) => map.lookup(name),
            _ => false,
        }
    }
}

/// A flag set with nothing enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFlags;

impl FlagSet for NoFlags {
    fn lookup(&self, _name: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct ServiceOptions {
        use_rest: bool,
        use_grpc: bool,
    }

    impl FlagSet for ServiceOptions {
        fn lookup(&self, name: &str) -> bool {
            match name {
                "UseREST" => self.use_rest,
                "UseGRPC" => self.use_grpc,
                _ => false,
            }
        }
    }

    #[test]
    fn test_open_maps() {
        let mut flags = IndexMap::new();
        flags.insert("UseREST".to_string(), true);
        flags.insert("UseGRPC".to_string(), false);

        assert!(flags.lookup("UseREST"));
        assert!(!flags.lookup("UseGRPC"));
        assert!(!flags.lookup("UseGraphQL"));

        let hashed: HashMap<String, bool> = flags.clone().into_iter().collect();
        assert!(hashed.lookup("UseREST"));
        assert!(!hashed.lookup("useREST"));
    }

    #[test]
    fn test_closed_struct() {
        let options = ServiceOptions { use_rest: false, use_grpc: true };
        assert!(options.lookup("UseGRPC"));
        assert!(!options.lookup("UseREST"));
        assert!(!options.lookup("UseWorkers"));
    }

    #[test]
    fn test_json_values() {
        let answers = json!({"UseREST": true, "UseGRPC": "yes", "project_name": "svc"});
        assert!(answers.lookup("UseREST"));
        assert!(!answers.lookup("UseGRPC"));
        assert!(!answers.lookup("project_name"));
        assert!(!json!(null).lookup("UseREST"));
        assert!(!NoFlags.lookup("UseREST"));
    }
}
