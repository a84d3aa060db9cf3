//! Host types exposed to scripts

use scriptweb_core::Person;
use scriptweb_scripting::TypeLibrary;

/// Namespace holding the model types
pub const MODELS_NAMESPACE: &str = "models";

/// The `models` library: `Person()`
pub fn person_library() -> TypeLibrary {
    TypeLibrary::new(MODELS_NAMESPACE).with_type::<Person>("Person")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_library() {
        let library = person_library();
        assert_eq!(library.namespace(), "models");

        let ctors = library.constructors();
        assert_eq!(ctors.len(), 1);
        assert_eq!(ctors[0].name(), "Person");

        let template = ctors[0].template().unwrap();
        assert_eq!(template["LastName"], "");
        assert_eq!(template["Pounds"], 0);
    }
}
