//! Service descriptor extraction from component type metadata.

use crate::component::ComponentType;
use crate::config::NamePolicy;
use crate::error::DescriptorError;

/// Extracted web service metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    pub name: String,
}

impl ServiceDescriptor {
    /// Endpoint path derived from the service name.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.name)
    }
}

/// Read the web service marker of `ty`.
///
/// Returns `Ok(None)` when the type carries no marker; that is a skip, not an error.
///
/// # Errors
/// With [`NamePolicy::Strict`], returns `DescriptorError::InvalidDescriptor`
/// for an empty name or one that cannot form a single path segment.
pub fn extract(
    ty: &ComponentType,
    policy: NamePolicy,
) -> Result<Option<ServiceDescriptor>, DescriptorError> {
    let Some(ws) = ty.web_service else {
        return Ok(None);
    };

    if policy == NamePolicy::Strict {
        validate_name(ws.name).map_err(|reason| DescriptorError::InvalidDescriptor {
            type_name: ty.type_name,
            reason,
        })?;
    }

    Ok(Some(ServiceDescriptor {
        name: ws.name.to_owned(),
    }))
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("service name is empty");
    }
    if name.contains(['/', '?', '#']) {
        return Err("service name contains a reserved path character");
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("service name contains whitespace or control characters");
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn plain_type_has_no_descriptor() {
        let ty = ComponentType::plain("app::Audit");
        assert_eq!(extract(&ty, NamePolicy::Strict).unwrap(), None);
        assert_eq!(extract(&ty, NamePolicy::Verbatim).unwrap(), None);
    }

    #[test]
    fn name_is_read_verbatim() {
        let ty = ComponentType::web_service("app::Foo", "FooTestService");
        let desc = extract(&ty, NamePolicy::Strict).unwrap().unwrap();
        assert_eq!(desc.name, "FooTestService");
        assert_eq!(desc.path(), "/FooTestService");
    }

    #[test]
    fn empty_name_is_rejected_when_strict() {
        let ty = ComponentType::web_service("app::Nameless", "");
        let err = extract(&ty, NamePolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::InvalidDescriptor {
                type_name: "app::Nameless",
                reason: "service name is empty",
            }
        );
    }

    #[test]
    fn empty_name_maps_to_root_when_verbatim() {
        let ty = ComponentType::web_service("app::Nameless", "");
        let desc = extract(&ty, NamePolicy::Verbatim).unwrap().unwrap();
        assert_eq!(desc.path(), "/");
    }

    #[test]
    fn malformed_names_are_rejected_when_strict() {
        for name in ["a/b", "a?b", "a#b", "a b", " lead", "tab\t", "nl\n"] {
            let ty = ComponentType::web_service("app::Bad", name);
            assert!(
                extract(&ty, NamePolicy::Strict).is_err(),
                "{name:?} should be rejected"
            );
        }
    }
}
