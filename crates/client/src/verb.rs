//! The enumerated remote operation set.
//!
//! The original surface here was an open-ended forwarding of arbitrary verb
//! names; this is its sealed replacement. A verb is an action applied to a
//! resource, and the full set is a compile-time constant, so capability
//! queries are a membership test rather than reflection.

use clearbooks_model::Resource;

/// What an operation does to its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    List,
    Get,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Update,
        Action::List,
        Action::Get,
        Action::Delete,
    ];
}

/// A remote operation: action × resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Verb {
    pub action: Action,
    pub resource: Resource,
}

impl Verb {
    /// Every operation the service exposes.
    pub const ALL: [Verb; 15] = {
        let mut all = [Verb {
            action: Action::Create,
            resource: Resource::Entity,
        }; 15];
        let actions = Action::ALL;
        let resources = Resource::ALL;
        let mut i = 0;
        while i < actions.len() {
            let mut j = 0;
            while j < resources.len() {
                all[i * resources.len() + j] = Verb {
                    action: actions[i],
                    resource: resources[j],
                };
                j += 1;
            }
            i += 1;
        }
        all
    };

    pub fn new(action: Action, resource: Resource) -> Self {
        Self { action, resource }
    }

    /// Operation name as exposed to callers and to the transport.
    pub fn as_str(self) -> &'static str {
        use Action::*;
        use Resource::*;
        match (self.action, self.resource) {
            (Create, Entity) => "create_entity",
            (Update, Entity) => "update_entity",
            (List, Entity) => "list_entities",
            (Get, Entity) => "get_entity",
            (Delete, Entity) => "delete_entity",
            (Create, Invoice) => "create_invoice",
            (Update, Invoice) => "update_invoice",
            (List, Invoice) => "list_invoices",
            (Get, Invoice) => "get_invoice",
            (Delete, Invoice) => "delete_invoice",
            (Create, Item) => "create_item",
            (Update, Item) => "update_item",
            (List, Item) => "list_items",
            (Get, Item) => "get_item",
            (Delete, Item) => "delete_item",
        }
    }

    /// Static membership test over the operation set.
    pub fn parse(name: &str) -> Option<Verb> {
        Verb::ALL.into_iter().find(|verb| verb.as_str() == name)
    }
}

impl core::fmt::Display for Verb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Verb {
    type Err = crate::error::ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::parse(s).ok_or_else(|| crate::error::ClientError::unsupported(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_action_resource_pair() {
        assert_eq!(Verb::ALL.len(), 15);
        for action in Action::ALL {
            for resource in Resource::ALL {
                assert!(Verb::ALL.contains(&Verb::new(action, resource)));
            }
        }
    }

    #[test]
    fn parse_round_trips_every_name() {
        for verb in Verb::ALL {
            assert_eq!(Verb::parse(verb.as_str()), Some(verb));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Verb::parse("make_coffee"), None);
        assert_eq!(Verb::parse("create_entities"), None);
        assert_eq!(Verb::parse(""), None);
    }

    #[test]
    fn from_str_reports_unsupported_operations() {
        use crate::error::ClientError;

        let verb: Verb = "list_invoices".parse().unwrap();
        assert_eq!(verb, Verb::new(Action::List, Resource::Invoice));

        let err = "make_coffee".parse::<Verb>().unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedOperation(name) if name == "make_coffee"));
    }
}
