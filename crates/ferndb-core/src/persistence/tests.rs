use crate::{
    identity::ClassName,
    metadata::ClassDefinition,
    persistence::{
        PersistenceError, PersistenceModelLoader, PersistenceModelValidator,
        StorageEntityResolver, StorageProviderLoader,
    },
    test_support::{class_name, fixture_graph},
};
use std::{cell::RefCell, rc::Rc, sync::Arc};

///
/// StubProvider
///

#[derive(Default)]
struct StubProvider {
    applied: RefCell<Vec<Vec<ClassName>>>,
}

impl StorageProviderLoader for StubProvider {
    fn apply_persistence_model(
        &self,
        hierarchy: &[Arc<ClassDefinition>],
    ) -> Result<(), PersistenceError> {
        self.applied
            .borrow_mut()
            .push(hierarchy.iter().map(|class| class.name().clone()).collect());

        Ok(())
    }

    fn create_validator(
        &self,
        root: &Arc<ClassDefinition>,
    ) -> Result<Box<dyn PersistenceModelValidator>, PersistenceError> {
        Ok(Box::new(StubValidator {
            root: root.name().clone(),
        }))
    }
}

struct StubValidator {
    root: ClassName,
}

impl PersistenceModelValidator for StubValidator {
    fn validate(&self) -> Result<(), PersistenceError> {
        if self.root == class_name("Customer") {
            Ok(())
        } else {
            Err(PersistenceError::InvalidMapping {
                class: self.root.clone(),
                message: "unmapped property".to_string(),
            })
        }
    }
}

fn loader_with(provider: Rc<StubProvider>) -> PersistenceModelLoader<'static> {
    let mut resolver = StorageEntityResolver::new();
    resolver.register("main", provider).unwrap();

    PersistenceModelLoader::new(fixture_graph(), resolver)
}

#[test]
fn apply_delegates_the_hierarchy_to_the_group_provider() {
    let provider = Rc::new(StubProvider::default());
    let loader = loader_with(provider.clone());

    loader.apply_persistence_model(&class_name("Customer")).unwrap();

    let applied = provider.applied.borrow();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0], vec![class_name("Customer")]);
}

#[test]
fn validator_creation_delegates_to_the_group_provider() {
    let loader = loader_with(Rc::new(StubProvider::default()));

    let validator = loader.create_validator(&class_name("Customer")).unwrap();
    validator.validate().unwrap();

    let validator = loader.create_validator(&class_name("Order")).unwrap();
    assert!(matches!(
        validator.validate(),
        Err(PersistenceError::InvalidMapping { .. })
    ));
}

#[test]
fn unknown_root_and_unregistered_group_fail() {
    let loader = loader_with(Rc::new(StubProvider::default()));
    assert!(matches!(
        loader.apply_persistence_model(&class_name("Ghost")),
        Err(PersistenceError::Metadata(_))
    ));

    let empty = PersistenceModelLoader::new(fixture_graph(), StorageEntityResolver::new());
    assert!(matches!(
        empty.apply_persistence_model(&class_name("Customer")),
        Err(PersistenceError::UnknownStorageProvider { .. })
    ));
}

#[test]
fn a_second_provider_for_the_same_group_is_rejected() {
    let mut resolver = StorageEntityResolver::new();
    resolver.register("main", Rc::new(StubProvider::default())).unwrap();

    assert!(matches!(
        resolver.register("main", Rc::new(StubProvider::default())),
        Err(PersistenceError::DuplicateStorageProvider { .. })
    ));
}
