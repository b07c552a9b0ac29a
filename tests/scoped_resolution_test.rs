use scopist::prelude::*;
use std::sync::Arc;

#[derive(Debug)]
struct UnitOfWork {
    id: uuid::Uuid,
}

impl Component for UnitOfWork {
    fn construct(_resolver: &dyn Resolver) -> anyhow::Result<Self> {
        Ok(UnitOfWork {
            id: uuid::Uuid::new_v4(),
        })
    }
}

struct Dispatcher {
    unit_of_work: ScopedResolver<UnitOfWork>,
}

impl Component for Dispatcher {
    fn dependencies() -> EntryPoint {
        EntryPoint::new().with(ScopedResolver::<UnitOfWork>::dependency())
    }

    fn construct(_resolver: &dyn Resolver) -> anyhow::Result<Self> {
        Ok(Dispatcher {
            unit_of_work: ScopedResolver::new(),
        })
    }
}

fn provider() -> ServiceProvider {
    let mut services = ServiceCollection::new();
    services.add_scopist();
    services.add_singleton::<Dispatcher>();
    services.add_scoped::<UnitOfWork>();
    services.build_and_validate().unwrap()
}

#[test]
fn test_same_scope_shares_instance() {
    let provider = provider();
    let dispatcher = provider.get::<Dispatcher>().unwrap();
    let scope = provider.create_named_scope("request");

    let first = dispatcher.unit_of_work.resolve(&scope).unwrap();
    let second = dispatcher.unit_of_work.resolve(&scope).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(scope.name(), "request");
}

#[test]
fn test_each_scope_gets_its_own_instance() {
    let provider = provider();
    let dispatcher = provider.get::<Dispatcher>().unwrap();

    let first = dispatcher.unit_of_work.resolve(&provider.create_scope()).unwrap();
    let second = dispatcher.unit_of_work.resolve(&provider.create_scope()).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn test_singleton_is_shared_across_scopes() {
    let provider = provider();
    let scope = provider.create_scope();

    let from_root = provider.get::<Dispatcher>().unwrap();
    let from_scope = scope.get::<Dispatcher>().unwrap();
    assert!(Arc::ptr_eq(&from_root, &from_scope));
}

#[test]
fn test_scoped_service_from_root_is_rejected_when_validating_scopes() {
    let provider = provider();
    let err = provider.get::<UnitOfWork>().unwrap_err();
    assert!(matches!(err, ContainerError::ScopeViolation { .. }));
}

#[test]
fn test_last_registration_wins_at_resolution() {
    let mut services = ServiceCollection::new();
    services.add_instance(Arc::new(String::from("first")));
    services.add_instance(Arc::new(String::from("second")));

    let provider = services.build().unwrap();
    assert_eq!(provider.get::<String>().unwrap().as_str(), "second");
}
