//! End-to-end transaction flow over the public surface: publish a mapping
//! graph, load objects lazily, eager-fetch a relation, mutate, and commit.

use ferndb_core::{
    container::ValueAccess,
    error::EngineError,
    fetch::{
        DataSourceRecord, EagerFetchQueryCollection, FetchError, FetchQuery, FetchQueryExecutor,
        LoadedObjectWithSource, QueryId,
    },
    identity::{ClassName, ObjectId, ObjectKey, PropertyName},
    metadata::{
        ClassDefinition, MappingGraph, MappingGraphBuilder, PropertyDefinition, PropertyType,
        RelationDefinition, RelationEndPointDefinition, RelationEndPointId, StorageClass,
    },
    object::ObjectHandle,
    uow::{StorageAdapter, UnitOfWork},
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};
use ulid::Ulid;

fn class(name: &str) -> ClassName {
    ClassName::try_from_str(name).unwrap()
}

fn prop(name: &str) -> PropertyName {
    PropertyName::try_from_str(name).unwrap()
}

fn object(class_name: &str, n: u128) -> ObjectId {
    ObjectId::new(class(class_name), ObjectKey::Ulid(Ulid(n)))
}

/// Author 1:N Book, with the foreign key on Book.
fn build_graph() -> Arc<MappingGraph> {
    let books = Arc::new(RelationEndPointDefinition::VirtualCollection {
        class: class("Author"),
        property: prop("books"),
        mandatory: false,
    });
    let author = Arc::new(RelationEndPointDefinition::Real {
        class: class("Book"),
        property: prop("author"),
        mandatory: true,
    });

    let author_class = ClassDefinition::new(class("Author"), None, Some("library".to_string()));
    author_class
        .set_property_definitions(vec![PropertyDefinition::new(
            prop("name"),
            PropertyType::Text,
            false,
            StorageClass::Persistent,
        )])
        .unwrap();
    author_class
        .set_relation_end_point_definitions(vec![books.clone()])
        .unwrap();

    let book_class = ClassDefinition::new(class("Book"), None, Some("library".to_string()));
    book_class
        .set_property_definitions(vec![
            PropertyDefinition::new(prop("title"), PropertyType::Text, false, StorageClass::Persistent),
            PropertyDefinition::new(
                prop("author"),
                PropertyType::ObjectId,
                true,
                StorageClass::Persistent,
            ),
        ])
        .unwrap();
    book_class
        .set_relation_end_point_definitions(vec![author.clone()])
        .unwrap();

    let mut builder = MappingGraphBuilder::new();
    builder.add_class(author_class).unwrap();
    builder.add_class(book_class).unwrap();
    builder
        .add_relation(RelationDefinition::try_new("Book->Author", author, books).unwrap())
        .unwrap();

    Arc::new(builder.build().unwrap())
}

struct MapAdapter {
    records: BTreeMap<ObjectId, DataSourceRecord>,
}

impl StorageAdapter for MapAdapter {
    fn load_record(&mut self, id: &ObjectId) -> Result<Option<DataSourceRecord>, EngineError> {
        Ok(self.records.get(id).cloned())
    }
}

struct MapExecutor {
    rows: Vec<LoadedObjectWithSource>,
}

impl FetchQueryExecutor for MapExecutor {
    fn execute(&mut self, _query: &FetchQuery) -> Result<Vec<LoadedObjectWithSource>, FetchError> {
        Ok(self.rows.clone())
    }
}

fn text_record(property: &str, value: &str) -> DataSourceRecord {
    let mut values = BTreeMap::new();
    values.insert(prop(property), Value::Text(value.to_string()));

    DataSourceRecord::new(values)
}

#[test]
fn load_fetch_mutate_commit() {
    let graph = build_graph();
    let author_id = object("Author", 1);

    let adapter = MapAdapter {
        records: [(author_id.clone(), text_record("name", "N. K. Jemisin"))]
            .into_iter()
            .collect(),
    };
    let mut uow = UnitOfWork::new(Arc::clone(&graph), Box::new(adapter));

    // Lazy load the author.
    let author = uow.register_loaded(author_id.clone()).unwrap();
    assert_eq!(
        uow.get_value(author.id(), &prop("name"), ValueAccess::Current)
            .unwrap(),
        Value::Text("N. K. Jemisin".to_string())
    );

    // Eager-fetch the author's books.
    let books_def = graph
        .end_point_definition(&class("Author"), &prop("books"))
        .unwrap()
        .clone();
    let mut queries = EagerFetchQueryCollection::new();
    queries
        .add(
            books_def.clone(),
            FetchQuery::new(QueryId::new("books-by-author"), "books where author in (..)"),
        )
        .unwrap();

    let mut fk = BTreeMap::new();
    fk.insert(prop("author"), Value::ObjectId(author_id.clone()));
    let mut executor = MapExecutor {
        rows: vec![LoadedObjectWithSource::new(
            ObjectHandle::new(object("Book", 10)),
            DataSourceRecord::new(fk),
        )],
    };
    uow.eager_fetch(&[Some(author.clone())], &queries, &mut executor)
        .unwrap();

    let end_point_id = RelationEndPointId::try_new(author_id.clone(), books_def).unwrap();
    let end_point = uow.virtual_end_point(&end_point_id).unwrap();
    assert!(end_point.is_data_complete());
    let data = end_point.as_collection().unwrap().data();
    assert_eq!(data.borrow().count(), 1);
    assert_eq!(data.borrow().get(0).unwrap().id(), &object("Book", 10));

    // Mutate and commit.
    uow.set_value(
        author.id(),
        &prop("name"),
        Value::Text("Nora K. Jemisin".to_string()),
    )
    .unwrap();
    assert!(uow.state(author.id()).unwrap().is_changed());

    uow.commit().unwrap();
    assert!(uow.state(author.id()).unwrap().is_unchanged());
    assert_eq!(
        uow.get_value(author.id(), &prop("name"), ValueAccess::Original)
            .unwrap(),
        Value::Text("Nora K. Jemisin".to_string())
    );
}
