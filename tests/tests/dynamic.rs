use pretty_assertions::assert_eq;
use rowbind::mapping::ExtractInfo;
use rowbind::memory::{Table, TableCursor};
use rowbind::{
    AnyObject, Cursor, EntityType, Mapper, MappingFact, MappingProvider, Model, Object,
    ObjectBuilder, ObjectList, Result, Type, Value,
};
use tests::{customers, customers_with_orders, init_logging, mapper};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Customer {
    #[column("Id")]
    id: Option<i32>,

    #[column("Name")]
    name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Order {
    #[column("OrderId")]
    id: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Label {
    #[column("Name")]
    text: String,
}

#[derive(Debug, Default, Clone, Model)]
struct Account {
    #[column("Id")]
    id: i32,

    #[complex(item = Label)]
    label: AnyObject,

    #[relation("Orders", parent_key = "Id", child_key = "ParentId", item = Order)]
    orders: ObjectList,
}

#[test]
fn fills_by_descriptor() {
    let mapper = mapper!(Customer);

    let object = mapper
        .fill_one_dyn(&customers(), 1, Customer::entity_type(), 0, None)
        .unwrap();

    assert_eq!(object.object_type().name, "Customer");
    assert_eq!(
        object.downcast::<Customer>().unwrap(),
        Customer {
            id: Some(34),
            name: "Bob".to_string(),
        }
    );
}

#[test]
fn fills_into_an_existing_instance() {
    let mapper = mapper!(Customer);

    let names = Table::new("Customer")
        .column("Name", Type::String)
        .row([Value::from("Renamed")]);

    let existing: Box<dyn Object> = Box::new(Customer {
        id: Some(5),
        name: "Old".to_string(),
    });

    let object = mapper
        .fill_one_dyn(&names, 0, Customer::entity_type(), 0, Some(existing))
        .unwrap();

    let customer = object.downcast_ref::<Customer>().unwrap();
    assert_eq!(customer.id, Some(5));
    assert_eq!(customer.name, "Renamed");
}

#[test]
fn rejects_an_instance_of_another_type() {
    let mapper = mapper!(Customer, Order);

    let err = mapper
        .fill_one_dyn(
            &customers(),
            0,
            Customer::entity_type(),
            0,
            Some(Box::new(Order::default())),
        )
        .unwrap_err();

    assert!(err.is_invalid_argument());
}

#[test]
fn rejects_rows_past_the_end() {
    let mapper = mapper!(Customer);

    let err = mapper
        .fill_one_dyn(&customers(), 3, Customer::entity_type(), 0, None)
        .unwrap_err();

    assert!(err.is_invalid_argument());
}

#[test]
fn untyped_slots_take_their_item_type_from_facts() {
    let mapper = mapper!(Account);

    let mut dest: Vec<Account> = vec![];
    mapper
        .fill_list(&customers_with_orders(), 0, &mut dest)
        .unwrap();

    let ann = &dest[0];
    assert_eq!(ann.id, 72);

    let label = ann.label.0.as_ref().unwrap();
    assert_eq!(label.downcast_ref::<Label>().unwrap().text, "Ann");

    let ids: Vec<_> = ann
        .orders
        .iter()
        .map(|order| order.downcast_ref::<Order>().unwrap().id)
        .collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn untyped_slots_without_an_item_type_are_rejected() {
    #[derive(Debug, Default, Clone, Model)]
    struct Loose {
        #[column("Id")]
        id: i32,

        #[relation("Orders", parent_key = "Id", child_key = "ParentId")]
        orders: ObjectList,
    }

    let mapper = mapper!(Loose);

    let err = mapper.resolve::<Loose>(0).unwrap_err();
    assert!(err.is_unresolvable_item_type());
}

#[test]
fn sessions_fill_untyped_lists() {
    let mapper = mapper!(Customer);
    let table = customers();

    let mut session = mapper.session();
    let mut dest = ObjectList::default();
    session
        .fill_list(&table, Customer::entity_type(), 0, &mut dest, false)
        .unwrap();

    assert_eq!(dest.0.len(), 3);
    assert!(dest.iter().all(|object| object.is::<Customer>()));
}

#[test]
fn typed_lists_reject_objects_of_another_type() {
    let mapper = mapper!(Customer, Order);
    let table = customers();

    let mut session = mapper.session();
    let mut dest: Vec<Order> = vec![];
    let err = session
        .fill_list(&table, Customer::entity_type(), 0, &mut dest, false)
        .unwrap_err();

    assert!(err.is_invalid_argument());
}

#[derive(Default)]
struct CountingBuilder {
    created: Arc<AtomicUsize>,
}

impl ObjectBuilder for CountingBuilder {
    fn create_instance(&self, ty: &'static EntityType) -> Result<Box<dyn Object>> {
        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(ty.construct())
    }
}

#[test]
fn custom_object_builders_create_every_instance() {
    init_logging();

    let builder = CountingBuilder::default();
    let created = builder.created.clone();

    let mapper = Mapper::builder()
        .register::<Customer>()
        .object_builder(builder)
        .build()
        .unwrap();

    let mut dest: Vec<Customer> = vec![];
    mapper.fill_list(&customers(), 0, &mut dest).unwrap();
    let _: Customer = mapper.fill_one(&customers(), 0, 0).unwrap();

    assert_eq!(created.load(Ordering::Relaxed), 4);
}

#[test]
fn nothing_is_constructed_for_a_missing_mapping() {
    init_logging();

    let builder = CountingBuilder::default();
    let created = builder.created.clone();

    let mapper = Mapper::builder()
        .register::<Order>()
        .object_builder(builder)
        .build()
        .unwrap();

    // Customers carry no `OrderId` column
    let source = customers();

    let err = mapper.fill_one::<Order>(&source, 0, 0).unwrap_err();
    assert!(err.is_missing_mapping());

    let err = mapper
        .fill_one_dyn(&source, 0, Order::entity_type(), 0, None)
        .unwrap_err();
    assert!(err.is_missing_mapping());

    let mut cursor = TableCursor::new(&source);
    assert!(cursor.advance().unwrap());
    let err = mapper.fill_current::<Order, _>(&cursor, 0).unwrap_err();
    assert!(err.is_missing_mapping());

    let mut dest: Vec<Order> = vec![];
    let err = mapper
        .fill_cursor(&mut TableCursor::new(&source), 0, &mut dest)
        .unwrap_err();
    assert!(err.is_missing_mapping());
    assert!(dest.is_empty());

    assert_eq!(created.load(Ordering::Relaxed), 0);
}

/// Maps `Customer::name` to the id column and knows nothing else.
struct NameFromId;

impl MappingProvider for NameFromId {
    fn extract_info(&self, info: &mut ExtractInfo) -> Result<bool> {
        if !info.ty.is::<Customer>() {
            return Ok(false);
        }

        let Some(name) = info.ty.member_by_name("name") else {
            return Ok(false);
        };

        info.push(name.index, MappingFact::column(Some("Id"), info.scheme));
        Ok(true)
    }
}

#[test]
fn custom_providers_come_first() {
    init_logging();

    let mapper = Mapper::builder()
        .register::<Customer>()
        .register::<Order>()
        .provider(NameFromId)
        .build()
        .unwrap();

    let customer: Customer = mapper.fill_one(&customers(), 0, 0).unwrap();
    assert_eq!(
        customer,
        Customer {
            id: None,
            name: "72".to_string(),
        }
    );

    // Other types fall through to the attributes
    let mut orders = vec![];
    mapper.fill_list::<Order>(&tests::orders(), 0, &mut orders).unwrap();
    assert_eq!(orders.len(), 4);
}
