use pretty_assertions::assert_eq;
use rowbind::{Model, RowSet};
use tests::{customers, customers_with_orders, mapper, orders};

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Customer {
    #[column("Id")]
    id: Option<i32>,

    #[column("Name")]
    name: String,

    #[relation("Orders", parent_key = "Id", child_key = "ParentId")]
    orders: Vec<Order>,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Order {
    #[column("OrderId")]
    id: i32,

    #[column("Total")]
    total: f64,
}

fn order_ids(customer: &Customer) -> Vec<i32> {
    customer.orders.iter().map(|order| order.id).collect()
}

#[test]
fn key_join_matches_children_in_encounter_order() {
    let mapper = mapper!(Customer, Order);
    let customers = customers();
    let orders = orders();

    let mut dest: Vec<Customer> = vec![];
    mapper
        .fill_linked(&customers, &[&orders], 0, &mut dest)
        .unwrap();

    assert_eq!(dest.len(), 3);
    assert_eq!(dest[0].id, Some(72));
    assert_eq!(order_ids(&dest[0]), [1, 2]);
    assert_eq!(dest[1].id, Some(34));
    assert_eq!(order_ids(&dest[1]), [3]);

    // A null parent key links nothing, and is not an error
    assert_eq!(dest[2].id, None);
    assert_eq!(dest[2].name, "Nobody");
    assert!(dest[2].orders.is_empty());

    assert_eq!(dest[0].orders[1].total, 7.25);
}

#[test]
fn navigation_gives_the_same_result_as_key_join() {
    let mapper = mapper!(Customer, Order);

    let mut joined: Vec<Customer> = vec![];
    mapper
        .fill_linked(&customers(), &[&orders()], 0, &mut joined)
        .unwrap();

    let mut navigated: Vec<Customer> = vec![];
    mapper
        .fill_list(&customers_with_orders(), 0, &mut navigated)
        .unwrap();

    assert_eq!(joined, navigated);
}

#[test]
fn children_stay_empty_without_navigation_or_related_tables() {
    let mapper = mapper!(Customer, Order);

    let mut dest: Vec<Customer> = vec![];
    mapper.fill_list(&customers(), 0, &mut dest).unwrap();

    assert_eq!(dest.len(), 3);
    assert!(dest.iter().all(|customer| customer.orders.is_empty()));
}

#[test]
fn a_child_row_reached_from_two_parents_is_extracted_once() {
    let mapper = mapper!(Customer, Order);

    let customers = customers()
        .column("Extra", None)
        .row([72.into(), "Ann again".into(), rowbind::Value::Null]);
    let orders = orders();

    let mut session = mapper.session();
    session.with_related([&orders as &dyn RowSet]);

    let mut dest: Vec<Customer> = vec![];
    session
        .fill_list(&customers, Customer::entity_type(), 0, &mut dest, true)
        .unwrap();

    assert_eq!(order_ids(&dest[0]), [1, 2]);
    assert_eq!(order_ids(&dest[3]), [1, 2]);
    assert_eq!(dest[0].orders, dest[3].orders);

    // Four customer rows and the three linked order rows
    assert_eq!(session.cached_objects(), 7);
}

#[test]
fn filling_grows_capacity_by_the_number_of_children() {
    let mapper = mapper!(Customer, Order);

    let mut customer = Customer::default();
    let before = customer.orders.capacity();

    mapper
        .fill_one_into(&customers_with_orders(), 0, 0, &mut customer)
        .unwrap();

    assert_eq!(customer.orders.len(), 2);
    assert!(customer.orders.capacity() >= before + 2);
}

#[test]
fn composite_keys_compare_column_by_column() {
    #[derive(Debug, Default, Clone, Model)]
    struct Shipment {
        #[column("Region")]
        region: String,

        #[column("Number")]
        number: i64,

        #[relation("Parcels", parent_key = ["Region", "Number"], child_key = ["ShipRegion", "ShipNumber"])]
        parcels: Vec<Parcel>,
    }

    #[derive(Debug, Default, Clone, Model)]
    struct Parcel {
        #[column("Label")]
        label: String,
    }

    use rowbind::memory::Table;
    use rowbind::{Type, Value};

    let shipments = Table::new("Shipment")
        .column("Region", Type::String)
        .column("Number", Type::I64)
        .row([Value::from("eu"), Value::I64(1)])
        .row([Value::from("us"), Value::I64(1)])
        .row([Value::from("EU"), Value::I64(1)]);

    let parcels = Table::new("Parcel")
        .column("ShipRegion", Type::String)
        .column("ShipNumber", Type::U8)
        .column("Label", Type::String)
        .row([Value::from("us"), Value::U8(1), Value::from("a")])
        .row([Value::from("eu"), Value::U8(1), Value::from("b")])
        .row([Value::from("eu"), Value::U8(2), Value::from("c")])
        .row([Value::from("eu"), Value::U8(1), Value::from("d")]);

    let mapper = mapper!(Shipment, Parcel);
    let mut dest: Vec<Shipment> = vec![];
    mapper
        .fill_linked(&shipments, &[&parcels], 0, &mut dest)
        .unwrap();

    let labels = |shipment: &Shipment| -> Vec<String> {
        shipment.parcels.iter().map(|p| p.label.clone()).collect()
    };

    assert_eq!(labels(&dest[0]), ["b", "d"]);
    assert_eq!(labels(&dest[1]), ["a"]);

    // Strings compare ordinally
    assert!(dest[2].parcels.is_empty());
}

#[test]
fn key_join_without_key_columns_is_an_error() {
    #[derive(Debug, Default, Clone, Model)]
    struct Keyless {
        #[column("Id")]
        id: i32,

        #[relation("Orders")]
        orders: Vec<Order>,
    }

    let mapper = mapper!(Keyless, Order);
    let mut dest: Vec<Keyless> = vec![];

    let err = mapper
        .fill_linked(&customers(), &[&orders()], 0, &mut dest)
        .unwrap_err();
    assert!(err.is_missing_key_info());
}

#[test]
fn key_join_with_missing_key_column_is_an_error() {
    let mapper = mapper!(Customer, Order);
    let orders = rowbind::memory::Table::new("Order").column("OrderId", rowbind::Type::I32);

    let mut dest: Vec<Customer> = vec![];
    let err = mapper
        .fill_linked(&customers(), &[&orders], 0, &mut dest)
        .unwrap_err();
    assert!(err.is_missing_key_info());
}

#[test]
fn plans_record_keys_on_both_ends() {
    let mapper = mapper!(Customer, Order);

    let customer = mapper.resolve::<Customer>(0).unwrap();
    assert_eq!(customer.primary_keys().len(), 1);
    assert!(customer.foreign_keys().is_empty());

    let key = &customer.primary_keys()[0];
    assert_eq!(key.name, "Orders");
    assert_eq!(key.parent_columns, ["Id"]);
    assert_eq!(key.child_columns, ["ParentId"]);
    assert_eq!(key.parent_scheme, rowbind::SchemeId(0));
    assert_eq!(key.child_scheme, rowbind::SchemeId(i32::MIN));

    let order = mapper.plan(customer.children()[0].plan).unwrap();
    assert_eq!(order.foreign_keys().len(), 1);
    assert_eq!(order.foreign_keys()[0], *key);
    assert_eq!(order.relations_from_parent().len(), 1);
    assert_eq!(order.relations_from_parent()[0].parent, customer.id());
}
