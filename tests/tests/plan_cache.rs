use pretty_assertions::assert_eq;
use rowbind::Model;
use std::sync::Arc;
use tests::{customers_with_orders, mapper};

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[table("Customer", schemes = [0])]
struct Customer {
    #[column("Id")]
    #[column("CustomerId", scheme = 1)]
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
}

#[test]
fn resolving_twice_returns_the_cached_plan() {
    let mapper = mapper!(Customer, Order);

    let first = mapper.resolve::<Customer>(0).unwrap();
    let second = mapper.resolve::<Customer>(0).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // The root and its child plan
    assert_eq!(mapper.cached_plans(), 2);
}

#[test]
fn schemes_resolve_to_distinct_plans() {
    let mapper = mapper!(Customer, Order);

    let deep = mapper.resolve::<Customer>(0).unwrap();
    let shallow = mapper.resolve::<Customer>(1).unwrap();

    assert_ne!(deep.id(), shallow.id());
    assert_eq!(deep.members().len(), 2);
    assert_eq!(deep.children().len(), 1);
    assert_eq!(deep.table().map(|table| table.name.as_str()), Some("Customer"));

    assert_eq!(shallow.members().len(), 1);
    assert_eq!(shallow.members()[0].column, "CustomerId");
    assert!(shallow.children().is_empty());
    assert!(shallow.table().is_none());
}

#[test]
fn clearing_the_cache_gives_equivalent_results() {
    let mapper = mapper!(Customer, Order);
    let source = customers_with_orders();

    let mut before: Vec<Customer> = vec![];
    mapper.fill_list(&source, 0, &mut before).unwrap();

    let mut again: Vec<Customer> = vec![];
    mapper.fill_list(&source, 0, &mut again).unwrap();
    assert_eq!(before, again);

    let plan = mapper.resolve::<Customer>(0).unwrap();
    mapper.clear_cache();
    assert_eq!(mapper.cached_plans(), 0);

    let mut after: Vec<Customer> = vec![];
    mapper.fill_list(&source, 0, &mut after).unwrap();
    assert_eq!(before, after);

    // Plans handed out earlier stay usable
    assert_eq!(plan.members().len(), 2);
}

#[test]
fn concurrent_resolution_agrees_on_one_plan() {
    let mapper = mapper!(Customer, Order);

    let plans: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mapper = mapper.clone();
                scope.spawn(move || mapper.resolve::<Customer>(0).unwrap())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for plan in &plans[1..] {
        assert!(Arc::ptr_eq(&plans[0], plan));
    }
    assert_eq!(mapper.cached_plans(), 2);
}

#[test]
fn clones_share_the_cache() {
    let mapper = mapper!(Customer, Order);
    let clone = mapper.clone();

    mapper.resolve::<Order>(0).unwrap();
    assert_eq!(clone.cached_plans(), 1);

    clone.clear_cache();
    assert_eq!(mapper.cached_plans(), 0);
}

#[test]
fn scheme_less_fills_use_the_configured_default() {
    tests::init_logging();

    let mapper = rowbind::Mapper::builder()
        .register::<Customer>()
        .config(rowbind::Config::new().default_scheme(1))
        .build()
        .unwrap();

    let source = rowbind::memory::Table::new("Customer")
        .column("CustomerId", rowbind::Type::I32)
        .column("Name", rowbind::Type::String)
        .row([rowbind::Value::I32(5), rowbind::Value::from("Eve")]);

    let mut dest: Vec<Customer> = vec![];
    mapper.fill(&source, &mut dest).unwrap();

    assert_eq!(dest[0].id, Some(5));
    // `Name` is only mapped under scheme 0
    assert_eq!(dest[0].name, "");
}
