use pretty_assertions::assert_eq;
use rowbind::memory::Table;
use rowbind::{Model, Type, Value};
use tests::mapper;

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Contact {
    #[column("Id")]
    id: i64,

    #[column("Name")]
    name: String,

    #[column("Email")]
    email: Option<String>,

    #[column("Age")]
    age: u8,
}

fn full() -> Table {
    Table::new("Contact")
        .column("Id", Type::I64)
        .column("Name", Type::String)
        .column("Email", Type::String)
        .column("Age", Type::U8)
        .row([
            Value::I64(1),
            Value::from("Ann"),
            Value::from("ann@example.com"),
            Value::U8(40),
        ])
}

fn partial() -> Table {
    Table::new("Contact")
        .column("name", Type::String)
        .column("Id", Type::I64)
        .column("Unrelated", Type::Bool)
        .row([Value::from("Bob"), Value::I64(2), Value::Bool(true)])
}

#[test]
fn missing_columns_leave_members_at_default() {
    let mapper = mapper!(Contact);

    // Build the plan against the full shape first
    let ann: Contact = mapper.fill_one(&full(), 0, 0).unwrap();
    assert_eq!(ann.email.as_deref(), Some("ann@example.com"));

    let bob: Contact = mapper.fill_one(&partial(), 0, 0).unwrap();
    assert_eq!(
        bob,
        Contact {
            id: 2,
            name: "Bob".to_string(),
            email: None,
            age: 0,
        }
    );
}

#[test]
fn missing_columns_keep_existing_values() {
    let mapper = mapper!(Contact);

    let mut contact: Contact = mapper.fill_one(&full(), 0, 0).unwrap();
    mapper.fill_one_into(&partial(), 0, 0, &mut contact).unwrap();

    assert_eq!(contact.id, 2);
    assert_eq!(contact.name, "Bob");
    assert_eq!(contact.email.as_deref(), Some("ann@example.com"));
    assert_eq!(contact.age, 40);
}

#[test]
fn alternating_shapes_reuse_one_plan() {
    let mapper = mapper!(Contact);
    let (full, partial) = (full(), partial());

    for _ in 0..3 {
        let mut dest: Vec<Contact> = vec![];
        mapper.fill_list(&full, 0, &mut dest).unwrap();
        mapper.fill_list(&partial, 0, &mut dest).unwrap();

        assert_eq!(dest[0].age, 40);
        assert_eq!(dest[1].age, 0);
    }

    assert_eq!(mapper.cached_plans(), 1);
}

#[test]
fn a_source_without_any_mapped_column_is_a_missing_mapping() {
    let mapper = mapper!(Contact);

    let unrelated = Table::new("Other")
        .column("Color", Type::String)
        .row([Value::from("red")]);

    let err = mapper.fill_one::<Contact>(&unrelated, 0, 0).unwrap_err();
    assert!(err.is_missing_mapping());
}

#[test]
fn a_scheme_without_facts_is_a_missing_mapping() {
    let mapper = mapper!(Contact);

    let err = mapper.fill_one::<Contact>(&full(), 0, 5).unwrap_err();
    assert!(err.is_missing_mapping());
    assert!(err
        .to_string()
        .contains("no mapping found for `Contact` with scheme 5"));
}

#[test]
fn out_of_range_rows_are_rejected() {
    let mapper = mapper!(Contact);

    let err = mapper.fill_one::<Contact>(&full(), 1, 0).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[derive(Debug, Default, Clone, Model)]
struct Draft {
    #[column("Id")]
    id: i64,

    #[skip]
    dirty: bool,
}

#[test]
fn skipped_fields_are_left_alone() {
    let mapper = mapper!(Draft);

    assert!(Draft::entity_type().member_by_name("dirty").is_none());

    let mut draft = Draft { id: 0, dirty: true };
    mapper.fill_one_into(&full(), 0, 0, &mut draft).unwrap();

    assert_eq!(draft.id, 1);
    assert!(draft.dirty);
}
