use rowbind::memory::Table;
use rowbind::{AnyObject, Config, Mapper, Model, Type, Value};
use tests::{init_logging, mapper};

#[derive(Debug, Default, Clone, Model)]
struct Author {
    #[column("Id")]
    id: i32,

    #[relation("Books", parent_key = "Id", child_key = "AuthorId")]
    books: Vec<Book>,
}

#[derive(Debug, Default, Clone, Model)]
struct Book {
    #[column("Id")]
    id: i32,

    #[relation("Authors", parent_key = "Id", child_key = "BookId")]
    authors: Vec<Author>,
}

#[test]
fn mutual_child_relations_are_rejected() {
    let mapper = mapper!(Author, Book);

    let err = mapper.resolve::<Author>(0).unwrap_err();
    assert!(err.is_cyclic_mapping());
    assert_eq!(err.to_string(), "cyclic mapping: Author#0 -> Book#0 -> Author#0");

    // Nothing half-resolved is left behind
    assert_eq!(mapper.cached_plans(), 0);
}

#[derive(Debug, Default, Clone, Model)]
struct Link {
    #[column("Id")]
    id: i32,

    #[complex(item = Link)]
    next: AnyObject,
}

#[test]
fn complex_members_cannot_nest_their_own_plan() {
    let mapper = mapper!(Link);

    let err = mapper.resolve::<Link>(0).unwrap_err();
    assert!(err.is_cyclic_mapping());
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Category {
    #[column("Id")]
    id: i32,

    #[column("Name")]
    name: String,

    #[relation("Children", parent_key = "Id", child_key = "ParentId")]
    children: Vec<Category>,
}

#[test]
fn a_relation_may_target_its_own_plan() {
    let mapper = mapper!(Category);

    let plan = mapper.resolve::<Category>(0).unwrap();
    assert_eq!(plan.children()[0].plan, plan.id());
    assert_eq!(plan.relations_from_parent()[0].parent, plan.id());

    let mut tree = Table::new("Category")
        .column("Id", Type::I32)
        .column("ParentId", Type::I32)
        .column("Name", Type::String)
        .row([Value::from(1), Value::Null, Value::from("root")])
        .row([Value::from(2), Value::from(1), Value::from("left")])
        .row([Value::from(3), Value::from(1), Value::from("right")])
        .row([Value::from(4), Value::from(2), Value::from("leaf")]);
    tree.relate_self("Children", &["Id"], &["ParentId"]).unwrap();

    let root: Category = mapper.fill_one(&tree, 0, 0).unwrap();

    let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["left", "right"]);
    assert_eq!(root.children[0].children[0].name, "leaf");
    assert!(root.children[1].children.is_empty());
}

#[test]
fn a_row_that_is_its_own_parent_is_extracted_once() {
    let mapper = mapper!(Category);

    let mut tree = Table::new("Category")
        .column("Id", Type::I32)
        .column("ParentId", Type::I32)
        .column("Name", Type::String)
        .row([Value::from(1), Value::from(1), Value::from("root")])
        .row([Value::from(2), Value::from(1), Value::from("child")]);
    tree.relate_self("Children", &["Id"], &["ParentId"]).unwrap();

    let mut dest: Vec<Category> = vec![];
    mapper.fill_list(&tree, 0, &mut dest).unwrap();

    assert_eq!(dest.len(), 2);
    let names: Vec<_> = dest[0].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["child"]);
    assert!(dest[0].children[0].children.is_empty());
    assert_eq!(dest[1], dest[0].children[0]);

    let root: Category = mapper.fill_one(&tree, 0, 0).unwrap();
    assert_eq!(root, dest[0]);
}

#[test]
fn the_same_type_under_another_scheme_is_not_a_cycle() {
    #[derive(Debug, Default, Clone, Model)]
    struct Manager {
        #[column("Id")]
        id: i32,

        #[relation("Reports", parent_key = "Id", child_key = "ManagerId", nested = 1)]
        reports: Vec<Manager>,
    }

    let mapper = mapper!(Manager);

    let plan = mapper.resolve::<Manager>(0).unwrap();
    let nested = mapper.plan(plan.children()[0].plan).unwrap();

    assert_ne!(nested.id(), plan.id());
    assert_eq!(nested.scheme(), rowbind::SchemeId(1));
    assert!(nested.children().is_empty());
}

#[derive(Debug, Default, Clone, Model)]
struct Outer {
    #[complex]
    middle: Middle,
}

#[derive(Debug, Default, Clone, Model)]
struct Middle {
    #[complex]
    inner: Inner,
}

#[derive(Debug, Default, Clone, Model)]
struct Inner {
    #[column("Value")]
    value: i32,
}

#[test]
fn nesting_deeper_than_the_configured_limit_fails() {
    init_logging();

    let mapper = Mapper::builder()
        .config(Config::new().max_depth(2))
        .build()
        .unwrap();

    let err = mapper.resolve::<Outer>(0).unwrap_err();
    assert!(err.is_recursion_limit());

    let mapper = Mapper::builder()
        .config(Config::new().max_depth(3))
        .build()
        .unwrap();

    let source = Table::new("Outer")
        .column("Value", Type::I32)
        .row([Value::from(9)]);

    let outer: Outer = mapper.fill_one(&source, 0, 0).unwrap();
    assert_eq!(outer.middle.inner.value, 9);
}
