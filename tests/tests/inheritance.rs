use pretty_assertions::assert_eq;
use rowbind::memory::Table;
use rowbind::{Model, Type, Value};
use tests::mapper;

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[table("Party")]
struct Party {
    #[column("Id")]
    id: i64,

    #[column("DisplayName")]
    name: String,

    #[column("Note")]
    note: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Person {
    #[inherit]
    party: Party,

    #[column("Born")]
    born: Option<i32>,

    /// Hides `Party::note`
    #[column("PersonNote")]
    note: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Employee {
    #[inherit]
    person: Person,

    #[column("Salary")]
    salary: f64,
}

fn people() -> Table {
    Table::new("People")
        .column("Id", Type::I64)
        .column("DisplayName", Type::String)
        .column("Note", Type::String)
        .column("PersonNote", Type::String)
        .column("Born", Type::I32)
        .column("Salary", Type::F64)
        .row([
            Value::I64(9),
            Value::from("Ada"),
            Value::from("party note"),
            Value::from("person note"),
            Value::I32(1815),
            Value::F64(100.0),
        ])
}

#[test]
fn base_members_are_flattened() {
    let ty = Employee::entity_type();
    let names: Vec<_> = ty.members.iter().map(|member| member.name).collect();

    assert_eq!(names, ["salary", "born", "note", "id", "name"]);
    assert_eq!(ty.member_by_name("id").unwrap().declaring_type, "Party");
    assert_eq!(ty.member_by_name("note").unwrap().declaring_type, "Person");
    assert_eq!(ty.lineage(), ["Employee", "Person", "Party"]);
}

#[test]
fn derived_types_inherit_the_base_table() {
    assert_eq!(Person::entity_type().tables[0].name, "Party");
}

#[test]
fn fills_inherited_members_through_the_base_value() {
    let mapper = mapper!(Employee);

    let employee: Employee = mapper.fill_one(&people(), 0, 0).unwrap();

    assert_eq!(
        employee,
        Employee {
            person: Person {
                party: Party {
                    id: 9,
                    name: "Ada".to_string(),
                    note: String::new(),
                },
                born: Some(1815),
                note: "person note".to_string(),
            },
            salary: 100.0,
        }
    );
}

#[test]
fn base_types_still_map_on_their_own() {
    let mapper = mapper!(Party, Person);

    let party: Party = mapper.fill_one(&people(), 0, 0).unwrap();
    assert_eq!(party.note, "party note");

    let person: Person = mapper.fill_one(&people(), 0, 0).unwrap();
    assert_eq!(person.party.note, "");
    assert_eq!(person.party.name, "Ada");
}
