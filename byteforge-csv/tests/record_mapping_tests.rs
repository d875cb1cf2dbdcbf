//! Typed record mapping through record schemas
//!
//! Uses the enemies.csv fixture, a typical game data table with quoted
//! names, multi-line notes and empty cells.

use std::path::PathBuf;

use byteforge_csv::{
    ByteForgeError, CsvConfiguration, CsvReader, CsvRecord, RecordSchema,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Enemy {
    id: u32,
    name: String,
    health: i32,
    speed: f32,
    boss: bool,
    notes: Option<String>,
}

impl CsvRecord for Enemy {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field("id", |e: &mut Enemy, v: u32| e.id = v)
            .field("name", |e: &mut Enemy, v: String| e.name = v)
            .field("HEALTH", |e: &mut Enemy, v: i32| e.health = v)
            .field("Speed", |e: &mut Enemy, v: f32| e.speed = v)
            .field("Boss", |e: &mut Enemy, v: bool| e.boss = v)
            .field("Notes", |e: &mut Enemy, v: Option<String>| e.notes = v)
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_get_records_from_fixture() {
    let mut reader = CsvReader::from_path(fixture("enemies.csv"), CsvConfiguration::default())
        .expect("fixture should open");

    let enemies: Vec<Enemy> = reader.get_records().unwrap();
    assert_eq!(enemies.len(), 3);

    assert_eq!(
        enemies[0],
        Enemy {
            id: 1,
            name: "Slime".to_string(),
            health: 20,
            speed: 1.5,
            boss: false,
            notes: None,
        }
    );
    assert_eq!(enemies[1].name, "Goblin, Archer");
    assert_eq!(enemies[1].notes.as_deref(), Some("Shoots \"fire\" arrows"));
    assert_eq!(enemies[2].notes.as_deref(), Some("Breathes fire\r\nand flies"));
    assert!(enemies[2].boss);
}

#[test]
fn test_empty_int_field_is_default() -> anyhow::Result<()> {
    let mut reader = CsvReader::from_path(fixture("enemies.csv"), CsvConfiguration::default())?;
    let enemies: Vec<Enemy> = reader.get_records()?;
    assert_eq!(enemies[2].name, "Dragon");
    assert_eq!(enemies[2].health, 0);
    Ok(())
}

#[test]
fn test_get_records_reads_header_when_needed() {
    let input = "Id,Name\n7,Bat\n";

    let mut reader = CsvReader::from_reader(input.as_bytes());
    assert!(reader.headers().is_none());
    let enemies: Vec<Enemy> = reader
        .get_records_with(
            &RecordSchema::new()
                .field("Id", |e: &mut Enemy, v: u32| e.id = v)
                .field("Name", |e: &mut Enemy, v: String| e.name = v),
        )
        .unwrap();
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].id, 7);
    assert!(reader.headers().is_some());

    let config = CsvConfiguration::default().with_header_record(false);
    let mut headerless = CsvReader::new(input.as_bytes(), config).unwrap();
    assert!(matches!(
        headerless.get_records::<Enemy>(),
        Err(ByteForgeError::HeadersNotRead)
    ));
}

#[test]
fn test_get_records_after_manual_header() {
    let mut reader = CsvReader::from_reader("Id,Name\n1,A\n2,B\n".as_bytes());
    reader.read_header().unwrap();
    assert!(reader.read().unwrap());

    // Mapping continues from the next unread record
    let schema = RecordSchema::new().field("Name", |e: &mut Enemy, v: String| e.name = v);
    let rest = reader.get_records_with(&schema).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].name, "B");
}

#[test]
fn test_conversion_failure_policies() {
    let input = "Id,Name,Health,Speed,Boss,Notes\n1,Orc,lots,fast,maybe,\n";

    let mut strict = CsvReader::from_reader(input.as_bytes());
    let err = strict.get_records::<Enemy>().unwrap_err();
    assert!(matches!(
        err,
        ByteForgeError::TypeConversion { ref column, ref value, .. }
            if column == "HEALTH" && value == "lots"
    ));
    assert!(err.is_policy_controlled());

    let config = CsvConfiguration::default().with_throw_on_type_conversion_failure(false);
    let mut lenient = CsvReader::new(input.as_bytes(), config).unwrap();
    let enemies: Vec<Enemy> = lenient.get_records().unwrap();
    assert_eq!(enemies[0].name, "Orc");
    assert_eq!(enemies[0].health, 0);
    assert_eq!(enemies[0].speed, 0.0);
    assert!(!enemies[0].boss);
}

#[test]
fn test_fields_without_column_keep_default() {
    #[derive(Debug, Default)]
    struct Person {
        name: String,
        age: u32,
        extra: String,
    }

    let schema = RecordSchema::new()
        .field("Name", |p: &mut Person, v: String| p.name = v)
        .field("Age", |p: &mut Person, v: u32| p.age = v)
        .field("Extra", |p: &mut Person, v: String| p.extra = v);

    let mut reader = CsvReader::from_reader("Name,Age\nAnn,30\n".as_bytes());
    let people = reader.get_records_with(&schema).unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Ann");
    assert_eq!(people[0].age, 30);
    assert_eq!(people[0].extra, "");
}

#[test]
fn test_property_mapping_policies() {
    // No Boss or Notes columns
    let input = "Id,Name,Health,Speed\n4,Wolf,12,3.0\n";

    let mut reader = CsvReader::from_reader(input.as_bytes());
    let enemies: Vec<Enemy> = reader.get_records().unwrap();
    assert_eq!(enemies[0].name, "Wolf");
    assert!(!enemies[0].boss);
    assert_eq!(enemies[0].notes, None);

    let config = CsvConfiguration::default().with_ignore_missing_columns(false);
    let mut strict = CsvReader::new(input.as_bytes(), config.clone()).unwrap();
    assert!(matches!(
        strict.get_records::<Enemy>(),
        Err(ByteForgeError::PropertyMapping { ref column, .. }) if column == "Boss"
    ));

    let tolerant = config.with_throw_on_property_mapping_failure(false);
    let mut reader = CsvReader::new(input.as_bytes(), tolerant).unwrap();
    let enemies: Vec<Enemy> = reader.get_records().unwrap();
    assert_eq!(enemies[0].health, 12);
    assert_eq!(enemies[0].notes, None);

    // Short records still follow the mapping policy
    let mut short = CsvReader::from_reader("Id,Name,Health,Speed\n4,Wolf\n".as_bytes());
    assert!(matches!(
        short.get_records::<Enemy>(),
        Err(ByteForgeError::PropertyMapping { ref column, .. }) if column == "HEALTH"
    ));
}

#[test]
fn test_unmapped_columns_are_dropped_by_default() {
    let input = "Id,Name,Health,Speed,Boss,Notes,Loot\n5,Bat,4,6.5,false,,Wing\n";

    let mut reader = CsvReader::from_reader(input.as_bytes());
    let enemies: Vec<Enemy> = reader.get_records().unwrap();
    assert_eq!(enemies[0].name, "Bat");

    let config = CsvConfiguration::default().with_ignore_unmapped_columns(false);
    let mut strict = CsvReader::new(input.as_bytes(), config).unwrap();
    assert!(matches!(
        strict.get_records::<Enemy>(),
        Err(ByteForgeError::PropertyMapping { ref column, .. }) if column == "Loot"
    ));
}

#[test]
fn test_mapped_records_are_lazy() {
    let input = "Id,Name\n1,A\n2,B\n3,C\n";
    let schema = RecordSchema::new()
        .field("Id", |e: &mut Enemy, v: u32| e.id = v)
        .field("Name", |e: &mut Enemy, v: String| e.name = v);

    let mut reader = CsvReader::from_reader(input.as_bytes());
    let first_two: Vec<Enemy> = reader
        .mapped_records(&schema)
        .unwrap()
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first_two.len(), 2);
    assert_eq!(reader.record_count(), 2);

    assert!(reader.read().unwrap());
    assert_eq!(reader.get_field_by_name("name").unwrap(), "C");
}

#[test]
fn test_lenient_preset_survives_malformed_table() {
    let input = "Id,Name,Id,Health\nx,Ghost,9,\n2,Imp\n";
    let mut reader = CsvReader::new(input.as_bytes(), CsvConfiguration::lenient()).unwrap();
    let enemies: Vec<Enemy> = reader.get_records().unwrap();

    assert_eq!(enemies.len(), 2);
    assert_eq!(enemies[0].id, 0);
    assert_eq!(enemies[0].name, "Ghost");
    assert_eq!(enemies[1].id, 2);
    assert_eq!(enemies[1].health, 0);
}
