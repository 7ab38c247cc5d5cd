use anyhow::Result;
use chrono::{TimeZone, Utc};
use council_roles::legistar::{person_name, roles_from_person, LegistarCache, LegistarDump, LegistarLookup};
use council_roles::{RoleOrigin, RoleSanitizer, RoleTitle, RosterError, SanitizeOptions, StaticData};
use std::io::Write;
use tempfile::NamedTempFile;

const STATIC_FILE: &str = r#"{
    "seats": {
        "Position 3": {"name": "Position 3", "electoral_area": "District 3", "electoral_type": "district"}
    },
    "primary_bodies": {
        "City Council": {"name": "City Council", "external_source_id": "138"},
        "Council Briefing": {"name": "Council Briefing"}
    },
    "persons": {
        "Ada Lovelace": {
            "name": "Ada Lovelace",
            "is_active": true,
            "seat": "Position 3",
            "roles": [
                {"title": "Councilmember", "body": "City Council",
                 "start_datetime": "2016-01-01T00:00:00", "end_datetime": "2023-12-31T00:00:00"},
                {"title": "Council President", "body": "City Council",
                 "start_datetime": "2020-01-01T00:00:00", "end_datetime": "2021-12-31T00:00:00"},
                {"title": "Chairman", "body": "City Council",
                 "start_datetime": "2020-01-01T00:00:00", "end_datetime": "2021-12-31T00:00:00"}
            ]
        }
    }
}"#;

const LEGISTAR_EXPORT: &str = r#"{
    "bodies": [
        {"BodyId": 138, "BodyName": "City Council", "BodyActiveFlag": 1},
        {"BodyId": 202, "BodyName": "Public Safety Committee", "BodyActiveFlag": 1}
    ],
    "persons": [
        {"PersonId": 7, "PersonFullName": "Ada Lovelace"},
        {"PersonId": 8, "PersonFullName": "Grace Hopper"}
    ],
    "office_records": {
        "7": [
            {"OfficeRecordId": 70, "OfficeRecordBodyId": 138, "OfficeRecordTitle": "Councilmember",
             "OfficeRecordStartDate": "2016-01-01T00:00:00", "OfficeRecordEndDate": "2019-12-31T00:00:00"},
            {"OfficeRecordId": 71, "OfficeRecordBodyId": 202, "OfficeRecordTitle": "Vice Chair",
             "OfficeRecordStartDate": "2020-01-01T00:00:00", "OfficeRecordEndDate": "2021-12-31T00:00:00"}
        ],
        "8": [
            {"OfficeRecordId": 80, "OfficeRecordBodyId": 138, "OfficeRecordTitle": "Councilmember",
             "OfficeRecordStartDate": "2018-01-01T00:00:00", "OfficeRecordEndDate": "2022-12-31T00:00:00"},
            {"OfficeRecordId": 81, "OfficeRecordBodyId": 138, "OfficeRecordTitle": "Council President",
             "OfficeRecordStartDate": "2020-01-01T00:00:00", "OfficeRecordEndDate": "2021-12-31T00:00:00"},
            {"OfficeRecordId": 82, "OfficeRecordBodyId": 138, "OfficeRecordTitle": "Councilmember",
             "OfficeRecordStartDate": "2021-01-01T00:00:00", "OfficeRecordEndDate": "2024-12-31T00:00:00"}
        ]
    }
}"#;

fn write_temp(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_static_file_from_disk() -> Result<()> {
    let file = write_temp(STATIC_FILE)?;
    let data = StaticData::load(file.path())?;

    assert_eq!(data.primary_body_names(), vec!["city council", "council briefing"]);
    let seat = data.persons["Ada Lovelace"].seat.as_ref().unwrap();
    assert_eq!(seat.electoral_area.as_deref(), Some("District 3"));

    // "Chairman" is not a canonical title and is skipped
    let roles = data.person_roles("Ada Lovelace");
    assert_eq!(roles.len(), 2);
    assert!(roles.iter().all(|r| r.origin == RoleOrigin::Static));
    assert_eq!(roles[1].title, RoleTitle::CouncilPresident);
    Ok(())
}

#[test]
fn test_missing_static_file_is_an_error() {
    let result = StaticData::load("/nonexistent/static.json");
    assert!(matches!(result, Err(RosterError::StaticData(_))));
}

#[test]
fn test_malformed_static_file_is_an_error() -> Result<()> {
    let file = write_temp("{ not json")?;
    assert!(matches!(StaticData::load(file.path()), Err(RosterError::Json(_))));
    Ok(())
}

#[test]
fn test_legistar_export_through_sanitizer() -> Result<()> {
    let static_file = write_temp(STATIC_FILE)?;
    let data = StaticData::load(static_file.path())?;
    let dump = LegistarDump::from_json_str(LEGISTAR_EXPORT)?;
    let sanitizer = RoleSanitizer::new(&SanitizeOptions::default());
    let now = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();

    let mut cache = LegistarCache::new();
    let mut lookup = LegistarLookup::new(&dump, &mut cache);

    let ada = lookup.get_person(7)?.unwrap();
    let ada_roles = sanitizer.sanitize(&person_name(&ada).unwrap(), &roles_from_person(&ada), Some(&data), now);
    // scraped council term replaced by static ones, committee role kept
    assert_eq!(ada_roles.len(), 3);
    assert_eq!(ada_roles[0].title, RoleTitle::ViceChair);
    assert_eq!(ada_roles[0].origin, RoleOrigin::Scraped);
    assert!(ada_roles[1..].iter().all(|r| r.origin == RoleOrigin::Static));

    // Grace has no static roles: only current terms survive, then overlaps are cut
    let grace = lookup.get_person(8)?.unwrap();
    let grace_roles = sanitizer.sanitize(&person_name(&grace).unwrap(), &roles_from_person(&grace), Some(&data), now);
    assert_eq!(grace_roles.len(), 3);
    assert_eq!(grace_roles[0].title, RoleTitle::Councilmember);
    assert_eq!(grace_roles[0].end_datetime, Utc.with_ymd_and_hms(2019, 12, 31, 0, 0, 0).unwrap());
    assert_eq!(grace_roles[1].title, RoleTitle::CouncilPresident);
    assert_eq!(grace_roles[1].end_datetime, Utc.with_ymd_and_hms(2020, 12, 31, 0, 0, 0).unwrap());
    assert_eq!(grace_roles[2].end_datetime, Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap());
    Ok(())
}
