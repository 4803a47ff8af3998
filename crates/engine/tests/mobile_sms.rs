use std::collections::HashMap;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement, Value};

use engine::{
    Actor, ContractState, Engine, EngineError, PartnerNew, SdsState, SmsChildData,
    SmsSponsorForm, SponsorshipNew,
};
use migration::MigratorTrait;
use uuid::Uuid;

struct Pool {
    nicaragua: Uuid,
    burkina: Uuid,
    project: Uuid,
    /// NI1, girl of 5 in Nicaragua.
    maria: Uuid,
    /// NI2, boy of 8 in Nicaragua.
    carlos: Uuid,
    /// BF1, girl of 6 in Burkina Faso.
    awa: Uuid,
    /// NI3, sponsored by partner `1234`.
    sponsored: Uuid,
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    exec(
        &db,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    )
    .await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn alice() -> Actor {
    Actor::user("alice")
}

async fn exec(db: &DatabaseConnection, sql: &str, values: Vec<Value>) {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        sql,
        values,
    ))
    .await
    .unwrap();
}

async fn field_office(db: &DatabaseConnection, code: &str, name: &str, available: bool) -> Uuid {
    let id = Uuid::new_v4();
    exec(
        db,
        "INSERT INTO field_offices (id, country_code, name, available_on_childpool) VALUES (?, ?, ?, ?)",
        vec![id.to_string().into(), code.into(), name.into(), available.into()],
    )
    .await;
    id
}

async fn child(
    db: &DatabaseConnection,
    global_id: &str,
    gender: &str,
    age: i32,
    field_office: Uuid,
    project: Option<Uuid>,
    sponsor: Option<Uuid>,
) -> Uuid {
    let id = Uuid::new_v4();
    exec(
        db,
        "INSERT INTO children (id, global_id, name, gender, age, field_office_id, project_id, sponsor_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        vec![
            id.to_string().into(),
            global_id.into(),
            format!("Child {global_id}").into(),
            gender.into(),
            age.into(),
            field_office.to_string().into(),
            project.map(|p| p.to_string()).into(),
            sponsor.map(|s| s.to_string()).into(),
        ],
    )
    .await;
    id
}

async fn seed_pool(engine: &Engine, db: &DatabaseConnection) -> Pool {
    let nicaragua = field_office(db, "NI", "Nicaragua", true).await;
    let burkina = field_office(db, "BF", "Burkina Faso", true).await;
    field_office(db, "XX", "Closed office", false).await;

    let project = Uuid::new_v4();
    exec(
        db,
        "INSERT INTO projects (id, fcp_id, name, city, country) VALUES (?, ?, ?, ?, ?)",
        vec![
            project.to_string().into(),
            "NI0123".into(),
            "Centro de Desarrollo".into(),
            "Managua".into(),
            "Nicaragua".into(),
        ],
    )
    .await;

    let sponsor = PartnerNew {
        reference: Some("1234".to_string()),
        lastname: "Sponsor".to_string(),
        ..Default::default()
    };
    let sponsor = engine.new_partner(sponsor, &alice()).await.unwrap();

    Pool {
        maria: child(db, "NI1", "F", 5, nicaragua, Some(project), None).await,
        carlos: child(db, "NI2", "M", 8, nicaragua, None, None).await,
        awa: child(db, "BF1", "F", 6, burkina, None, None).await,
        sponsored: child(db, "NI3", "M", 9, nicaragua, None, Some(sponsor)).await,
        nicaragua,
        burkina,
        project,
    }
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn app_data_collects_pictures_and_location() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;
    let old = Uuid::new_v4();
    let recent = Uuid::new_v4();
    for (id, url, date) in [
        (old, Some("https://img/old.jpg"), "2020-01-01"),
        (recent, Some("https://img/new.jpg"), "2023-01-01"),
        (Uuid::new_v4(), None, "2024-01-01"),
    ] {
        exec(
            &db,
            "INSERT INTO child_pictures (id, child_id, image_url, date) VALUES (?, ?, ?, ?)",
            vec![
                id.to_string().into(),
                pool.maria.to_string().into(),
                url.into(),
                date.into(),
            ],
        )
        .await;
    }

    let data = engine
        .child_app_data(&[pool.maria, pool.carlos], &alice())
        .await
        .unwrap()
        .unwrap();

    let children: Vec<Uuid> = data.children.iter().map(|c| c.id).collect();
    assert_eq!(children, vec![pool.maria, pool.carlos]);
    let pictures: Vec<Uuid> = data.pictures.iter().map(|p| p.id).collect();
    assert_eq!(pictures, vec![recent, old]);
    assert_eq!(data.project.map(|p| p.id), Some(pool.project));
    assert_eq!(data.child_time.len(), "01/03/2024 08:05:09".len());
}

#[tokio::test]
async fn app_data_without_children_is_empty() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(engine.child_app_data(&[], &alice()).await.unwrap(), None);
}

#[tokio::test]
async fn app_data_requires_a_user() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;

    let res = engine.child_app_data(&[pool.maria], &Actor::Public).await;
    assert!(matches!(res, Err(EngineError::Forbidden(_))));
}

#[tokio::test]
async fn sponsor_children_by_partner_reference() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;

    let children = engine
        .mobile_sponsor_children(&params(&[("userid", "1234")]), &alice())
        .await
        .unwrap();
    let ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![pool.sponsored]);

    let children = engine
        .mobile_sponsor_children(&params(&[("userid", "9999")]), &alice())
        .await
        .unwrap();
    assert!(children.is_empty());

    let res = engine
        .mobile_sponsor_children(&params(&[]), &alice())
        .await;
    assert_eq!(res, Err(EngineError::MissingParameter("userid".to_string())));
}

#[tokio::test]
async fn child_bio_by_global_id() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;

    let child = engine
        .mobile_child_bio(&params(&[("child_global_id", "BF1")]), &alice())
        .await
        .unwrap();
    assert_eq!(child.id, pool.awa);
    assert_eq!(child.age, Some(6));

    let res = engine.mobile_child_bio(&params(&[]), &alice()).await;
    assert_eq!(
        res,
        Err(EngineError::MissingParameter("child_global_id".to_string()))
    );

    let res = engine
        .mobile_child_bio(&params(&[("child_global_id", "ZZ9")]), &alice())
        .await;
    assert!(matches!(res, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn sms_child_data_flags_invalid_and_childless_requests() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.sms_child_data(999, &Actor::Public).await.unwrap(),
        SmsChildData::Invalid
    );

    let id = engine
        .new_sms_request("+41791234567", None, None, &alice())
        .await
        .unwrap();
    assert_eq!(
        engine.sms_child_data(id, &Actor::Public).await.unwrap(),
        SmsChildData::NoChild
    );
}

#[tokio::test]
async fn sms_child_data_lists_available_countries() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;
    let id = engine
        .new_sms_request("+41791234567", Some(pool.maria), None, &alice())
        .await
        .unwrap();

    let SmsChildData::Child {
        child,
        field_office,
        countries,
        partner,
    } = engine.sms_child_data(id, &Actor::Public).await.unwrap()
    else {
        panic!("expected child data");
    };
    assert_eq!(child.id, pool.maria);
    assert_eq!(field_office.map(|fo| fo.id), Some(pool.nicaragua));
    let names: Vec<&str> = countries.iter().map(|fo| fo.name.as_str()).collect();
    assert_eq!(names, vec!["Burkina Faso", "Nicaragua"]);
    assert_eq!(partner, None);
}

#[tokio::test]
async fn sms_request_registration_requires_a_user() {
    let (engine, _db) = engine_with_db().await;

    let res = engine
        .new_sms_request("+41791234567", None, None, &Actor::Public)
        .await;
    assert!(matches!(res, Err(EngineError::Forbidden(_))));
}

#[tokio::test]
async fn confirmation_creates_sponsor_and_sponsorship() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;
    let id = engine
        .new_sms_request("+41791234567", Some(pool.maria), None, &alice())
        .await
        .unwrap();
    let form = SmsSponsorForm {
        firstname: Some("Ana".to_string()),
        lastname: "Muster".to_string(),
        email: Some("ana@example.org".to_string()),
    };

    let sponsorship_id = engine
        .confirm_sms_sponsorship(id, form.clone(), &Actor::Public)
        .await
        .unwrap();

    let (sponsorship, partner) = engine
        .sms_sponsorship_form(sponsorship_id, &Actor::Public)
        .await
        .unwrap();
    assert_eq!(sponsorship.child_id, Some(pool.maria));
    assert_eq!(sponsorship.kind, "S");
    assert_eq!(sponsorship.state, ContractState::Draft);
    assert_eq!(sponsorship.sds_state, SdsState::Draft);
    assert_eq!(sponsorship.sds_uid, None);
    assert_eq!(partner.phone.as_deref(), Some("+41791234567"));
    assert_eq!(partner.lastname, "Muster");

    let request = engine.sms_request(id, &alice()).await.unwrap();
    assert!(request.sponsorship_confirmed);
    assert_eq!(request.partner_id, Some(partner.id));
    assert_eq!(request.sponsorship_id, Some(sponsorship_id));

    assert_eq!(
        engine.sms_child_data(id, &Actor::Public).await.unwrap(),
        SmsChildData::Confirmed
    );
    let res = engine
        .confirm_sms_sponsorship(id, form, &Actor::Public)
        .await;
    assert!(matches!(res, Err(EngineError::InvalidState(_))));
}

#[tokio::test]
async fn confirmation_reuses_known_partner() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;
    let known = PartnerNew {
        lastname: "Known".to_string(),
        ..Default::default()
    };
    let known = engine.new_partner(known, &alice()).await.unwrap();
    let id = engine
        .new_sms_request("+41791234567", Some(pool.carlos), Some(known), &alice())
        .await
        .unwrap();

    let sponsorship_id = engine
        .confirm_sms_sponsorship(id, SmsSponsorForm::default(), &Actor::Public)
        .await
        .unwrap();

    let sponsorship = engine.sponsorship(sponsorship_id, &alice()).await.unwrap();
    assert_eq!(sponsorship.partner_id, known);
}

#[tokio::test]
async fn confirmation_needs_a_child() {
    let (engine, _db) = engine_with_db().await;
    let id = engine
        .new_sms_request("+41791234567", None, None, &alice())
        .await
        .unwrap();
    let form = SmsSponsorForm {
        lastname: "Muster".to_string(),
        ..Default::default()
    };

    let res = engine
        .confirm_sms_sponsorship(id, form, &Actor::Public)
        .await;
    assert!(matches!(res, Err(EngineError::InvalidState(_))));
}

#[tokio::test]
async fn change_child_follows_preferences() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;
    let id = engine
        .new_sms_request("+41791234567", Some(pool.maria), None, &alice())
        .await
        .unwrap();

    let child = engine
        .change_sms_child(id, "F", "5-7", "BF", &Actor::Public)
        .await
        .unwrap();
    assert_eq!(child, Some(pool.awa));
    let request = engine.sms_request(id, &alice()).await.unwrap();
    assert_eq!(request.child_id, Some(pool.awa));
    assert_eq!(request.preferences.gender.as_deref(), Some("F"));
    assert_eq!(request.preferences.min_age, Some(5));
    assert_eq!(request.preferences.max_age, Some(7));
    assert_eq!(request.preferences.field_office_id, Some(pool.burkina));

    let child = engine
        .change_sms_child(id, "M", "", "", &Actor::Public)
        .await
        .unwrap();
    assert_eq!(child, Some(pool.carlos));
    let request = engine.sms_request(id, &alice()).await.unwrap();
    assert_eq!(request.preferences.min_age, None);
    assert_eq!(request.preferences.field_office_id, None);
}

#[tokio::test]
async fn change_child_skips_children_reserved_elsewhere() {
    let (engine, db) = engine_with_db().await;
    let pool = seed_pool(&engine, &db).await;
    engine
        .new_sms_request("+41790000000", Some(pool.carlos), None, &alice())
        .await
        .unwrap();
    let id = engine
        .new_sms_request("+41791234567", Some(pool.maria), None, &alice())
        .await
        .unwrap();

    let child = engine
        .change_sms_child(id, "M", "", "NI", &Actor::Public)
        .await
        .unwrap();
    assert_eq!(child, None);
    let request = engine.sms_request(id, &alice()).await.unwrap();
    assert_eq!(request.child_id, None);
}

#[tokio::test]
async fn change_child_rejects_bad_age_range() {
    let (engine, _db) = engine_with_db().await;
    let id = engine
        .new_sms_request("+41791234567", None, None, &alice())
        .await
        .unwrap();

    let res = engine
        .change_sms_child(id, "", "ten", "", &Actor::Public)
        .await;
    assert!(matches!(res, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn registration_form_only_exposes_sms_sponsorships() {
    let (engine, _db) = engine_with_db().await;
    let partner = PartnerNew {
        lastname: "Office".to_string(),
        ..Default::default()
    };
    let partner = engine.new_partner(partner, &alice()).await.unwrap();
    let cmd = SponsorshipNew {
        partner_id: partner,
        kind: "O".to_string(),
        ..Default::default()
    };
    let sponsorship = engine.create_sponsorship(cmd, &alice()).await.unwrap();

    let res = engine
        .sms_sponsorship_form(sponsorship, &Actor::Public)
        .await;
    assert!(matches!(res, Err(EngineError::KeyNotFound(_))));
}
