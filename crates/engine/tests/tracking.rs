use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Actor, ContractState, Engine, EngineError, PartnerNew, SdsState, SponsorshipNew,
    SponsorshipUpdate, color,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
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

async fn new_partner(engine: &Engine, lastname: &str, lang: Option<&str>) -> Uuid {
    let cmd = PartnerNew {
        lastname: lastname.to_string(),
        lang: lang.map(ToString::to_string),
        ..Default::default()
    };
    engine.new_partner(cmd, &alice()).await.unwrap()
}

async fn new_sponsorship(
    engine: &Engine,
    partner_id: Uuid,
    kind: &str,
    parent_id: Option<Uuid>,
) -> Uuid {
    let cmd = SponsorshipNew {
        partner_id,
        kind: kind.to_string(),
        parent_id,
        ..Default::default()
    };
    engine.create_sponsorship(cmd, &alice()).await.unwrap()
}

async fn set_sds_state(engine: &Engine, id: Uuid, state: SdsState) {
    engine
        .update_sponsorship(id, SponsorshipUpdate::sds_state(state), &alice())
        .await
        .unwrap();
}

async fn sds(engine: &Engine, id: Uuid) -> (SdsState, i32) {
    let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
    (sponsorship.sds_state, sponsorship.color)
}

#[tokio::test]
async fn new_sponsorship_defaults() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let id = new_sponsorship(&engine, partner, "O", None).await;

    let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
    assert_eq!(sponsorship.state, ContractState::Draft);
    assert_eq!(sponsorship.sds_state, SdsState::Draft);
    assert_eq!(sponsorship.correspondent_id, partner);
    assert_eq!(sponsorship.sds_uid.as_deref(), Some("alice"));
    assert_eq!(sponsorship.color, color::DEFAULT);
}

#[tokio::test]
async fn public_actor_cannot_create_sponsorships() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let cmd = SponsorshipNew {
        partner_id: partner,
        kind: "O".to_string(),
        ..Default::default()
    };

    let res = engine.create_sponsorship(cmd, &Actor::Public).await;
    assert!(matches!(res, Err(EngineError::Forbidden(_))));
}

#[tokio::test]
async fn substitute_promotes_waiting_parent() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::SubWaiting).await;

    new_sponsorship(&engine, partner, "S", Some(parent)).await;

    assert_eq!(sds(&engine, parent).await, (SdsState::Sub, color::PENDING));
    let parent = engine.sponsorship(parent, &alice()).await.unwrap();
    assert_eq!(parent.sds_state_date, Some(Utc::now().date_naive()));
}

#[tokio::test]
async fn parent_not_waiting_is_left_alone() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::Active).await;

    new_sponsorship(&engine, partner, "S", Some(parent)).await;

    assert_eq!(sds(&engine, parent).await, (SdsState::Active, color::DEFAULT));
}

#[tokio::test]
async fn validated_substitute_keeps_its_parent() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    let other = new_sponsorship(&engine, partner, "O", None).await;
    let sub = new_sponsorship(&engine, partner, "S", Some(parent)).await;

    // Still draft: the parent can move.
    let update = SponsorshipUpdate {
        parent_id: Some(Some(other)),
        ..Default::default()
    };
    let sponsorship = engine
        .update_sponsorship(sub, update, &alice())
        .await
        .unwrap();
    assert_eq!(sponsorship.parent_id, Some(other));

    engine.contract_waiting(&[sub], &alice()).await.unwrap();

    let update = SponsorshipUpdate {
        parent_id: Some(None),
        ..Default::default()
    };
    let res = engine.update_sponsorship(sub, update, &alice()).await;
    assert_eq!(
        res,
        Err(EngineError::Validation(
            "You cannot change the sub sponsorship.".to_string()
        ))
    );
    let sponsorship = engine.sponsorship(sub, &alice()).await.unwrap();
    assert_eq!(sponsorship.parent_id, Some(other));
}

#[tokio::test]
async fn validated_substitute_promotes_new_waiting_parent() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::SubWaiting).await;
    let sub = new_sponsorship(&engine, partner, "S", None).await;
    engine.contract_waiting(&[sub], &alice()).await.unwrap();

    let update = SponsorshipUpdate {
        parent_id: Some(Some(parent)),
        ..Default::default()
    };
    let sponsorship = engine
        .update_sponsorship(sub, update, &alice())
        .await
        .unwrap();

    assert_eq!(sponsorship.parent_id, Some(parent));
    assert_eq!(sds(&engine, parent).await, (SdsState::Sub, color::PENDING));
    let parent = engine.sponsorship(parent, &alice()).await.unwrap();
    assert_eq!(parent.sds_state_date, Some(Utc::now().date_naive()));
}

#[tokio::test]
async fn rejected_parent_change_leaves_target_waiting() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    let target = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, target, SdsState::SubWaiting).await;
    let before = sds(&engine, target).await;
    assert_eq!(before, (SdsState::SubWaiting, color::DEFAULT));
    let sub = new_sponsorship(&engine, partner, "S", Some(parent)).await;
    engine.contract_waiting(&[sub], &alice()).await.unwrap();

    let update = SponsorshipUpdate {
        parent_id: Some(Some(target)),
        ..Default::default()
    };
    let res = engine.update_sponsorship(sub, update, &alice()).await;
    assert!(matches!(res, Err(EngineError::Validation(_))));

    assert_eq!(sds(&engine, target).await, before);
    let sponsorship = engine.sponsorship(sub, &alice()).await.unwrap();
    assert_eq!(sponsorship.parent_id, Some(parent));
}

#[tokio::test]
async fn waiting_activates_draft_sds() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let draft = new_sponsorship(&engine, partner, "O", None).await;
    let followed = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, followed, SdsState::NoSub).await;

    engine
        .contract_waiting(&[draft, followed], &alice())
        .await
        .unwrap();

    let draft = engine.sponsorship(draft, &alice()).await.unwrap();
    assert_eq!(draft.state, ContractState::Waiting);
    assert_eq!(draft.sds_state, SdsState::Active);
    assert_eq!(draft.sds_state_date, Some(Utc::now().date_naive()));
    assert_eq!(sds(&engine, followed).await.0, SdsState::NoSub);
}

#[tokio::test]
async fn activation_turns_pending_parent_green() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::SubWaiting).await;
    let sub = new_sponsorship(&engine, partner, "S", Some(parent)).await;

    engine.contract_active(&[sub], &alice()).await.unwrap();

    let sub = engine.sponsorship(sub, &alice()).await.unwrap();
    assert_eq!(sub.state, ContractState::Active);
    assert_eq!(sds(&engine, parent).await, (SdsState::Sub, color::ACCEPTED));
}

#[tokio::test]
async fn child_departure_waits_for_substitute() {
    let (engine, _db) = engine_with_db().await;
    engine
        .set_sds_follower("fr", "bob", &alice())
        .await
        .unwrap();
    let partner = new_partner(&engine, "Sponsor", Some("fr_CH")).await;
    let id = new_sponsorship(&engine, partner, "O", None).await;

    engine
        .contract_terminated(&[id], Some("1"), &alice())
        .await
        .unwrap();

    let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
    assert_eq!(sponsorship.state, ContractState::Terminated);
    assert_eq!(sponsorship.end_reason.as_deref(), Some("1"));
    assert_eq!(sponsorship.sds_state, SdsState::SubWaiting);
    assert_eq!(sponsorship.color, color::WAITING);
    assert_eq!(sponsorship.sds_uid.as_deref(), Some("bob"));
    assert_eq!(sponsorship.sds_state_date, Some(Utc::now().date_naive()));

    let followed = engine
        .followed_sub_waiting(&Actor::user("bob"))
        .await
        .unwrap();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].id, id);
}

#[tokio::test]
async fn departure_without_follower_keeps_the_user() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", Some("de_CH")).await;
    let id = new_sponsorship(&engine, partner, "O", None).await;

    engine
        .contract_terminated(&[id], Some("1"), &alice())
        .await
        .unwrap();

    let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
    assert_eq!(sponsorship.sds_state, SdsState::SubWaiting);
    assert_eq!(sponsorship.sds_uid.as_deref(), Some("alice"));
}

#[tokio::test]
async fn departure_of_substitute_accepts_parent_offer() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::SubWaiting).await;
    let sub = new_sponsorship(&engine, partner, "S", Some(parent)).await;

    engine
        .contract_terminated(&[sub], Some("1"), &alice())
        .await
        .unwrap();

    assert_eq!(sds(&engine, parent).await, (SdsState::SubAccept, color::ACCEPTED));
    assert_eq!(sds(&engine, sub).await, (SdsState::SubWaiting, color::WAITING));
}

#[tokio::test]
async fn other_end_reason_rejects_parent_offer() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::SubWaiting).await;
    let sub = new_sponsorship(&engine, partner, "S", Some(parent)).await;

    engine
        .contract_cancelled(&[sub], Some("25"), &alice())
        .await
        .unwrap();

    assert_eq!(sds(&engine, parent).await, (SdsState::SubReject, color::PENDING));
    assert_eq!(sds(&engine, sub).await, (SdsState::Cancelled, color::CANCELLED));
    let sub = engine.sponsorship(sub, &alice()).await.unwrap();
    assert_eq!(sub.state, ContractState::Cancelled);
}

#[tokio::test]
async fn child_exchange_keeps_parent_offer() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let parent = new_sponsorship(&engine, partner, "O", None).await;
    set_sds_state(&engine, parent, SdsState::SubWaiting).await;
    let sub = new_sponsorship(&engine, partner, "S", Some(parent)).await;

    engine
        .contract_terminated(&[sub], Some("11"), &alice())
        .await
        .unwrap();

    assert_eq!(sds(&engine, parent).await, (SdsState::Sub, color::PENDING));
    assert_eq!(sds(&engine, sub).await, (SdsState::Cancelled, color::CANCELLED));
}

#[tokio::test]
async fn no_sub_is_kept_on_termination() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let id = new_sponsorship(&engine, partner, "O", None).await;

    engine
        .mark_no_sub(&[id], Some("sponsor declined"), &alice())
        .await
        .unwrap();
    engine
        .contract_terminated(&[id], Some("1"), &alice())
        .await
        .unwrap();

    let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
    assert_eq!(sponsorship.state, ContractState::Terminated);
    assert_eq!(sponsorship.sds_state, SdsState::NoSub);
    assert_eq!(sponsorship.no_sub_reason.as_deref(), Some("sponsor declined"));
    assert_eq!(sponsorship.sds_state_date, Some(Utc::now().date_naive()));
}

#[tokio::test]
async fn check_sub_state_follows_the_substitute() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let accepted = new_sponsorship(&engine, partner, "O", None).await;
    let rejected = new_sponsorship(&engine, partner, "O", None).await;
    let sub = new_sponsorship(&engine, partner, "S", None).await;
    engine.contract_active(&[sub], &alice()).await.unwrap();

    let update = SponsorshipUpdate {
        sub_sponsorship_id: Some(Some(sub)),
        ..Default::default()
    };
    engine
        .update_sponsorship(accepted, update, &alice())
        .await
        .unwrap();
    engine.mark_sub(&[accepted, rejected], &alice()).await.unwrap();

    engine
        .check_sub_state(&[accepted, rejected], &alice())
        .await
        .unwrap();

    assert_eq!(sds(&engine, accepted).await.0, SdsState::SubAccept);
    assert_eq!(sds(&engine, rejected).await.0, SdsState::SubReject);
    for id in [accepted, rejected] {
        let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
        assert_eq!(sponsorship.sds_state_date, Some(Utc::now().date_naive()));
    }
}

#[tokio::test]
async fn batch_aborts_on_unknown_sponsorship() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    let id = new_sponsorship(&engine, partner, "O", None).await;

    let res = engine
        .contract_waiting(&[id, Uuid::new_v4()], &alice())
        .await;
    assert!(matches!(res, Err(EngineError::KeyNotFound(_))));

    let sponsorship = engine.sponsorship(id, &alice()).await.unwrap();
    assert_eq!(sponsorship.state, ContractState::Draft);
    assert_eq!(sponsorship.sds_state, SdsState::Draft);
}

#[tokio::test]
async fn resolver_skips_parents_already_substituted() {
    let (engine, _db) = engine_with_db().await;
    let correspondent = new_partner(&engine, "Correspondent", None).await;
    let first = new_sponsorship(&engine, correspondent, "O", None).await;
    let second = new_sponsorship(&engine, correspondent, "O", None).await;
    set_sds_state(&engine, first, SdsState::SubWaiting).await;
    set_sds_state(&engine, second, SdsState::SubWaiting).await;

    let suggested = engine
        .suggest_parent(correspondent, &alice())
        .await
        .unwrap()
        .unwrap();
    assert!(suggested == first || suggested == second);
    new_sponsorship(&engine, correspondent, "S", Some(suggested)).await;

    let remaining = if suggested == first { second } else { first };
    assert_eq!(
        engine.suggest_parent(correspondent, &alice()).await.unwrap(),
        Some(remaining)
    );
    new_sponsorship(&engine, correspondent, "S", Some(remaining)).await;

    // Both parents moved to `sub` and have a child.
    assert_eq!(
        engine.suggest_parent(correspondent, &alice()).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn new_correspondent_links_draft_substitute() {
    let (engine, _db) = engine_with_db().await;
    let origin = engine.new_origin("Substitute", "sub", &alice()).await.unwrap();
    let sponsor = new_partner(&engine, "Sponsor", None).await;
    let correspondent = new_partner(&engine, "Correspondent", None).await;
    let waiting = new_sponsorship(&engine, correspondent, "O", None).await;
    set_sds_state(&engine, waiting, SdsState::SubWaiting).await;
    let sub = new_sponsorship(&engine, sponsor, "SC", None).await;

    let sponsorship = engine
        .change_correspondent(sub, correspondent, &alice())
        .await
        .unwrap();

    assert_eq!(sponsorship.correspondent_id, correspondent);
    assert_eq!(sponsorship.parent_id, Some(waiting));
    assert_eq!(sponsorship.origin_id, Some(origin));
    assert_eq!(sds(&engine, waiting).await, (SdsState::Sub, color::PENDING));
}

#[tokio::test]
async fn new_correspondent_of_regular_sponsorship_links_nothing() {
    let (engine, _db) = engine_with_db().await;
    let sponsor = new_partner(&engine, "Sponsor", None).await;
    let correspondent = new_partner(&engine, "Correspondent", None).await;
    let waiting = new_sponsorship(&engine, correspondent, "O", None).await;
    set_sds_state(&engine, waiting, SdsState::SubWaiting).await;
    let regular = new_sponsorship(&engine, sponsor, "O", None).await;

    let sponsorship = engine
        .change_correspondent(regular, correspondent, &alice())
        .await
        .unwrap();

    assert_eq!(sponsorship.parent_id, None);
    assert_eq!(sds(&engine, waiting).await.0, SdsState::SubWaiting);
}

#[tokio::test]
async fn sds_groups_count_displayed_states() {
    let (engine, _db) = engine_with_db().await;
    let partner = new_partner(&engine, "Sponsor", None).await;
    new_sponsorship(&engine, partner, "O", None).await;
    for state in [SdsState::Active, SdsState::Active, SdsState::SubWaiting, SdsState::NoSub] {
        let id = new_sponsorship(&engine, partner, "O", None).await;
        set_sds_state(&engine, id, state).await;
    }

    let groups = engine.sds_groups(&alice()).await.unwrap();
    let summary: Vec<(SdsState, u64, bool)> = groups
        .iter()
        .map(|g| (g.state, g.count, g.folded))
        .collect();
    assert_eq!(
        summary,
        vec![
            (SdsState::Active, 2, true),
            (SdsState::SubWaiting, 1, false),
            (SdsState::NoSub, 1, false),
        ]
    );
}
