//! Short reads, updates, and cross-cutting runtime behavior

mod common;

use common::*;
use kindred::queries::short::*;
use kindred::queries::updates::*;
use kindred::{Fixtures, KindredDb, PropertyMap, QueryError, ReadMode, RuntimeConfig, VertexId};

fn db() -> KindredDb<kindred::MemoryStore> {
    KindredDb::new(sample_graph(), RuntimeConfig::default())
}

// -- short reads ------------------------------------------------------------

#[test]
fn s1_returns_profile_with_city() {
    let db = db();
    let profile = db.s1(&S1Params { person_id: ALICE }).unwrap();
    assert_eq!(profile.first_name, "Alice");
    assert_eq!(profile.last_name, "Archer");
    assert_eq!(profile.city_id, OSLO);
}

#[test]
fn s1_unknown_person_is_an_error() {
    let db = db();
    let err = db.s1(&S1Params { person_id: 404 }).unwrap_err();
    assert!(matches!(err, QueryError::MissingVertex(_)));
}

#[test]
fn s2_resolves_original_posts_through_reply_chains() {
    let db = db();
    let rows = db.s2(&S2Params { person_id: ANNA_ADAMS, limit: 10 }).unwrap();

    assert_eq!(rows.len(), 2);
    // The reply is newer than the image post.
    assert_eq!(rows[0].message_id, REPLY_BY_ADAMS);
    assert_eq!(rows[0].original_post_id, POST_BY_BOB);
    assert_eq!(rows[0].original_post_author_id, BOB);
    assert_eq!(rows[0].author_first_name, "Bob");
    // A post is its own original.
    assert_eq!(rows[1].message_id, POST_BY_ADAMS);
    assert_eq!(rows[1].original_post_id, POST_BY_ADAMS);
    assert_eq!(rows[1].original_post_author_id, ANNA_ADAMS);
    assert_eq!(rows[1].content, "photo.jpg");
}

#[test]
fn s3_orders_friends_by_friendship_date() {
    let db = db();
    let rows = db.s3(&S3Params { person_id: ALICE }).unwrap();
    let ids: Vec<u64> = rows.iter().map(|r| r.person_id).collect();
    assert_eq!(ids, vec![BOB, ANNA_BELL]);
    assert_eq!(rows[0].friendship_creation_date, 3_000);
    assert_eq!(rows[1].friendship_creation_date, 2_000);
}

#[test]
fn s4_applies_image_fallback() {
    let db = db();
    let text = db.s4(&S4Params { message_id: POST_BY_BOB }).unwrap();
    assert_eq!(text.content, "hello world");
    assert_eq!(text.creation_date, 10_000);

    let image = db.s4(&S4Params { message_id: POST_BY_ADAMS }).unwrap();
    assert_eq!(image.content, "photo.jpg");
}

#[test]
fn s4_unknown_message_is_an_error() {
    let db = db();
    let err = db.s4(&S4Params { message_id: 9_999 }).unwrap_err();
    assert!(matches!(err, QueryError::MissingVertex(_)));
}

#[test]
fn s5_finds_message_creator() {
    let db = db();
    let creator = db.s5(&S5Params { message_id: REPLY_BY_ADAMS }).unwrap();
    assert_eq!(creator.person_id, ANNA_ADAMS);
    assert_eq!(creator.first_name, "Anna");
    assert_eq!(creator.last_name, "Adams");
}

#[test]
fn s6_walks_reply_chain_to_forum() {
    let db = db();
    // Two levels of replies above the containing post.
    let result = db.s6(&S6Params { message_id: REPLY_BY_ALICE }).unwrap();
    assert_eq!(result.forum_id, FORUM);
    assert_eq!(result.forum_title, "Rust Forum");
    assert_eq!(result.moderator_id, BOB);
    assert_eq!(result.moderator_first_name, "Bob");
}

#[test]
fn s6_rejects_cyclic_reply_chains() {
    let db = db();
    let a = VertexId::comment(900);
    let b = VertexId::comment(901);
    db.store().seed_vertex(a, PropertyMap::new());
    db.store().seed_vertex(b, PropertyMap::new());
    db.store().seed_edge(a, "replyOf", b, PropertyMap::new());
    db.store().seed_edge(b, "replyOf", a, PropertyMap::new());

    let err = db.s6(&S6Params { message_id: 900 }).unwrap_err();
    assert!(matches!(err, QueryError::TraversalDepthExceeded { .. }));
}

#[test]
fn s7_lists_replies_with_knows_flag() {
    let db = db();
    let rows = db.s7(&S7Params { message_id: POST_BY_BOB }).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].comment_id, REPLY_BY_BELL);
    assert_eq!(rows[1].comment_id, REPLY_BY_ADAMS);
    // Anna Adams knows Bob; Anna Bell does not.
    assert!(!rows[0].knows_original_author);
    assert!(rows[1].knows_original_author);
}

// -- updates ----------------------------------------------------------------

#[test]
fn u8_then_s3_lists_the_new_friend_in_order() {
    let db = db();
    db.u8(&U8Params { person1_id: ALICE, person2_id: CAROL, creation_date: 9_999 }).unwrap();

    let rows = db.s3(&S3Params { person_id: ALICE }).unwrap();
    let ids: Vec<u64> = rows.iter().map(|r| r.person_id).collect();
    assert_eq!(ids, vec![CAROL, BOB, ANNA_BELL]);
    assert_eq!(rows[0].friendship_creation_date, 9_999);

    // Undirected: the reverse direction is visible too.
    let reverse = db.s3(&S3Params { person_id: CAROL }).unwrap();
    assert!(reverse.iter().any(|r| r.person_id == ALICE));
}

#[test]
fn u1_then_s1_round_trip() {
    let db = db();
    db.u1(&U1Params {
        person_id: 7,
        first_name: "Erik".to_string(),
        last_name: "Eng".to_string(),
        gender: "male".to_string(),
        birthday: date_ms(1992, 7, 7),
        creation_date: 50_000,
        location_ip: "10.0.0.7".to_string(),
        browser_used: "Safari".to_string(),
        city_id: BERGEN,
        languages: vec!["no".to_string()],
        emails: vec!["erik@example.org".to_string()],
        tag_ids: vec![TAG_RUST],
        universities: vec![OrganisationMembership { organisation_id: UNI_OSLO, year: 2012 }],
        companies: vec![],
    })
    .unwrap();

    let profile = db.s1(&S1Params { person_id: 7 }).unwrap();
    assert_eq!(profile.first_name, "Erik");
    assert_eq!(profile.city_id, BERGEN);
}

#[test]
fn u1_missing_city_is_fatal() {
    let db = db();
    let err = db
        .u1(&U1Params {
            person_id: 8,
            first_name: "Frida".to_string(),
            last_name: "Falk".to_string(),
            gender: "female".to_string(),
            birthday: 0,
            creation_date: 0,
            location_ip: String::new(),
            browser_used: String::new(),
            city_id: 404,
            languages: vec![],
            emails: vec![],
            tag_ids: vec![],
            universities: vec![],
            companies: vec![],
        })
        .unwrap_err();
    assert!(matches!(err, QueryError::MissingVertex(_)));
    assert_eq!(db.store().staged_write_count(), 0);
}

#[test]
fn u2_like_becomes_visible_to_q7() {
    let db = db();
    db.u2(&U2Params { person_id: CAROL, post_id: POST_BY_BELL, creation_date: 30_000 }).unwrap();

    let rows = db
        .q7(&kindred::queries::complex::Q7Params { person_id: ANNA_BELL, limit: 10 })
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].person_id, CAROL);
    assert_eq!(rows[0].message_id, POST_BY_BELL);
}

#[test]
fn u3_comment_like_becomes_visible_to_q7() {
    let db = db();
    db.u3(&U3Params { person_id: CAROL, comment_id: REPLY_BY_BELL, creation_date: 31_000 })
        .unwrap();

    let rows = db
        .q7(&kindred::queries::complex::Q7Params { person_id: ANNA_BELL, limit: 10 })
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].message_id, REPLY_BY_BELL);
}

#[test]
fn forum_post_comment_chain_round_trip() {
    let db = db();
    db.u4(&U4Params {
        forum_id: 2,
        title: "Hiking".to_string(),
        creation_date: 40_000,
        moderator_id: CAROL,
        tag_ids: vec![TAG_MUSIC],
    })
    .unwrap();
    db.u5(&U5Params { forum_id: 2, person_id: CAROL, join_date: 41_000 }).unwrap();
    db.u6(&U6Params {
        post_id: 300,
        image_file: String::new(),
        creation_date: 42_000,
        location_ip: String::new(),
        browser_used: String::new(),
        language: "no".to_string(),
        content: "trail report".to_string(),
        length: 12,
        author_id: CAROL,
        forum_id: 2,
        country_id: NORWAY,
        tag_ids: vec![TAG_MUSIC],
    })
    .unwrap();
    db.u7(&U7Params {
        comment_id: 301,
        creation_date: 43_000,
        location_ip: String::new(),
        browser_used: String::new(),
        content: "which trail?".to_string(),
        length: 12,
        author_id: BOB,
        country_id: NORWAY,
        reply_to_post_id: Some(300),
        reply_to_comment_id: None,
        tag_ids: vec![],
    })
    .unwrap();

    let forum = db.s6(&S6Params { message_id: 301 }).unwrap();
    assert_eq!(forum.forum_id, 2);
    assert_eq!(forum.forum_title, "Hiking");
    assert_eq!(forum.moderator_id, CAROL);
}

#[test]
fn updates_retry_through_injected_conflicts() {
    init_tracing();
    let db = db();
    db.store().fail_next_commits(3);
    db.u8(&U8Params { person1_id: ALICE, person2_id: DANA, creation_date: 1 }).unwrap();

    let rows = db.s3(&S3Params { person_id: DANA }).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].person_id, ALICE);
}

#[test]
fn suppressed_updates_are_acknowledged_without_writing() {
    let store = sample_graph();
    let config = RuntimeConfig { suppress_updates: true, ..RuntimeConfig::default() };
    let db = KindredDb::new(store, config);

    db.u8(&U8Params { person1_id: ALICE, person2_id: DANA, creation_date: 1 }).unwrap();
    assert!(db.s3(&S3Params { person_id: DANA }).unwrap().is_empty());
    assert_eq!(db.store().staged_write_count(), 0);
}

// -- runtime modes ----------------------------------------------------------

#[test]
fn fixture_mode_answers_complex_reads_without_the_store() {
    let store = sample_graph();
    let config = RuntimeConfig {
        fixtures: Some(Fixtures::from_ids(vec![42], vec![7]).unwrap()),
        ..RuntimeConfig::default()
    };
    let db = KindredDb::new(store, config);

    let rows = db
        .q2(&kindred::queries::complex::Q2Params { person_id: ALICE, max_date: 0, limit: 5 })
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.person_id == 42 && r.message_id == 7));
    assert_eq!(db.store().round_trips(), 0);

    // Short reads are never faked.
    let profile = db.s1(&S1Params { person_id: ALICE }).unwrap();
    assert_eq!(profile.first_name, "Alice");
}

#[test]
fn transactional_read_mode_returns_the_same_results() {
    let best_effort = db();
    let transactional = KindredDb::new(
        sample_graph(),
        RuntimeConfig { read_mode: ReadMode::Transactional, ..RuntimeConfig::default() },
    );

    let params = S3Params { person_id: ALICE };
    let a = best_effort.s3(&params).unwrap();
    let b = transactional.s3(&params).unwrap();
    let ids = |rows: &[S3Row]| rows.iter().map(|r| r.person_id).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
}
