//! Shared sample graph for the integration suites
//!
//! A small social network with enough structure to exercise every
//! operation: five connected persons plus an isolated one, two cities in
//! Norway and one in Germany, a forum, three posts, three comments in a
//! reply chain, tags under a two-level tag-class hierarchy, likes, and
//! study/work affiliations.

#![allow(dead_code)] // each suite uses a different slice of the fixture

use kindred::{MemoryStore, PropertyMap, PropertyValue, VertexId};

pub const ALICE: u64 = 1; // Archer, Oslo
pub const BOB: u64 = 2; // Baker, Oslo, friend of Alice
pub const ANNA_BELL: u64 = 3; // Berlin, friend of Alice
pub const ANNA_ADAMS: u64 = 4; // Oslo, friend of Bob
pub const CAROL: u64 = 5; // Cole, Bergen, friend of Anna Adams
pub const DANA: u64 = 6; // isolated

pub const OSLO: u64 = 10;
pub const BERGEN: u64 = 11;
pub const BERLIN: u64 = 12;
pub const NORWAY: u64 = 100;
pub const GERMANY: u64 = 101;
pub const FRANCE: u64 = 102;

pub const TAG_RUST: u64 = 1; // class Programming
pub const TAG_GRAPHS: u64 = 2; // class Technology
pub const TAG_MUSIC: u64 = 3; // class Art

pub const FORUM: u64 = 1;
pub const QUIET_FORUM: u64 = 3; // joined by Anna Adams, no posts
pub const UNI_OSLO: u64 = 50;
pub const ACME: u64 = 51;

pub const POST_BY_BOB: u64 = 100; // 10_000, Norway, tags rust+graphs
pub const POST_BY_ADAMS: u64 = 101; // 10_000, Germany, image post, tag rust
pub const POST_BY_BELL: u64 = 102; // 4_000, Norway, tag music
pub const REPLY_BY_ADAMS: u64 = 200; // 11_000, France, replyOf POST_BY_BOB
pub const REPLY_BY_ALICE: u64 = 201; // 12_000, replyOf REPLY_BY_ADAMS
pub const REPLY_BY_BELL: u64 = 202; // 13_000, replyOf POST_BY_BOB

/// Route `tracing` output through the test harness; repeated calls are
/// no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn date_ms(year: i32, month: u32, day: u32) -> i64 {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn props(pairs: Vec<(&str, PropertyValue)>) -> PropertyMap {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn named(store: &MemoryStore, v: VertexId, name: &str) {
    store.seed_vertex(v, props(vec![("name", name.into())]));
}

fn person(
    store: &MemoryStore,
    id: u64,
    first: &str,
    last: &str,
    birthday: i64,
    city: u64,
) -> VertexId {
    let v = VertexId::person(id);
    store.seed_vertex(
        v,
        props(vec![
            ("firstName", first.into()),
            ("lastName", last.into()),
            ("birthday", PropertyValue::DateTime(birthday)),
            ("creationDate", PropertyValue::DateTime(1_000)),
            ("gender", "female".into()),
            ("browserUsed", "Firefox".into()),
            ("locationIP", "10.0.0.1".into()),
            ("email", vec![format!("{first}@example.org")].into()),
            ("language", vec!["no".to_string()].into()),
        ]),
    );
    store.seed_edge(v, "isLocatedIn", VertexId::place(city), PropertyMap::new());
    v
}

fn post(store: &MemoryStore, id: u64, author: u64, date: i64, content: &str, image: &str) {
    let v = VertexId::post(id);
    store.seed_vertex(
        v,
        props(vec![
            ("content", content.into()),
            ("imageFile", image.into()),
            ("creationDate", PropertyValue::DateTime(date)),
        ]),
    );
    store.seed_edge(v, "hasCreator", VertexId::person(author), PropertyMap::new());
    store.seed_edge(VertexId::forum(FORUM), "containerOf", v, PropertyMap::new());
}

fn comment(store: &MemoryStore, id: u64, author: u64, date: i64, content: &str, parent: VertexId) {
    let v = VertexId::comment(id);
    store.seed_vertex(
        v,
        props(vec![
            ("content", content.into()),
            ("creationDate", PropertyValue::DateTime(date)),
        ]),
    );
    store.seed_edge(v, "hasCreator", VertexId::person(author), PropertyMap::new());
    store.seed_edge(v, "replyOf", parent, PropertyMap::new());
}

fn locate(store: &MemoryStore, message: VertexId, country: u64) {
    store.seed_edge(message, "isLocatedIn", VertexId::place(country), PropertyMap::new());
}

fn tag_message(store: &MemoryStore, message: VertexId, tag: u64) {
    store.seed_edge(message, "hasTag", VertexId::tag(tag), PropertyMap::new());
}

fn like(store: &MemoryStore, person: u64, message: VertexId, date: i64) {
    store.seed_edge(
        VertexId::person(person),
        "likes",
        message,
        props(vec![("creationDate", PropertyValue::DateTime(date))]),
    );
}

pub fn sample_graph() -> MemoryStore {
    let store = MemoryStore::new();

    named(&store, VertexId::place(OSLO), "Oslo");
    named(&store, VertexId::place(BERGEN), "Bergen");
    named(&store, VertexId::place(BERLIN), "Berlin");
    named(&store, VertexId::place(NORWAY), "Norway");
    named(&store, VertexId::place(GERMANY), "Germany");
    named(&store, VertexId::place(FRANCE), "France");
    for (city, country) in [(OSLO, NORWAY), (BERGEN, NORWAY), (BERLIN, GERMANY)] {
        store.seed_edge(
            VertexId::place(city),
            "isPartOf",
            VertexId::place(country),
            PropertyMap::new(),
        );
    }

    person(&store, ALICE, "Alice", "Archer", date_ms(1985, 1, 1), OSLO);
    person(&store, BOB, "Bob", "Baker", date_ms(1986, 2, 2), OSLO);
    person(&store, ANNA_BELL, "Anna", "Bell", date_ms(1987, 3, 3), BERLIN);
    person(&store, ANNA_ADAMS, "Anna", "Adams", date_ms(1990, 4, 25), OSLO);
    person(&store, CAROL, "Carol", "Cole", date_ms(1990, 5, 10), BERGEN);
    person(&store, DANA, "Dana", "Dunn", date_ms(1991, 6, 6), OSLO);

    store.seed_knows(VertexId::person(ALICE), VertexId::person(BOB), 3_000);
    store.seed_knows(VertexId::person(ALICE), VertexId::person(ANNA_BELL), 2_000);
    store.seed_knows(VertexId::person(BOB), VertexId::person(ANNA_ADAMS), 1_000);
    store.seed_knows(VertexId::person(ANNA_ADAMS), VertexId::person(CAROL), 500);

    // Tag-class hierarchy: Programming -> Technology; Art stands alone.
    named(&store, VertexId::tag_class(1), "Programming");
    named(&store, VertexId::tag_class(2), "Technology");
    named(&store, VertexId::tag_class(3), "Art");
    store.seed_edge(
        VertexId::tag_class(1),
        "isSubclassOf",
        VertexId::tag_class(2),
        PropertyMap::new(),
    );
    named(&store, VertexId::tag(TAG_RUST), "rust");
    named(&store, VertexId::tag(TAG_GRAPHS), "graphs");
    named(&store, VertexId::tag(TAG_MUSIC), "music");
    for (tag, class) in [(TAG_RUST, 1), (TAG_GRAPHS, 2), (TAG_MUSIC, 3)] {
        store.seed_edge(
            VertexId::tag(tag),
            "hasType",
            VertexId::tag_class(class),
            PropertyMap::new(),
        );
    }

    store.seed_vertex(
        VertexId::forum(FORUM),
        props(vec![
            ("title", "Rust Forum".into()),
            ("creationDate", PropertyValue::DateTime(1_000)),
        ]),
    );
    store.seed_edge(
        VertexId::forum(FORUM),
        "hasModerator",
        VertexId::person(BOB),
        PropertyMap::new(),
    );
    for (member, join_date) in [(BOB, 5_000), (ANNA_ADAMS, 8_000)] {
        store.seed_edge(
            VertexId::forum(FORUM),
            "hasMember",
            VertexId::person(member),
            props(vec![("joinDate", PropertyValue::DateTime(join_date))]),
        );
    }

    store.seed_vertex(
        VertexId::forum(QUIET_FORUM),
        props(vec![
            ("title", "Quiet Forum".into()),
            ("creationDate", PropertyValue::DateTime(1_000)),
        ]),
    );
    store.seed_edge(
        VertexId::forum(QUIET_FORUM),
        "hasModerator",
        VertexId::person(BOB),
        PropertyMap::new(),
    );
    store.seed_edge(
        VertexId::forum(QUIET_FORUM),
        "hasMember",
        VertexId::person(ANNA_ADAMS),
        props(vec![("joinDate", PropertyValue::DateTime(8_500))]),
    );

    post(&store, POST_BY_BOB, BOB, 10_000, "hello world", "");
    locate(&store, VertexId::post(POST_BY_BOB), NORWAY);
    tag_message(&store, VertexId::post(POST_BY_BOB), TAG_RUST);
    tag_message(&store, VertexId::post(POST_BY_BOB), TAG_GRAPHS);

    post(&store, POST_BY_ADAMS, ANNA_ADAMS, 10_000, "", "photo.jpg");
    locate(&store, VertexId::post(POST_BY_ADAMS), GERMANY);
    tag_message(&store, VertexId::post(POST_BY_ADAMS), TAG_RUST);

    post(&store, POST_BY_BELL, ANNA_BELL, 4_000, "old post", "");
    locate(&store, VertexId::post(POST_BY_BELL), NORWAY);
    tag_message(&store, VertexId::post(POST_BY_BELL), TAG_MUSIC);

    comment(&store, REPLY_BY_ADAMS, ANNA_ADAMS, 11_000, "nice post", VertexId::post(POST_BY_BOB));
    locate(&store, VertexId::comment(REPLY_BY_ADAMS), FRANCE);
    comment(&store, REPLY_BY_ALICE, ALICE, 12_000, "thanks", VertexId::comment(REPLY_BY_ADAMS));
    locate(&store, VertexId::comment(REPLY_BY_ALICE), NORWAY);
    comment(&store, REPLY_BY_BELL, ANNA_BELL, 13_000, "agreed", VertexId::post(POST_BY_BOB));
    locate(&store, VertexId::comment(REPLY_BY_BELL), NORWAY);

    like(&store, ANNA_BELL, VertexId::post(POST_BY_BOB), 15_000);
    like(&store, ANNA_ADAMS, VertexId::post(POST_BY_BOB), 15_000);
    like(&store, CAROL, VertexId::post(POST_BY_BOB), 20_000);

    named(&store, VertexId::organisation(UNI_OSLO), "Uni Oslo");
    store.seed_edge(
        VertexId::organisation(UNI_OSLO),
        "isLocatedIn",
        VertexId::place(OSLO),
        PropertyMap::new(),
    );
    named(&store, VertexId::organisation(ACME), "Acme");
    store.seed_edge(
        VertexId::organisation(ACME),
        "isLocatedIn",
        VertexId::place(GERMANY),
        PropertyMap::new(),
    );
    store.seed_edge(
        VertexId::person(ANNA_BELL),
        "studyAt",
        VertexId::organisation(UNI_OSLO),
        props(vec![("classYear", PropertyValue::Integer(2010))]),
    );
    store.seed_edge(
        VertexId::person(ANNA_BELL),
        "workAt",
        VertexId::organisation(ACME),
        props(vec![("workFrom", PropertyValue::Integer(2015))]),
    );
    store.seed_edge(
        VertexId::person(ANNA_ADAMS),
        "workAt",
        VertexId::organisation(ACME),
        props(vec![("workFrom", PropertyValue::Integer(2012))]),
    );

    store.seed_edge(
        VertexId::person(ALICE),
        "hasInterest",
        VertexId::tag(TAG_RUST),
        PropertyMap::new(),
    );

    store
}
