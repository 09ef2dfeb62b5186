//! Short read operations
//!
//! Point lookups around a single person or message. Same batching rules
//! as the complex reads, just shallower plans.

use super::{content_or_image, friends, messages_of, resolve_message, string_prop, walk_until};
use crate::error::{QueryError, QueryResult};
use crate::graph::property::edge_datetime;
use crate::graph::{Direction, EntityKind, PropertyCache, VertexId};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

// ---------------------------------------------------------------------------
// S1: person profile

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S1Params {
    pub person_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S1Result {
    pub first_name: String,
    pub last_name: String,
    pub birthday: i64,
    pub location_ip: String,
    pub browser_used: String,
    pub city_id: u64,
    pub gender: String,
    pub creation_date: i64,
}

pub fn s1(store: &dyn GraphStore, params: &S1Params) -> QueryResult<S1Result> {
    let person = VertexId::person(params.person_id);
    let mut cache = PropertyCache::new();
    store.hydrate(&[person], &mut cache)?;
    if cache.get(person).is_none() {
        return Err(QueryError::MissingVertex(person));
    }
    let city = store
        .edges_of(person, "isLocatedIn", Direction::Out, false, &[EntityKind::Place])?
        .first()
        .map(|(city, _)| city.local)
        .unwrap_or_default();
    Ok(S1Result {
        first_name: string_prop(&cache, person, "firstName"),
        last_name: string_prop(&cache, person, "lastName"),
        birthday: cache.datetime(person, "birthday").unwrap_or_default(),
        location_ip: string_prop(&cache, person, "locationIP"),
        browser_used: string_prop(&cache, person, "browserUsed"),
        city_id: city,
        gender: string_prop(&cache, person, "gender"),
        creation_date: cache.datetime(person, "creationDate").unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// S2: a person's most recent messages with their original posts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S2Params {
    pub person_id: u64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S2Row {
    pub message_id: u64,
    pub content: String,
    pub creation_date: i64,
    pub original_post_id: u64,
    pub original_post_author_id: u64,
    pub author_first_name: String,
    pub author_last_name: String,
}

pub fn s2(store: &dyn GraphStore, params: &S2Params) -> QueryResult<Vec<S2Row>> {
    let person = VertexId::person(params.person_id);
    let messages = messages_of(store, &[person])?;

    let mut cache = PropertyCache::new();
    store.hydrate(&messages.target_ids(), &mut cache)?;

    let mut ranked: Vec<(i64, VertexId)> = messages
        .target_iter()
        .map(|m| (cache.datetime(m, "creationDate").unwrap_or_default(), m))
        .collect();
    ranked.sort_by_key(|(date, message)| (Reverse(*date), message.local));
    ranked.truncate(params.limit);

    // Reply chains are short; each one is walked to its post, then the
    // authors are resolved in one batch.
    let mut originals = Vec::with_capacity(ranked.len());
    for (_, message) in &ranked {
        let original = walk_until(store, *message, "replyOf", "original post resolution", |v| {
            v.kind == EntityKind::Post
        })?;
        originals.push(original);
    }
    let authors = store.traverse(
        &originals,
        "hasCreator",
        Direction::Out,
        false,
        &[EntityKind::Person],
    )?;
    store.hydrate(&authors.target_ids(), &mut cache)?;

    Ok(ranked
        .into_iter()
        .zip(originals)
        .map(|((creation_date, message), original)| {
            let author = authors.first_target(original);
            S2Row {
                message_id: message.local,
                content: content_or_image(&cache, message),
                creation_date,
                original_post_id: original.local,
                original_post_author_id: author.map(|a| a.local).unwrap_or_default(),
                author_first_name: author
                    .map(|a| string_prop(&cache, a, "firstName"))
                    .unwrap_or_default(),
                author_last_name: author
                    .map(|a| string_prop(&cache, a, "lastName"))
                    .unwrap_or_default(),
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// S3: all friends with friendship dates

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Params {
    pub person_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub friendship_creation_date: i64,
}

pub fn s3(store: &dyn GraphStore, params: &S3Params) -> QueryResult<Vec<S3Row>> {
    let person = VertexId::person(params.person_id);
    let edges = store.edges_of(person, "knows", Direction::Out, true, &[EntityKind::Person])?;

    let mut cache = PropertyCache::new();
    let friend_ids: Vec<VertexId> = edges.iter().map(|(friend, _)| *friend).collect();
    store.hydrate(&friend_ids, &mut cache)?;

    let mut rows: Vec<S3Row> = edges
        .into_iter()
        .map(|(friend, props)| S3Row {
            person_id: friend.local,
            first_name: string_prop(&cache, friend, "firstName"),
            last_name: string_prop(&cache, friend, "lastName"),
            friendship_creation_date: edge_datetime(&props, "creationDate").unwrap_or_default(),
        })
        .collect();
    rows.sort_by_key(|row| (Reverse(row.friendship_creation_date), row.person_id));
    Ok(rows)
}

// ---------------------------------------------------------------------------
// S4: message content

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S4Params {
    pub message_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S4Result {
    pub creation_date: i64,
    pub content: String,
}

pub fn s4(store: &dyn GraphStore, params: &S4Params) -> QueryResult<S4Result> {
    let message = resolve_message(store, params.message_id)?;
    let mut cache = PropertyCache::new();
    store.hydrate(&[message], &mut cache)?;
    Ok(S4Result {
        creation_date: cache.datetime(message, "creationDate").unwrap_or_default(),
        content: content_or_image(&cache, message),
    })
}

// ---------------------------------------------------------------------------
// S5: message creator

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S5Params {
    pub message_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S5Result {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
}

pub fn s5(store: &dyn GraphStore, params: &S5Params) -> QueryResult<S5Result> {
    let message = resolve_message(store, params.message_id)?;
    let creator = store
        .edges_of(message, "hasCreator", Direction::Out, false, &[EntityKind::Person])?
        .first()
        .map(|(person, _)| *person)
        .ok_or(QueryError::MissingVertex(message))?;
    let mut cache = PropertyCache::new();
    store.hydrate(&[creator], &mut cache)?;
    Ok(S5Result {
        person_id: creator.local,
        first_name: string_prop(&cache, creator, "firstName"),
        last_name: string_prop(&cache, creator, "lastName"),
    })
}

// ---------------------------------------------------------------------------
// S6: forum of a message

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S6Params {
    pub message_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S6Result {
    pub forum_id: u64,
    pub forum_title: String,
    pub moderator_id: u64,
    pub moderator_first_name: String,
    pub moderator_last_name: String,
}

/// Walks the reply chain up to the containing post, then hops to its
/// forum and the forum's moderator.
pub fn s6(store: &dyn GraphStore, params: &S6Params) -> QueryResult<S6Result> {
    let message = resolve_message(store, params.message_id)?;
    let post = walk_until(store, message, "replyOf", "forum resolution", |v| {
        v.kind == EntityKind::Post
    })?;
    if post.kind != EntityKind::Post {
        return Err(QueryError::MissingVertex(post));
    }
    let forum = store
        .edges_of(post, "containerOf", Direction::In, false, &[EntityKind::Forum])?
        .first()
        .map(|(forum, _)| *forum)
        .ok_or(QueryError::MissingVertex(post))?;
    let moderator = store
        .edges_of(forum, "hasModerator", Direction::Out, false, &[EntityKind::Person])?
        .first()
        .map(|(person, _)| *person)
        .ok_or(QueryError::MissingVertex(forum))?;

    let mut cache = PropertyCache::new();
    store.hydrate(&[forum, moderator], &mut cache)?;
    Ok(S6Result {
        forum_id: forum.local,
        forum_title: string_prop(&cache, forum, "title"),
        moderator_id: moderator.local,
        moderator_first_name: string_prop(&cache, moderator, "firstName"),
        moderator_last_name: string_prop(&cache, moderator, "lastName"),
    })
}

// ---------------------------------------------------------------------------
// S7: direct replies to a message

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S7Params {
    pub message_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S7Row {
    pub comment_id: u64,
    pub content: String,
    pub creation_date: i64,
    pub author_id: u64,
    pub author_first_name: String,
    pub author_last_name: String,
    /// Whether the reply author and the message author know each other;
    /// false when they are the same person.
    pub knows_original_author: bool,
}

pub fn s7(store: &dyn GraphStore, params: &S7Params) -> QueryResult<Vec<S7Row>> {
    let message = resolve_message(store, params.message_id)?;
    let original_author = store
        .edges_of(message, "hasCreator", Direction::Out, false, &[EntityKind::Person])?
        .first()
        .map(|(person, _)| *person)
        .ok_or(QueryError::MissingVertex(message))?;
    let author_friends = friends(store, original_author)?;

    let replies =
        store.traverse(&[message], "replyOf", Direction::In, false, &[EntityKind::Comment])?;
    let reply_authors = store.traverse(
        &replies.target_ids(),
        "hasCreator",
        Direction::Out,
        false,
        &[EntityKind::Person],
    )?;

    let mut cache = PropertyCache::new();
    store.hydrate(&replies.target_ids(), &mut cache)?;
    store.hydrate(&reply_authors.target_ids(), &mut cache)?;

    let mut rows: Vec<S7Row> = replies
        .target_iter()
        .map(|reply| {
            let author = reply_authors.first_target(reply);
            S7Row {
                comment_id: reply.local,
                content: content_or_image(&cache, reply),
                creation_date: cache.datetime(reply, "creationDate").unwrap_or_default(),
                author_id: author.map(|a| a.local).unwrap_or_default(),
                author_first_name: author
                    .map(|a| string_prop(&cache, a, "firstName"))
                    .unwrap_or_default(),
                author_last_name: author
                    .map(|a| string_prop(&cache, a, "lastName"))
                    .unwrap_or_default(),
                knows_original_author: author
                    .map(|a| a != original_author && author_friends.contains(&a))
                    .unwrap_or(false),
            }
        })
        .collect();
    rows.sort_by_key(|row| (Reverse(row.creation_date), row.author_id));
    Ok(rows)
}
