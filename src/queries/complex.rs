//! Complex read operations (queries 1-12)
//!
//! Each evaluator is a hop-and-prune plan: every traversal and hydration
//! is batched over a whole frontier, so the number of store round trips is
//! bounded by the plan depth, never by result cardinality. Results are
//! fully sorted before the limit is applied, with descending primary keys
//! tie-broken by ascending identifier.

use super::{content_or_image, friends, friends_and_fof, messages_of, string_prop, WALK_DEPTH_LIMIT};
use crate::error::{QueryError, QueryResult};
use crate::graph::property::{edge_datetime, edge_integer};
use crate::graph::{Direction, EntityKind, Frontier, PropertyCache, VertexId};
use crate::store::{hydrate_targets, GraphStore};
use chrono::{DateTime, Datelike};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

const DAY_MS: i64 = 86_400_000;

/// University or company summary attached to a query-1 row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganisationDetail {
    pub name: String,
    pub year: i64,
    pub place: String,
}

// ---------------------------------------------------------------------------
// Q1: friends with a given first name, by graph distance

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q1Params {
    pub person_id: u64,
    pub first_name: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q1Row {
    pub friend_id: u64,
    pub last_name: String,
    pub distance: u32,
    pub birthday: i64,
    pub creation_date: i64,
    pub gender: String,
    pub browser_used: String,
    pub location_ip: String,
    pub emails: Vec<String>,
    pub languages: Vec<String>,
    pub city_name: String,
    pub universities: Vec<OrganisationDetail>,
    pub companies: Vec<OrganisationDetail>,
}

/// Bounded breadth-first search over `knows`, up to three hops. Matches
/// are ranked per level (last name asc, id asc); deeper levels are only
/// expanded while the limit is unmet. The level index is the reported
/// distance.
pub fn q1(store: &dyn GraphStore, params: &Q1Params) -> QueryResult<Vec<Q1Row>> {
    let start = VertexId::person(params.person_id);
    let mut cache = PropertyCache::new();

    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    seen.insert(start);
    let mut current = vec![start];
    let mut matched: Vec<(u32, VertexId)> = Vec::new();

    for distance in 0..3u32 {
        if current.is_empty() {
            break;
        }
        let hop =
            store.traverse(&current, "knows", Direction::Out, false, &[EntityKind::Person])?;
        let mut next: Vec<VertexId> = Vec::new();
        for target in hop.target_iter() {
            if seen.insert(target) {
                next.push(target);
            }
        }
        store.hydrate(&next, &mut cache)?;

        let mut level: Vec<VertexId> = next
            .iter()
            .copied()
            .filter(|v| cache.string(*v, "firstName") == Some(params.first_name.as_str()))
            .collect();
        level.sort_by(|a, b| {
            let last_a = cache.string(*a, "lastName").unwrap_or_default();
            let last_b = cache.string(*b, "lastName").unwrap_or_default();
            last_a.cmp(last_b).then(a.local.cmp(&b.local))
        });
        matched.extend(level.into_iter().map(|v| (distance, v)));

        if matched.len() >= params.limit {
            break;
        }
        current = next;
    }
    matched.truncate(params.limit);

    let people: Vec<VertexId> = matched.iter().map(|(_, v)| *v).collect();
    let cities =
        store.traverse(&people, "isLocatedIn", Direction::Out, false, &[EntityKind::Place])?;
    let studies =
        store.traverse(&people, "studyAt", Direction::Out, true, &[EntityKind::Organisation])?;
    let works =
        store.traverse(&people, "workAt", Direction::Out, true, &[EntityKind::Organisation])?;

    let mut org_ids = studies.target_ids();
    org_ids.extend(works.target_ids());
    let org_places =
        store.traverse(&org_ids, "isLocatedIn", Direction::Out, false, &[EntityKind::Place])?;

    let mut to_hydrate = cities.target_ids();
    to_hydrate.extend(org_ids);
    to_hydrate.extend(org_places.target_ids());
    store.hydrate(&to_hydrate, &mut cache)?;

    let rows = matched
        .into_iter()
        .map(|(distance, v)| {
            let org_details = |frontier: &Frontier, year_key: &str| {
                let mut out = Vec::new();
                if let Some(neighbors) = frontier.neighbors(v) {
                    for (org, props) in neighbors.iter_with_props() {
                        out.push(OrganisationDetail {
                            name: string_prop(&cache, org, "name"),
                            year: props.and_then(|p| edge_integer(p, year_key)).unwrap_or_default(),
                            place: org_places
                                .first_target(org)
                                .map(|p| string_prop(&cache, p, "name"))
                                .unwrap_or_default(),
                        });
                    }
                }
                out
            };
            Q1Row {
                friend_id: v.local,
                last_name: string_prop(&cache, v, "lastName"),
                distance,
                birthday: cache.datetime(v, "birthday").unwrap_or_default(),
                creation_date: cache.datetime(v, "creationDate").unwrap_or_default(),
                gender: string_prop(&cache, v, "gender"),
                browser_used: string_prop(&cache, v, "browserUsed"),
                location_ip: string_prop(&cache, v, "locationIP"),
                emails: cache.list(v, "email").map(<[String]>::to_vec).unwrap_or_default(),
                languages: cache.list(v, "language").map(<[String]>::to_vec).unwrap_or_default(),
                city_name: cities
                    .first_target(v)
                    .map(|c| string_prop(&cache, c, "name"))
                    .unwrap_or_default(),
                universities: org_details(&studies, "classYear"),
                companies: org_details(&works, "workFrom"),
            }
        })
        .collect();
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Q2: recent messages by friends

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q2Params {
    pub person_id: u64,
    pub max_date: i64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q2Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub message_id: u64,
    pub content: String,
    pub creation_date: i64,
}

pub fn q2(store: &dyn GraphStore, params: &Q2Params) -> QueryResult<Vec<Q2Row>> {
    let start = VertexId::person(params.person_id);
    let friend_set = friends(store, start)?;
    let friend_vec: Vec<VertexId> = friend_set.into_iter().collect();
    let messages = messages_of(store, &friend_vec)?;

    let mut cache = PropertyCache::new();
    hydrate_targets(store, &messages, &mut cache)?;
    store.hydrate(&friend_vec, &mut cache)?;

    let mut hits: Vec<(i64, VertexId, VertexId)> = Vec::new();
    for (creator, neighbors) in messages.iter() {
        for message in &neighbors.targets {
            let date = cache.datetime(*message, "creationDate").unwrap_or_default();
            if date <= params.max_date {
                hits.push((date, *message, creator));
            }
        }
    }
    hits.sort_by_key(|(date, message, _)| (Reverse(*date), message.local));
    hits.truncate(params.limit);

    Ok(hits
        .into_iter()
        .map(|(date, message, creator)| Q2Row {
            person_id: creator.local,
            first_name: string_prop(&cache, creator, "firstName"),
            last_name: string_prop(&cache, creator, "lastName"),
            message_id: message.local,
            content: content_or_image(&cache, message),
            creation_date: date,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Q3: persons posting from both of two foreign countries

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q3Params {
    pub person_id: u64,
    pub country_x: String,
    pub country_y: String,
    pub start_date: i64,
    pub duration_days: i64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q3Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub count_x: u64,
    pub count_y: u64,
    pub count_total: u64,
}

pub fn q3(store: &dyn GraphStore, params: &Q3Params) -> QueryResult<Vec<Q3Row>> {
    let start = VertexId::person(params.person_id);
    let end_date = params.start_date + params.duration_days * DAY_MS;
    let persons: Vec<VertexId> = friends_and_fof(store, start)?.into_iter().collect();

    let mut cache = PropertyCache::new();

    // Residence country: person -> city -> country. Persons living in
    // either queried country are excluded.
    let cities =
        store.traverse(&persons, "isLocatedIn", Direction::Out, false, &[EntityKind::Place])?;
    let countries = store.traverse(
        &cities.target_ids(),
        "isPartOf",
        Direction::Out,
        false,
        &[EntityKind::Place],
    )?;
    store.hydrate(&countries.target_ids(), &mut cache)?;

    let candidates: Vec<VertexId> = persons
        .iter()
        .copied()
        .filter(|person| {
            let home = cities
                .first_target(*person)
                .and_then(|city| countries.first_target(city))
                .map(|country| string_prop(&cache, country, "name"))
                .unwrap_or_default();
            home != params.country_x && home != params.country_y
        })
        .collect();

    let messages = messages_of(store, &candidates)?;
    let message_countries = store.traverse(
        &messages.target_ids(),
        "isLocatedIn",
        Direction::Out,
        false,
        &[EntityKind::Place],
    )?;
    store.hydrate(&messages.target_ids(), &mut cache)?;
    store.hydrate(&message_countries.target_ids(), &mut cache)?;
    store.hydrate(&candidates, &mut cache)?;

    let mut rows: Vec<Q3Row> = Vec::new();
    for (person, neighbors) in messages.iter() {
        let mut count_x = 0u64;
        let mut count_y = 0u64;
        for message in &neighbors.targets {
            let date = cache.datetime(*message, "creationDate").unwrap_or_default();
            if date < params.start_date || date >= end_date {
                continue;
            }
            let country = message_countries
                .first_target(*message)
                .map(|c| string_prop(&cache, c, "name"))
                .unwrap_or_default();
            if country == params.country_x {
                count_x += 1;
            } else if country == params.country_y {
                count_y += 1;
            }
        }
        if count_x > 0 && count_y > 0 {
            rows.push(Q3Row {
                person_id: person.local,
                first_name: string_prop(&cache, person, "firstName"),
                last_name: string_prop(&cache, person, "lastName"),
                count_x,
                count_y,
                count_total: count_x + count_y,
            });
        }
    }
    rows.sort_by_key(|row| (Reverse(row.count_total), row.person_id));
    rows.truncate(params.limit);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Q4: new topics among friends' posts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q4Params {
    pub person_id: u64,
    pub start_date: i64,
    pub duration_days: i64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q4Row {
    pub tag_name: String,
    pub post_count: u64,
}

/// Tags carried only by friends' posts inside the window; a tag seen on
/// any friend post created before the window is disqualified entirely.
pub fn q4(store: &dyn GraphStore, params: &Q4Params) -> QueryResult<Vec<Q4Row>> {
    let start = VertexId::person(params.person_id);
    let end_date = params.start_date + params.duration_days * DAY_MS;
    let friend_vec: Vec<VertexId> = friends(store, start)?.into_iter().collect();

    let posts =
        store.traverse(&friend_vec, "hasCreator", Direction::In, false, &[EntityKind::Post])?;
    let mut cache = PropertyCache::new();
    store.hydrate(&posts.target_ids(), &mut cache)?;

    let tags =
        store.traverse(&posts.target_ids(), "hasTag", Direction::Out, false, &[EntityKind::Tag])?;
    store.hydrate(&tags.target_ids(), &mut cache)?;

    let mut in_window: FxHashMap<VertexId, u64> = FxHashMap::default();
    let mut banned: FxHashSet<VertexId> = FxHashSet::default();
    for post in posts.target_iter() {
        let date = cache.datetime(post, "creationDate").unwrap_or_default();
        let Some(post_tags) = tags.neighbors(post) else { continue };
        if date < params.start_date {
            banned.extend(post_tags.targets.iter().copied());
        } else if date < end_date {
            for tag in &post_tags.targets {
                *in_window.entry(*tag).or_default() += 1;
            }
        }
    }

    let mut rows: Vec<Q4Row> = in_window
        .into_iter()
        .filter(|(tag, _)| !banned.contains(tag))
        .map(|(tag, post_count)| Q4Row {
            tag_name: string_prop(&cache, tag, "name"),
            post_count,
        })
        .collect();
    rows.sort_by(|a, b| b.post_count.cmp(&a.post_count).then_with(|| a.tag_name.cmp(&b.tag_name)));
    rows.truncate(params.limit);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Q5: new groups joined by friends and friends-of-friends

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q5Params {
    pub person_id: u64,
    pub min_date: i64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q5Row {
    pub forum_title: String,
    pub post_count: u64,
}

/// Forums joined after `min_date`, ranked by how many posts the joining
/// members made in them. A qualifying forum with no such posts still
/// appears with a zero count.
pub fn q5(store: &dyn GraphStore, params: &Q5Params) -> QueryResult<Vec<Q5Row>> {
    let start = VertexId::person(params.person_id);
    let members: Vec<VertexId> = friends_and_fof(store, start)?.into_iter().collect();

    let memberships =
        store.traverse(&members, "hasMember", Direction::In, true, &[EntityKind::Forum])?;

    let mut joined: FxHashSet<(VertexId, VertexId)> = FxHashSet::default();
    let mut forums: FxHashSet<VertexId> = FxHashSet::default();
    for (person, neighbors) in memberships.iter() {
        for (forum, props) in neighbors.iter_with_props() {
            let join_date = props.and_then(|p| edge_datetime(p, "joinDate")).unwrap_or_default();
            if join_date > params.min_date {
                joined.insert((forum, person));
                forums.insert(forum);
            }
        }
    }

    let posts =
        store.traverse(&members, "hasCreator", Direction::In, false, &[EntityKind::Post])?;
    let post_forums = store.traverse(
        &posts.target_ids(),
        "containerOf",
        Direction::In,
        false,
        &[EntityKind::Forum],
    )?;

    let mut counts: FxHashMap<VertexId, u64> = FxHashMap::default();
    for (person, neighbors) in posts.iter() {
        for post in &neighbors.targets {
            if let Some(forum) = post_forums.first_target(*post) {
                if joined.contains(&(forum, person)) {
                    *counts.entry(forum).or_default() += 1;
                }
            }
        }
    }

    let mut cache = PropertyCache::new();
    let forum_vec: Vec<VertexId> = forums.iter().copied().collect();
    store.hydrate(&forum_vec, &mut cache)?;

    let mut ranked: Vec<(VertexId, u64)> = forum_vec
        .into_iter()
        .map(|forum| (forum, counts.get(&forum).copied().unwrap_or_default()))
        .collect();
    ranked.sort_by_key(|(forum, count)| (Reverse(*count), forum.local));
    ranked.truncate(params.limit);

    Ok(ranked
        .into_iter()
        .map(|(forum, post_count)| Q5Row {
            forum_title: string_prop(&cache, forum, "title"),
            post_count,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Q6: tags co-occurring with a given tag

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q6Params {
    pub person_id: u64,
    pub tag_name: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q6Row {
    pub tag_name: String,
    pub post_count: u64,
}

pub fn q6(store: &dyn GraphStore, params: &Q6Params) -> QueryResult<Vec<Q6Row>> {
    let start = VertexId::person(params.person_id);
    let persons: Vec<VertexId> = friends_and_fof(store, start)?.into_iter().collect();

    let posts =
        store.traverse(&persons, "hasCreator", Direction::In, false, &[EntityKind::Post])?;
    let tags =
        store.traverse(&posts.target_ids(), "hasTag", Direction::Out, false, &[EntityKind::Tag])?;
    let mut cache = PropertyCache::new();
    store.hydrate(&tags.target_ids(), &mut cache)?;

    let mut counts: FxHashMap<String, u64> = FxHashMap::default();
    for post in posts.target_iter() {
        let Some(post_tags) = tags.neighbors(post) else { continue };
        let names: Vec<&str> = post_tags
            .targets
            .iter()
            .filter_map(|tag| cache.string(*tag, "name"))
            .collect();
        if !names.iter().any(|name| *name == params.tag_name) {
            continue;
        }
        for name in names {
            if name != params.tag_name {
                *counts.entry(name.to_string()).or_default() += 1;
            }
        }
    }

    let mut rows: Vec<Q6Row> = counts
        .into_iter()
        .map(|(tag_name, post_count)| Q6Row { tag_name, post_count })
        .collect();
    rows.sort_by(|a, b| b.post_count.cmp(&a.post_count).then_with(|| a.tag_name.cmp(&b.tag_name)));
    rows.truncate(params.limit);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Q7: most recent likers of a person's messages

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q7Params {
    pub person_id: u64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q7Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub like_creation_date: i64,
    pub is_new: bool,
    pub message_id: u64,
    pub content: String,
    pub latency_minutes: i32,
}

/// One row per liker, carrying their most recent like; when a liker liked
/// several messages at the same instant the lowest message id wins.
pub fn q7(store: &dyn GraphStore, params: &Q7Params) -> QueryResult<Vec<Q7Row>> {
    let start = VertexId::person(params.person_id);
    let messages = messages_of(store, &[start])?;
    let likes = store.traverse(
        &messages.target_ids(),
        "likes",
        Direction::In,
        true,
        &[EntityKind::Person],
    )?;

    let mut best: FxHashMap<VertexId, (i64, VertexId)> = FxHashMap::default();
    for (message, neighbors) in likes.iter() {
        for (liker, props) in neighbors.iter_with_props() {
            let date = props.and_then(|p| edge_datetime(p, "creationDate")).unwrap_or_default();
            match best.get(&liker) {
                Some((best_date, best_message))
                    if *best_date > date
                        || (*best_date == date && best_message.local <= message.local) => {}
                _ => {
                    best.insert(liker, (date, message));
                }
            }
        }
    }

    let friend_set = friends(store, start)?;
    let mut cache = PropertyCache::new();
    let likers: Vec<VertexId> = best.keys().copied().collect();
    store.hydrate(&likers, &mut cache)?;
    store.hydrate(&messages.target_ids(), &mut cache)?;

    let mut ranked: Vec<(VertexId, i64, VertexId)> = best
        .into_iter()
        .map(|(liker, (date, message))| (liker, date, message))
        .collect();
    ranked.sort_by_key(|(liker, date, _)| (Reverse(*date), liker.local));
    ranked.truncate(params.limit);

    Ok(ranked
        .into_iter()
        .map(|(liker, like_date, message)| {
            let created = cache.datetime(message, "creationDate").unwrap_or_default();
            Q7Row {
                person_id: liker.local,
                first_name: string_prop(&cache, liker, "firstName"),
                last_name: string_prop(&cache, liker, "lastName"),
                like_creation_date: like_date,
                is_new: !friend_set.contains(&liker) && liker != start,
                message_id: message.local,
                content: content_or_image(&cache, message),
                latency_minutes: ((like_date - created) / 60_000) as i32,
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Q8: most recent replies to a person's messages

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q8Params {
    pub person_id: u64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q8Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub creation_date: i64,
    pub comment_id: u64,
    pub content: String,
}

pub fn q8(store: &dyn GraphStore, params: &Q8Params) -> QueryResult<Vec<Q8Row>> {
    let start = VertexId::person(params.person_id);
    let messages = messages_of(store, &[start])?;
    let replies = store.traverse(
        &messages.target_ids(),
        "replyOf",
        Direction::In,
        false,
        &[EntityKind::Comment],
    )?;
    let authors = store.traverse(
        &replies.target_ids(),
        "hasCreator",
        Direction::Out,
        false,
        &[EntityKind::Person],
    )?;

    let mut cache = PropertyCache::new();
    hydrate_targets(store, &replies, &mut cache)?;
    hydrate_targets(store, &authors, &mut cache)?;

    let mut ranked: Vec<(i64, VertexId)> = replies
        .target_iter()
        .map(|reply| (cache.datetime(reply, "creationDate").unwrap_or_default(), reply))
        .collect();
    ranked.sort_by_key(|(date, reply)| (Reverse(*date), reply.local));
    ranked.truncate(params.limit);

    Ok(ranked
        .into_iter()
        .map(|(creation_date, reply)| {
            let author = authors.first_target(reply);
            Q8Row {
                person_id: author.map(|a| a.local).unwrap_or_default(),
                first_name: author.map(|a| string_prop(&cache, a, "firstName")).unwrap_or_default(),
                last_name: author.map(|a| string_prop(&cache, a, "lastName")).unwrap_or_default(),
                creation_date,
                comment_id: reply.local,
                content: content_or_image(&cache, reply),
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Q9: recent messages within two hops

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q9Params {
    pub person_id: u64,
    pub max_date: i64,
    pub limit: usize,
}

pub type Q9Row = Q2Row;

pub fn q9(store: &dyn GraphStore, params: &Q9Params) -> QueryResult<Vec<Q9Row>> {
    let start = VertexId::person(params.person_id);
    let persons: Vec<VertexId> = friends_and_fof(store, start)?.into_iter().collect();
    let messages = messages_of(store, &persons)?;

    let mut cache = PropertyCache::new();
    store.hydrate(&messages.target_ids(), &mut cache)?;
    store.hydrate(&persons, &mut cache)?;

    let mut hits: Vec<(i64, VertexId, VertexId)> = Vec::new();
    for (creator, neighbors) in messages.iter() {
        for message in &neighbors.targets {
            let date = cache.datetime(*message, "creationDate").unwrap_or_default();
            if date < params.max_date {
                hits.push((date, *message, creator));
            }
        }
    }
    hits.sort_by_key(|(date, message, _)| (Reverse(*date), message.local));
    hits.truncate(params.limit);

    Ok(hits
        .into_iter()
        .map(|(date, message, creator)| Q9Row {
            person_id: creator.local,
            first_name: string_prop(&cache, creator, "firstName"),
            last_name: string_prop(&cache, creator, "lastName"),
            message_id: message.local,
            content: content_or_image(&cache, message),
            creation_date: date,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Q10: friend recommendation by birthday window and shared interests

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q10Params {
    pub person_id: u64,
    /// Calendar month 1-12.
    pub month: u32,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q10Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub common_interest_score: i64,
    pub gender: String,
    pub city_name: String,
}

fn birthday_in_window(birthday_ms: i64, month: u32) -> bool {
    let Some(date) = DateTime::from_timestamp_millis(birthday_ms) else {
        return false;
    };
    let next_month = month % 12 + 1;
    (date.month() == month && date.day() >= 21) || (date.month() == next_month && date.day() < 22)
}

/// Strict friends-of-friends (direct friends and the person excluded)
/// whose birthday falls in [month 21st, next month 22nd). Score counts
/// each candidate post tagged with one of the person's interests as +1
/// and every other post as -1; candidates without posts score 0.
pub fn q10(store: &dyn GraphStore, params: &Q10Params) -> QueryResult<Vec<Q10Row>> {
    let start = VertexId::person(params.person_id);
    let friend_set = friends(store, start)?;
    let friend_vec: Vec<VertexId> = friend_set.iter().copied().collect();
    let mut hop2 =
        store.traverse(&friend_vec, "knows", Direction::Out, false, &[EntityKind::Person])?;

    // Strictly two hops out: direct friends and the person drop out.
    let mut exclude = friend_set;
    exclude.insert(start);
    hop2.subtract(&exclude);

    let mut cache = PropertyCache::new();
    let fof = hop2.target_ids();
    store.hydrate(&fof, &mut cache)?;

    let candidates: Vec<VertexId> = fof
        .into_iter()
        .filter(|v| {
            cache
                .datetime(*v, "birthday")
                .map(|b| birthday_in_window(b, params.month))
                .unwrap_or(false)
        })
        .collect();

    let interests: FxHashSet<VertexId> = store
        .traverse(&[start], "hasInterest", Direction::Out, false, &[EntityKind::Tag])?
        .target_iter()
        .collect();

    let posts =
        store.traverse(&candidates, "hasCreator", Direction::In, false, &[EntityKind::Post])?;
    let post_tags =
        store.traverse(&posts.target_ids(), "hasTag", Direction::Out, false, &[EntityKind::Tag])?;
    let cities =
        store.traverse(&candidates, "isLocatedIn", Direction::Out, false, &[EntityKind::Place])?;
    store.hydrate(&cities.target_ids(), &mut cache)?;

    let mut rows: Vec<Q10Row> = candidates
        .into_iter()
        .map(|candidate| {
            let mut common = 0i64;
            let mut total = 0i64;
            if let Some(neighbors) = posts.neighbors(candidate) {
                for post in &neighbors.targets {
                    total += 1;
                    let tagged = post_tags
                        .neighbors(*post)
                        .map(|t| t.targets.iter().any(|tag| interests.contains(tag)))
                        .unwrap_or(false);
                    if tagged {
                        common += 1;
                    }
                }
            }
            Q10Row {
                person_id: candidate.local,
                first_name: string_prop(&cache, candidate, "firstName"),
                last_name: string_prop(&cache, candidate, "lastName"),
                common_interest_score: 2 * common - total,
                gender: string_prop(&cache, candidate, "gender"),
                city_name: cities
                    .first_target(candidate)
                    .map(|c| string_prop(&cache, c, "name"))
                    .unwrap_or_default(),
            }
        })
        .collect();
    rows.sort_by_key(|row| (Reverse(row.common_interest_score), row.person_id));
    rows.truncate(params.limit);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Q11: job referral candidates

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q11Params {
    pub person_id: u64,
    pub country_name: String,
    pub year: i64,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q11Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub organisation_name: String,
    pub work_from: i64,
}

pub fn q11(store: &dyn GraphStore, params: &Q11Params) -> QueryResult<Vec<Q11Row>> {
    let start = VertexId::person(params.person_id);
    let persons: Vec<VertexId> = friends_and_fof(store, start)?.into_iter().collect();

    let works =
        store.traverse(&persons, "workAt", Direction::Out, true, &[EntityKind::Organisation])?;
    let org_countries = store.traverse(
        &works.target_ids(),
        "isLocatedIn",
        Direction::Out,
        false,
        &[EntityKind::Place],
    )?;

    let mut cache = PropertyCache::new();
    store.hydrate(&works.target_ids(), &mut cache)?;
    store.hydrate(&org_countries.target_ids(), &mut cache)?;
    store.hydrate(&persons, &mut cache)?;

    let mut rows: Vec<Q11Row> = Vec::new();
    for (person, neighbors) in works.iter() {
        for (org, props) in neighbors.iter_with_props() {
            let Some(work_from) = props.and_then(|p| edge_integer(p, "workFrom")) else {
                continue;
            };
            if work_from >= params.year {
                continue;
            }
            let country = org_countries
                .first_target(org)
                .map(|c| string_prop(&cache, c, "name"))
                .unwrap_or_default();
            if country != params.country_name {
                continue;
            }
            rows.push(Q11Row {
                person_id: person.local,
                first_name: string_prop(&cache, person, "firstName"),
                last_name: string_prop(&cache, person, "lastName"),
                organisation_name: string_prop(&cache, org, "name"),
                work_from,
            });
        }
    }
    rows.sort_by(|a, b| {
        a.work_from
            .cmp(&b.work_from)
            .then(a.person_id.cmp(&b.person_id))
            .then_with(|| b.organisation_name.cmp(&a.organisation_name))
    });
    rows.truncate(params.limit);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Q12: expert search via the tag-class hierarchy

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q12Params {
    pub person_id: u64,
    pub tag_class_name: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q12Row {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub tag_names: Vec<String>,
    pub reply_count: u64,
}

/// Friends ranked by how many of their comments reply to posts tagged
/// under the given tag class (directly or through `isSubclassOf`
/// ancestors). The upward hierarchy walk is depth-guarded; stored class
/// hierarchies are trees, so exceeding the guard means corrupt linkage.
pub fn q12(store: &dyn GraphStore, params: &Q12Params) -> QueryResult<Vec<Q12Row>> {
    let start = VertexId::person(params.person_id);
    let friend_vec: Vec<VertexId> = friends(store, start)?.into_iter().collect();

    let comments =
        store.traverse(&friend_vec, "hasCreator", Direction::In, false, &[EntityKind::Comment])?;
    let replied = store.traverse(
        &comments.target_ids(),
        "replyOf",
        Direction::Out,
        false,
        &[EntityKind::Post],
    )?;
    let post_tags = store.traverse(
        &replied.target_ids(),
        "hasTag",
        Direction::Out,
        false,
        &[EntityKind::Tag],
    )?;
    let tag_classes = store.traverse(
        &post_tags.target_ids(),
        "hasType",
        Direction::Out,
        false,
        &[EntityKind::TagClass],
    )?;

    let mut cache = PropertyCache::new();

    // Resolve each class's ancestor chain level by level, one hop per
    // level across all unresolved classes.
    let mut parent_of: FxHashMap<VertexId, VertexId> = FxHashMap::default();
    let mut level = tag_classes.target_ids();
    let mut seen: FxHashSet<VertexId> = level.iter().copied().collect();
    let mut depth = 0usize;
    while !level.is_empty() {
        depth += 1;
        if depth > WALK_DEPTH_LIMIT {
            return Err(QueryError::TraversalDepthExceeded {
                operation: "tag-class hierarchy",
                limit: WALK_DEPTH_LIMIT,
            });
        }
        store.hydrate(&level, &mut cache)?;
        let parents = store.traverse(
            &level,
            "isSubclassOf",
            Direction::Out,
            false,
            &[EntityKind::TagClass],
        )?;
        let mut next = Vec::new();
        for (child, neighbors) in parents.iter() {
            if let Some(parent) = neighbors.first() {
                parent_of.insert(child, parent);
                if seen.insert(parent) {
                    next.push(parent);
                }
            }
        }
        level = next;
    }

    let class_qualifies = |mut class: VertexId| {
        for _ in 0..=WALK_DEPTH_LIMIT {
            if cache.string(class, "name") == Some(params.tag_class_name.as_str()) {
                return true;
            }
            match parent_of.get(&class) {
                Some(parent) => class = *parent,
                None => return false,
            }
        }
        false
    };
    let qualifying_tags: FxHashSet<VertexId> = post_tags
        .target_iter()
        .filter(|tag| {
            tag_classes
                .neighbors(*tag)
                .map(|classes| classes.targets.iter().any(|c| class_qualifies(*c)))
                .unwrap_or(false)
        })
        .collect();

    // comment -> qualifying tags of the post it replies to; comments
    // whose post carries none drop out with the retain.
    let mut comment_tags = Frontier::fuse(&replied, &post_tags, false);
    comment_tags.retain_targets(&qualifying_tags);
    let qualifying_comments: FxHashSet<VertexId> =
        comment_tags.keys().into_iter().collect();

    store.hydrate(&friend_vec, &mut cache)?;
    store.hydrate(&comment_tags.target_ids(), &mut cache)?;

    let mut rows: Vec<Q12Row> = Vec::new();
    for (friend, neighbors) in comments.iter() {
        let mut reply_count = 0u64;
        let mut names: FxHashSet<String> = FxHashSet::default();
        for comment in &neighbors.targets {
            if !qualifying_comments.contains(comment) {
                continue;
            }
            reply_count += 1;
            if let Some(tags) = comment_tags.neighbors(*comment) {
                for tag in &tags.targets {
                    names.insert(string_prop(&cache, *tag, "name"));
                }
            }
        }
        if reply_count > 0 {
            let mut tag_names: Vec<String> = names.into_iter().collect();
            tag_names.sort();
            rows.push(Q12Row {
                person_id: friend.local,
                first_name: string_prop(&cache, friend, "firstName"),
                last_name: string_prop(&cache, friend, "lastName"),
                tag_names,
                reply_count,
            });
        }
    }
    rows.sort_by_key(|row| (Reverse(row.reply_count), row.person_id));
    rows.truncate(params.limit);
    Ok(rows)
}
